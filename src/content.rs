//! Static content: question chapters, enemy pools, player archetypes.
//!
//! The engine treats this as read-only input. `ContentSet::builtin()`
//! ships a small demo dataset; hosts build their own set from whatever
//! question bank they load.

use crate::state::Relic;

/// Marker for a fill-in slot inside question content.
pub const BLANK_MARKER: &str = "{{BLANK}}";

// ── Questions ─────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Question {
    pub id: u32,
    /// Text with zero or more `{{BLANK}}` placeholders.
    pub content: String,
    /// Expected answers, one per blank, delimited by `、`, `,` or `，`.
    pub answer: String,
    /// Explicit blank count for content without placeholders.
    pub blanks: u32,
    /// Per-blank distractor options; may be shorter than the blank count.
    pub distractors: Vec<Vec<String>>,
    pub difficulty: u8,
    pub hint: Option<String>,
}

impl Question {
    /// Number of blanks: placeholder occurrences, else the explicit
    /// field, never less than 1.
    pub fn blank_count(&self) -> usize {
        let placeholders = self.content.matches(BLANK_MARKER).count();
        if placeholders > 0 {
            placeholders
        } else {
            self.blanks.max(1) as usize
        }
    }

    /// Accepted answers: the answer field split on common delimiters,
    /// trimmed, empties removed.
    pub fn split_answers(&self) -> Vec<String> {
        self.answer
            .split(['、', ',', '，'])
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Chapter {
    pub name: String,
    pub questions: Vec<Question>,
}

/// Substituted when the content set has no usable questions, so a run
/// never fails for lack of material.
pub fn placeholder_question() -> (Question, String) {
    (
        Question {
            id: 0,
            content: format!("Placeholder question {}?", BLANK_MARKER),
            answer: "A".into(),
            blanks: 1,
            distractors: Vec::new(),
            difficulty: 1,
            hint: None,
        },
        "Practice".into(),
    )
}

// ── Enemies ───────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyTier {
    Normal,
    Elite,
    Boss,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnemyDef {
    pub name: String,
    pub hp: i32,
    /// Damage dealt per wrong answer. 0 means "use the default".
    pub attack: i32,
    pub sprite: String,
}

impl EnemyDef {
    pub fn new(name: &str, hp: i32, attack: i32, sprite: &str) -> Self {
        Self {
            name: name.into(),
            hp,
            attack,
            sprite: sprite.into(),
        }
    }
}

// ── Player archetypes ─────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Archetype {
    pub name: &'static str,
    pub hp: i32,
    pub max_hp: i32,
    pub gold: u32,
    pub strength: i32,
    pub talent: Relic,
    pub talent_name: &'static str,
    pub talent_desc: &'static str,
    pub desc: &'static str,
}

pub fn archetype(class: crate::state::ClassKey) -> Archetype {
    use crate::state::ClassKey;
    match class {
        ClassKey::Scholar => Archetype {
            name: "Scholar",
            hp: 80,
            max_hp: 80,
            gold: 99,
            strength: 0,
            talent: Relic::Erudite,
            talent_name: "Erudite",
            talent_desc: "20% chance of +5 gold after winning a battle.",
            desc: "A balanced start for steady climbers.",
        },
        ClassKey::Warrior => Archetype {
            name: "Warrior",
            hp: 95,
            max_hp: 95,
            gold: 75,
            strength: 1,
            talent: Relic::IronOath,
            talent_name: "Iron Oath",
            talent_desc: "Forged in drills and repetition.",
            desc: "More health, less coin.",
        },
        ClassKey::Mage => Archetype {
            name: "Mage",
            hp: 70,
            max_hp: 70,
            gold: 120,
            strength: 0,
            talent: Relic::ArcaneInsight,
            talent_name: "Arcane Insight",
            talent_desc: "Sees patterns where others see noise.",
            desc: "Fragile, but starts wealthy.",
        },
    }
}

// ── Content set ───────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct ContentSet {
    pub chapters: Vec<Chapter>,
    pub normal_enemies: Vec<EnemyDef>,
    pub elite_enemies: Vec<EnemyDef>,
    pub boss_enemies: Vec<EnemyDef>,
}

impl ContentSet {
    pub fn enemy_pool(&self, tier: EnemyTier) -> &[EnemyDef] {
        match tier {
            EnemyTier::Normal => &self.normal_enemies,
            EnemyTier::Elite => &self.elite_enemies,
            EnemyTier::Boss => &self.boss_enemies,
        }
    }

    /// Small built-in dataset used by the demo host and tests.
    pub fn builtin() -> Self {
        let chapters = vec![
            Chapter {
                name: "Foundations".into(),
                questions: vec![
                    Question {
                        id: 1,
                        content: format!(
                            "Water boils at {} degrees Celsius at sea level.",
                            BLANK_MARKER
                        ),
                        answer: "100".into(),
                        blanks: 1,
                        distractors: vec![vec!["90".into(), "110".into(), "212".into()]],
                        difficulty: 1,
                        hint: Some("Think metric.".into()),
                    },
                    Question {
                        id: 2,
                        content: format!(
                            "The three primary colors of light are {}, {} and {}.",
                            BLANK_MARKER, BLANK_MARKER, BLANK_MARKER
                        ),
                        answer: "red, green, blue".into(),
                        blanks: 3,
                        distractors: vec![
                            vec!["yellow".into(), "cyan".into(), "magenta".into()],
                            vec!["yellow".into(), "orange".into(), "violet".into()],
                            vec!["yellow".into(), "white".into(), "black".into()],
                        ],
                        difficulty: 2,
                        hint: None,
                    },
                ],
            },
            Chapter {
                name: "Numbers".into(),
                questions: vec![
                    Question {
                        id: 3,
                        content: format!("The smallest prime number is {}.", BLANK_MARKER),
                        answer: "2".into(),
                        blanks: 1,
                        distractors: vec![vec!["1".into(), "3".into(), "0".into()]],
                        difficulty: 1,
                        hint: None,
                    },
                    Question {
                        id: 4,
                        content: format!(
                            "A right angle measures {} degrees.",
                            BLANK_MARKER
                        ),
                        answer: "90".into(),
                        blanks: 1,
                        distractors: vec![vec!["45".into(), "180".into(), "60".into()]],
                        difficulty: 1,
                        hint: None,
                    },
                ],
            },
        ];

        Self {
            chapters,
            normal_enemies: vec![
                EnemyDef::new("Page Imp", 30, 8, "imp"),
                EnemyDef::new("Ink Slime", 35, 10, "slime"),
                EnemyDef::new("Dust Bookworm", 28, 9, "worm"),
            ],
            elite_enemies: vec![
                EnemyDef::new("Margin Fiend", 60, 14, "fiend"),
                EnemyDef::new("Footnote Golem", 70, 12, "golem"),
            ],
            boss_enemies: vec![EnemyDef::new("The Final Examiner", 120, 15, "examiner")],
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────
