//! Recall Spire run state — all data structures, no logic.
//!
//! One `RunState` owns everything a run mutates (player, map, battle,
//! stats, achievements). Components receive `&mut RunState`; there are
//! no ambient singletons, so every test can build an isolated run.

use serde::{Deserialize, Serialize};

use crate::achievements::Achievements;
use crate::content::{ContentSet, EnemyTier, Question};
use crate::save::KvStore;

// ── Player ────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassKey {
    Scholar,
    Warrior,
    Mage,
}

/// A permanent capability carried for the rest of the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relic {
    /// Scholar talent: 20% chance of +5 gold after a battle win.
    Erudite,
    /// Warrior talent.
    IronOath,
    /// Mage talent.
    ArcaneInsight,
    /// Enemies in the first 3 battles of the run spawn with 1 hp.
    NeowsLament,
}

/// A permanent negative modifier, removable only by the purge scroll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Curse {
    Burden,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Player {
    pub class_key: Option<ClassKey>,
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub gold: u32,
    pub strength: i32,
    pub armor: i32,
    pub relics: Vec<Relic>,
    pub curses: Vec<Curse>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            class_key: None,
            name: String::new(),
            hp: 80,
            max_hp: 80,
            gold: 99,
            strength: 0,
            armor: 0,
            relics: Vec::new(),
            curses: Vec::new(),
        }
    }
}

impl Player {
    pub fn has_relic(&self, relic: Relic) -> bool {
        self.relics.contains(&relic)
    }

    /// Heal without exceeding max hp.
    pub fn heal(&mut self, amount: i32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }
}

// ── Map Nodes ─────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeType {
    Enemy,
    Elite,
    Boss,
    Treasure,
    Merchant,
    Rest,
    Unknown,
}

/// Lifecycle is monotonic except for the single-active-path rule:
/// an `Available` sibling reverts to `Locked` when another node on the
/// same floor is completed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeState {
    Locked,
    Available,
    Completed,
}

#[derive(Clone, Debug)]
pub struct MapNode {
    pub floor: usize,
    pub lane: usize,
    pub kind: NodeType,
    /// Lane indices on the next floor this node connects to.
    /// Sorted, deduplicated, always contains `lane` below the top floor.
    pub next: Vec<usize>,
    pub state: NodeState,
}

// ── Battle ────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct BattleEnemy {
    pub name: String,
    pub tier: EnemyTier,
    pub hp: i32,
    pub max_hp: i32,
    pub attack: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlankStatus {
    Pending,
    Correct,
    Wrong,
}

/// Resolution record for one blank of the current question.
#[derive(Clone, Debug, PartialEq)]
pub struct BlankState {
    pub status: BlankStatus,
    /// The answer shown for this blank once resolved: the player's pick
    /// when correct, the expected answer when wrong.
    pub value: String,
}

impl BlankState {
    pub fn pending() -> Self {
        Self {
            status: BlankStatus::Pending,
            value: String::new(),
        }
    }
}

/// Pacing delay between answer resolution and the next blank/question.
/// While set, answer input is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingStep {
    pub ticks_left: u32,
}

#[derive(Clone, Debug)]
pub struct BattleState {
    pub enemy: BattleEnemy,
    pub turn: u32,
    pub streak: u32,
    pub max_streak: u32,
    pub total_correct: u32,
    pub question_index: u32,
    pub took_damage: bool,
    pub question: Option<Question>,
    pub chapter: String,
    /// Accepted answers for the current question, one per blank where
    /// available (split from the question's delimited answer field).
    pub answers: Vec<String>,
    pub blank_index: usize,
    pub total_blanks: usize,
    pub blank_states: Vec<BlankState>,
    pub pending: Option<PendingStep>,
}

impl BattleState {
    pub fn new(enemy: BattleEnemy) -> Self {
        Self {
            enemy,
            turn: 0,
            streak: 0,
            max_streak: 0,
            total_correct: 0,
            question_index: 0,
            took_damage: false,
            question: None,
            chapter: String::new(),
            answers: Vec::new(),
            blank_index: 0,
            total_blanks: 0,
            blank_states: Vec::new(),
            pending: None,
        }
    }
}

// ── Stats ─────────────────────────────────────────────────────

/// Run-spanning counters. Monotonically non-decreasing except via an
/// explicit reset; these survive restarts through the save record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub total_battles: u32,
    pub total_wins: u32,
    pub total_correct_answers: u32,
    pub total_wrong_answers: u32,
    pub max_streak: u32,
    pub gold_earned: u32,
    pub enemies_defeated: u32,
    pub bosses_defeated: u32,
    pub highest_floor: u32,
}

// ── Scenes & Commands payloads ────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scene {
    MainMenu,
    CharacterSelect,
    /// The blessing choice between character select and the map.
    Neow,
    Map,
    Battle,
    /// Victory modal after a won battle; continuing completes the node.
    BattleResult,
    Shop,
    Rest,
    GameOver,
    /// Act 1 cleared — the floor-14 boss node was completed.
    Victory,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NeowOption {
    /// +100 gold.
    Gold,
    /// +8 max hp (and hp).
    Vitality,
    /// Gain the Neow's Lament relic.
    Lament,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestChoice {
    Heal,
    Upgrade,
}

// ── Outbound events ───────────────────────────────────────────

/// Presentation payload for the current blank of the current question.
#[derive(Clone, Debug, PartialEq)]
pub struct QuestionView {
    pub chapter: String,
    pub content: String,
    pub blank_index: usize,
    pub total_blanks: usize,
    pub blank_states: Vec<BlankState>,
    /// Shuffled option cards; contains the expected answer exactly once.
    pub options: Vec<String>,
}

/// Events drained by the presentation adapter after each command/tick.
#[derive(Clone, Debug, PartialEq)]
pub enum UiEvent {
    SceneChanged(Scene),
    MapUpdated,
    QuestionUpdated(QuestionView),
    StatsUpdated,
    AchievementUnlocked(crate::achievements::AchievementId),
    BattleResult {
        win: bool,
        gold_reward: u32,
        total_correct: u32,
        max_streak: u32,
    },
    GameOver {
        floor_reached: u32,
        enemies_defeated: u32,
        gold_earned: u32,
        total_correct: u32,
    },
    Notice(String),
}

// ── Root Run State ────────────────────────────────────────────

pub struct RunState {
    pub content: ContentSet,
    pub scene: Scene,
    pub player: Player,
    pub selected_class: ClassKey,

    /// 15 floors × 3 lanes; empty until the Neow choice generates it.
    pub map: Vec<Vec<MapNode>>,
    pub current_node: Option<(usize, usize)>,
    pub current_floor: usize,
    pub act: u32,

    pub battle: Option<BattleState>,

    pub stats: Stats,
    pub achievements: Achievements,
    pub study_streak: u32,
    pub last_study_date: Option<String>,

    /// Battles started this run, for the Neow's Lament relic window.
    pub battles_started: u32,

    pub rng_seed: u64,
    pub log: Vec<String>,
    pub ui_events: Vec<UiEvent>,

    /// Local key-value store for the save record. `None` keeps the run
    /// fully in memory (persistence-unavailable degradation).
    pub store: Option<Box<dyn KvStore>>,
}

impl RunState {
    pub fn new(content: ContentSet, rng_seed: u64) -> Self {
        Self {
            content,
            scene: Scene::MainMenu,
            player: Player::default(),
            selected_class: ClassKey::Scholar,
            map: Vec::new(),
            current_node: None,
            current_floor: 0,
            act: 1,
            battle: None,
            stats: Stats::default(),
            achievements: Achievements::default(),
            study_streak: 0,
            last_study_date: None,
            battles_started: 0,
            rng_seed,
            log: Vec::new(),
            ui_events: Vec::new(),
            store: None,
        }
    }

    pub fn with_store(mut self, store: Box<dyn KvStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn add_log(&mut self, text: &str) {
        self.log.push(text.to_string());
        if self.log.len() > 50 {
            self.log.remove(0);
        }
    }

    pub fn emit(&mut self, event: UiEvent) {
        self.ui_events.push(event);
    }

    /// Drain pending presentation events in emission order.
    pub fn drain_events(&mut self) -> Vec<UiEvent> {
        std::mem::take(&mut self.ui_events)
    }

    /// Advance the run RNG and return a value in `0..max`.
    pub fn roll(&mut self, max: u32) -> u32 {
        self.rng_seed = self
            .rng_seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.rng_seed >> 33) % max.max(1) as u64) as u32
    }

    pub fn node(&self, floor: usize, lane: usize) -> Option<&MapNode> {
        self.map.get(floor)?.get(lane)
    }

    pub fn node_mut(&mut self, floor: usize, lane: usize) -> Option<&mut MapNode> {
        self.map.get_mut(floor)?.get_mut(lane)
    }

    /// Back to the main menu, keeping stats, achievements and the study
    /// record. The next run starts from scratch (floor 0, act 1).
    pub fn reset_run(&mut self) {
        self.scene = Scene::MainMenu;
        self.player = Player::default();
        self.map.clear();
        self.current_node = None;
        self.current_floor = 0;
        self.act = 1;
        self.battle = None;
        self.battles_started = 0;
        self.emit(UiEvent::SceneChanged(Scene::MainMenu));
    }
}

// ── Tests ─────────────────────────────────────────────────────
