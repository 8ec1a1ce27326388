//! Battle engine — question sequencing, answer resolution, pacing.
//!
//! A battle is a loop of fill-in-the-blank prompts against one enemy:
//! a correct pick damages the enemy, a wrong pick damages the player.
//! Between resolutions the battle holds an explicit pending step for a
//! short (correct) or long (wrong — time to read the expected answer)
//! delay; while it is pending, all answer input is rejected, so a blank
//! can never resolve twice. `tick` drives pending steps forward.

use crate::achievements::{check_achievement, AchievementId};
use crate::content::{placeholder_question, EnemyDef, EnemyTier, Question};
use crate::save;
use crate::state::{
    BattleEnemy, BattleState, BlankState, BlankStatus, PendingStep, QuestionView, RunState,
    Relic, Scene, UiEvent,
};

/// Damage per correct answer before the strength bonus.
pub const BASE_DAMAGE: i32 = 10;
/// Enemy attack used when the enemy definition leaves it unset.
pub const DEFAULT_ENEMY_ATTACK: i32 = 10;

/// Pacing after a correct answer: 1.5 s at 10 ticks/sec.
pub const CORRECT_DELAY_TICKS: u32 = 15;
/// Pacing after a wrong/forfeited answer: 10 s to read the expected
/// answer.
pub const WRONG_DELAY_TICKS: u32 = 100;

/// Number of battles the Neow's Lament relic affects.
const LAMENT_BATTLES: u32 = 3;

// ── Battle start ──────────────────────────────────────────────

fn spawn_enemy(state: &mut RunState, tier: EnemyTier) -> BattleEnemy {
    let pool_len = state.content.enemy_pool(tier).len();
    let def: EnemyDef = if pool_len == 0 {
        EnemyDef::new("Training Dummy", 30, DEFAULT_ENEMY_ATTACK, "dummy")
    } else {
        let idx = state.roll(pool_len as u32) as usize;
        state.content.enemy_pool(tier)[idx].clone()
    };

    let mut hp = def.hp;
    if state.player.has_relic(Relic::NeowsLament) && state.battles_started < LAMENT_BATTLES {
        hp = 1;
    }

    BattleEnemy {
        name: def.name,
        tier,
        hp,
        max_hp: hp,
        attack: def.attack,
    }
}

/// Spawn an enemy of the given tier and open the first question.
pub fn start_battle(state: &mut RunState, tier: EnemyTier) {
    let enemy = spawn_enemy(state, tier);
    state.battles_started += 1;
    state.add_log(&format!("{} appears!", enemy.name));
    state.battle = Some(BattleState::new(enemy));
    state.scene = Scene::Battle;
    state.emit(UiEvent::SceneChanged(Scene::Battle));
    set_battle_question(state);
    load_battle_question(state);
}

// ── Question lifecycle ────────────────────────────────────────

fn draw_question(state: &mut RunState) -> (Question, String) {
    let candidates: Vec<usize> = state
        .content
        .chapters
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.questions.is_empty())
        .map(|(i, _)| i)
        .collect();
    if candidates.is_empty() {
        return placeholder_question();
    }
    let ci = candidates[state.roll(candidates.len() as u32) as usize];
    let qi = state.roll(state.content.chapters[ci].questions.len() as u32) as usize;
    let chapter = &state.content.chapters[ci];
    (chapter.questions[qi].clone(), chapter.name.clone())
}

/// Draw a fresh question and reset all per-question battle fields.
pub fn set_battle_question(state: &mut RunState) {
    let (question, chapter) = draw_question(state);
    let total_blanks = question.blank_count();
    let answers = question.split_answers();

    let battle = match state.battle.as_mut() {
        Some(b) => b,
        None => return,
    };
    battle.chapter = chapter;
    battle.answers = answers;
    battle.blank_index = 0;
    battle.total_blanks = total_blanks;
    battle.blank_states = vec![BlankState::pending(); total_blanks];
    battle.question = Some(question);
    battle.question_index += 1;
}

/// Expected answer for the current blank: answer-at-index, else the
/// first answer, else the raw answer field.
fn current_correct_answer(battle: &BattleState) -> String {
    battle
        .answers
        .get(battle.blank_index)
        .or_else(|| battle.answers.first())
        .cloned()
        .or_else(|| battle.question.as_ref().map(|q| q.answer.clone()))
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Emit the presentation payload for the current blank: question text,
/// blank progress and a shuffled 4-card option set. Never changes
/// battle state (only the option shuffle advances the RNG).
pub fn load_battle_question(state: &mut RunState) {
    if state.battle.as_ref().is_some_and(|b| b.question.is_none()) {
        set_battle_question(state);
    }

    let (correct, mut options, view_base) = {
        let battle = match state.battle.as_ref() {
            Some(b) => b,
            None => return,
        };
        let question = match battle.question.as_ref() {
            Some(q) => q,
            None => return,
        };
        let correct = current_correct_answer(battle);

        let mut distractors: Vec<String> = question
            .distractors
            .get(battle.blank_index)
            .map(|d| d.iter().take(3).cloned().collect())
            .unwrap_or_default();
        distractors.retain(|d| !d.is_empty() && *d != correct);
        while distractors.len() < 3 {
            distractors.push(format!("Option {}", distractors.len() + 1));
        }

        let view = QuestionView {
            chapter: battle.chapter.clone(),
            content: question.content.clone(),
            blank_index: battle.blank_index,
            total_blanks: battle.total_blanks,
            blank_states: battle.blank_states.clone(),
            options: Vec::new(),
        };
        (correct, distractors, view)
    };

    options.push(correct);
    // Fisher-Yates with the run RNG.
    for i in (1..options.len()).rev() {
        let j = state.roll((i + 1) as u32) as usize;
        options.swap(i, j);
    }

    let mut view = view_base;
    view.options = options;
    state.emit(UiEvent::QuestionUpdated(view));
}

// ── Answer resolution ─────────────────────────────────────────

/// True when a battle is active and not paused on a pacing delay.
fn can_accept_input(state: &RunState) -> bool {
    state.scene == Scene::Battle
        && state
            .battle
            .as_ref()
            .is_some_and(|b| b.question.is_some() && b.pending.is_none())
}

/// Resolve the current blank against the picked option. Silently
/// ignored outside a battle or while a pacing delay is pending.
pub fn handle_card_select(state: &mut RunState, selected: &str) -> bool {
    if !can_accept_input(state) {
        return false;
    }

    let correct = current_correct_answer(state.battle.as_ref().unwrap());
    let is_correct = selected == correct;

    let battle = state.battle.as_mut().unwrap();
    let blank_index = battle.blank_index;
    battle.blank_states[blank_index] = BlankState {
        status: if is_correct {
            BlankStatus::Correct
        } else {
            BlankStatus::Wrong
        },
        // A wrong pick shows the expected answer in the blank.
        value: if is_correct {
            selected.to_string()
        } else {
            correct.clone()
        },
    };
    battle.turn += 1;

    if is_correct {
        resolve_correct(state)
    } else {
        resolve_wrong(state)
    }
}

fn resolve_correct(state: &mut RunState) -> bool {
    let damage = BASE_DAMAGE + state.player.strength;
    let battle = state.battle.as_mut().unwrap();
    battle.enemy.hp -= damage;
    battle.total_correct += 1;
    battle.streak += 1;
    if battle.streak > battle.max_streak {
        battle.max_streak = battle.streak;
    }
    let streak = battle.streak;
    let enemy_dead = battle.enemy.hp <= 0;

    state.stats.total_correct_answers += 1;
    if streak > state.stats.max_streak {
        state.stats.max_streak = streak;
    }

    check_achievement(state, AchievementId::FirstCorrect);
    if streak >= 5 {
        check_achievement(state, AchievementId::Combo5);
    }
    if streak >= 10 {
        check_achievement(state, AchievementId::Combo10);
        check_achievement(state, AchievementId::StreakMaster);
    }
    if state.stats.total_correct_answers >= 100 {
        check_achievement(state, AchievementId::Total100);
    }

    state.add_log(&format!("Correct! Dealt {} damage.", damage));
    state.emit(UiEvent::StatsUpdated);

    if enemy_dead {
        end_battle(state, true);
        return true;
    }
    schedule_next_battle_step(state, CORRECT_DELAY_TICKS);
    true
}

fn resolve_wrong(state: &mut RunState) -> bool {
    let battle = state.battle.as_mut().unwrap();
    let attack = if battle.enemy.attack > 0 {
        battle.enemy.attack
    } else {
        DEFAULT_ENEMY_ATTACK
    };
    battle.streak = 0;
    battle.took_damage = true;

    state.player.hp -= attack;
    state.stats.total_wrong_answers += 1;
    state.add_log(&format!("Wrong! Took {} damage.", attack));
    state.emit(UiEvent::StatsUpdated);

    if state.player.hp <= 0 {
        end_battle(state, false);
        return true;
    }
    schedule_next_battle_step(state, WRONG_DELAY_TICKS);
    true
}

/// Forfeit the current blank: resolved as wrong with the expected
/// answer recorded, followed by the long pacing delay.
pub fn end_player_turn(state: &mut RunState) -> bool {
    if !can_accept_input(state) {
        return false;
    }

    let correct = current_correct_answer(state.battle.as_ref().unwrap());
    let battle = state.battle.as_mut().unwrap();
    let blank_index = battle.blank_index;
    battle.blank_states[blank_index] = BlankState {
        status: BlankStatus::Wrong,
        value: correct,
    };
    battle.turn += 1;

    resolve_wrong(state)
}

// ── Pacing ────────────────────────────────────────────────────

fn schedule_next_battle_step(state: &mut RunState, delay_ticks: u32) {
    if let Some(battle) = state.battle.as_mut() {
        battle.pending = Some(PendingStep {
            ticks_left: delay_ticks,
        });
    }
}

/// Advance battle pacing by `delta_ticks`. When a pending delay runs
/// out, move to the next blank (or draw a new question) and re-emit
/// the question view, which re-enables input.
pub fn tick(state: &mut RunState, delta_ticks: u32) {
    if state.scene != Scene::Battle || delta_ticks == 0 {
        return;
    }
    let expired = match state.battle.as_mut() {
        Some(battle) => match battle.pending.as_mut() {
            Some(step) => {
                step.ticks_left = step.ticks_left.saturating_sub(delta_ticks);
                step.ticks_left == 0
            }
            None => false,
        },
        None => false,
    };
    if !expired {
        return;
    }

    let needs_new_question = {
        let battle = state.battle.as_mut().unwrap();
        battle.pending = None;
        if battle.blank_index + 1 < battle.total_blanks {
            battle.blank_index += 1;
            false
        } else {
            true
        }
    };
    if needs_new_question {
        set_battle_question(state);
    }
    load_battle_question(state);
}

// ── Battle end ────────────────────────────────────────────────

fn gold_reward_for(tier: EnemyTier) -> u32 {
    match tier {
        EnemyTier::Normal => 25,
        EnemyTier::Elite => 75,
        EnemyTier::Boss => 150,
    }
}

/// Close out the battle: bookkeeping, rewards, achievements, save.
/// A win waits on the result screen for `ContinueAfterBattle`; a loss
/// ends the run.
pub fn end_battle(state: &mut RunState, win: bool) {
    let battle = match state.battle.as_mut() {
        Some(b) => b,
        None => return,
    };
    battle.pending = None;
    let tier = battle.enemy.tier;
    let took_damage = battle.took_damage;
    let total_correct = battle.total_correct;
    let max_streak = battle.max_streak;

    state.stats.total_battles += 1;

    if win {
        state.stats.total_wins += 1;
        state.stats.enemies_defeated += 1;

        let mut gold_reward = gold_reward_for(tier);
        if tier == EnemyTier::Boss {
            state.stats.bosses_defeated += 1;
            check_achievement(state, AchievementId::BossSlayer);
        }
        if state.player.has_relic(Relic::Erudite) && state.roll(100) < 20 {
            gold_reward += 5;
        }

        state.player.gold += gold_reward;
        state.stats.gold_earned += gold_reward;

        check_achievement(state, AchievementId::FirstWin);
        if state.stats.gold_earned >= 500 {
            check_achievement(state, AchievementId::GoldCollector);
        }
        if !took_damage {
            check_achievement(state, AchievementId::PerfectClear);
        }

        let floor_reached = state.current_floor as u32 + 1;
        if floor_reached > state.stats.highest_floor {
            state.stats.highest_floor = floor_reached;
        }

        state.add_log(&format!("Victory! +{} gold.", gold_reward));
        state.scene = Scene::BattleResult;
        state.emit(UiEvent::SceneChanged(Scene::BattleResult));
        state.emit(UiEvent::BattleResult {
            win: true,
            gold_reward,
            total_correct,
            max_streak,
        });
    } else {
        state.add_log("The run is over...");
        state.scene = Scene::GameOver;
        state.emit(UiEvent::SceneChanged(Scene::GameOver));
        state.emit(UiEvent::GameOver {
            floor_reached: state.current_floor as u32 + 1,
            enemies_defeated: state.stats.enemies_defeated,
            gold_earned: state.stats.gold_earned,
            total_correct: state.stats.total_correct_answers,
        });
    }

    save::save_game(state);
}

// ── Tests ─────────────────────────────────────────────────────
