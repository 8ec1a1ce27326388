//! End-to-end run scenarios driven through the command surface.

use recall_spire::battle::{self, CORRECT_DELAY_TICKS, WRONG_DELAY_TICKS};
use recall_spire::commands::{handle_command, Command};
use recall_spire::content::{Chapter, ContentSet, EnemyDef, Question, BLANK_MARKER};
use recall_spire::map::{FLOORS, LANES};
use recall_spire::save::{self, MemoryStore};
use recall_spire::state::{
    ClassKey, NeowOption, NodeState, RestChoice, RunState, Scene, UiEvent,
};
use recall_spire::time::GameTime;

/// One single-blank question ("4") and a configurable normal enemy.
fn content_with_enemy(hp: i32, attack: i32) -> ContentSet {
    ContentSet {
        chapters: vec![Chapter {
            name: "Arithmetic".into(),
            questions: vec![Question {
                id: 1,
                content: format!("2 + 2 = {}", BLANK_MARKER),
                answer: "4".into(),
                blanks: 1,
                distractors: vec![vec!["3".into(), "5".into(), "22".into()]],
                difficulty: 1,
                hint: None,
            }],
        }],
        normal_enemies: vec![EnemyDef::new("Page Imp", hp, attack, "imp")],
        elite_enemies: vec![EnemyDef::new("Margin Fiend", 60, 14, "fiend")],
        boss_enemies: vec![EnemyDef::new("The Final Examiner", 120, 15, "examiner")],
    }
}

fn start_run(content: ContentSet, class: ClassKey) -> RunState {
    let mut s = RunState::new(content, 42);
    assert!(handle_command(&mut s, &Command::SelectCharacter(class)));
    assert!(handle_command(&mut s, &Command::StartGame));
    assert!(handle_command(&mut s, &Command::ChooseNeowOption(NeowOption::Gold)));
    assert_eq!(s.scene, Scene::Map);
    s
}

fn first_available_lane(s: &RunState, floor: usize) -> usize {
    (0..LANES)
        .find(|&lane| s.node(floor, lane).unwrap().state == NodeState::Available)
        .expect("an available node on the floor")
}

// ── Scenario A ────────────────────────────────────────────────

#[test]
fn scenario_a_three_correct_answers_win_the_battle() {
    let mut s = start_run(content_with_enemy(30, 8), ClassKey::Scholar);
    assert_eq!(s.player.strength, 0);

    let lane = first_available_lane(&s, 0);
    assert!(handle_command(&mut s, &Command::SelectNode { floor: 0, lane }));
    assert_eq!(s.scene, Scene::Battle);

    for hit in 1..=3 {
        assert!(
            handle_command(&mut s, &Command::SelectAnswer("4".into())),
            "hit {} rejected",
            hit
        );
        if hit < 3 {
            assert_eq!(s.battle.as_ref().unwrap().enemy.hp, 30 - 10 * hit);
            battle::tick(&mut s, CORRECT_DELAY_TICKS);
        }
    }

    // 30 − 10 − 10 − 10 = 0, exactly lethal on the third hit.
    assert_eq!(s.battle.as_ref().unwrap().enemy.hp, 0);
    assert_eq!(s.scene, Scene::BattleResult);
    assert_eq!(s.stats.total_wins, 1);
    assert!(s
        .drain_events()
        .iter()
        .any(|e| matches!(e, UiEvent::BattleResult { win: true, .. })));
}

// ── Scenario B ────────────────────────────────────────────────

#[test]
fn scenario_b_two_wrong_answers_end_the_run() {
    let mut s = start_run(content_with_enemy(50, 10), ClassKey::Scholar);
    let lane = first_available_lane(&s, 0);
    handle_command(&mut s, &Command::SelectNode { floor: 0, lane });
    s.player.hp = 20;

    assert!(handle_command(&mut s, &Command::SelectAnswer("5".into())));
    assert_eq!(s.player.hp, 10);
    battle::tick(&mut s, WRONG_DELAY_TICKS);
    assert!(handle_command(&mut s, &Command::SelectAnswer("5".into())));

    assert_eq!(s.player.hp, 0);
    assert_eq!(s.scene, Scene::GameOver);
    let game_over = s
        .drain_events()
        .into_iter()
        .find_map(|e| match e {
            UiEvent::GameOver {
                enemies_defeated, ..
            } => Some(enemies_defeated),
            _ => None,
        })
        .expect("game-over payload");
    assert_eq!(game_over, 0);
}

// ── Scenario C ────────────────────────────────────────────────

#[test]
fn scenario_c_shop_purchase_requires_enough_gold() {
    let mut s = start_run(content_with_enemy(30, 8), ClassKey::Scholar);
    s.map[0][0].kind = recall_spire::state::NodeType::Merchant;
    assert!(handle_command(&mut s, &Command::SelectNode { floor: 0, lane: 0 }));
    assert_eq!(s.scene, Scene::Shop);

    // 40 gold cannot buy the 50-gold potion: nothing changes.
    s.player.gold = 40;
    s.player.hp = 50;
    assert!(!handle_command(&mut s, &Command::BuyItem("heal_potion".into())));
    assert_eq!(s.player.gold, 40);
    assert_eq!(s.player.hp, 50);

    // 60 gold buys it, deducting exactly 50.
    s.player.gold = 60;
    assert!(handle_command(&mut s, &Command::BuyItem("heal_potion".into())));
    assert_eq!(s.player.gold, 10);
    assert_eq!(s.player.hp, 80);

    assert!(handle_command(&mut s, &Command::CloseShop));
    assert_eq!(s.scene, Scene::Map);
    assert_eq!(s.node(0, 0).unwrap().state, NodeState::Completed);
}

// ── Scenario D ────────────────────────────────────────────────

#[test]
fn scenario_d_reload_preserves_stats_but_resets_run_position() {
    let content = content_with_enemy(30, 8);
    let mut s = RunState::new(content.clone(), 42).with_store(Box::new(MemoryStore::default()));
    handle_command(&mut s, &Command::StartGame);
    handle_command(&mut s, &Command::ChooseNeowOption(NeowOption::Gold));

    // Win one battle so there is something worth persisting.
    let lane = first_available_lane(&s, 0);
    handle_command(&mut s, &Command::SelectNode { floor: 0, lane });
    for _ in 0..3 {
        handle_command(&mut s, &Command::SelectAnswer("4".into()));
        battle::tick(&mut s, CORRECT_DELAY_TICKS);
    }
    assert_eq!(s.scene, Scene::BattleResult);
    handle_command(&mut s, &Command::ContinueAfterBattle);
    assert_eq!(s.current_floor, 0);
    assert!(s.stats.total_wins > 0);

    let stats = s.stats.clone();
    let achievements = s.achievements.clone();

    // "Restart the process": new state over the same store.
    let store = s.store.take().unwrap();
    let mut reloaded = RunState::new(content, 7).with_store(store);
    assert!(save::load_game(&mut reloaded));

    assert_eq!(reloaded.stats, stats);
    assert_eq!(reloaded.achievements, achievements);
    assert_eq!(reloaded.scene, Scene::MainMenu);
    assert_eq!(reloaded.current_floor, 0);
    assert_eq!(reloaded.act, 1);
    assert!(reloaded.map.is_empty());
}

// ── Pacing lockout through wall-clock time ────────────────────

#[test]
fn wrong_answer_locks_input_for_ten_seconds() {
    let mut s = start_run(content_with_enemy(50, 5), ClassKey::Scholar);
    let lane = first_available_lane(&s, 0);
    handle_command(&mut s, &Command::SelectNode { floor: 0, lane });

    assert!(handle_command(&mut s, &Command::SelectAnswer("wrong".into())));

    let mut clock = GameTime::default();
    clock.update(0.0);
    // 5 seconds in 250 ms frames: still locked.
    let mut now = 0.0;
    for _ in 0..20 {
        now += 250.0;
        battle::tick(&mut s, clock.update(now));
    }
    assert!(!handle_command(&mut s, &Command::SelectAnswer("4".into())));

    // The other 5 seconds: input opens up again.
    for _ in 0..20 {
        now += 250.0;
        battle::tick(&mut s, clock.update(now));
    }
    assert!(handle_command(&mut s, &Command::SelectAnswer("4".into())));
}

// ── Full climb ────────────────────────────────────────────────

#[test]
fn full_run_reaches_victory() {
    let mut s = start_run(content_with_enemy(30, 8), ClassKey::Scholar);
    // Tall hp so random traps along the way can never end the run.
    s.player.max_hp = 10_000;
    s.player.hp = 10_000;

    for floor in 0..FLOORS {
        let lane = first_available_lane(&s, floor);
        assert!(
            handle_command(&mut s, &Command::SelectNode { floor, lane }),
            "floor {} lane {} not selectable",
            floor,
            lane
        );

        let mut guard = 0;
        loop {
            guard += 1;
            assert!(guard < 200, "floor {} did not resolve", floor);
            match s.scene {
                Scene::Battle => {
                    assert!(handle_command(&mut s, &Command::SelectAnswer("4".into())));
                    battle::tick(&mut s, CORRECT_DELAY_TICKS);
                }
                Scene::BattleResult => {
                    assert!(handle_command(&mut s, &Command::ContinueAfterBattle));
                }
                Scene::Shop => {
                    assert!(handle_command(&mut s, &Command::CloseShop));
                }
                Scene::Rest => {
                    assert!(handle_command(&mut s, &Command::ChooseRest(RestChoice::Heal)));
                }
                Scene::Map | Scene::Victory => break,
                other => panic!("unexpected scene {:?} on floor {}", other, floor),
            }
        }

        if s.scene == Scene::Victory {
            assert_eq!(floor, FLOORS - 1);
            break;
        }
    }

    assert_eq!(s.scene, Scene::Victory);
    assert_eq!(s.stats.bosses_defeated, 1);
    assert_eq!(s.stats.highest_floor, FLOORS as u32);
    assert!(s
        .achievements
        .is_unlocked(recall_spire::achievements::AchievementId::BossSlayer));
}
