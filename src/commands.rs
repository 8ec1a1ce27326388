//! Inbound command surface — what the presentation adapter can ask for.
//!
//! Every command returns `bool`: false means the command did not apply
//! in the current state and nothing changed. Invalid commands are never
//! errors; a stray click on a locked node is simply ignored.

use crate::battle;
use crate::content::archetype;
use crate::economy;
use crate::progression;
use crate::state::{
    ClassKey, NeowOption, Player, RestChoice, RunState, Scene, UiEvent,
};

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    SelectCharacter(ClassKey),
    StartGame,
    ChooseNeowOption(NeowOption),
    SelectNode { floor: usize, lane: usize },
    SelectAnswer(String),
    EndTurn,
    BuyItem(String),
    CloseShop,
    ChooseRest(RestChoice),
    ContinueAfterBattle,
    RestartAfterGameOver,
}

pub fn handle_command(state: &mut RunState, command: &Command) -> bool {
    match command {
        Command::SelectCharacter(class) => select_character(state, *class),
        Command::StartGame => start_game(state),
        Command::ChooseNeowOption(option) => choose_neow_option(state, *option),
        Command::SelectNode { floor, lane } => progression::select_node(state, *floor, *lane),
        Command::SelectAnswer(option) => battle::handle_card_select(state, option),
        Command::EndTurn => battle::end_player_turn(state),
        Command::BuyItem(item_id) => economy::buy_item(state, item_id),
        Command::CloseShop => economy::close_shop(state),
        Command::ChooseRest(choice) => economy::choose_rest(state, *choice),
        Command::ContinueAfterBattle => continue_after_battle(state),
        Command::RestartAfterGameOver => restart_after_game_over(state),
    }
}

// ── Pre-run flow ──────────────────────────────────────────────

fn select_character(state: &mut RunState, class: ClassKey) -> bool {
    if !matches!(state.scene, Scene::MainMenu | Scene::CharacterSelect) {
        return false;
    }
    state.selected_class = class;
    if state.scene != Scene::CharacterSelect {
        state.scene = Scene::CharacterSelect;
        state.emit(UiEvent::SceneChanged(Scene::CharacterSelect));
    }
    true
}

fn start_game(state: &mut RunState) -> bool {
    if !matches!(state.scene, Scene::MainMenu | Scene::CharacterSelect) {
        return false;
    }
    let class = state.selected_class;
    let a = archetype(class);
    state.player = Player {
        class_key: Some(class),
        name: a.name.to_string(),
        hp: a.hp,
        max_hp: a.max_hp,
        gold: a.gold,
        strength: a.strength,
        armor: 0,
        relics: vec![a.talent],
        curses: Vec::new(),
    };
    state.battle = None;
    state.battles_started = 0;
    state.scene = Scene::Neow;
    state.emit(UiEvent::SceneChanged(Scene::Neow));
    true
}

fn choose_neow_option(state: &mut RunState, option: NeowOption) -> bool {
    if state.scene != Scene::Neow {
        return false;
    }
    match option {
        NeowOption::Gold => {
            state.player.gold += 100;
            state.add_log("Neow grants 100 gold.");
        }
        NeowOption::Vitality => {
            state.player.max_hp += 8;
            state.player.hp += 8;
            state.add_log("Neow grants 8 max hp.");
        }
        NeowOption::Lament => {
            state.player.relics.push(crate::state::Relic::NeowsLament);
            state.add_log("Neow's Lament: the first three foes are frail.");
        }
    }
    state.emit(UiEvent::StatsUpdated);
    progression::enter_map(state);
    true
}

// ── Post-battle flow ──────────────────────────────────────────

fn continue_after_battle(state: &mut RunState) -> bool {
    if state.scene != Scene::BattleResult {
        return false;
    }
    progression::complete_node(state);
    true
}

fn restart_after_game_over(state: &mut RunState) -> bool {
    if state.scene != Scene::GameOver {
        return false;
    }
    state.reset_run();
    true
}

// ── Tests ─────────────────────────────────────────────────────
