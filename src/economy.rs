//! Shop, rest site and random events — the between-battle economy.
//!
//! Effects are plain data (a tagged enum) interpreted by one
//! dispatcher, so catalogs stay inert and testable.

use crate::progression;
use crate::state::{RestChoice, RunState, Scene, UiEvent};

// ── Shop ──────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemEffect {
    Heal(i32),
    Strength(i32),
    MaxHp(i32),
    RandomGold { min: u32, max: u32 },
    RemoveCurse,
}

#[derive(Clone, Copy, Debug)]
pub struct ShopItem {
    pub id: &'static str,
    pub name: &'static str,
    pub desc: &'static str,
    pub price: u32,
    pub effect: ItemEffect,
}

pub const SHOP_ITEMS: &[ShopItem] = &[
    ShopItem {
        id: "heal_potion",
        name: "Healing Potion",
        desc: "Restore 30 hp",
        price: 50,
        effect: ItemEffect::Heal(30),
    },
    ShopItem {
        id: "strength_potion",
        name: "Strength Potion",
        desc: "+3 strength",
        price: 80,
        effect: ItemEffect::Strength(3),
    },
    ShopItem {
        id: "armor_plate",
        name: "Armor Plate",
        desc: "+10 max hp",
        price: 100,
        effect: ItemEffect::MaxHp(10),
    },
    ShopItem {
        id: "lucky_coin",
        name: "Lucky Coin",
        desc: "Gain 30-80 random gold",
        price: 25,
        effect: ItemEffect::RandomGold { min: 30, max: 80 },
    },
    ShopItem {
        id: "remove_curse",
        name: "Purging Scroll",
        desc: "Remove one curse",
        price: 150,
        effect: ItemEffect::RemoveCurse,
    },
];

fn apply_effect(state: &mut RunState, effect: ItemEffect) {
    match effect {
        ItemEffect::Heal(amount) => state.player.heal(amount),
        ItemEffect::Strength(amount) => state.player.strength += amount,
        ItemEffect::MaxHp(amount) => {
            state.player.max_hp += amount;
            state.player.hp += amount;
        }
        ItemEffect::RandomGold { min, max } => {
            let bonus = min + state.roll(max - min + 1);
            state.player.gold += bonus;
        }
        ItemEffect::RemoveCurse => {
            state.player.curses.pop();
        }
    }
}

/// Buy a catalog item by id. Requires the shop scene and enough gold;
/// anything else is a silent no-op.
pub fn buy_item(state: &mut RunState, item_id: &str) -> bool {
    if state.scene != Scene::Shop {
        return false;
    }
    let item = match SHOP_ITEMS.iter().find(|i| i.id == item_id) {
        Some(i) => *i,
        None => return false,
    };
    if state.player.gold < item.price {
        state.add_log("Not enough gold.");
        return false;
    }
    state.player.gold -= item.price;
    apply_effect(state, item.effect);
    state.add_log(&format!("Bought {} ({} gold).", item.name, item.price));
    state.emit(UiEvent::StatsUpdated);
    true
}

/// Leaving the shop completes the merchant node.
pub fn close_shop(state: &mut RunState) -> bool {
    if state.scene != Scene::Shop {
        return false;
    }
    progression::complete_node(state);
    true
}

// ── Rest site ─────────────────────────────────────────────────

/// Fraction of max hp restored when resting: 30%, floor-rounded.
pub fn rest_heal_amount(max_hp: i32) -> i32 {
    max_hp * 3 / 10
}

/// Heal or train at the campfire; either choice spends the node.
pub fn choose_rest(state: &mut RunState, choice: RestChoice) -> bool {
    if state.scene != Scene::Rest {
        return false;
    }
    match choice {
        RestChoice::Heal => {
            let amount = rest_heal_amount(state.player.max_hp);
            state.player.heal(amount);
            state.add_log(&format!("Rested and recovered {} hp.", amount));
        }
        RestChoice::Upgrade => {
            state.player.strength += 1;
            state.add_log("Trained by the fire. +1 strength.");
        }
    }
    state.emit(UiEvent::StatsUpdated);
    progression::complete_node(state);
    true
}

// ── Random events ─────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum UnknownEvent {
    HiddenChest,
    MysteriousPotion,
    Trap,
    AncientTome,
}

const UNKNOWN_EVENTS: [UnknownEvent; 4] = [
    UnknownEvent::HiddenChest,
    UnknownEvent::MysteriousPotion,
    UnknownEvent::Trap,
    UnknownEvent::AncientTome,
];

/// Resolve an unknown node: one of a fixed set of events, chosen
/// uniformly and applied immediately. The caller completes the node
/// (or ends the run if a trap was lethal).
pub fn run_unknown_event(state: &mut RunState) {
    let event = UNKNOWN_EVENTS[state.roll(UNKNOWN_EVENTS.len() as u32) as usize];
    let notice = match event {
        UnknownEvent::HiddenChest => {
            state.player.gold += 30;
            "You found a hidden chest! +30 gold."
        }
        UnknownEvent::MysteriousPotion => {
            state.player.heal(20);
            "A mysterious merchant hands you a potion! +20 hp."
        }
        UnknownEvent::Trap => {
            state.player.hp -= 10;
            "You stepped on a trap! -10 hp."
        }
        UnknownEvent::AncientTome => {
            state.player.strength += 1;
            "You absorbed an ancient tome! +1 strength."
        }
    };
    state.add_log(notice);
    state.emit(UiEvent::Notice(notice.to_string()));
    state.emit(UiEvent::StatsUpdated);
}

// ── Tests ─────────────────────────────────────────────────────
