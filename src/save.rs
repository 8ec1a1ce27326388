//! Save/load for statistics and achievements.
//!
//! ## Versioning policy
//!
//! - `SAVE_VERSION`: current save format version. Increment when adding
//!   fields.
//! - `MIN_COMPATIBLE_VERSION`: the oldest version that can still be
//!   loaded. Additive changes keep this value; increment only on
//!   breaking changes (field meaning changes or removals).
//!
//! Records at or above the minimum version load with missing fields
//! filled from defaults. Only statistics, achievements and the study
//! streak survive a restart: the player/floor/act snapshot is written
//! for inspection, but a fresh process always resumes at the main menu.

use serde::{Deserialize, Serialize};

use crate::achievements::Achievements;
use crate::state::{Player, RunState, Stats};

/// Save format version. Increment when adding fields.
const SAVE_VERSION: u32 = 1;

/// Oldest version that loads with defaults for missing fields.
const MIN_COMPATIBLE_VERSION: u32 = 1;

/// Key in the host's key-value store.
pub const STORAGE_KEY: &str = "recall_spire_save";

// ── Store abstraction ─────────────────────────────────────────

/// Minimal key-value store the host plugs in (localStorage, a file,
/// an in-memory map). All failures must be non-fatal: the engine
/// treats a failing store the same as no store.
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    /// Returns false when the write could not be performed.
    fn set(&mut self, key: &str, value: &str) -> bool;
    fn remove(&mut self, key: &str);
}

/// In-memory store, used by tests and store-less hosts.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: std::collections::BTreeMap<String, String>,
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> bool {
        self.entries.insert(key.to_string(), value.to_string());
        true
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

// ── Save record ───────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    #[serde(default)]
    record: SaveRecord,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct SaveRecord {
    player: Player,
    stats: Stats,
    achievements: Achievements,
    current_floor: usize,
    act: u32,
    study_streak: u32,
    last_study_date: Option<String>,
}

fn extract_save(state: &RunState) -> SaveData {
    SaveData {
        version: SAVE_VERSION,
        record: SaveRecord {
            player: state.player.clone(),
            stats: state.stats.clone(),
            achievements: state.achievements.clone(),
            current_floor: state.current_floor,
            act: state.act,
            study_streak: state.study_streak,
            last_study_date: state.last_study_date.clone(),
        },
    }
}

/// Restore the surviving parts of a record: stats, achievements and
/// the study streak. Run position is intentionally NOT restored.
fn apply_save(state: &mut RunState, record: &SaveRecord) {
    state.stats = record.stats.clone();
    state.achievements = record.achievements.clone();
    state.study_streak = record.study_streak;
    state.last_study_date = record.last_study_date.clone();
}

// ── Save / load ───────────────────────────────────────────────

/// Write the full snapshot. Failures (no store, serialization error,
/// store refusing the write) are swallowed: the run continues in
/// memory and simply will not survive a restart.
pub fn save_game(state: &mut RunState) {
    if state.store.is_none() {
        return;
    }
    let json = match serde_json::to_string(&extract_save(state)) {
        Ok(j) => j,
        Err(_) => return,
    };
    if let Some(store) = state.store.as_mut() {
        let _ = store.set(STORAGE_KEY, &json);
    }
}

/// Load the record from the attached store, restoring only what
/// survives restarts. Returns false (leaving the state untouched) when
/// there is no store, no record, a parse failure, or an incompatible
/// version; corrupt records are removed.
pub fn load_game(state: &mut RunState) -> bool {
    let json = match state.store.as_ref().and_then(|s| s.get(STORAGE_KEY)) {
        Some(j) => j,
        None => return false,
    };

    let data: SaveData = match serde_json::from_str(&json) {
        Ok(d) => d,
        Err(_) => {
            if let Some(store) = state.store.as_mut() {
                store.remove(STORAGE_KEY);
            }
            return false;
        }
    };

    if data.version < MIN_COMPATIBLE_VERSION {
        if let Some(store) = state.store.as_mut() {
            store.remove(STORAGE_KEY);
        }
        return false;
    }

    apply_save(state, &data.record);
    true
}

pub fn delete_save(state: &mut RunState) {
    if let Some(store) = state.store.as_mut() {
        store.remove(STORAGE_KEY);
    }
}

// ── Tests ─────────────────────────────────────────────────────
