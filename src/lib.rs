//! Recall Spire — a spaced-repetition quiz engine wrapped in a
//! roguelike spire climb.
//!
//! The host renders state and forwards user intents as [`Command`]s;
//! the engine mutates one [`RunState`] synchronously and queues
//! [`UiEvent`]s for the host to drain. Battle pacing is the only
//! time-dependent behavior and is driven by discrete ticks
//! ([`battle::tick`]), produced from wall-clock time with
//! [`time::GameTime`], so every run is deterministic from its seed.
//!
//! ```
//! use recall_spire::{commands::{handle_command, Command}, content::ContentSet, state::RunState};
//!
//! let mut run = RunState::new(ContentSet::builtin(), 42);
//! handle_command(&mut run, &Command::StartGame);
//! for event in run.drain_events() {
//!     // hand to the renderer
//!     let _ = event;
//! }
//! ```

pub mod achievements;
pub mod battle;
pub mod commands;
pub mod content;
pub mod economy;
pub mod map;
pub mod progression;
pub mod save;
pub mod state;
pub mod time;

pub use commands::{handle_command, Command};
pub use state::{RunState, Scene, UiEvent};
