//! Playback scheduler
//!
//! Paces frame decoding against a target pass duration and watches the two
//! folder buttons.

pub mod pacing;
pub mod player;
pub mod switch;

pub use pacing::{Pacer, MIN_INTERVAL_MS};
pub use player::{Buttons, PlaybackState, Player, PlayerError, StepReport, IDLE_POLL_MS};
pub use switch::{FolderSwitch, SwitchDirection, DEFAULT_DEBOUNCE_MS};
