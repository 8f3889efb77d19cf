//! Player state machine
//!
//! Playback is driven by an explicit, finite and deterministic state
//! machine. The player performs the work of each state; the machine only
//! decides what comes next.

pub mod events;
pub mod machine;

pub use events::PlayerEvent;
pub use machine::PlayerState;
