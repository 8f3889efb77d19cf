//! Shared state between tasks
//!
//! The tick task raises `FRAME_READY` once per pacing period; the player
//! consumes it. Pacing commands flow the other way through `TICK_COMMAND`.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use portable_atomic::AtomicBool;

/// Set by the tick task, cleared by the player when it presents a frame
pub static FRAME_READY: AtomicBool = AtomicBool::new(false);

/// Latest pacing command for the tick task
pub static TICK_COMMAND: Signal<CriticalSectionRawMutex, TickCommand> = Signal::new();

/// Pacing command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickCommand {
    /// Tick every `n` milliseconds
    Arm(u32),
    /// Stop ticking
    Disarm,
}

impl TickCommand {
    /// Tick period, or None when disarmed
    pub fn period_ms(self) -> Option<u32> {
        match self {
            TickCommand::Arm(ms) => Some(ms),
            TickCommand::Disarm => None,
        }
    }
}
