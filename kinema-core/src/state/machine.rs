//! State machine definition
//!
//! What the player does on each step is a function of the current state;
//! the next state is a function of the current state and an event.

use super::events::PlayerEvent;

/// Player states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlayerState {
    /// List frames of the active folder and arm pacing
    Loading,
    /// Decode and present frames on the pacing tick
    TimedPlayback,
    /// Apply a button-selected folder
    FolderSwitch,
    /// Nothing to play; only the buttons are watched
    Stopped,
}

impl PlayerState {
    /// Check if frames are being decoded in this state
    pub fn is_playing(&self) -> bool {
        matches!(self, PlayerState::TimedPlayback)
    }

    /// Check if the buttons are polled in this state
    pub fn polls_buttons(&self) -> bool {
        matches!(self, PlayerState::TimedPlayback | PlayerState::Stopped)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: PlayerEvent) -> Self {
        use PlayerEvent::*;
        use PlayerState::*;

        match (self, event) {
            // Loading transitions
            (Loading, FramesLoaded) => TimedPlayback,
            (Loading, NothingToPlay) => Stopped,

            // TimedPlayback transitions
            (TimedPlayback, PassComplete) => Loading,
            (TimedPlayback, ButtonSwitch) => FolderSwitch,
            (TimedPlayback, NothingToPlay) => Stopped,

            // FolderSwitch transitions
            (FolderSwitch, SwitchApplied) => Loading,

            // Stopped transitions
            (Stopped, ButtonSwitch) => FolderSwitch,

            // Default: stay in current state
            _ => self,
        }
    }
}
