//! Events that trigger state transitions

/// Events that can trigger player state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlayerEvent {
    // Loading events
    /// Frame list built and pacing armed
    FramesLoaded,
    /// Folder has nothing playable, or the stream could not be opened
    NothingToPlay,

    // Playback events
    /// Every frame of the folder has been played once
    PassComplete,

    // Button events
    /// A debounced button edge selected another folder
    ButtonSwitch,
    /// New folder and its settings are in place
    SwitchApplied,
}

impl PlayerEvent {
    /// Check if this event originates from the buttons
    pub fn is_button_event(&self) -> bool {
        matches!(self, PlayerEvent::ButtonSwitch)
    }

    /// Check if this event ends the current pass early or normally
    pub fn ends_pass(&self) -> bool {
        matches!(
            self,
            PlayerEvent::PassComplete | PlayerEvent::ButtonSwitch | PlayerEvent::NothingToPlay
        )
    }
}
