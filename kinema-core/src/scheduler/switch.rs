//! Two-button folder selection
//!
//! Button A steps to the next animation folder and button B to the previous
//! one, both wrapping. Only released-to-pressed edges count, A wins when
//! both change on the same poll, and after an accepted switch further edges
//! are ignored for the debounce window.

/// Default debounce window
pub const DEFAULT_DEBOUNCE_MS: u32 = 200;

/// Which way a switch moves through the folder list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SwitchDirection {
    /// Button A: next folder
    Next,
    /// Button B: previous folder
    Previous,
}

impl SwitchDirection {
    /// Move `index` one step within `count` folders, wrapping
    pub fn apply(self, index: usize, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        let index = index % count;
        match self {
            SwitchDirection::Next => (index + 1) % count,
            SwitchDirection::Previous => (index + count - 1) % count,
        }
    }
}

/// Debounced edge detector for the two folder buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FolderSwitch {
    debounce_ms: u32,
    last_switch_ms: Option<u64>,
    a_was_pressed: bool,
    b_was_pressed: bool,
}

impl FolderSwitch {
    /// Create a switch with both buttons assumed released
    pub const fn new(debounce_ms: u32) -> Self {
        Self {
            debounce_ms,
            last_switch_ms: None,
            a_was_pressed: false,
            b_was_pressed: false,
        }
    }

    /// Change the debounce window
    pub fn set_debounce(&mut self, debounce_ms: u32) {
        self.debounce_ms = debounce_ms;
    }

    /// Time of the last accepted switch
    pub fn last_switch_ms(&self) -> Option<u64> {
        self.last_switch_ms
    }

    /// Check if `now_ms` falls inside the window after the last switch
    fn debouncing(&self, now_ms: u64) -> bool {
        self.last_switch_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < u64::from(self.debounce_ms))
    }

    /// Sample both buttons
    ///
    /// Returns the direction of an accepted switch. With no folders, edges
    /// are tracked but never accepted.
    pub fn poll(
        &mut self,
        now_ms: u64,
        a_pressed: bool,
        b_pressed: bool,
        folder_count: usize,
    ) -> Option<SwitchDirection> {
        let a_edge = a_pressed && !self.a_was_pressed;
        let b_edge = b_pressed && !self.b_was_pressed;
        self.a_was_pressed = a_pressed;
        self.b_was_pressed = b_pressed;

        if self.debouncing(now_ms) || folder_count == 0 {
            return None;
        }

        let direction = if a_edge {
            SwitchDirection::Next
        } else if b_edge {
            SwitchDirection::Previous
        } else {
            return None;
        };

        self.last_switch_ms = Some(now_ms);
        Some(direction)
    }
}

impl Default for FolderSwitch {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}
