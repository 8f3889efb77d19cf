//! Configuration type definitions
//!
//! Settings come from a `settings.txt` file in each animation folder. Every
//! field has a built-in default so a missing or partial file is never fatal.

use heapless::String;

use crate::library::MAX_PATH_LEN;

/// Name of the settings file inside an animation folder
pub const SETTINGS_FILE: &str = "settings.txt";

/// Highest GPIO number on the RP2040
pub const MAX_GPIO: u8 = 29;

/// Playback settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    /// Present every Nth decoded frame (always at least 1)
    pub frame_skip: u16,
    /// Log each frame name as it is decoded
    pub print_frames: bool,
    /// Folder played at startup, relative to the storage root
    pub raw_frames_dir: String<MAX_PATH_LEN>,
    /// Play `.drle` frames; when false, play the folder's GIF instead
    pub use_raw_frames: bool,
    /// Width of encoded frames in pixels
    pub frame_width: u16,
    /// Height of encoded frames in pixels
    pub frame_height: u16,
    /// Wall-clock budget for one pass over all frames
    pub target_loop_ms: u32,
    /// Pace frames with the periodic tick (otherwise run flat out)
    pub use_timer_pacing: bool,
    /// Directory holding one subfolder per animation
    pub folders_root: String<MAX_PATH_LEN>,
    /// GPIO of the "next animation" button
    pub button_a_pin: u8,
    /// GPIO of the "previous animation" button
    pub button_b_pin: u8,
    /// Minimum time between accepted button presses
    pub debounce_ms: u32,
}

impl Default for Settings {
    fn default() -> Self {
        let mut raw_frames_dir = String::new();
        let _ = raw_frames_dir.push_str("frames_delta/sega");
        let mut folders_root = String::new();
        let _ = folders_root.push_str("frames_delta");

        Self {
            frame_skip: 4,
            print_frames: false,
            raw_frames_dir,
            use_raw_frames: true,
            frame_width: 240,
            frame_height: 135,
            target_loop_ms: 1160,
            use_timer_pacing: true,
            folders_root,
            button_a_pin: 15,
            button_b_pin: 17,
            debounce_ms: 200,
        }
    }
}
