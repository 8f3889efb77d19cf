//! Configuration types
//!
//! Playback settings and the parser for per-folder `settings.txt` files.

pub mod settings;
pub mod types;

pub use settings::{load_settings, parse_line, LineError, SettingError, Value};
pub use types::*;
