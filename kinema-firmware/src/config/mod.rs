//! Startup configuration
//!
//! Settings are read from the startup folder's settings.txt in the embedded
//! store; button GPIOs are taken from the pin bank by number.

mod loader;

pub use loader::{load_settings, take_button};
