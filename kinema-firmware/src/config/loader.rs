//! Settings loader

use defmt::*;
use kinema_core::config::{self, Settings};
use kinema_hal::FileStore;
use kinema_hal_rp2040::{Button, PinBank};

/// Load the startup settings
///
/// Starts from the defaults and applies `RAW_FRAMES_DIR/settings.txt` over
/// them. A missing or unreadable file leaves the defaults in place.
pub fn load_settings<S: FileStore>(store: &S) -> Settings {
    let mut settings = Settings::default();
    let dir = settings.raw_frames_dir.clone();

    if config::load_settings(store, &dir, &mut settings) {
        info!("Loaded {}/{}", dir.as_str(), config::SETTINGS_FILE);
    } else {
        warn!("No settings in {}, using defaults", dir.as_str());
    }

    info!(
        "frames {}x{} skip {} target {} ms, pacing {}",
        settings.frame_width,
        settings.frame_height,
        settings.frame_skip,
        settings.target_loop_ms,
        settings.use_timer_pacing
    );
    info!(
        "folders in {}, buttons GPIO{}/GPIO{}, debounce {} ms",
        settings.folders_root.as_str(),
        settings.button_a_pin,
        settings.button_b_pin,
        settings.debounce_ms
    );

    settings
}

/// Take a button GPIO from the bank, falling back to `fallback`
pub fn take_button(bank: &mut PinBank, pin: u8, fallback: u8) -> Button {
    match bank.take(pin) {
        Ok(p) => Button::new(p),
        Err(e) => {
            warn!("GPIO{} unusable for a button ({}), using GPIO{}", pin, e, fallback);
            match bank.take(fallback) {
                Ok(p) => Button::new(p),
                Err(e) => panic!("fallback button GPIO{} unusable: {}", fallback, e),
            }
        }
    }
}
