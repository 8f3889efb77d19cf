//! Playback task
//!
//! Drives the player one step at a time and reports what happened over RTT.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI1;
use embassy_rp::spi::{Async, Spi};
use kinema_core::library::{file_name, StaticStore};
use kinema_core::scheduler::{Player, StepReport, SwitchDirection};
use kinema_hal_rp2040::{Button, EmbassyTimebase};

use super::tick::PaceTicker;
use crate::display::St7789;

/// Panel driver as wired on the Pico LCD 1.14
pub type Lcd = St7789<Spi<'static, SPI1, Async>, Output<'static>>;

/// Player with the board's concrete collaborators
pub type FirmwarePlayer =
    Player<'static, Lcd, StaticStore<'static>, PaceTicker, EmbassyTimebase, Button>;

/// Playback task
#[embassy_executor::task]
pub async fn player_task(mut player: FirmwarePlayer) {
    info!("Player task started");

    if let Err(e) = player.start().await {
        // The panel is the only output; nothing useful can run without it
        panic!("display startup failed: {}", e);
    }

    info!("{} animation folders", player.folders().len());
    info!("animation: {}", file_name(player.folder()));

    loop {
        match player.step().await {
            Ok(StepReport::Loaded {
                frames,
                interval_ms,
            }) => {
                debug!("loaded {} frames, interval {} ms", frames, interval_ms);
            }
            Ok(StepReport::Frame { index, .. }) => {
                if player.settings().print_frames {
                    if let Some(name) = player.frame_name(index) {
                        info!("{}", name);
                    }
                }
            }
            Ok(StepReport::PassComplete {
                frames, elapsed_ms, ..
            }) => {
                info!("frames: {} total_ms: {}", frames, elapsed_ms);
            }
            Ok(StepReport::SwitchRequested(direction)) => match direction {
                SwitchDirection::Next => info!("button A"),
                SwitchDirection::Previous => info!("button B"),
            },
            Ok(StepReport::Switched { .. }) => {
                info!("animation: {}", file_name(player.folder()));
            }
            Ok(StepReport::Idle) => {}
            Err(e) => warn!("playback error: {}", e),
        }
    }
}
