//! Kinema - Animation Player Firmware
//!
//! Plays Delta-RLE frame sequences and GIFs from flash on the Waveshare Pico
//! LCD 1.14 (ST7789, 240x135). Two buttons step through the animation
//! folders.
//!
//! Named after the Greek "kinema" meaning "motion".

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::spi::Spi;
use static_cell::{ConstStaticCell, StaticCell};
use {defmt_rtt as _, panic_probe as _};

use kinema_core::config::Settings;
use kinema_core::gif::LzwDecoder;
use kinema_core::library::StaticStore;
use kinema_core::scheduler::{Buttons, Player};
use kinema_hal_rp2040::{EmbassyTimebase, PinBank};

use crate::display::{St7789, BUFFER_SIZE};
use crate::tasks::PaceTicker;

mod channels;
mod config;
mod display;
mod store;
mod tasks;

/// Panel frame buffer
static FRAME_BUFFER: ConstStaticCell<[u8; BUFFER_SIZE]> = ConstStaticCell::new([0; BUFFER_SIZE]);

/// GIF decoder tables
static LZW: ConstStaticCell<LzwDecoder> = ConstStaticCell::new(LzwDecoder::new());

/// Embedded animation files
static STORE: StaticCell<StaticStore<'static>> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Kinema firmware starting...");

    let p = embassy_rp::init(Default::default());
    let (mut bank, lcd) = PinBank::from_peripherals(p);

    let store: &'static StaticStore<'static> = STORE.init(store::animations());
    info!("{} files embedded", store.len());

    let settings = config::load_settings(store);

    let defaults = Settings::default();
    let buttons = Buttons {
        next: config::take_button(&mut bank, settings.button_a_pin, defaults.button_a_pin),
        previous: config::take_button(&mut bank, settings.button_b_pin, defaults.button_b_pin),
    };

    let spi = Spi::new_txonly(lcd.spi, lcd.clk, lcd.mosi, lcd.dma, display::spi_config());
    let panel = St7789::new(
        spi,
        Output::new(lcd.dc, Level::Low),
        Output::new(lcd.cs, Level::High),
        Output::new(lcd.rst, Level::High),
        Output::new(lcd.bl, Level::Low),
        FRAME_BUFFER.take(),
    );

    let player = Player::new(
        panel,
        store,
        PaceTicker,
        EmbassyTimebase,
        buttons,
        LZW.take(),
        settings,
    );

    spawner.spawn(tasks::tick_task()).unwrap();
    spawner.spawn(tasks::player_task(player)).unwrap();

    info!("All tasks spawned");
}
