//! Pico LCD 1.14 panel
//!
//! 240x135 ST7789 on SPI1, driven from a full RGB565 frame buffer.

mod st7789;

pub use st7789::{spi_config, St7789, BUFFER_SIZE, HEIGHT, WIDTH};
