//! Async ST7789 driver with a full frame buffer
//!
//! The panel is used in landscape (MADCTL 0x70). Its 240x135 visible area
//! sits at column 40, row 53 of the controller's 320x240 memory, so every
//! frame write sets that window before streaming the buffer.

use embassy_rp::spi::Config as SpiConfig;
use embassy_time::Timer;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::SpiBus;
use kinema_core::color::{PackedColor, BYTES_PER_PIXEL};
use kinema_core::traits::{DisplayError, FrameDisplay};

/// Visible width in landscape
pub const WIDTH: u16 = 240;
/// Visible height in landscape
pub const HEIGHT: u16 = 135;
/// Frame buffer size in bytes
pub const BUFFER_SIZE: usize = WIDTH as usize * HEIGHT as usize * BYTES_PER_PIXEL;

const COL_OFFSET: u16 = 40;
const ROW_OFFSET: u16 = 53;

/// SPI clock for pixel data
const SPI_FREQUENCY: u32 = 62_500_000;

// ST7789 Commands
const SLPOUT: u8 = 0x11;
const INVON: u8 = 0x21;
const DISPON: u8 = 0x29;
const CASET: u8 = 0x2A;
const RASET: u8 = 0x2B;
const RAMWR: u8 = 0x2C;
const MADCTL: u8 = 0x36;
const COLMOD: u8 = 0x3A;
const PORCTRL: u8 = 0xB2;
const GCTRL: u8 = 0xB7;
const VCOMS: u8 = 0xBB;
const LCMCTRL: u8 = 0xC0;
const VDVVRHEN: u8 = 0xC2;
const VRHS: u8 = 0xC3;
const VDVS: u8 = 0xC4;
const FRCTRL2: u8 = 0xC6;
const PWCTRL1: u8 = 0xD0;
const PVGAMCTRL: u8 = 0xE0;
const NVGAMCTRL: u8 = 0xE1;

/// Register setup sent after reset, before sleep-out
const INIT_SEQUENCE: &[(u8, &[u8])] = &[
    // Landscape: row/column exchange, mirrored X, BGR
    (MADCTL, &[0x70]),
    // 16 bits per pixel
    (COLMOD, &[0x05]),
    (PORCTRL, &[0x0C, 0x0C, 0x00, 0x33, 0x33]),
    (GCTRL, &[0x35]),
    (VCOMS, &[0x19]),
    (LCMCTRL, &[0x2C]),
    (VDVVRHEN, &[0x01]),
    (VRHS, &[0x12]),
    (VDVS, &[0x20]),
    // 60 Hz
    (FRCTRL2, &[0x0F]),
    (PWCTRL1, &[0xA4, 0xA1]),
    (
        PVGAMCTRL,
        &[0xD0, 0x04, 0x0D, 0x11, 0x13, 0x2B, 0x3F, 0x54, 0x4C, 0x18, 0x0D, 0x0B, 0x1F, 0x23],
    ),
    (
        NVGAMCTRL,
        &[0xD0, 0x04, 0x0C, 0x11, 0x13, 0x2C, 0x3F, 0x44, 0x51, 0x2F, 0x1F, 0x1F, 0x20, 0x23],
    ),
    // Panel needs inverted colors
    (INVON, &[]),
];

/// SPI settings for the panel
pub fn spi_config() -> SpiConfig {
    let mut config = SpiConfig::default();
    config.frequency = SPI_FREQUENCY;
    config
}

/// ST7789 driver
pub struct St7789<SPI, OUT> {
    spi: SPI,
    dc: OUT,
    cs: OUT,
    rst: OUT,
    bl: OUT,
    buffer: &'static mut [u8],
}

impl<SPI, OUT> St7789<SPI, OUT>
where
    SPI: SpiBus,
    OUT: OutputPin,
{
    /// Create a driver over `buffer` (call `init()` after)
    pub fn new(spi: SPI, dc: OUT, cs: OUT, rst: OUT, bl: OUT, buffer: &'static mut [u8]) -> Self {
        Self {
            spi,
            dc,
            cs,
            rst,
            bl,
            buffer,
        }
    }

    /// Send a command byte followed by its parameters
    async fn command(&mut self, cmd: u8, params: &[u8]) -> Result<(), DisplayError> {
        self.cs.set_low().map_err(|_| DisplayError::Communication)?;
        self.dc.set_low().map_err(|_| DisplayError::Communication)?;
        self.spi.write(&[cmd]).await.map_err(|_| DisplayError::Communication)?;
        if !params.is_empty() {
            self.dc.set_high().map_err(|_| DisplayError::Communication)?;
            self.spi.write(params).await.map_err(|_| DisplayError::Communication)?;
        }
        self.spi.flush().await.map_err(|_| DisplayError::Communication)?;
        self.cs.set_high().map_err(|_| DisplayError::Communication)
    }

    /// Point the controller's write window at the visible area
    async fn set_window(&mut self) -> Result<(), DisplayError> {
        let x0 = COL_OFFSET;
        let x1 = COL_OFFSET + WIDTH - 1;
        let y0 = ROW_OFFSET;
        let y1 = ROW_OFFSET + HEIGHT - 1;

        let [x0h, x0l] = x0.to_be_bytes();
        let [x1h, x1l] = x1.to_be_bytes();
        self.command(CASET, &[x0h, x0l, x1h, x1l]).await?;

        let [y0h, y0l] = y0.to_be_bytes();
        let [y1h, y1l] = y1.to_be_bytes();
        self.command(RASET, &[y0h, y0l, y1h, y1l]).await
    }

    /// Hardware reset pulse
    async fn reset(&mut self) -> Result<(), DisplayError> {
        self.rst.set_high().map_err(|_| DisplayError::Communication)?;
        Timer::after_millis(10).await;
        self.rst.set_low().map_err(|_| DisplayError::Communication)?;
        Timer::after_millis(10).await;
        self.rst.set_high().map_err(|_| DisplayError::Communication)?;
        Timer::after_millis(120).await;
        Ok(())
    }
}

impl<SPI, OUT> FrameDisplay for St7789<SPI, OUT>
where
    SPI: SpiBus,
    OUT: OutputPin,
{
    fn width(&self) -> u16 {
        WIDTH
    }

    fn height(&self) -> u16 {
        HEIGHT
    }

    async fn init(&mut self) -> Result<(), DisplayError> {
        self.reset().await?;

        for &(cmd, params) in INIT_SEQUENCE {
            self.command(cmd, params).await?;
        }

        self.command(SLPOUT, &[]).await?;
        Timer::after_millis(120).await;
        self.command(DISPON, &[]).await?;

        self.bl.set_high().map_err(|_| DisplayError::Communication)
    }

    fn fill(&mut self, color: PackedColor) {
        color.fill(&mut *self.buffer);
    }

    fn buffer_mut(&mut self) -> &mut [u8] {
        &mut *self.buffer
    }

    async fn show(&mut self) -> Result<(), DisplayError> {
        self.set_window().await?;

        // RAMWR then the whole buffer with CS held low
        self.cs.set_low().map_err(|_| DisplayError::Communication)?;
        self.dc.set_low().map_err(|_| DisplayError::Communication)?;
        self.spi.write(&[RAMWR]).await.map_err(|_| DisplayError::Communication)?;
        self.dc.set_high().map_err(|_| DisplayError::Communication)?;
        self.spi.write(&*self.buffer).await.map_err(|_| DisplayError::Communication)?;
        self.spi.flush().await.map_err(|_| DisplayError::Communication)?;
        self.cs.set_high().map_err(|_| DisplayError::Communication)
    }
}
