//! Pin allocation for config-driven hardware setup
//!
//! Button GPIOs come from the settings file, so pins are handed out by
//! number at runtime. The LCD pins are fixed by the Pico LCD 1.14 board and
//! are split off before the bank is built.

use embassy_rp::gpio::AnyPin;
use embassy_rp::peripherals::{DMA_CH0, PIN_10, PIN_11, PIN_12, PIN_13, PIN_8, PIN_9, SPI1};
use embassy_rp::{Peri, Peripherals};

/// Number of GPIO pins on RP2040
pub const GPIO_COUNT: usize = 30;

/// GPIOs wired to the LCD (DC, CS, SCK, MOSI, RST, BL)
pub const LCD_PINS: [u8; 6] = [8, 9, 10, 11, 12, 13];

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin,
    /// Pin already taken
    AlreadyTaken,
    /// Pin reserved for the LCD
    Reserved,
}

/// Peripherals driving the ST7789 panel
pub struct LcdPeripherals {
    pub spi: Peri<'static, SPI1>,
    pub dma: Peri<'static, DMA_CH0>,
    pub dc: Peri<'static, PIN_8>,
    pub cs: Peri<'static, PIN_9>,
    pub clk: Peri<'static, PIN_10>,
    pub mosi: Peri<'static, PIN_11>,
    pub rst: Peri<'static, PIN_12>,
    pub bl: Peri<'static, PIN_13>,
}

/// Pin bank that holds the free GPIO pins and allows taking them by number
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT],
}

impl PinBank {
    /// Split the peripherals into the LCD set and a bank of the other pins
    pub fn from_peripherals(p: Peripherals) -> (Self, LcdPeripherals) {
        let lcd = LcdPeripherals {
            spi: p.SPI1,
            dma: p.DMA_CH0,
            dc: p.PIN_8,
            cs: p.PIN_9,
            clk: p.PIN_10,
            mosi: p.PIN_11,
            rst: p.PIN_12,
            bl: p.PIN_13,
        };

        let bank = Self {
            pins: [
                Some(p.PIN_0.into()),
                Some(p.PIN_1.into()),
                Some(p.PIN_2.into()),
                Some(p.PIN_3.into()),
                Some(p.PIN_4.into()),
                Some(p.PIN_5.into()),
                Some(p.PIN_6.into()),
                Some(p.PIN_7.into()),
                None, // GPIO8: LCD
                None, // GPIO9: LCD
                None, // GPIO10: LCD
                None, // GPIO11: LCD
                None, // GPIO12: LCD
                None, // GPIO13: LCD
                Some(p.PIN_14.into()),
                Some(p.PIN_15.into()),
                Some(p.PIN_16.into()),
                Some(p.PIN_17.into()),
                Some(p.PIN_18.into()),
                Some(p.PIN_19.into()),
                Some(p.PIN_20.into()),
                Some(p.PIN_21.into()),
                Some(p.PIN_22.into()),
                Some(p.PIN_23.into()),
                Some(p.PIN_24.into()),
                Some(p.PIN_25.into()),
                Some(p.PIN_26.into()),
                Some(p.PIN_27.into()),
                Some(p.PIN_28.into()),
                Some(p.PIN_29.into()),
            ],
        };

        (bank, lcd)
    }

    /// Take a pin by number
    pub fn take(&mut self, pin_num: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        if pin_num as usize >= GPIO_COUNT {
            return Err(PinError::InvalidPin);
        }
        if LCD_PINS.contains(&pin_num) {
            return Err(PinError::Reserved);
        }
        self.pins[pin_num as usize]
            .take()
            .ok_or(PinError::AlreadyTaken)
    }
}
