//! RP2040-specific HAL for the animation player
//!
//! This crate provides RP2040 implementations of the shared `kinema-hal`
//! traits:
//!
//! - Active-low push buttons (implements `kinema_hal::InputPin`)
//! - Config-driven pin allocation with the LCD pins held back
//! - Embassy-backed millisecond clock (implements `kinema_hal::Timebase`)

#![no_std]

pub mod gpio;
pub mod pins;
pub mod time;

pub use gpio::Button;
pub use pins::{LcdPeripherals, PinBank, PinError};
pub use time::EmbassyTimebase;
