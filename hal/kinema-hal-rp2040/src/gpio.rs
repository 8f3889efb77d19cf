//! Push-button inputs
//!
//! Buttons are wired between the GPIO and ground, so the internal pull-up
//! holds the line high until the button is pressed.

use embassy_rp::gpio::{AnyPin, Input, Pull};
use embassy_rp::Peri;
use kinema_hal::InputPin;

/// Active-low push button
pub struct Button {
    input: Input<'static>,
}

impl Button {
    /// Configure `pin` as an input with pull-up
    pub fn new(pin: Peri<'static, AnyPin>) -> Self {
        Self {
            input: Input::new(pin, Pull::Up),
        }
    }
}

impl InputPin for Button {
    fn is_high(&self) -> bool {
        self.input.is_high()
    }
}
