//! GPIO adapters for STM32F4
//!
//! Thin wrappers giving embassy-stm32 pins the `biofet-hal` pin traits.

use biofet_hal::gpio::{InputPin, OutputPin};
use embassy_stm32::gpio::{Input, Output};

/// Push-pull output, used for device select lines
pub struct OutputLine<'d> {
    pin: Output<'d>,
}

impl<'d> OutputLine<'d> {
    pub fn new(pin: Output<'d>) -> Self {
        Self { pin }
    }
}

impl OutputPin for OutputLine<'_> {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }
}

/// Digital input, used for the boot-mode strap
pub struct InputLine<'d> {
    pin: Input<'d>,
}

impl<'d> InputLine<'d> {
    pub fn new(pin: Input<'d>) -> Self {
        Self { pin }
    }
}

impl InputPin for InputLine<'_> {
    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}
