//! Device select abstractions
//!
//! A command sequence to a bus device is framed by one continuous select
//! assertion. Implementations may drive a GPIO directly or go through an
//! output-expansion device; callers only see assert/release.

use crate::gpio::OutputPin;

/// Device select line for one bus device
pub trait ChipSelect {
    /// Error type for select operations
    type Error;

    /// Assert the select line (device listens to the bus)
    fn select(&mut self) -> Result<(), Self::Error>;

    /// Release the select line (device ends the command)
    fn deselect(&mut self) -> Result<(), Self::Error>;
}

/// Active-low select line on a plain GPIO
///
/// The line is released when created so the device starts idle.
pub struct ActiveLow<P> {
    pin: P,
}

impl<P: OutputPin> ActiveLow<P> {
    /// Wrap a GPIO output as an active-low select line
    pub fn new(mut pin: P) -> Self {
        pin.set_high();
        Self { pin }
    }
}

impl<P: OutputPin> ChipSelect for ActiveLow<P> {
    type Error = core::convert::Infallible;

    fn select(&mut self) -> Result<(), Self::Error> {
        self.pin.set_low();
        Ok(())
    }

    fn deselect(&mut self) -> Result<(), Self::Error> {
        self.pin.set_high();
        Ok(())
    }
}
