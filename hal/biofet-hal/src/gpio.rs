//! GPIO pin abstractions
//!
//! Digital outputs drive device select lines; the single digital input the
//! controller reads is the boot-mode strap sampled once at startup.

/// Digital output pin
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;
}

/// Input sampled once at boot to decide whether a run starts on its own
pub struct BootModeInput<P> {
    pin: P,
    active_high: bool,
}

impl<P: InputPin> BootModeInput<P> {
    /// Wrap a strap input; `active_high` selects which level means auto-start
    pub fn new(pin: P, active_high: bool) -> Self {
        Self { pin, active_high }
    }

    /// Sample the strap and release the pin
    pub fn auto_start(self) -> bool {
        self.pin.is_high() == self.active_high
    }
}
