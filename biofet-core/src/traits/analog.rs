//! Analog output trait

/// Analog output channel driven during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputChannel {
    /// Swept or held at the high target
    Primary,
    /// Held at 0 V (ramp) or the low target (constant)
    Secondary,
}

impl OutputChannel {
    /// Both channels, primary first
    pub const ALL: [OutputChannel; 2] = [OutputChannel::Primary, OutputChannel::Secondary];
}

/// Trait for the voltage outputs (DAC)
///
/// Implementations own the encoding from volts to hardware codes. Writes
/// cannot fail from the controller's point of view; a driver that can
/// detect faults reports them through its own channel.
pub trait AnalogOutput {
    /// Command a channel to the given voltage
    fn set_voltage(&mut self, channel: OutputChannel, volts: f32);

    /// Drive every channel to 0 V
    fn set_safe(&mut self) {
        for channel in OutputChannel::ALL {
            self.set_voltage(channel, 0.0);
        }
    }
}
