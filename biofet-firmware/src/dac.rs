//! Analog output stand-in
//!
//! The bench board has no DAC fitted yet. Commanded voltages are kept and
//! logged when they change so a run can be followed over RTT.

use biofet_core::traits::{AnalogOutput, OutputChannel};
use defmt::*;

/// Change below which a new command is not logged
const LOG_STEP_V: f32 = 0.05;

pub struct LoggedDac {
    primary_v: f32,
    secondary_v: f32,
}

impl LoggedDac {
    pub const fn new() -> Self {
        Self {
            primary_v: 0.0,
            secondary_v: 0.0,
        }
    }
}

impl AnalogOutput for LoggedDac {
    fn set_voltage(&mut self, channel: OutputChannel, volts: f32) {
        let last = match channel {
            OutputChannel::Primary => &mut self.primary_v,
            OutputChannel::Secondary => &mut self.secondary_v,
        };

        let step = if volts > *last { volts - *last } else { *last - volts };
        // Always report a return to 0 V
        if step >= LOG_STEP_V || (volts == 0.0 && *last != 0.0) {
            debug!("DAC {}: {} V", channel, volts);
        }
        *last = volts;
    }
}
