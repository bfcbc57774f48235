//! Configuration type definitions
//!
//! [`TestConfiguration`] is the user-editable part, changed by commands and
//! persisted only on an explicit save. [`ControllerSettings`] are fixed
//! per build.

use biofet_protocol::{TYPE_CONSTANT_VOLTAGE, TYPE_RAMP};

/// Default run time in minutes
pub const DEFAULT_RUN_TIME_MINUTES: f32 = 5.0;

/// Default primary channel target for constant runs (V)
pub const DEFAULT_HIGH_TARGET_V: f32 = 5.0;

/// Default secondary channel target for constant runs (V)
pub const DEFAULT_LOW_TARGET_V: f32 = 0.5;

/// Output profile of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TestType {
    /// Both channels held at their targets until stopped
    ConstantVoltage,
    /// Primary channel swept linearly from 0 V to the ceiling
    #[default]
    Ramp,
}

impl TestType {
    /// Wire and record code
    pub fn code(self) -> u8 {
        match self {
            TestType::ConstantVoltage => TYPE_CONSTANT_VOLTAGE,
            TestType::Ramp => TYPE_RAMP,
        }
    }

    /// Decode a wire or record code
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            TYPE_CONSTANT_VOLTAGE => Some(TestType::ConstantVoltage),
            TYPE_RAMP => Some(TestType::Ramp),
            _ => None,
        }
    }
}

/// Test configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TestConfiguration {
    /// Output profile
    pub test_type: TestType,
    /// Run duration in minutes, always finite and > 0
    pub run_time_minutes: f32,
    /// Primary channel voltage in constant mode
    pub high_target_v: f32,
    /// Secondary channel voltage in constant mode
    pub low_target_v: f32,
}

impl Default for TestConfiguration {
    fn default() -> Self {
        Self {
            test_type: TestType::Ramp,
            run_time_minutes: DEFAULT_RUN_TIME_MINUTES,
            high_target_v: DEFAULT_HIGH_TARGET_V,
            low_target_v: DEFAULT_LOW_TARGET_V,
        }
    }
}

impl TestConfiguration {
    /// Check a candidate run time
    pub fn is_valid_run_time(minutes: f32) -> bool {
        minutes.is_finite() && minutes > 0.0
    }

    /// Set the run time, rejecting values that are not finite and > 0
    ///
    /// Returns `false` and leaves the configuration unchanged on rejection.
    pub fn set_run_time(&mut self, minutes: f32) -> bool {
        if !Self::is_valid_run_time(minutes) {
            return false;
        }
        self.run_time_minutes = minutes;
        true
    }

    /// Run duration in milliseconds (saturates at `u32::MAX`)
    pub fn duration_ms(&self) -> u32 {
        (self.run_time_minutes * 60_000.0) as u32
    }
}

/// Build-time controller settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerSettings {
    /// Analog output refresh period
    pub update_interval_ms: u32,
    /// Sample log period
    pub log_interval_ms: u32,
    /// Ramp end voltage
    pub ramp_ceiling_v: f32,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            update_interval_ms: 100,
            log_interval_ms: 1000,
            ramp_ceiling_v: 10.0,
        }
    }
}
