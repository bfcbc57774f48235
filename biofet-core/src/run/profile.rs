//! Output setpoints over the course of a run

use crate::config::{TestConfiguration, TestType};

/// Commanded channel voltages at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Setpoint {
    pub primary_v: f32,
    pub secondary_v: f32,
}

/// Linear ramp from 0 V at the start to `ceiling_v` at `duration_ms`
///
/// `elapsed_ms` is clamped to the duration; a zero duration is already
/// at the ceiling.
pub fn ramp_voltage(elapsed_ms: u32, duration_ms: u32, ceiling_v: f32) -> f32 {
    if duration_ms == 0 {
        return ceiling_v;
    }
    let elapsed = elapsed_ms.min(duration_ms);
    (elapsed as f32 / duration_ms as f32) * ceiling_v
}

/// Setpoint for a run `elapsed_ms` after its start
pub fn setpoint(config: &TestConfiguration, ceiling_v: f32, elapsed_ms: u32) -> Setpoint {
    match config.test_type {
        TestType::Ramp => Setpoint {
            primary_v: ramp_voltage(elapsed_ms, config.duration_ms(), ceiling_v),
            secondary_v: 0.0,
        },
        TestType::ConstantVoltage => Setpoint {
            primary_v: config.high_target_v,
            secondary_v: config.low_target_v,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ramp_endpoints() {
        assert_eq!(ramp_voltage(0, 60_000, 10.0), 0.0);
        assert_eq!(ramp_voltage(30_000, 60_000, 10.0), 5.0);
        assert_eq!(ramp_voltage(60_000, 60_000, 10.0), 10.0);
    }

    #[test]
    fn test_ramp_clamps_past_duration() {
        assert_eq!(ramp_voltage(90_000, 60_000, 10.0), 10.0);
        assert_eq!(ramp_voltage(5, 0, 10.0), 10.0);
    }

    #[test]
    fn test_ramp_holds_secondary_at_zero() {
        let config = TestConfiguration::default();
        let sp = setpoint(&config, 10.0, 150_000);
        assert_eq!(sp.primary_v, 5.0);
        assert_eq!(sp.secondary_v, 0.0);
    }

    #[test]
    fn test_constant_uses_targets() {
        let config = TestConfiguration {
            test_type: TestType::ConstantVoltage,
            ..Default::default()
        };
        for elapsed in [0, 1_000, 10_000_000] {
            let sp = setpoint(&config, 10.0, elapsed);
            assert_eq!(sp.primary_v, 5.0);
            assert_eq!(sp.secondary_v, 0.5);
        }
    }

    proptest! {
        #[test]
        fn ramp_is_monotonic_and_bounded(
            duration in 1u32..10_000_000,
            a in any::<u32>(),
            b in any::<u32>(),
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let v_lo = ramp_voltage(lo, duration, 10.0);
            let v_hi = ramp_voltage(hi, duration, 10.0);
            prop_assert!(v_lo <= v_hi);
            prop_assert!((0.0..=10.0).contains(&v_lo));
            prop_assert!((0.0..=10.0).contains(&v_hi));
        }
    }
}
