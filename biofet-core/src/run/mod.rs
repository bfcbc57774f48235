//! Test run execution
//!
//! Time is a free-running `u32` millisecond counter; all deltas use
//! wrapping arithmetic so a counter rollover mid-run is harmless.

pub mod profile;
pub mod sample;
pub mod timer;

pub use profile::{ramp_voltage, setpoint, Setpoint};
pub use sample::{SampleLine, SampleRecord, MAX_SAMPLE_LEN};
pub use timer::{Interval, RunTimer};
