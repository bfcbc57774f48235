//! Hardware abstraction traits
//!
//! Bus-level traits live in `biofet-hal`; these are the device capabilities
//! the controller is handed directly.

pub mod analog;

pub use analog::{AnalogOutput, OutputChannel};
