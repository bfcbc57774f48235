//! Run state machine
//!
//! The controller is either idle with safe outputs or running a test. The
//! state machine is explicit, finite, and deterministic.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::State;
