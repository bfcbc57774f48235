//! Events that trigger state transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// `START` command or boot-mode auto start
    Start,
    /// `STOP` command
    Stop,
    /// Ramp run reached its duration
    Complete,
    /// Storage failed while logging a sample
    Fault,
}

impl Event {
    /// Check if this event ends a run
    pub fn ends_run(&self) -> bool {
        matches!(self, Event::Stop | Event::Complete | Event::Fault)
    }
}
