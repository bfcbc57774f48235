//! State machine definition
//!
//! Output behavior is a function of the current state: outputs follow the
//! run profile only while `Running` and are held at 0 V otherwise.

use super::events::Event;

/// Controller states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Outputs at 0 V, waiting for a command
    #[default]
    Idle,
    /// Test run in progress
    Running,
}

impl State {
    /// Check if a run is in progress
    pub fn is_running(&self) -> bool {
        matches!(self, State::Running)
    }

    /// Process an event and return the next state
    ///
    /// `Start` while running restarts the run and stays `Running`. Events
    /// that end a run are no-ops when already idle.
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            (_, Start) => Running,
            (Running, event) if event.ends_run() => Idle,

            // Default: stay in current state
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_idle() {
        assert_eq!(State::default(), State::Idle);
    }

    #[test]
    fn test_start_runs() {
        assert_eq!(State::Idle.transition(Event::Start), State::Running);
        assert_eq!(State::Running.transition(Event::Start), State::Running);
    }

    #[test]
    fn test_run_ending_events_return_to_idle() {
        for event in [Event::Stop, Event::Complete, Event::Fault] {
            assert_eq!(State::Running.transition(event), State::Idle);
        }
    }

    #[test]
    fn test_idle_ignores_run_ending_events() {
        for event in [Event::Stop, Event::Complete, Event::Fault] {
            assert_eq!(State::Idle.transition(event), State::Idle);
        }
    }
}
