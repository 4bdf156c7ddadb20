//! Logger state machine
//!
//! The device cycles between an active state and a low-power state for
//! its whole deployment; there is no terminal state. Logging and
//! testing are mutually exclusive branches out of `Idle`.

use super::events::Event;

/// Logger states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoggerState {
    /// Power-on initialization: clock check, storage check, sensor setup
    #[default]
    Boot,
    /// Awake between actions, deciding what to do next
    Idle,
    /// Taking and persisting a measurement record
    Logging,
    /// Running the diagnostic branch
    Testing,
    /// Processor halted; only the wake interrupt ends this state
    Sleeping,
}

impl LoggerState {
    /// Check if the processor may be halted from this state
    pub fn can_sleep(&self) -> bool {
        matches!(self, LoggerState::Idle)
    }

    /// Check if a multi-step action is in progress
    pub fn is_busy(&self) -> bool {
        matches!(self, LoggerState::Logging | LoggerState::Testing)
    }

    /// Process an event and return the next state
    ///
    /// This is the core transition logic. Events that do not apply to
    /// the current state leave it unchanged; in particular a testing
    /// request arriving mid-record is ignored rather than queued.
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use LoggerState::*;

        match (self, event) {
            // Boot transitions
            (Boot, BootComplete) => Idle,

            // Idle transitions
            (Idle, IntervalDue) => Logging,
            (Idle, TestRequested) => Testing,
            (Idle, SleepRequested) => Sleeping,

            // Logging transitions
            (Logging, LoggingComplete) => Idle,

            // Testing transitions
            (Testing, TestComplete) => Idle,

            // Sleeping transitions - only the wake signal ends sleep
            (Sleeping, WakeSignal) => Idle,

            // Default: stay in current state
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boot_to_idle() {
        assert_eq!(
            LoggerState::Boot.transition(Event::BootComplete),
            LoggerState::Idle
        );
    }

    #[test]
    fn test_full_logging_cycle() {
        let state = LoggerState::Idle;
        let logging = state.transition(Event::IntervalDue);
        assert_eq!(logging, LoggerState::Logging);

        let idle = logging.transition(Event::LoggingComplete);
        assert_eq!(idle, LoggerState::Idle);

        let sleeping = idle.transition(Event::SleepRequested);
        assert_eq!(sleeping, LoggerState::Sleeping);

        let awake = sleeping.transition(Event::WakeSignal);
        assert_eq!(awake, LoggerState::Idle);
    }

    #[test]
    fn test_only_wake_signal_ends_sleep() {
        let sleeping = LoggerState::Sleeping;
        for event in [
            Event::IntervalDue,
            Event::TestRequested,
            Event::SleepRequested,
            Event::LoggingComplete,
        ] {
            assert_eq!(sleeping.transition(event), LoggerState::Sleeping);
        }
        assert_eq!(
            sleeping.transition(Event::WakeSignal),
            LoggerState::Idle
        );
    }

    #[test]
    fn test_testing_excluded_while_logging() {
        let logging = LoggerState::Logging;
        assert_eq!(logging.transition(Event::TestRequested), logging);
    }

    #[test]
    fn test_logging_excluded_while_testing() {
        let testing = LoggerState::Testing;
        assert_eq!(testing.transition(Event::IntervalDue), testing);
    }

    #[test]
    fn test_can_sleep_only_when_idle() {
        assert!(LoggerState::Idle.can_sleep());
        assert!(!LoggerState::Logging.can_sleep());
        assert!(!LoggerState::Testing.can_sleep());
        assert!(!LoggerState::Boot.can_sleep());
        assert!(!LoggerState::Sleeping.can_sleep());
    }

    #[test]
    fn test_is_busy() {
        assert!(LoggerState::Logging.is_busy());
        assert!(LoggerState::Testing.is_busy());
        assert!(!LoggerState::Idle.is_busy());
        assert!(!LoggerState::Sleeping.is_busy());
    }
}
