//! Events that trigger logger state transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Boot sequence completed
    BootComplete,
    /// Marked time landed on a logging boundary
    IntervalDue,
    /// Record persisted (or skipped after failure)
    LoggingComplete,
    /// Testing flag consumed by the main loop
    TestRequested,
    /// Diagnostic branch finished
    TestComplete,
    /// Nothing left to do while awake
    SleepRequested,
    /// Wake interrupt fired
    WakeSignal,
}
