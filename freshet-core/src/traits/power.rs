//! Processor sleep and wake-interrupt traits
//!
//! The wake source is typically an RTC alarm line routed to an
//! external-interrupt pin. Its handler has exactly one job: let the
//! processor resume execution. All multi-step logic stays in the main
//! context; see [`crate::state::RunFlags`].

/// Trait for the external wake-interrupt provider
///
/// Contract: the interrupt must be armed before the processor halts
/// and disarmed immediately after it resumes, so a lingering alarm
/// cannot re-enter sleep spuriously. Results are plain booleans; a
/// failed arm simply keeps the logger awake for that cycle.
pub trait WakeSource {
    /// Arm the wake interrupt. Must precede [`SleepControl::standby`].
    fn arm(&mut self) -> bool;

    /// Disarm the wake interrupt. Must follow the return from standby.
    fn disarm(&mut self) -> bool;
}

/// Trait for halting the processor
///
/// `standby` returns only after the armed wake source has fired;
/// execution resumes at the next instruction. There is no software
/// cancellation of an in-progress standby.
pub trait SleepControl {
    /// Halt the processor until the wake interrupt fires
    fn standby(&mut self);
}
