//! Real-time clock source trait
//!
//! The clock source hands out raw RTC epochs; timezone and RTC-offset
//! correction are applied by [`crate::clock::LoggerClock`], not here.

/// Errors that can occur when reading or writing the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// Clock chip did not respond
    NoResponse,
    /// Clock responded with a time it cannot have (oscillator stop,
    /// never set, ...)
    InvalidTime,
    /// Requested time is outside the clock's representable range
    OutOfRange,
}

/// Trait for battery-backed real-time clock chips
///
/// Epochs are seconds since 2000-01-01 00:00:00 in the clock's own
/// timezone, matching the register convention of DS3231-class parts.
pub trait ClockSource {
    /// Read the current RTC epoch
    fn now_rtc_epoch(&mut self) -> Result<u32, ClockError>;

    /// Write a new RTC epoch, e.g. after a network time sync
    fn set_rtc_epoch(&mut self, epoch: u32) -> Result<(), ClockError>;
}
