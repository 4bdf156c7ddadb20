//! Clock and logging-interval scheduling
//!
//! [`LoggerClock`] owns all time policy: timezone correction, the
//! RTC-to-logging-zone offset, the year-2000 RTC epoch bias, and the
//! single marked instant shared by every consumer of "now" within one
//! logging cycle. Sensor updates can take seconds; reading the marked
//! instant instead of resampling keeps a record attributed to the
//! interval boundary that triggered it.

pub mod calendar;

pub use calendar::{CalendarTime, MAX_ISO8601_LEN};

use heapless::String;

use crate::traits::{ClockError, ClockSource};

/// 2000-01-01 00:00:00 as a 1970-based epoch
///
/// DS3231-class RTCs count seconds from 2000-01-01; all arithmetic in
/// this module is 1970-based, so raw clock readings are shifted by
/// this constant on the way in.
pub const EPOCH_TIME_OFF: u32 = 946_684_800;

/// Grace window after logging starts during which every cycle logs
///
/// Guarantees an initial record even when the deployment misses its
/// first natural interval boundary.
pub const STARTUP_GRACE_SECONDS: u32 = 15 * 60;

/// Lower bound of a credible sync time: 2020-01-01 00:00:00
const SYNC_EPOCH_MIN: u32 = 1_577_836_800;

/// Upper bound of a credible sync time: 2100-01-01 00:00:00
const SYNC_EPOCH_MAX: u32 = 4_102_444_800;

/// One instant sampled by [`LoggerClock::mark`]
///
/// Valid only until the next `mark` call.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MarkedInstant {
    /// 1970-based epoch in the logging timezone
    pub epoch: u32,
    /// Calendar fields derived from `epoch`
    pub calendar: CalendarTime,
    /// ISO-8601 rendering with the logging-zone suffix
    pub iso8601: String<MAX_ISO8601_LEN>,
}

/// Interval scheduler and timezone-corrected clock front end
///
/// Explicitly owned and passed by reference to everything that needs
/// "now" - there are no process-wide clock globals.
#[derive(Debug)]
pub struct LoggerClock {
    /// Logging timezone, hours from UTC (rendered in timestamps)
    timezone: i8,
    /// Hours to add to the RTC's zone to reach the logging zone
    rtc_offset: i8,
    /// Logging interval, whole seconds (fractional minutes truncate)
    interval_seconds: u32,
    /// Epoch at which logging started, for the grace window
    start_epoch: Option<u32>,
    marked: Option<MarkedInstant>,
}

impl LoggerClock {
    /// Create a clock for the given zone configuration
    ///
    /// `interval_minutes` is truncated to whole seconds; a zero or
    /// sub-second interval is clamped to one second.
    pub fn new(timezone: i8, rtc_offset: i8, interval_minutes: f32) -> Self {
        let interval_seconds = (interval_minutes * 60.0) as u32;
        Self {
            timezone,
            rtc_offset,
            interval_seconds: interval_seconds.max(1),
            start_epoch: None,
            marked: None,
        }
    }

    /// Logging timezone, hours from UTC
    pub fn timezone(&self) -> i8 {
        self.timezone
    }

    /// Logging interval in whole seconds
    pub fn interval_seconds(&self) -> u32 {
        self.interval_seconds
    }

    /// Current epoch in the logging timezone
    ///
    /// Applies the year-2000 RTC bias and the RTC-to-logging-zone
    /// offset to a raw clock reading.
    pub fn now_epoch(&self, source: &mut dyn ClockSource) -> Result<u32, ClockError> {
        let raw = source.now_rtc_epoch()?;
        Ok(corrected_epoch(raw, self.rtc_offset))
    }

    /// Record the instant logging started, for the grace window
    pub fn note_logging_started(&mut self, epoch: u32) {
        self.start_epoch = Some(epoch);
    }

    /// Sample "now" once and hold it as the shared marked instant
    ///
    /// Call exactly once per cycle, immediately before sensor update,
    /// so every later format and interval decision in that cycle reads
    /// the same instant.
    pub fn mark(&mut self, source: &mut dyn ClockSource) -> Result<u32, ClockError> {
        let epoch = self.now_epoch(source)?;
        let calendar = CalendarTime::from_epoch(epoch);
        self.marked = Some(MarkedInstant {
            epoch,
            calendar,
            iso8601: calendar.to_iso8601(self.timezone),
        });
        Ok(epoch)
    }

    /// The instant held by the last [`mark`](Self::mark), if any
    pub fn marked(&self) -> Option<&MarkedInstant> {
        self.marked.as_ref()
    }

    /// True iff the current time lands on a logging boundary
    pub fn check_interval(&self, source: &mut dyn ClockSource) -> Result<bool, ClockError> {
        Ok(self.is_interval(self.now_epoch(source)?))
    }

    /// True iff the marked time lands on a logging boundary
    ///
    /// False when nothing has been marked yet: no record may be
    /// attributed to an unknown time.
    pub fn check_marked_interval(&self) -> bool {
        match &self.marked {
            Some(instant) => self.is_interval(instant.epoch),
            None => false,
        }
    }

    /// Write a corrected time back to the clock source
    ///
    /// `utc_epoch` is a 1970-based UTC instant (e.g. from NIST).
    /// Returns `Ok(false)` without touching the clock when the value
    /// is outside the credible window.
    pub fn sync(
        &self,
        source: &mut dyn ClockSource,
        utc_epoch: u32,
    ) -> Result<bool, ClockError> {
        if !(SYNC_EPOCH_MIN..SYNC_EPOCH_MAX).contains(&utc_epoch) {
            return Ok(false);
        }
        // The RTC keeps time in its own zone: logging zone minus the
        // configured RTC offset.
        let rtc_zone = self.timezone as i32 - self.rtc_offset as i32;
        let local = utc_epoch.wrapping_add_signed(rtc_zone * 3600);
        source.set_rtc_epoch(local - EPOCH_TIME_OFF)?;
        Ok(true)
    }

    fn is_interval(&self, epoch: u32) -> bool {
        if epoch % self.interval_seconds == 0 {
            return true;
        }
        match self.start_epoch {
            Some(start) => epoch >= start && epoch - start < STARTUP_GRACE_SECONDS,
            None => false,
        }
    }
}

fn corrected_epoch(raw_rtc: u32, rtc_offset: i8) -> u32 {
    (raw_rtc + EPOCH_TIME_OFF).wrapping_add_signed(rtc_offset as i32 * 3600)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeRtc {
        epoch: Option<u32>,
        last_set: Option<u32>,
    }

    impl FakeRtc {
        fn at(epoch: u32) -> Self {
            Self {
                epoch: Some(epoch),
                last_set: None,
            }
        }
    }

    impl ClockSource for FakeRtc {
        fn now_rtc_epoch(&mut self) -> Result<u32, ClockError> {
            self.epoch.ok_or(ClockError::NoResponse)
        }

        fn set_rtc_epoch(&mut self, epoch: u32) -> Result<(), ClockError> {
            self.last_set = Some(epoch);
            self.epoch = Some(epoch);
            Ok(())
        }
    }

    // 2023-06-15 12:00:00 as a raw year-2000 RTC epoch
    const RAW_NOON: u32 = 1_686_830_400 - EPOCH_TIME_OFF;

    #[test]
    fn test_rtc_epoch_bias_applied() {
        let clock = LoggerClock::new(0, 0, 15.0);
        let mut rtc = FakeRtc::at(RAW_NOON);
        assert_eq!(clock.now_epoch(&mut rtc).unwrap(), 1_686_830_400);
    }

    #[test]
    fn test_rtc_offset_applied() {
        // RTC runs in UTC, logging zone is UTC-5
        let clock = LoggerClock::new(-5, -5, 15.0);
        let mut rtc = FakeRtc::at(RAW_NOON);
        assert_eq!(
            clock.now_epoch(&mut rtc).unwrap(),
            1_686_830_400 - 5 * 3600
        );
    }

    #[test]
    fn test_interval_on_boundary() {
        let clock = LoggerClock::new(0, 0, 15.0);
        let mut rtc = FakeRtc::at(RAW_NOON); // 12:00:00, multiple of 15 min
        assert!(clock.check_interval(&mut rtc).unwrap());
    }

    #[test]
    fn test_interval_off_boundary() {
        let clock = LoggerClock::new(0, 0, 15.0);
        let mut rtc = FakeRtc::at(RAW_NOON + 7 * 60); // 12:07:00
        assert!(!clock.check_interval(&mut rtc).unwrap());
    }

    #[test]
    fn test_grace_window_forces_log() {
        let mut clock = LoggerClock::new(0, 0, 15.0);
        clock.note_logging_started(1_686_830_400);
        let mut rtc = FakeRtc::at(RAW_NOON + 7 * 60); // 12:07, inside grace
        assert!(clock.check_interval(&mut rtc).unwrap());

        let mut rtc = FakeRtc::at(RAW_NOON + 22 * 60); // 12:22, past grace
        assert!(!clock.check_interval(&mut rtc).unwrap());
    }

    #[test]
    fn test_marked_interval_uses_marked_time() {
        let mut clock = LoggerClock::new(0, 0, 15.0);
        let mut rtc = FakeRtc::at(RAW_NOON);
        clock.mark(&mut rtc).unwrap();

        // Clock drifts off the boundary after mark; decision must not.
        rtc.epoch = Some(RAW_NOON + 42);
        assert!(clock.check_marked_interval());
        assert!(!clock.check_interval(&mut rtc).unwrap());
    }

    #[test]
    fn test_unmarked_interval_is_false() {
        let clock = LoggerClock::new(0, 0, 15.0);
        assert!(!clock.check_marked_interval());
    }

    #[test]
    fn test_mark_formats_iso8601() {
        let mut clock = LoggerClock::new(-5, 0, 15.0);
        let mut rtc = FakeRtc::at(RAW_NOON);
        clock.mark(&mut rtc).unwrap();
        assert_eq!(
            clock.marked().unwrap().iso8601.as_str(),
            "2023-06-15T12:00:00-05:00"
        );
    }

    #[test]
    fn test_fractional_minutes_truncate() {
        let clock = LoggerClock::new(0, 0, 2.5);
        assert_eq!(clock.interval_seconds(), 150);
    }

    #[test]
    fn test_clock_failure_propagates() {
        let clock = LoggerClock::new(0, 0, 15.0);
        let mut rtc = FakeRtc {
            epoch: None,
            last_set: None,
        };
        assert_eq!(
            clock.check_interval(&mut rtc),
            Err(ClockError::NoResponse)
        );
    }

    #[test]
    fn test_sync_rejects_stale_time() {
        let clock = LoggerClock::new(0, 0, 15.0);
        let mut rtc = FakeRtc::at(RAW_NOON);
        assert_eq!(clock.sync(&mut rtc, 946_684_800).unwrap(), false);
        assert_eq!(rtc.last_set, None);
    }

    #[test]
    fn test_sync_writes_rtc_zone_epoch() {
        // Logging zone UTC-5, RTC offset 0 => RTC also keeps UTC-5
        let clock = LoggerClock::new(-5, 0, 15.0);
        let mut rtc = FakeRtc::at(RAW_NOON);
        assert!(clock.sync(&mut rtc, 1_686_830_400).unwrap());
        assert_eq!(
            rtc.last_set,
            Some(1_686_830_400 - 5 * 3600 - EPOCH_TIME_OFF)
        );
    }
}
