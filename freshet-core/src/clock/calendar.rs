//! Epoch/calendar conversion and ISO-8601 rendering
//!
//! Integer-only Gregorian math (no_std, no float) using the
//! era/year-of-era day-count algorithm.

use core::fmt::Write;

use heapless::String;

/// Rendered length of `YYYY-MM-DDThh:mm:ss+hh:00` plus slack
pub const MAX_ISO8601_LEN: usize = 26;

const SECONDS_PER_DAY: u32 = 86_400;

/// Broken-down calendar time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalendarTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl CalendarTime {
    /// Break a 1970-based epoch into calendar fields
    ///
    /// The epoch is interpreted as a wall-clock instant; any timezone
    /// shift must already be applied.
    pub fn from_epoch(epoch: u32) -> Self {
        let days = (epoch / SECONDS_PER_DAY) as i64;
        let secs = epoch % SECONDS_PER_DAY;

        let (year, month, day) = civil_from_days(days);

        Self {
            year: year as u16,
            month: month as u8,
            day: day as u8,
            hour: (secs / 3600) as u8,
            minute: (secs / 60 % 60) as u8,
            second: (secs % 60) as u8,
        }
    }

    /// Reassemble calendar fields into a 1970-based epoch
    pub fn to_epoch(&self) -> u32 {
        let days = days_from_civil(self.year as i32, self.month as u32, self.day as u32);
        days as u32 * SECONDS_PER_DAY
            + self.hour as u32 * 3600
            + self.minute as u32 * 60
            + self.second as u32
    }

    /// Render as ISO-8601 with an explicit whole-hour zone suffix
    ///
    /// The fields are assumed to already be in the zone named by
    /// `timezone` (hours from UTC).
    pub fn to_iso8601(&self, timezone: i8) -> String<MAX_ISO8601_LEN> {
        let mut out = String::new();
        let sign = if timezone < 0 { '-' } else { '+' };
        let _ = write!(
            out,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}{}{:02}:00",
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            sign,
            timezone.unsigned_abs(),
        );
        out
    }
}

/// Days since 1970-01-01 for a civil date (proleptic Gregorian)
fn days_from_civil(year: i32, month: u32, day: u32) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400) as i64;
    let yoe = (y - y.div_euclid(400) * 400) as i64;
    let mp = if month > 2 { month - 3 } else { month + 9 } as i64;
    let doy = (153 * mp + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Civil date for a day count since 1970-01-01
fn civil_from_days(days: i64) -> (i32, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    let year = (yoe + era * 400) as i32 + (month <= 2) as i32;
    (year, month, day)
}
