//! DS3231 real-time clock driver
//!
//! Blocking-I2C driver for the DS3231 temperature-compensated RTC.
//! Implements [`ClockSource`] on the chip's year-2000 epoch and
//! [`WakeSource`] through alarm 1, configured to fire on every
//! whole-minute boundary - the wake line that pulls the processor out
//! of standby between logging intervals.

use embedded_hal::i2c::I2c;

use freshet_core::clock::{CalendarTime, EPOCH_TIME_OFF};
use freshet_core::traits::{ClockError, ClockSource, WakeSource};

/// Fixed I2C address of the DS3231
pub const DS3231_ADDR: u8 = 0x68;

// Register map
const REG_SECONDS: u8 = 0x00;
const REG_ALARM1_SECONDS: u8 = 0x07;
const REG_CONTROL: u8 = 0x0e;
const REG_STATUS: u8 = 0x0f;

// Control register bits
const CONTROL_A1IE: u8 = 0x01;
const CONTROL_INTCN: u8 = 0x04;

// Status register bits
const STATUS_A1F: u8 = 0x01;
const STATUS_OSF: u8 = 0x80;

// Month register carries the century flag in bit 7
const MONTH_MASK: u8 = 0x1f;

/// DS3231 over a blocking I2C bus
pub struct Ds3231<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> Ds3231<I2C> {
    /// Create a driver over the given bus
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Release the bus
    pub fn free(self) -> I2C {
        self.i2c
    }

    /// Read the broken-down clock registers
    pub fn datetime(&mut self) -> Result<CalendarTime, ClockError> {
        let mut regs = [0u8; 7];
        self.i2c
            .write_read(DS3231_ADDR, &[REG_SECONDS], &mut regs)
            .map_err(|_| ClockError::NoResponse)?;

        Ok(CalendarTime {
            second: bcd_to_bin(regs[0]),
            minute: bcd_to_bin(regs[1]),
            hour: bcd_to_bin(regs[2] & 0x3f),
            day: bcd_to_bin(regs[4]),
            month: bcd_to_bin(regs[5] & MONTH_MASK),
            year: 2000 + bcd_to_bin(regs[6]) as u16,
        })
    }

    /// True if the oscillator has stopped since the time was last set
    pub fn lost_time(&mut self) -> Result<bool, ClockError> {
        Ok(self.read_register(REG_STATUS)? & STATUS_OSF != 0)
    }

    /// Clear a fired alarm-1 flag so the INT line releases
    pub fn clear_alarm(&mut self) -> Result<(), ClockError> {
        let status = self.read_register(REG_STATUS)?;
        self.write_register(REG_STATUS, status & !STATUS_A1F)
    }

    fn read_register(&mut self, reg: u8) -> Result<u8, ClockError> {
        let mut value = [0u8; 1];
        self.i2c
            .write_read(DS3231_ADDR, &[reg], &mut value)
            .map_err(|_| ClockError::NoResponse)?;
        Ok(value[0])
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), ClockError> {
        self.i2c
            .write(DS3231_ADDR, &[reg, value])
            .map_err(|_| ClockError::NoResponse)
    }
}

impl<I2C: I2c> ClockSource for Ds3231<I2C> {
    fn now_rtc_epoch(&mut self) -> Result<u32, ClockError> {
        if self.lost_time()? {
            return Err(ClockError::InvalidTime);
        }
        let calendar = self.datetime()?;
        Ok(calendar.to_epoch() - EPOCH_TIME_OFF)
    }

    fn set_rtc_epoch(&mut self, epoch: u32) -> Result<(), ClockError> {
        let unix = epoch.checked_add(EPOCH_TIME_OFF).ok_or(ClockError::OutOfRange)?;
        let cal = CalendarTime::from_epoch(unix);
        if cal.year < 2000 || cal.year > 2099 {
            return Err(ClockError::OutOfRange);
        }

        let regs = [
            REG_SECONDS,
            bin_to_bcd(cal.second),
            bin_to_bcd(cal.minute),
            bin_to_bcd(cal.hour),
            1, // day-of-week unused, must be 1..=7
            bin_to_bcd(cal.day),
            bin_to_bcd(cal.month),
            bin_to_bcd((cal.year - 2000) as u8),
        ];
        self.i2c
            .write(DS3231_ADDR, &regs)
            .map_err(|_| ClockError::NoResponse)?;

        // A freshly set clock is valid again
        let status = self.read_register(REG_STATUS)?;
        self.write_register(REG_STATUS, status & !STATUS_OSF)
    }
}

impl<I2C: I2c> WakeSource for Ds3231<I2C> {
    /// Route alarm 1 to the INT pin, matching seconds == 00
    ///
    /// Fires once per minute; the logging-interval decision itself is
    /// the clock scheduler's job.
    fn arm(&mut self) -> bool {
        // Alarm mask: A1M1 clear (match seconds), A1M2..A1M4 set
        let alarm = [REG_ALARM1_SECONDS, 0x00, 0x80, 0x80, 0x80];
        if self.i2c.write(DS3231_ADDR, &alarm).is_err() {
            return false;
        }
        if self.clear_alarm().is_err() {
            return false;
        }
        match self.read_register(REG_CONTROL) {
            Ok(control) => self
                .write_register(REG_CONTROL, control | CONTROL_INTCN | CONTROL_A1IE)
                .is_ok(),
            Err(_) => false,
        }
    }

    fn disarm(&mut self) -> bool {
        let disabled = match self.read_register(REG_CONTROL) {
            Ok(control) => self
                .write_register(REG_CONTROL, control & !CONTROL_A1IE)
                .is_ok(),
            Err(_) => false,
        };
        disabled && self.clear_alarm().is_ok()
    }
}

fn bcd_to_bin(value: u8) -> u8 {
    (value >> 4) * 10 + (value & 0x0f)
}

fn bin_to_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}
