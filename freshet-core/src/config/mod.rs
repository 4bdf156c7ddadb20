//! Deployment configuration
//!
//! Plain-data configuration for one logger deployment. With the
//! `serde` feature enabled the struct round-trips through postcard so
//! a firmware crate can keep it in flash.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum logger identifier length
pub const MAX_LOGGER_ID_LEN: usize = 20;

/// Serialized configuration size bound (postcard)
#[cfg(feature = "serde")]
pub const MAX_CONFIG_BYTES: usize = 32;

/// Configuration for one logger deployment
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoggerConfig {
    /// Site/deployment identifier, used in file names
    pub logger_id: String<MAX_LOGGER_ID_LEN>,
    /// Logging interval in minutes; fractions truncate to whole
    /// seconds when compared
    pub interval_minutes: f32,
    /// Logging timezone, hours from UTC
    pub timezone: i8,
    /// Hours from the RTC's zone to the logging zone (0 when the RTC
    /// is set to the logging zone)
    pub clock_offset: i8,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            logger_id: String::new(),
            interval_minutes: 15.0,
            timezone: 0,
            clock_offset: 0,
        }
    }
}

impl LoggerConfig {
    /// Create a configuration with the given identifier
    ///
    /// Identifiers longer than [`MAX_LOGGER_ID_LEN`] are truncated.
    pub fn new(logger_id: &str, interval_minutes: f32, timezone: i8) -> Self {
        let mut id = String::new();
        for c in logger_id.chars() {
            if id.push(c).is_err() {
                break;
            }
        }
        Self {
            logger_id: id,
            interval_minutes,
            timezone,
            clock_offset: 0,
        }
    }

    /// Logging interval in whole seconds
    pub fn interval_seconds(&self) -> u32 {
        (self.interval_minutes * 60.0) as u32
    }

    /// Serialize to postcard bytes for flash storage
    #[cfg(feature = "serde")]
    pub fn to_bytes(&self) -> Result<heapless::Vec<u8, MAX_CONFIG_BYTES>, postcard::Error> {
        postcard::to_vec(self)
    }

    /// Deserialize from postcard bytes
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes(bytes)
    }
}
