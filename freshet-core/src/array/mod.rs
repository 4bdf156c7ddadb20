//! Variable array orchestration
//!
//! [`VariableArray`] iterates a caller-owned, fixed list of measured
//! variables and coordinates the sensors behind them. Several
//! variables may share one instrument, so the array distinguishes
//! sensor-level operations (setup, sleep, wake, update), which must
//! run exactly once per distinct instrument, from variable-level reads
//! (value, unit), which run once per handle, duplicates included.
//!
//! Insertion order is significant: it fixes the CSV column order and
//! the last-seen deduplication semantics.

use core::fmt;

use heapless::{String, Vec};

use crate::traits::{SensorStatus, Variable, MAX_VALUE_LEN};

/// Maximum variables per array
pub const MAX_VARIABLES: usize = 16;

/// Setup attempts per sensor before it is marked failed
pub const SETUP_RETRIES: u8 = 5;

/// Capacity of one serialized data row (values only, no timestamp)
pub const MAX_DATA_LEN: usize = MAX_VARIABLES * (MAX_VALUE_LEN + 2);

/// Ordered, fixed-length list of measured-variable handles
///
/// The array never allocates or frees handles; it only reads through
/// the references handed to it at construction.
pub struct VariableArray<'a> {
    variables: Vec<&'a dyn Variable, MAX_VARIABLES>,
}

impl<'a> VariableArray<'a> {
    /// Build an array over the given handles
    ///
    /// Returns `None` when there are more than [`MAX_VARIABLES`]
    /// handles. The count is fixed from here on.
    pub fn new(variables: &[&'a dyn Variable]) -> Option<Self> {
        Vec::from_slice(variables)
            .ok()
            .map(|variables| Self { variables })
    }

    /// Number of variable handles, duplicates included
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Number of distinct sensors behind the handles
    pub fn sensor_count(&self) -> usize {
        (0..self.variables.len())
            .filter(|&i| self.is_last_for_sensor(i))
            .count()
    }

    /// The handles, in insertion order
    pub fn variables(&self) -> &[&'a dyn Variable] {
        &self.variables
    }

    /// True iff index `i` is the canonical handle for its sensor
    ///
    /// Canonical means no later handle refers to a sensor with the
    /// same (name, location) pair; the last occurrence of each
    /// distinct instrument is the one used for sensor-level
    /// operations. A single-element array is trivially canonical.
    pub fn is_last_for_sensor(&self, index: usize) -> bool {
        let sensor = self.variables[index].sensor();
        !self.variables[index + 1..].iter().any(|other| {
            let o = other.sensor();
            o.name() == sensor.name() && o.location() == sensor.location()
        })
    }

    /// Set up every distinct sensor, then attach every variable
    ///
    /// Each distinct sensor gets up to [`SETUP_RETRIES`] setup
    /// attempts, stopping at the first success. A sensor that
    /// exhausts its budget is recorded as failed and the loop moves
    /// on; partial success is allowed and reported. The second pass
    /// binds every handle to its parent exactly once, duplicates
    /// included.
    ///
    /// Returns true iff every setup and every attach succeeded.
    pub fn setup_sensors(&self) -> bool {
        let mut success = true;

        for (i, variable) in self.variables.iter().enumerate() {
            if !self.is_last_for_sensor(i) {
                continue;
            }
            let sensor = variable.sensor();
            let mut sensor_success = false;
            for _ in 0..SETUP_RETRIES {
                if sensor.setup().is_ok() {
                    sensor_success = true;
                    break;
                }
            }
            if !sensor_success {
                #[cfg(feature = "defmt")]
                defmt::warn!(
                    "setup of {} at {} failed",
                    sensor.name(),
                    sensor.location()
                );
                success = false;
            }
        }

        for variable in self.variables.iter() {
            success &= variable.attach().is_ok();
        }

        success
    }

    /// Put every distinct sensor to sleep (i.e. cut power)
    ///
    /// Returns the conjunction of all results.
    pub fn sensors_sleep(&self) -> bool {
        let mut success = true;
        for (i, variable) in self.variables.iter().enumerate() {
            if self.is_last_for_sensor(i) {
                success &= variable.sensor().sleep().is_ok();
            }
        }
        success
    }

    /// Wake every distinct sensor (i.e. restore power)
    ///
    /// Returns the conjunction of all results.
    pub fn sensors_wake(&self) -> bool {
        let mut success = true;
        for (i, variable) in self.variables.iter().enumerate() {
            if self.is_last_for_sensor(i) {
                success &= variable.sensor().wake().is_ok();
            }
        }
        success
    }

    /// Take a fresh measurement on every distinct sensor
    ///
    /// A failed update does not stop the remaining sensors. Returns
    /// the conjunction of all results.
    pub fn update_all(&self) -> bool {
        let mut success = true;
        for (i, variable) in self.variables.iter().enumerate() {
            if self.is_last_for_sensor(i) {
                success &= variable.sensor().update().is_ok();
            }
        }
        success
    }

    /// Serialize every handle's value as comma-separated text
    ///
    /// One field per handle in array order, duplicates included, no
    /// trailing separator. Read-only and idempotent: without an
    /// intervening update two calls yield identical output.
    pub fn values_csv(&self) -> String<MAX_DATA_LEN> {
        let mut csv = String::new();
        for (i, variable) in self.variables.iter().enumerate() {
            if i > 0 {
                let _ = csv.push_str(", ");
            }
            let _ = csv.push_str(variable.value_text().as_str());
        }
        csv
    }

    /// Write a one-line-per-handle status report
    ///
    /// Used by the diagnostic branch; renders sensor name, location,
    /// status, and the handle's current value.
    pub fn write_status_report<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        for variable in self.variables.iter() {
            let sensor = variable.sensor();
            writeln!(
                out,
                "{} at {} ({}): {} = {} {}",
                sensor.name(),
                sensor.location(),
                sensor.status().as_str(),
                variable.name(),
                variable.value_text(),
                variable.unit(),
            )?;
        }
        Ok(())
    }

    /// True iff any sensor failed setup and is excluded from this run
    pub fn has_failed_sensors(&self) -> bool {
        self.variables
            .iter()
            .any(|v| v.sensor().status() == SensorStatus::SetupFailed)
    }
}

impl<'a> fmt::Debug for VariableArray<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariableArray")
            .field("variable_count", &self.variable_count())
            .field("sensor_count", &self.sensor_count())
            .finish()
    }
}
