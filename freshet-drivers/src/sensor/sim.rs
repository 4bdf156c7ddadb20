//! Simulated sensor
//!
//! Produces a deterministic ramp per channel so bench runs and
//! integration tests get predictable, distinguishable values. Setup
//! failures can be injected to exercise the orchestrator's retry
//! budget.

use core::cell::Cell;
use core::fmt::Write;

use heapless::String;

use freshet_core::traits::{Sensor, SensorError, SensorStatus, Variable, MAX_VALUE_LEN};

/// Channels per simulated sensor
pub const MAX_SIM_CHANNELS: usize = 4;

/// Deterministic multi-channel sensor
///
/// Each update adds the per-channel step to the base value, so the
/// n-th record of channel `c` reads `base[c] + n * step[c]`.
pub struct SimSensor {
    name: &'static str,
    location: &'static str,
    base: [f32; MAX_SIM_CHANNELS],
    step: [f32; MAX_SIM_CHANNELS],
    updates: Cell<u32>,
    status: Cell<SensorStatus>,
    /// Remaining setup attempts that will be refused
    setup_failures: Cell<u8>,
}

impl SimSensor {
    /// Create a sensor with the given per-channel ramp
    pub fn new(
        name: &'static str,
        location: &'static str,
        base: [f32; MAX_SIM_CHANNELS],
        step: [f32; MAX_SIM_CHANNELS],
    ) -> Self {
        Self {
            name,
            location,
            base,
            step,
            updates: Cell::new(0),
            status: Cell::new(SensorStatus::Uninitialized),
            setup_failures: Cell::new(0),
        }
    }

    /// Refuse the next `count` setup attempts
    pub fn fail_next_setups(&self, count: u8) {
        self.setup_failures.set(count);
    }

    /// Current value of one channel
    pub fn channel(&self, channel: usize) -> f32 {
        self.base[channel] + self.updates.get() as f32 * self.step[channel]
    }

    /// Number of completed updates
    pub fn update_count(&self) -> u32 {
        self.updates.get()
    }
}

impl Sensor for SimSensor {
    fn name(&self) -> &str {
        self.name
    }

    fn location(&self) -> &str {
        self.location
    }

    fn status(&self) -> SensorStatus {
        self.status.get()
    }

    fn setup(&self) -> Result<(), SensorError> {
        if self.setup_failures.get() > 0 {
            self.setup_failures.set(self.setup_failures.get() - 1);
            self.status.set(SensorStatus::SetupFailed);
            return Err(SensorError::NoResponse);
        }
        self.status.set(SensorStatus::Ready);
        Ok(())
    }

    fn sleep(&self) -> Result<(), SensorError> {
        self.status.set(SensorStatus::Asleep);
        Ok(())
    }

    fn wake(&self) -> Result<(), SensorError> {
        if self.status.get() == SensorStatus::SetupFailed {
            return Err(SensorError::NotReady);
        }
        self.status.set(SensorStatus::Ready);
        Ok(())
    }

    fn update(&self) -> Result<(), SensorError> {
        if self.status.get() != SensorStatus::Ready {
            return Err(SensorError::NotReady);
        }
        self.updates.set(self.updates.get() + 1);
        Ok(())
    }
}

/// One measured variable backed by a [`SimSensor`] channel
pub struct SimVariable<'a> {
    sensor: &'a SimSensor,
    channel: usize,
    name: &'static str,
    unit: &'static str,
}

impl<'a> SimVariable<'a> {
    /// Bind a variable to one sensor channel
    pub fn new(
        sensor: &'a SimSensor,
        channel: usize,
        name: &'static str,
        unit: &'static str,
    ) -> Self {
        debug_assert!(channel < MAX_SIM_CHANNELS);
        Self {
            sensor,
            channel,
            name,
            unit,
        }
    }
}

impl<'a> Variable for SimVariable<'a> {
    fn sensor(&self) -> &dyn Sensor {
        self.sensor
    }

    fn attach(&self) -> Result<(), SensorError> {
        if self.channel < MAX_SIM_CHANNELS {
            Ok(())
        } else {
            Err(SensorError::AttachFailed)
        }
    }

    fn name(&self) -> &str {
        self.name
    }

    fn unit(&self) -> &str {
        self.unit
    }

    fn value(&self) -> Option<f32> {
        if self.sensor.update_count() == 0 {
            return None;
        }
        Some(self.sensor.channel(self.channel))
    }

    fn value_text(&self) -> String<MAX_VALUE_LEN> {
        let mut s = String::new();
        match self.value() {
            Some(v) => {
                let _ = write!(s, "{:.1}", v);
            }
            None => {
                let _ = s.push_str("NaN");
            }
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freshet_core::array::VariableArray;

    fn probe() -> SimSensor {
        SimSensor::new(
            "sim-dht22",
            "bench 1",
            [20.0, 40.0, 0.0, 0.0],
            [0.5, 1.0, 0.0, 0.0],
        )
    }

    #[test]
    fn test_ramp_is_deterministic() {
        let sensor = probe();
        sensor.setup().unwrap();
        sensor.update().unwrap();
        sensor.update().unwrap();
        assert_eq!(sensor.channel(0), 21.0);
        assert_eq!(sensor.channel(1), 42.0);
    }

    #[test]
    fn test_value_text_before_first_update() {
        let sensor = probe();
        let var = SimVariable::new(&sensor, 0, "airTemp", "degC");
        assert_eq!(var.value(), None);
        assert_eq!(var.value_text().as_str(), "NaN");
    }

    #[test]
    fn test_update_requires_setup() {
        let sensor = probe();
        assert_eq!(sensor.update(), Err(SensorError::NotReady));
    }

    #[test]
    fn test_injected_setup_failures() {
        let sensor = probe();
        sensor.fail_next_setups(2);
        assert!(sensor.setup().is_err());
        assert_eq!(sensor.status(), SensorStatus::SetupFailed);
        assert!(sensor.setup().is_err());
        assert!(sensor.setup().is_ok());
        assert_eq!(sensor.status(), SensorStatus::Ready);
    }

    #[test]
    fn test_failed_sensor_refuses_wake() {
        let sensor = probe();
        sensor.fail_next_setups(u8::MAX);
        let _ = sensor.setup();
        assert_eq!(sensor.wake(), Err(SensorError::NotReady));
    }

    #[test]
    fn test_two_variables_share_one_sensor_in_array() {
        let sensor = probe();
        let temp = SimVariable::new(&sensor, 0, "airTemp", "degC");
        let humidity = SimVariable::new(&sensor, 1, "humidity", "percent");
        let array = VariableArray::new(&[&temp, &humidity]).unwrap();

        assert_eq!(array.sensor_count(), 1);
        assert!(array.setup_sensors());
        assert!(array.update_all());
        assert_eq!(sensor.update_count(), 1);
        assert_eq!(array.values_csv().as_str(), "20.5, 41.0");
    }
}
