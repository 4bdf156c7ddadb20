//! Reference implementations of the Freshet capability traits
//!
//! - Simulated sensor for bench testing and dry deployments
//! - DS3231 real-time clock over blocking I2C, including its alarm
//!   line as the processor wake source
//! - In-memory record sink
//!
//! Board crates supply the concrete I2C bus, interrupt wiring, and
//! storage; everything here is hardware-agnostic above those seams.

#![no_std]
#![deny(unsafe_code)]

pub mod rtc;
pub mod sensor;
pub mod storage;

#[cfg(test)]
mod tests {
    //! End-to-end logging cycle over the reference implementations

    use crate::sensor::{SimSensor, SimVariable};
    use crate::storage::MemorySink;
    use freshet_core::array::VariableArray;
    use freshet_core::clock::EPOCH_TIME_OFF;
    use freshet_core::config::LoggerConfig;
    use freshet_core::logger::{CycleOutcome, Logger};
    use freshet_core::state::RunFlags;
    use freshet_core::traits::{ClockError, ClockSource, SleepControl, WakeSource};

    // 2023-06-15 12:00:00, on every 5-minute boundary
    const NOON: u32 = 1_686_830_400;

    struct BenchRtc {
        unix_epoch: u32,
    }

    impl ClockSource for BenchRtc {
        fn now_rtc_epoch(&mut self) -> Result<u32, ClockError> {
            Ok(self.unix_epoch - EPOCH_TIME_OFF)
        }

        fn set_rtc_epoch(&mut self, epoch: u32) -> Result<(), ClockError> {
            self.unix_epoch = epoch + EPOCH_TIME_OFF;
            Ok(())
        }
    }

    struct BenchWake;

    impl WakeSource for BenchWake {
        fn arm(&mut self) -> bool {
            true
        }

        fn disarm(&mut self) -> bool {
            true
        }
    }

    /// Halt is a no-op on the bench; the clock is advanced by hand
    /// between cycles.
    struct BenchSleep;

    impl SleepControl for BenchSleep {
        fn standby(&mut self) {}
    }

    #[test]
    fn test_shared_sensor_end_to_end() {
        let dht = SimSensor::new(
            "sim-dht22",
            "pin 7",
            [20.0, 40.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0],
        );
        let sonar = SimSensor::new(
            "sim-sonar",
            "pin 11",
            [1500.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0],
        );
        let air_temp = SimVariable::new(&dht, 0, "airTemp", "degC");
        let humidity = SimVariable::new(&dht, 1, "humidity", "percent");
        let depth = SimVariable::new(&sonar, 0, "depth", "mm");
        let array = VariableArray::new(&[&air_temp, &humidity, &depth]).unwrap();
        assert_eq!(array.sensor_count(), 2);

        let flags = RunFlags::new();
        let mut logger = Logger::new(
            LoggerConfig::new("bench01", 5.0, -5),
            &array,
            BenchRtc { unix_epoch: NOON },
            MemorySink::new(),
            BenchWake,
            BenchSleep,
            &flags,
        );

        assert_eq!(logger.start(), Ok(true));
        assert_eq!(
            logger.log(),
            Ok(CycleOutcome::Logged { sensors_ok: true })
        );

        let lines = logger.sink().lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0].as_str(),
            "Date and Time (UTC-05:00), airTemp (degC), humidity (percent), depth (mm)"
        );
        assert_eq!(
            lines[1].as_str(),
            "2023-06-15T12:00:00-05:00, 20.0, 40.0, 1500.0"
        );
        assert_eq!(logger.sink().file_name(), Some("bench01_2023-06-15.csv"));
    }
}
