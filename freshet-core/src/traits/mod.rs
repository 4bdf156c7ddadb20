//! Capability traits
//!
//! These traits define the interface between the logging logic and
//! hardware-specific implementations.

pub mod clock;
pub mod power;
pub mod sensor;
pub mod storage;

pub use clock::{ClockError, ClockSource};
pub use power::{SleepControl, WakeSource};
pub use sensor::{Sensor, SensorError, SensorStatus, Variable, MAX_VALUE_LEN};
pub use storage::{RecordSink, StorageError};
