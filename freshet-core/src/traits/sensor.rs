//! Sensor and measured-variable traits
//!
//! A physical sensor may back several measured variables (a DHT-style
//! probe reports temperature and humidity from one bus address), so
//! sensor methods take `&self` and implementations use interior
//! mutability. The array layer is responsible for invoking sensor-level
//! operations only once per distinct instrument.

use heapless::String;

/// Maximum length of a rendered variable value
pub const MAX_VALUE_LEN: usize = 16;

/// Errors that can occur when talking to a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Sensor did not respond on its bus or pin
    NoResponse,
    /// Sensor responded but has not completed setup
    NotReady,
    /// Reading was outside the sensor's plausible range
    BadReading,
    /// Variable could not bind to its parent sensor
    AttachFailed,
}

/// Lifecycle status of a sensor instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorStatus {
    /// Power-on state, setup not yet attempted
    #[default]
    Uninitialized,
    /// Setup exhausted its retry budget
    SetupFailed,
    /// Set up and awake
    Ready,
    /// Powered down between logging intervals
    Asleep,
}

impl SensorStatus {
    /// Short human-readable rendering for status reports
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorStatus::Uninitialized => "uninitialized",
            SensorStatus::SetupFailed => "setup failed",
            SensorStatus::Ready => "ready",
            SensorStatus::Asleep => "asleep",
        }
    }
}

/// Trait for physical or logical sensor instances
///
/// Two handles reporting the same `name()` and `location()` pair are
/// treated as the same instrument by the array layer.
///
/// Setup must be safe to retry; the orchestrator re-attempts it up to
/// its retry budget before marking the sensor failed.
pub trait Sensor {
    /// Human-readable sensor model name
    fn name(&self) -> &str;

    /// Physical location or bus address (pin number, I2C address, ...)
    fn location(&self) -> &str;

    /// Current lifecycle status
    fn status(&self) -> SensorStatus;

    /// Establish communication and configure the hardware
    fn setup(&self) -> Result<(), SensorError>;

    /// Cut power or put the hardware in its low-power mode
    fn sleep(&self) -> Result<(), SensorError>;

    /// Restore power ahead of a measurement
    fn wake(&self) -> Result<(), SensorError>;

    /// Take a fresh measurement for every variable this sensor backs
    fn update(&self) -> Result<(), SensorError>;
}

/// Trait for measured-variable handles
///
/// Handles are owned by the caller for the life of the deployment; the
/// orchestration layer only reads through them.
pub trait Variable {
    /// Non-owning back-reference to the parent sensor
    fn sensor(&self) -> &dyn Sensor;

    /// Bind this variable to its already-set-up parent
    ///
    /// Runs once per handle during array setup, duplicates included.
    fn attach(&self) -> Result<(), SensorError>;

    /// Variable name (e.g. "waterTemp")
    fn name(&self) -> &str;

    /// Measurement unit (e.g. "degC")
    fn unit(&self) -> &str;

    /// Last computed value, if any measurement has succeeded
    fn value(&self) -> Option<f32>;

    /// Last computed value rendered as text
    ///
    /// Must be stable between updates: the CSV serializer calls this
    /// once per handle and relies on idempotence.
    fn value_text(&self) -> String<MAX_VALUE_LEN>;
}
