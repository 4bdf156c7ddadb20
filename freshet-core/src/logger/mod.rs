//! Logging cycle driver
//!
//! [`Logger`] composes the variable array, the interval clock, the
//! run-state flags, and the sleep/wake transitions into one
//! end-to-end cycle: wake, mark time, check the interval, update
//! sensors, persist the record, sleep. Header generation and the
//! diagnostic branch are injected through [`LoggerHooks`] so the
//! driver stays closed over concrete behavior while open to
//! substitution.

use core::fmt::{self, Write};

use heapless::String;

use crate::array::{VariableArray, MAX_DATA_LEN};
use crate::clock::{CalendarTime, LoggerClock, MAX_ISO8601_LEN};
use crate::config::{LoggerConfig, MAX_LOGGER_ID_LEN};
use crate::state::{Event, LoggerState, RunFlags};
use crate::traits::{ClockError, ClockSource, RecordSink, SleepControl, StorageError, WakeSource};

/// Capacity of a generated file name: `<logger_id>_YYYY-MM-DD.csv`
pub const MAX_FILE_NAME_LEN: usize = MAX_LOGGER_ID_LEN + 16;

/// Capacity of one full data record: timestamp plus values
pub const MAX_RECORD_LEN: usize = MAX_ISO8601_LEN + 2 + MAX_DATA_LEN;

/// Capacity of a generated header line
pub const MAX_HEADER_LEN: usize = 512;

/// Errors that end a logging cycle early
///
/// Sensor failures are not in this taxonomy: they are aggregated into
/// the cycle outcome and never abort the array loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoggerError {
    /// The clock could not supply a valid time; no record may be
    /// attributed to an unknown time
    Clock(ClockError),
    /// The record sink rejected a write
    Storage(StorageError),
}

impl From<ClockError> for LoggerError {
    fn from(err: ClockError) -> Self {
        LoggerError::Clock(err)
    }
}

impl From<StorageError> for LoggerError {
    fn from(err: StorageError) -> Self {
        LoggerError::Storage(err)
    }
}

/// What one cycle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleOutcome {
    /// A record was persisted; `sensors_ok` is the conjunction of all
    /// wake/update/sleep results for the cycle
    Logged { sensors_ok: bool },
    /// The marked time was not on a boundary; nothing was written
    Skipped,
    /// The diagnostic branch ran instead of a logging cycle
    Tested,
}

/// Injected strategy for header generation and the diagnostic branch
pub trait LoggerHooks {
    /// Write the CSV header line (no terminator)
    ///
    /// The default renders a timestamp column labelled with the
    /// logging timezone, then one `name (unit)` column per variable
    /// in array order, matching the data rows exactly.
    fn write_file_header(
        &self,
        array: &VariableArray<'_>,
        clock: &LoggerClock,
        out: &mut dyn fmt::Write,
    ) -> fmt::Result {
        let tz = clock.timezone();
        let sign = if tz < 0 { '-' } else { '+' };
        write!(out, "Date and Time (UTC{}{:02}:00)", sign, tz.unsigned_abs())?;
        for variable in array.variables() {
            write!(out, ", {} ({})", variable.name(), variable.unit())?;
        }
        Ok(())
    }

    /// Run the diagnostic branch
    ///
    /// The default takes one full measurement pass so a field tech can
    /// read fresh values off the status report.
    fn run_diagnostic(&self, array: &VariableArray<'_>) {
        array.sensors_wake();
        array.update_all();
        array.sensors_sleep();
    }
}

/// Hook implementation with the default header and diagnostic pass
#[derive(Debug, Default)]
pub struct DefaultHooks;

impl LoggerHooks for DefaultHooks {}

/// The end-to-end logging cycle driver
///
/// Owns its clock source, record sink, and sleep/wake providers;
/// borrows the caller-owned variable array and the (typically static,
/// interrupt-visible) run flags.
pub struct Logger<'a, C, S, W, P>
where
    C: ClockSource,
    S: RecordSink,
    W: WakeSource,
    P: SleepControl,
{
    config: LoggerConfig,
    array: &'a VariableArray<'a>,
    clock_source: C,
    sink: S,
    wake_source: W,
    sleep_control: P,
    clock: LoggerClock,
    flags: &'a RunFlags,
    hooks: &'a dyn LoggerHooks,
    state: LoggerState,
    file_name: Option<String<MAX_FILE_NAME_LEN>>,
}

impl<'a, C, S, W, P> Logger<'a, C, S, W, P>
where
    C: ClockSource,
    S: RecordSink,
    W: WakeSource,
    P: SleepControl,
{
    /// Create a logger with the default hooks
    pub fn new(
        config: LoggerConfig,
        array: &'a VariableArray<'a>,
        clock_source: C,
        sink: S,
        wake_source: W,
        sleep_control: P,
        flags: &'a RunFlags,
    ) -> Self {
        Self::with_hooks(
            config,
            array,
            clock_source,
            sink,
            wake_source,
            sleep_control,
            flags,
            &DefaultHooks,
        )
    }

    /// Create a logger with injected hooks
    #[allow(clippy::too_many_arguments)]
    pub fn with_hooks(
        config: LoggerConfig,
        array: &'a VariableArray<'a>,
        clock_source: C,
        sink: S,
        wake_source: W,
        sleep_control: P,
        flags: &'a RunFlags,
        hooks: &'a dyn LoggerHooks,
    ) -> Self {
        let clock = LoggerClock::new(
            config.timezone,
            config.clock_offset,
            config.interval_minutes,
        );
        Self {
            config,
            array,
            clock_source,
            sink,
            wake_source,
            sleep_control,
            clock,
            flags,
            hooks,
            state: LoggerState::Boot,
            file_name: None,
        }
    }

    /// Current state-machine state
    pub fn state(&self) -> LoggerState {
        self.state
    }

    /// The interval clock (marked instant, timezone, interval)
    pub fn clock(&self) -> &LoggerClock {
        &self.clock
    }

    /// The record sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Override the generated log file name
    pub fn set_file_name(&mut self, name: &str) {
        let mut file = String::new();
        for c in name.chars() {
            if file.push(c).is_err() {
                break;
            }
        }
        self.file_name = Some(file);
    }

    /// Current log file name, once set or generated
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// One-time startup: set up sensors, open the log file, write the
    /// header, and record the logging-start instant for the grace
    /// window
    ///
    /// Returns `Ok(sensors_ok)`; sensor setup failures do not abort
    /// startup, only clock and storage failures do.
    pub fn start(&mut self) -> Result<bool, LoggerError> {
        let sensors_ok = self.array.setup_sensors();

        let epoch = self.clock.now_epoch(&mut self.clock_source)?;
        let calendar = CalendarTime::from_epoch(epoch);
        self.ensure_file_name(&calendar);

        let mut header = String::<MAX_HEADER_LEN>::new();
        let _ = self
            .hooks
            .write_file_header(self.array, &self.clock, &mut header);
        let file_name = self.file_name.as_ref().map_or("", |f| f.as_str());
        self.sink.append(file_name, header.as_str())?;

        self.clock.note_logging_started(epoch);
        self.state = self.state.transition(Event::BootComplete);

        #[cfg(feature = "defmt")]
        defmt::info!("logger started, file {}", file_name);

        Ok(sensors_ok)
    }

    /// Run one awake phase: testing branch, or mark/decide/act
    ///
    /// Does not halt the processor; see [`log`](Self::log) for the
    /// full cycle including standby.
    pub fn run_cycle(&mut self) -> Result<CycleOutcome, LoggerError> {
        if self.flags.take_testing_request() {
            return Ok(self.run_testing());
        }

        // Mark once; every decision below reads the same instant even
        // if sensor updates take seconds.
        self.clock.mark(&mut self.clock_source)?;
        if !self.clock.check_marked_interval() {
            return Ok(CycleOutcome::Skipped);
        }

        self.flags.set_logging(true);
        self.state = self.state.transition(Event::IntervalDue);

        let mut sensors_ok = self.array.sensors_wake();
        sensors_ok &= self.array.update_all();
        sensors_ok &= self.array.sensors_sleep();

        let record = self.build_record();
        let calendar = self.clock.marked().map(|m| m.calendar);
        if let Some(calendar) = calendar {
            self.ensure_file_name(&calendar);
        }
        let file_name = self.file_name.as_ref().map_or("", |f| f.as_str());
        let persisted = self.sink.append(file_name, record.as_str());

        self.flags.set_logging(false);
        self.state = self.state.transition(Event::LoggingComplete);

        persisted?;
        Ok(CycleOutcome::Logged { sensors_ok })
    }

    /// One-and-done cycle: run the awake phase, then halt until the
    /// wake interrupt
    ///
    /// A storage or clock failure skips the record but never the
    /// sleep; a logger in the field must keep cycling.
    pub fn log(&mut self) -> Result<CycleOutcome, LoggerError> {
        let outcome = self.run_cycle();
        self.enter_standby();
        outcome
    }

    /// Halt the processor until the wake source fires
    ///
    /// No-op unless the state machine allows sleep and no flag is
    /// set. The wake interrupt is armed before the halt and disarmed
    /// immediately after resume.
    pub fn enter_standby(&mut self) {
        if !self.state.can_sleep() || self.flags.is_logging() || self.flags.is_testing() {
            return;
        }
        if !self.wake_source.arm() {
            return;
        }
        self.state = self.state.transition(Event::SleepRequested);

        // Execution resumes here at the instruction after the halt.
        self.sleep_control.standby();

        self.wake_source.disarm();
        self.flags.take_wake();
        self.state = self.state.transition(Event::WakeSignal);
    }

    /// Write a corrected UTC time back to the clock chip
    ///
    /// Returns `Ok(false)` when the value is outside the credible
    /// window and was rejected.
    pub fn sync_clock(&mut self, utc_epoch: u32) -> Result<bool, ClockError> {
        self.clock.sync(&mut self.clock_source, utc_epoch)
    }

    fn run_testing(&mut self) -> CycleOutcome {
        self.flags.set_testing(true);
        self.state = self.state.transition(Event::TestRequested);

        self.hooks.run_diagnostic(self.array);

        self.flags.set_testing(false);
        self.state = self.state.transition(Event::TestComplete);
        CycleOutcome::Tested
    }

    /// Marked timestamp plus one field per handle, in array order
    fn build_record(&self) -> String<MAX_RECORD_LEN> {
        let mut record = String::new();
        if let Some(marked) = self.clock.marked() {
            let _ = record.push_str(marked.iso8601.as_str());
            let _ = record.push_str(", ");
        }
        let _ = record.push_str(self.array.values_csv().as_str());
        record
    }

    fn ensure_file_name(&mut self, calendar: &CalendarTime) {
        if self.file_name.is_some() {
            return;
        }
        let mut file = String::new();
        let _ = write!(
            file,
            "{}_{:04}-{:02}-{:02}.csv",
            self.config.logger_id.as_str(),
            calendar.year,
            calendar.month,
            calendar.day,
        );
        self.file_name = Some(file);
    }
}
