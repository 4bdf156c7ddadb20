//! Interrupt-shared run flags
//!
//! The only state shared between interrupt handlers and the main loop.
//! Handlers set single flags; the main loop consumes them at defined
//! poll points. No handler performs multi-step mutation, and none of
//! the composite logger state (array, clock, file names) is ever
//! touched from interrupt context.

use core::sync::atomic::{AtomicBool, Ordering};

/// Run-state flags for one logger
///
/// `const`-constructible so a firmware crate can place it in a
/// `static` reachable from its interrupt handlers. When none of the
/// flags are set and no request is pending, the logger is sleeping.
///
/// All accesses use `SeqCst`: these flags order the mark/decide/act
/// sequence against the wake and testing interrupts, and the handful
/// of operations per cycle makes the strongest ordering free in
/// practice.
#[derive(Debug)]
pub struct RunFlags {
    /// A record is being taken and persisted right now
    is_logging_now: AtomicBool,
    /// The diagnostic branch is running right now
    is_testing_now: AtomicBool,
    /// Single-slot request: run the diagnostic branch at the next poll
    start_testing: AtomicBool,
    /// Single-slot signal: the wake interrupt has fired
    wake_pending: AtomicBool,
}

impl RunFlags {
    /// Create a flag set with nothing pending
    pub const fn new() -> Self {
        Self {
            is_logging_now: AtomicBool::new(false),
            is_testing_now: AtomicBool::new(false),
            start_testing: AtomicBool::new(false),
            wake_pending: AtomicBool::new(false),
        }
    }

    /// Main context: mark a logging record in progress
    pub fn set_logging(&self, active: bool) {
        self.is_logging_now.store(active, Ordering::SeqCst);
    }

    /// True while a record is being taken and persisted
    pub fn is_logging(&self) -> bool {
        self.is_logging_now.load(Ordering::SeqCst)
    }

    /// Main context: mark the diagnostic branch in progress
    pub fn set_testing(&self, active: bool) {
        self.is_testing_now.store(active, Ordering::SeqCst);
    }

    /// True while the diagnostic branch is running
    pub fn is_testing(&self) -> bool {
        self.is_testing_now.load(Ordering::SeqCst)
    }

    /// Interrupt context: request the diagnostic branch
    ///
    /// Ignored while a log or test is already in progress, so a button
    /// bounce mid-record cannot queue a second entry.
    pub fn request_testing(&self) {
        if !self.is_logging() && !self.is_testing() {
            self.start_testing.store(true, Ordering::SeqCst);
        }
    }

    /// Main context: consume a pending testing request
    ///
    /// Returns true at most once per request.
    pub fn take_testing_request(&self) -> bool {
        self.start_testing.swap(false, Ordering::SeqCst)
    }

    /// Interrupt context: note that the wake interrupt fired
    ///
    /// This is the wake handler's entire job.
    pub fn signal_wake(&self) {
        self.wake_pending.store(true, Ordering::SeqCst);
    }

    /// Main context: consume a pending wake signal
    pub fn take_wake(&self) -> bool {
        self.wake_pending.swap(false, Ordering::SeqCst)
    }
}

impl Default for RunFlags {
    fn default() -> Self {
        Self::new()
    }
}
