//! Logger run state
//!
//! The state machine gives the main loop one place to reason about
//! "what is the logger doing"; the flags are the only state shared
//! with interrupt context.

pub mod events;
pub mod flags;
pub mod machine;

pub use events::Event;
pub use flags::RunFlags;
pub use machine::LoggerState;
