//! Record sink implementations

pub mod memory;

pub use memory::{MemorySink, MAX_LINE_LEN, SINK_CAPACITY};
