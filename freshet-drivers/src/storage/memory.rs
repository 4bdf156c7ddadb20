//! In-memory record sink
//!
//! Holds appended lines in a fixed buffer. Used on the bench, in
//! integration tests, and as a staging buffer on boards whose real
//! storage is flushed in bulk.

use heapless::{String, Vec};

use freshet_core::traits::{RecordSink, StorageError};

/// Longest line the sink accepts
pub const MAX_LINE_LEN: usize = 320;

/// Lines held before the sink reports [`StorageError::Full`]
pub const SINK_CAPACITY: usize = 32;

/// Fixed-capacity in-memory sink
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Vec<String<MAX_LINE_LEN>, SINK_CAPACITY>,
    file_name: Option<String<64>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Appended lines, oldest first
    pub fn lines(&self) -> &[String<MAX_LINE_LEN>] {
        &self.lines
    }

    /// File name of the most recent append
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Drop all buffered lines
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl RecordSink for MemorySink {
    fn append(&mut self, file_name: &str, record: &str) -> Result<(), StorageError> {
        if record.len() > MAX_LINE_LEN {
            return Err(StorageError::WriteFailed);
        }
        let mut name = String::new();
        for c in file_name.chars() {
            if name.push(c).is_err() {
                break;
            }
        }
        self.file_name = Some(name);

        let mut line = String::new();
        let _ = line.push_str(record);
        self.lines.push(line).map_err(|_| StorageError::Full)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_order() {
        let mut sink = MemorySink::new();
        sink.append("log.csv", "header").unwrap();
        sink.append("log.csv", "row 1").unwrap();
        assert_eq!(sink.lines().len(), 2);
        assert_eq!(sink.lines()[0].as_str(), "header");
        assert_eq!(sink.lines()[1].as_str(), "row 1");
        assert_eq!(sink.file_name(), Some("log.csv"));
    }

    #[test]
    fn test_full_sink_reports_error() {
        let mut sink = MemorySink::new();
        for i in 0..SINK_CAPACITY {
            assert!(sink.append("log.csv", if i % 2 == 0 { "a" } else { "b" }).is_ok());
        }
        assert_eq!(sink.append("log.csv", "overflow"), Err(StorageError::Full));
        assert_eq!(sink.lines().len(), SINK_CAPACITY);
    }
}
