//! Persistent record sink trait

/// Errors that can occur when persisting a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Storage medium absent or not initialized
    NotPresent,
    /// Write was attempted and rejected
    WriteFailed,
    /// Medium has no room for the record
    Full,
}

/// Trait for append-only record storage (SD card file, flash ring, ...)
///
/// The sink receives complete text lines - a header or one data row -
/// and appends them to the named file. Line termination is the sink's
/// concern.
pub trait RecordSink {
    /// Append one record to the named file
    fn append(&mut self, file_name: &str, record: &str) -> Result<(), StorageError>;
}
