//! Match row writers

use crate::MatchRecord;

pub mod csv;

/// Column headers of the exported table, in order
pub const COLUMNS: [&str; 4] = ["Order Number", "Order Date", "Comment", "Comment Date"];

/// Output writer errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// CSV write error
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Buffer flush error
    #[error("flush error: {0}")]
    FlushError(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Writer for match rows
pub trait MatchWriter {
    /// Write a single row
    fn write_match(&mut self, record: &MatchRecord) -> OutputResult<()>;

    /// Write multiple rows in order
    fn write_matches(&mut self, records: &[MatchRecord]) -> OutputResult<()> {
        for record in records {
            self.write_match(record)?;
        }
        Ok(())
    }

    /// Flush any buffered data
    fn flush(&mut self) -> OutputResult<()>;

    /// Close the writer and finalize output
    fn close(self) -> OutputResult<()>;
}
