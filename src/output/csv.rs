//! CSV output writer for match rows

use csv::{Writer, WriterBuilder};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

use super::{MatchWriter, OutputError, OutputResult, COLUMNS};
use crate::MatchRecord;

const DEFAULT_BUFFER_SIZE: usize = 8192; // 8KB buffer

/// CSV record for one match row
#[derive(Debug, Serialize)]
struct MatchRow<'a> {
    order_number: &'a str,
    order_created_at: &'a str,
    comment: &'a str,
    comment_created_at: &'a str,
}

impl<'a> From<&'a MatchRecord> for MatchRow<'a> {
    fn from(record: &'a MatchRecord) -> Self {
        Self {
            order_number: &record.order_number,
            order_created_at: &record.order_created_at,
            comment: &record.comment,
            comment_created_at: &record.comment_created_at,
        }
    }
}

/// CSV writer producing the four-column export table
pub struct CsvMatchWriter<W: Write = BufWriter<File>> {
    writer: Writer<W>,
    rows_written: u64,
}

impl CsvMatchWriter<BufWriter<File>> {
    /// Create a writer at `path`, creating parent directories as needed
    pub fn new<P: AsRef<Path>>(path: P) -> OutputResult<Self> {
        let path = path.as_ref();
        info!("Creating CSV writer: path={}", path.display());

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    OutputError::IoError(format!("Failed to create directory: {}", e))
                })?;
            }
        }

        let file = File::create(path)
            .map_err(|e| OutputError::IoError(format!("Failed to create file: {}", e)))?;

        Self::from_writer(BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file))
    }

    /// Close the writer and sync the file to disk
    pub fn close_and_sync(self) -> OutputResult<()> {
        let rows = self.rows_written;
        let buf_writer = self
            .writer
            .into_inner()
            .map_err(|e| OutputError::IoError(format!("Failed to get inner writer: {}", e)))?;

        let file = buf_writer
            .into_inner()
            .map_err(|e| OutputError::IoError(format!("Failed to get file handle: {}", e)))?;

        file.sync_all()
            .map_err(|e| OutputError::IoError(format!("Failed to sync file: {}", e)))?;

        info!("CSV writer closed successfully: {} rows written", rows);
        Ok(())
    }
}

impl<W: Write> CsvMatchWriter<W> {
    /// Wrap any writer; the header row is written immediately
    pub fn from_writer(inner: W) -> OutputResult<Self> {
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(inner);
        writer
            .write_record(COLUMNS)
            .map_err(|e| OutputError::CsvError(format!("Failed to write header: {}", e)))?;

        debug!("CSV writer created with header {:?}", COLUMNS);

        Ok(Self {
            writer,
            rows_written: 0,
        })
    }

    /// Number of data rows written so far
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Flush and hand back the inner writer
    pub fn into_inner(self) -> OutputResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| OutputError::IoError(format!("Failed to get inner writer: {}", e)))
    }
}

impl<W: Write> MatchWriter for CsvMatchWriter<W> {
    fn write_match(&mut self, record: &MatchRecord) -> OutputResult<()> {
        self.writer
            .serialize(MatchRow::from(record))
            .map_err(|e| OutputError::CsvError(format!("Failed to write row: {}", e)))?;

        self.rows_written += 1;
        Ok(())
    }

    fn flush(&mut self) -> OutputResult<()> {
        self.writer
            .flush()
            .map_err(|e| OutputError::FlushError(format!("Failed to flush: {}", e)))
    }

    fn close(mut self) -> OutputResult<()> {
        debug!("Closing CSV writer: {} total rows written", self.rows_written);
        self.flush()
    }
}

/// Render rows as a CSV string (header included)
pub fn render_csv(records: &[MatchRecord]) -> OutputResult<String> {
    let mut writer = CsvMatchWriter::from_writer(Vec::new())?;
    writer.write_matches(records)?;
    let bytes = writer.into_inner()?;
    String::from_utf8(bytes).map_err(|e| OutputError::CsvError(format!("Invalid UTF-8: {}", e)))
}
