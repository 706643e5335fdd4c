//! Row writers
//!
//! Rows are written a page at a time, so whatever was flattened before a
//! fatal error is already in the destination.

use crate::error::{Error, Result};
use crate::flatten::Row;
use async_trait::async_trait;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

/// Destination for flattened rows
#[async_trait]
pub trait RowSink: Send {
    /// Append a batch of rows
    async fn write_rows(&mut self, rows: &[Row]) -> Result<()>;

    /// Flush anything buffered
    async fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Caller-owned row buffer
#[async_trait]
impl RowSink for Vec<Row> {
    async fn write_rows(&mut self, rows: &[Row]) -> Result<()> {
        self.extend_from_slice(rows);
        Ok(())
    }
}

/// Writes rows as JSON lines
pub struct JsonLinesSink {
    /// Buffered destination
    writer: BufWriter<Box<dyn AsyncWrite + Unpin + Send>>,
    /// Number of rows written
    rows_written: usize,
}

impl JsonLinesSink {
    /// Write to any async writer
    pub fn new(writer: impl AsyncWrite + Unpin + Send + 'static) -> Self {
        Self {
            writer: BufWriter::new(Box::new(writer)),
            rows_written: 0,
        }
    }

    /// Write to standard output
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }

    /// Create (or truncate) a file and write to it
    pub async fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).await.map_err(|e| {
            Error::output(format!("Failed to create '{}': {e}", path.display()))
        })?;
        Ok(Self::new(file))
    }

    /// Get the number of rows written so far
    #[must_use]
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }
}

impl std::fmt::Debug for JsonLinesSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesSink")
            .field("rows_written", &self.rows_written)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RowSink for JsonLinesSink {
    async fn write_rows(&mut self, rows: &[Row]) -> Result<()> {
        for row in rows {
            let mut line = serde_json::to_vec(row)?;
            line.push(b'\n');
            self.writer
                .write_all(&line)
                .await
                .map_err(|e| Error::output(format!("Failed to write row: {e}")))?;
            self.rows_written += 1;
        }
        Ok(())
    }

    async fn finish(&mut self) -> Result<()> {
        self.writer
            .flush()
            .await
            .map_err(|e| Error::output(format!("Failed to flush output: {e}")))
    }
}
