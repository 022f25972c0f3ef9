//! Sink trait and error types

use crate::record::EmittedRecord;
use thiserror::Error;

/// Errors that can occur while writing results
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to write record: {0}")]
    Write(String),

    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Receives finalized records
///
/// The crawler treats sinks as fire-and-forget: `accept` has no meaningful
/// return value beyond failure, and records arrive in emission order.
pub trait ResultSink: Send {
    /// Accepts one record
    fn accept(&mut self, record: &EmittedRecord) -> SinkResult<()>;

    /// Flushes and closes the sink once the crawl is done
    fn finalize(&mut self) -> SinkResult<()> {
        Ok(())
    }
}

/// An in-memory sink, useful for tests and dry runs
#[derive(Debug, Default)]
pub struct VecSink {
    pub records: Vec<EmittedRecord>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultSink for VecSink {
    fn accept(&mut self, record: &EmittedRecord) -> SinkResult<()> {
        self.records.push(record.clone());
        Ok(())
    }
}
