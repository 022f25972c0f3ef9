//! Result sinks
//!
//! The crawler hands every finalized record to a [`ResultSink`]. Two sinks
//! ship with the crate: a JSON Lines file (the default) and a SQLite
//! database.

mod jsonl;
mod sqlite;
mod traits;

pub use jsonl::JsonlSink;
pub use sqlite::SqliteSink;
pub use traits::{ResultSink, SinkError, SinkResult, VecSink};

use crate::config::OutputOptions;

/// Builds the sink selected by the output options
///
/// A configured database path wins over the JSONL file.
pub fn open_sink(options: &OutputOptions) -> SinkResult<Box<dyn ResultSink>> {
    match &options.database_path {
        Some(path) => Ok(Box::new(SqliteSink::open(path)?)),
        None => Ok(Box::new(JsonlSink::create(&options.jsonl_path)?)),
    }
}
