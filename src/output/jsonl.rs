//! JSON Lines sink
//!
//! Writes one JSON object per record, camelCase keys, in emission order.

use crate::output::traits::{ResultSink, SinkResult};
use crate::record::EmittedRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// A sink appending records to a JSON Lines file
pub struct JsonlSink {
    writer: BufWriter<File>,
}

impl JsonlSink {
    /// Creates (or truncates) the result file
    pub fn create(path: &Path) -> SinkResult<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl ResultSink for JsonlSink {
    fn accept(&mut self, record: &EmittedRecord) -> SinkResult<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn finalize(&mut self) -> SinkResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}
