//! JSON output formatter

use super::OutputFormatter;
use anyhow::Result;
use corpstat_engine::Output;
use std::io::Write;

/// JSON formatter - writes the result and job metadata as one document
pub struct JsonFormatter<W: Write> {
    writer: W,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write + Send> OutputFormatter for JsonFormatter<W> {
    fn write_output(&mut self, output: &Output) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, output)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
