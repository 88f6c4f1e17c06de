//! Plain text output formatter

use super::{table, OutputFormatter};
use anyhow::Result;
use corpstat_engine::Output;
use std::io::Write;

/// Plain text formatter - one tab-separated row per ranked entry
pub struct TextFormatter<W: Write> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write + Send> OutputFormatter for TextFormatter<W> {
    fn write_output(&mut self, output: &Output) -> Result<()> {
        let (_, rows) = table(&output.result);
        for row in rows {
            writeln!(self.writer, "{}", row.join("\t"))?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
