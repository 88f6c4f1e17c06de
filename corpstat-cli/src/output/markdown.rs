//! Markdown output formatter

use super::{table, OutputFormatter};
use anyhow::Result;
use corpstat_engine::Output;
use std::io::Write;

/// Markdown formatter - writes a table followed by job metadata
pub struct MarkdownFormatter<W: Write> {
    writer: W,
    row_count: usize,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            row_count: 0,
        }
    }
}

fn escape(cell: &str) -> String {
    cell.replace('|', "\\|")
}

impl<W: Write + Send> OutputFormatter for MarkdownFormatter<W> {
    fn write_output(&mut self, output: &Output) -> Result<()> {
        let (headers, rows) = table(&output.result);
        let meta = &output.metadata;

        writeln!(self.writer, "## {}", meta.analysis)?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| {} |", headers.join(" | "))?;
        writeln!(self.writer, "|{}", "---|".repeat(headers.len()))?;
        for row in &rows {
            let cells: Vec<String> = row.iter().map(|c| escape(c)).collect();
            writeln!(self.writer, "| {} |", cells.join(" | "))?;
        }
        self.row_count += rows.len();

        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "*{} sentences in {} chunks, {:?} on {} thread(s), {:.2}ms*",
            meta.sentences, meta.chunks, meta.execution_mode, meta.threads, meta.total_time_ms
        )?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "---")?;
        writeln!(self.writer, "*Total rows: {}*", self.row_count)?;
        self.writer.flush()?;
        Ok(())
    }
}
