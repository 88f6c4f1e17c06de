//! Output formatting module

use anyhow::Result;
use corpstat_engine::{AnalysisResult, Output, ScoredCollocate};
use std::io::Write;

/// Trait for output formatters
pub trait OutputFormatter: Send {
    /// Format one analysis output
    fn write_output(&mut self, output: &Output) -> Result<()>;

    /// Finalize output
    fn finish(&mut self) -> Result<()>;
}

pub mod json;
pub mod markdown;
pub mod text;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated rows
    Text,
    /// JSON document with the result and job metadata
    Json,
    /// Markdown tables
    Markdown,
}

/// Build the formatter for `format` writing to `writer`
pub fn create_formatter<W>(format: OutputFormat, writer: W) -> Box<dyn OutputFormatter>
where
    W: Write + Send + 'static,
{
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(writer)),
        OutputFormat::Json => Box::new(JsonFormatter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownFormatter::new(writer)),
    }
}

/// Column headers and rows of a result, shared by the text formats
pub(crate) fn table(result: &AnalysisResult) -> (&'static [&'static str], Vec<Vec<String>>) {
    match result {
        AnalysisResult::Frequency(report) => (
            FREQUENCY_HEADERS,
            report
                .ranked
                .iter()
                .map(|r| vec![r.key.to_string(), r.count.to_string(), ratio(r.relative_frequency)])
                .collect(),
        ),
        AnalysisResult::Transitions(report) => (
            TRANSITION_HEADERS,
            report
                .probabilities
                .iter()
                .map(|p| {
                    vec![
                        p.first.clone(),
                        p.second.clone(),
                        p.count.to_string(),
                        ratio(p.probability),
                    ]
                })
                .collect(),
        ),
        AnalysisResult::SpecificCollocate(report) => {
            (COLLOCATE_HEADERS, report.scored().map(collocate_row).collect())
        }
        AnalysisResult::GeneralCollocate(report) => {
            (COLLOCATE_HEADERS, report.ranked.iter().map(collocate_row).collect())
        }
    }
}

const FREQUENCY_HEADERS: &[&str] = &["ngram", "count", "relative_frequency"];
const TRANSITION_HEADERS: &[&str] = &["first", "second", "count", "probability"];
const COLLOCATE_HEADERS: &[&str] = &[
    "subject",
    "collocate",
    "joint_count",
    "base_count",
    "relative_frequency",
];

fn collocate_row(scored: &ScoredCollocate) -> Vec<String> {
    vec![
        scored.subject.clone(),
        scored.phrase.to_string(),
        scored.joint_count.to_string(),
        scored.base_count.to_string(),
        ratio(scored.relative_frequency),
    ]
}

fn ratio(value: f64) -> String {
    format!("{value:.6}")
}
