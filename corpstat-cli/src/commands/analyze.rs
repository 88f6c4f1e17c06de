//! Analysis command implementations
//!
//! Every analysis command shares the same flow: load configuration, resolve
//! and read the corpus, run one job and format its output.

use crate::{
    config::{limit_setting, AnalysisSection, CliConfig, EngineOverrides, Sides},
    error::CliError,
    input::{resolve_patterns, CorpusReader},
    output::{create_formatter, OutputFormat},
    progress::ProgressReporter,
};
use anyhow::{Context, Result};
use clap::Args;
use corpstat_engine::{
    Analysis, Analyzer, FrequencyOptions, GeneralCollocateOptions, SpecificCollocateOptions,
    WindowSides,
};
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Options shared by every analysis command
#[derive(Debug, Args)]
pub struct CommonArgs {
    /// Corpus files, directories or glob patterns
    #[arg(short, long, value_name = "FILE/DIR/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Configuration file
    #[arg(short, long, value_name = "FILE", env = "CORPSTAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Number of worker threads (0 = one per CPU)
    #[arg(short, long, value_name = "N")]
    pub threads: Option<usize>,

    /// Sentences per chunk
    #[arg(long, value_name = "SENTENCES")]
    pub chunk_size: Option<usize>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl CommonArgs {
    /// Initialize logging based on verbosity level
    fn init_logging(&self) {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            // A logger may already be installed when running in-process
            let _ = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(log_level),
            )
            .try_init();
        }
    }

    fn open_output(&self) -> Result<Box<dyn Write + Send>> {
        match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create output file: {}", path.display()))?;
                Ok(Box::new(BufWriter::new(file)))
            }
            None => Ok(Box::new(io::stdout())),
        }
    }
}

/// An analysis command: shared options plus its own parameters
pub trait AnalysisCommand {
    /// The shared options
    fn common(&self) -> &CommonArgs;

    /// Build the analysis from flags, falling back to the config file
    fn analysis(&self, config: &AnalysisSection) -> Result<Analysis>;

    /// Run the command end to end
    fn execute(&self) -> Result<()> {
        let common = self.common();
        common.init_logging();

        let config = CliConfig::load_or_default(common.config.as_deref())?;
        let engine_config = config.engine_config(EngineOverrides {
            threads: common.threads,
            chunk_size: common.chunk_size,
        })?;
        let analysis = self.analysis(&config.analysis)?;
        analysis
            .validate()
            .map_err(|e| CliError::ConfigError(e.to_string()))?;

        let files = resolve_patterns(&common.input)?;
        log::info!("Loading {} corpus file(s)", files.len());

        let mut progress = ProgressReporter::new(common.quiet);
        progress.init_files(files.len() as u64);
        let sentences = CorpusReader::read_all(&files, |path| progress.file_completed(path))?;

        progress.start_analysis(analysis.name(), sentences.len());
        let analyzer = Analyzer::with_config(engine_config)?;
        let output = analyzer.run(&analysis, sentences);
        progress.finish();
        let output = output?;

        let mut formatter = create_formatter(common.format, common.open_output()?);
        formatter.write_output(&output)?;
        formatter.finish()?;

        log::info!(
            "{} finished: {} sentences, {} chunks, {:.2}ms",
            output.metadata.analysis,
            output.metadata.sentences,
            output.metadata.chunks,
            output.metadata.total_time_ms
        );
        Ok(())
    }
}

fn sides(flag: Option<Sides>, config: &AnalysisSection) -> WindowSides {
    flag.or(config.sides).map(Into::into).unwrap_or_default()
}

/// Arguments for the frequency command
#[derive(Debug, Args)]
pub struct FrequencyArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// N-gram length
    #[arg(short = 'n', long = "ngram", value_name = "N")]
    pub n: Option<usize>,

    /// Drop n-grams seen this many times or fewer
    #[arg(long, value_name = "COUNT")]
    pub discard_threshold: Option<u64>,

    /// Show only the most frequent entries (0 = all)
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,
}

impl AnalysisCommand for FrequencyArgs {
    fn common(&self) -> &CommonArgs {
        &self.common
    }

    fn analysis(&self, config: &AnalysisSection) -> Result<Analysis> {
        let defaults = FrequencyOptions::default();
        Ok(Analysis::Frequency(FrequencyOptions {
            n: self.n.or(config.n).unwrap_or(defaults.n),
            discard_threshold: self
                .discard_threshold
                .or(config.discard_threshold)
                .unwrap_or(defaults.discard_threshold),
            limit: self.limit.or(config.limit).and_then(limit_setting),
        }))
    }
}

/// Arguments for the transitions command
#[derive(Debug, Args)]
pub struct TransitionsArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

impl AnalysisCommand for TransitionsArgs {
    fn common(&self) -> &CommonArgs {
        &self.common
    }

    fn analysis(&self, _config: &AnalysisSection) -> Result<Analysis> {
        Ok(Analysis::Transitions)
    }
}

/// Arguments for the collocate command
#[derive(Debug, Args)]
pub struct CollocateArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Subject word (repeatable)
    #[arg(short, long = "subject", value_name = "WORD")]
    pub subjects: Vec<String>,

    /// File with one subject word per line
    #[arg(long, value_name = "FILE")]
    pub subjects_file: Option<PathBuf>,

    /// Maximum collocate length in tokens
    #[arg(short, long, value_name = "N")]
    pub window: Option<usize>,

    /// Sides of each subject to scan
    #[arg(long, value_enum)]
    pub sides: Option<Sides>,
}

impl CollocateArgs {
    fn subjects(&self) -> Result<BTreeSet<String>> {
        let mut subjects: BTreeSet<String> = self.subjects.iter().cloned().collect();

        if let Some(path) = &self.subjects_file {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read subjects file: {}", path.display()))?;
            subjects.extend(
                content
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string),
            );
        }

        if subjects.is_empty() {
            return Err(CliError::MissingSubjects.into());
        }
        Ok(subjects)
    }
}

impl AnalysisCommand for CollocateArgs {
    fn common(&self) -> &CommonArgs {
        &self.common
    }

    fn analysis(&self, config: &AnalysisSection) -> Result<Analysis> {
        let subjects = self.subjects()?;
        let mut options = SpecificCollocateOptions::new(subjects);
        if let Some(window) = self.window.or(config.window) {
            options.window = window;
        }
        options.sides = sides(self.sides, config);
        Ok(Analysis::SpecificCollocate(options))
    }
}

/// Arguments for the general-collocate command
#[derive(Debug, Args)]
pub struct GeneralCollocateArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Maximum collocate length in tokens
    #[arg(short, long, value_name = "N")]
    pub window: Option<usize>,

    /// Number of most frequent words used as subjects
    #[arg(short = 'k', long, value_name = "K")]
    pub top_k: Option<usize>,

    /// Sides of each subject to scan
    #[arg(long, value_enum)]
    pub sides: Option<Sides>,

    /// Collocates kept per subject (0 = all)
    #[arg(long, value_name = "N")]
    pub per_subject_limit: Option<usize>,

    /// Length of the merged ranking (0 = all)
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,
}

impl AnalysisCommand for GeneralCollocateArgs {
    fn common(&self) -> &CommonArgs {
        &self.common
    }

    fn analysis(&self, config: &AnalysisSection) -> Result<Analysis> {
        let defaults = GeneralCollocateOptions::default();
        Ok(Analysis::GeneralCollocate(GeneralCollocateOptions {
            window: self.window.or(config.window).unwrap_or(defaults.window),
            top_k: self.top_k.or(config.top_k).unwrap_or(defaults.top_k),
            sides: sides(self.sides, config),
            per_subject_limit: match self.per_subject_limit.or(config.per_subject_limit) {
                Some(limit) => limit_setting(limit),
                None => defaults.per_subject_limit,
            },
            limit: self.limit.or(config.limit).and_then(limit_setting),
        }))
    }
}
