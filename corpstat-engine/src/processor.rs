//! Main analyzer and builder
//!
//! An [`Analyzer`] runs one job per call: chunk the corpus, count every
//! chunk on a freshly built worker pool, merge the partials and score the
//! merged tables.

use crate::{
    aggregator::Aggregator,
    chunker::ChunkManager,
    config::{
        Analysis, EngineConfig, EngineConfigBuilder, FrequencyOptions, GeneralCollocateOptions,
        SpecificCollocateOptions,
    },
    error::Result,
    executor::{ExecutionMode, Executor, SelectedExecutor},
    job::{Job, JobState},
};
use corpstat_core::{
    into_word_frequencies, scorer, Chunk, CollocateCounter, CollocateCounts, CountTable,
    FrequencyCounter, Ngram, RankedCount, ScoredCollocate, Sentence, SubjectScores, TagPair,
    TransitionCounter, TransitionProbability, WindowSides,
};
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::Serialize;

/// N-gram frequencies
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct FrequencyReport {
    /// N-gram length
    pub n: usize,
    /// Sum of the retained counts
    pub total: u64,
    /// Global count table after the discard threshold
    pub counts: CountTable<Ngram>,
    /// Entries by count descending, then n-gram ascending
    pub ranked: Vec<RankedCount<Ngram>>,
}

/// Tag transition counts and probabilities
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TransitionReport {
    /// Global count table of adjacent tag pairs
    pub counts: CountTable<TagPair>,
    /// Row-normalized probabilities
    pub probabilities: Vec<TransitionProbability>,
}

/// Collocates of caller-chosen subjects
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SpecificCollocateReport {
    /// Maximum collocate length
    pub window: usize,
    /// Sides scanned
    pub sides: WindowSides,
    /// One entry per subject in ascending order
    pub subjects: Vec<SubjectScores>,
}

impl SpecificCollocateReport {
    /// Every scored collocate across subjects
    pub fn scored(&self) -> impl Iterator<Item = &ScoredCollocate> + '_ {
        self.subjects.iter().flat_map(|s| s.collocates.iter())
    }
}

/// Collocates of the most frequent words
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct GeneralCollocateReport {
    /// Maximum collocate length
    pub window: usize,
    /// Sides scanned
    pub sides: WindowSides,
    /// The selected subjects with their corpus frequency
    pub subjects: Vec<RankedCount<String>>,
    /// Merged ranking across subjects
    pub ranked: Vec<ScoredCollocate>,
}

/// Result of one analysis
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize),
    serde(tag = "analysis", rename_all = "kebab-case")
)]
pub enum AnalysisResult {
    /// N-gram frequencies
    Frequency(FrequencyReport),
    /// Tag transitions
    Transitions(TransitionReport),
    /// Specific collocation
    SpecificCollocate(SpecificCollocateReport),
    /// General collocation
    GeneralCollocate(GeneralCollocateReport),
}

impl AnalysisResult {
    /// Whether the analysis found nothing to report
    pub fn is_empty(&self) -> bool {
        match self {
            AnalysisResult::Frequency(r) => r.ranked.is_empty(),
            AnalysisResult::Transitions(r) => r.probabilities.is_empty(),
            AnalysisResult::SpecificCollocate(r) => r.scored().next().is_none(),
            AnalysisResult::GeneralCollocate(r) => r.ranked.is_empty(),
        }
    }
}

/// Rich output with metadata
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Output {
    /// The analysis result
    pub result: AnalysisResult,
    /// Job metadata and stage timings
    pub metadata: JobMetadata,
}

/// Job metadata
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct JobMetadata {
    /// Analysis that ran
    pub analysis: &'static str,
    /// Execution mode that was actually used
    pub execution_mode: ExecutionMode,
    /// Worker count
    pub threads: usize,
    /// Number of chunks counted
    pub chunks: usize,
    /// Number of sentences in the corpus
    pub sentences: usize,
    /// Chunking time in milliseconds
    pub chunking_time_ms: f64,
    /// Counting time in milliseconds
    pub counting_time_ms: f64,
    /// Aggregation time in milliseconds
    pub aggregation_time_ms: f64,
    /// Scoring time in milliseconds
    pub scoring_time_ms: f64,
    /// Whole job in milliseconds
    pub total_time_ms: f64,
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// Corpus statistics analyzer
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: EngineConfig,
}

impl Analyzer {
    /// Create an analyzer with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyzer with custom configuration
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Start building an analyzer
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run `analysis` over `sentences`.
    ///
    /// Invalid parameters are rejected before the corpus is touched. Any
    /// later failure aborts the job and reports the stage it happened in.
    pub fn run<I>(&self, analysis: &Analysis, sentences: I) -> Result<Output>
    where
        I: IntoIterator<Item = Sentence>,
    {
        analysis.validate()?;
        let chunker = ChunkManager::new(self.config.chunk_size)?;

        let mut job = Job::new(analysis.name());
        job.advance(JobState::Chunking)?;
        let chunks = chunker.chunk_all(sentences);
        let sentence_count: usize = chunks.iter().map(Chunk::len).sum();
        log::info!(
            "{}: {} sentences in {} chunks of up to {}",
            job.analysis(),
            sentence_count,
            chunks.len(),
            chunker.chunk_size()
        );

        job.advance(JobState::Counting)?;
        let executor = job.check(SelectedExecutor::for_job(&self.config, chunks.len()))?;
        log::debug!(
            "{}: {:?} execution on {} thread(s)",
            job.analysis(),
            executor.mode(),
            executor.thread_count()
        );

        let result = match analysis {
            Analysis::Frequency(options) => frequency(&mut job, &executor, &chunks, options)?,
            Analysis::Transitions => transitions(&mut job, &executor, &chunks)?,
            Analysis::SpecificCollocate(options) => {
                specific_collocate(&mut job, &executor, &chunks, options)?
            }
            Analysis::GeneralCollocate(options) => {
                general_collocate(&mut job, &executor, &chunks, options)?
            }
        };

        job.advance(JobState::Done)?;
        let metadata = JobMetadata {
            analysis: job.analysis(),
            execution_mode: executor.mode(),
            threads: executor.thread_count(),
            chunks: chunks.len(),
            sentences: sentence_count,
            chunking_time_ms: millis(job.stage_time(JobState::Chunking)),
            counting_time_ms: millis(job.stage_time(JobState::Counting)),
            aggregation_time_ms: millis(job.stage_time(JobState::Aggregating)),
            scoring_time_ms: millis(job.stage_time(JobState::Scoring)),
            total_time_ms: millis(job.elapsed()),
        };
        log::info!(
            "{}: done in {:.2}ms",
            metadata.analysis,
            metadata.total_time_ms
        );

        Ok(Output { result, metadata })
    }
}

fn frequency(
    job: &mut Job,
    executor: &SelectedExecutor,
    chunks: &[Chunk],
    options: &FrequencyOptions,
) -> Result<AnalysisResult> {
    let counter = job.check(FrequencyCounter::new(options.n).map_err(Into::into))?;
    let partials = job.check(executor.run(chunks, &counter))?;

    job.advance(JobState::Aggregating)?;
    let mut counts = Aggregator::new(executor).aggregate(partials);
    counts.discard_at_or_below(options.discard_threshold);

    job.advance(JobState::Scoring)?;
    let ranked = scorer::rank_counts(&counts, options.limit);
    Ok(AnalysisResult::Frequency(FrequencyReport {
        n: options.n,
        total: counts.total(),
        counts,
        ranked,
    }))
}

fn transitions(
    job: &mut Job,
    executor: &SelectedExecutor,
    chunks: &[Chunk],
) -> Result<AnalysisResult> {
    let partials = job.check(executor.run(chunks, &TransitionCounter::new()))?;

    job.advance(JobState::Aggregating)?;
    let counts = Aggregator::new(executor).aggregate(partials);

    job.advance(JobState::Scoring)?;
    let probabilities = scorer::transition_probabilities(&counts);
    Ok(AnalysisResult::Transitions(TransitionReport {
        counts,
        probabilities,
    }))
}

fn specific_collocate(
    job: &mut Job,
    executor: &SelectedExecutor,
    chunks: &[Chunk],
    options: &SpecificCollocateOptions,
) -> Result<AnalysisResult> {
    let counter = job.check(
        CollocateCounter::new(options.subjects.iter().cloned(), options.window, options.sides)
            .map_err(Into::into),
    )?;
    let partials = job.check(executor.run(chunks, &counter))?;

    job.advance(JobState::Aggregating)?;
    let counts = Aggregator::new(executor).aggregate(partials);

    job.advance(JobState::Scoring)?;
    let subjects = scorer::score_specific(&counts, options.subjects.iter().map(String::as_str));
    Ok(AnalysisResult::SpecificCollocate(SpecificCollocateReport {
        window: options.window,
        sides: options.sides,
        subjects,
    }))
}

/// Two passes over the same chunks: word frequencies pick the subjects,
/// then collocates are counted around them. Both run in the counting stage.
fn general_collocate(
    job: &mut Job,
    executor: &SelectedExecutor,
    chunks: &[Chunk],
    options: &GeneralCollocateOptions,
) -> Result<AnalysisResult> {
    let aggregator = Aggregator::new(executor);

    let word_counter = job.check(FrequencyCounter::new(1).map_err(Into::into))?;
    let word_partials = job.check(executor.run(chunks, &word_counter))?;
    let words = into_word_frequencies(aggregator.aggregate(word_partials));
    let top = scorer::top_k_words(&words, options.top_k);
    log::debug!(
        "{}: selected {} of {} distinct words as subjects",
        job.analysis(),
        top.len(),
        words.len()
    );

    let counts = if top.is_empty() {
        job.advance(JobState::Aggregating)?;
        CollocateCounts::default()
    } else {
        let counter = job.check(
            CollocateCounter::new(
                top.iter().map(|(word, _)| word.clone()),
                options.window,
                options.sides,
            )
            .map_err(Into::into),
        )?;
        let partials = job.check(executor.run(chunks, &counter))?;

        job.advance(JobState::Aggregating)?;
        aggregator.aggregate(partials)
    };

    job.advance(JobState::Scoring)?;
    let ranked = scorer::rank_general(&counts, options.per_subject_limit, options.limit);
    let total = words.total();
    let subjects = top
        .into_iter()
        .map(|(key, count)| RankedCount {
            key,
            count,
            relative_frequency: scorer::relative_frequency(count, total),
        })
        .collect();

    Ok(AnalysisResult::GeneralCollocate(GeneralCollocateReport {
        window: options.window,
        sides: options.sides,
        subjects,
        ranked,
    }))
}

/// Builder for Analyzer
///
/// Provides a fluent interface for configuring the analyzer.
#[derive(Debug, Default)]
pub struct AnalyzerBuilder {
    config_builder: EngineConfigBuilder,
}

impl AnalyzerBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set sentences per chunk
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config_builder = self.config_builder.chunk_size(size);
        self
    }

    /// Set the thread count
    pub fn threads(mut self, count: Option<usize>) -> Self {
        self.config_builder = self.config_builder.threads(count);
        self
    }

    /// Set the execution mode
    pub fn execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.config_builder = self.config_builder.execution_mode(mode);
        self
    }

    /// Set how often pool construction is retried
    pub fn pool_retries(mut self, retries: usize) -> Self {
        self.config_builder = self.config_builder.pool_retries(retries);
        self
    }

    /// Build the analyzer
    pub fn build(self) -> Result<Analyzer> {
        Analyzer::with_config(self.config_builder.build()?)
    }
}
