//! Application orchestration for corpus statistics
//!
//! This crate provides chunking, execution strategies, aggregation and the
//! job lifecycle around the mergeable counters of `corpstat-core`.
//!
//! # Example
//!
//! ```rust
//! use corpstat_engine::{Analysis, AnalysisResult, Analyzer, FrequencyOptions, Sentence};
//!
//! let corpus = vec![
//!     Sentence::from_words(["the", "quick", "brown", "fox"]),
//!     Sentence::from_words(["the", "lazy", "dog"]),
//! ];
//!
//! let analyzer = Analyzer::builder().chunk_size(1).build().unwrap();
//! let output = analyzer
//!     .run(&Analysis::Frequency(FrequencyOptions::new(1)), corpus)
//!     .unwrap();
//!
//! if let AnalysisResult::Frequency(report) = output.result {
//!     assert_eq!(report.ranked[0].key.to_string(), "the");
//!     assert_eq!(report.ranked[0].count, 2);
//! }
//! ```

#![warn(missing_docs)]

pub mod aggregator;
pub mod chunker;
pub mod config;
pub mod error;
pub mod executor;
pub mod job;
pub mod processor;

// Re-export key types
pub use aggregator::Aggregator;
pub use chunker::ChunkManager;
pub use config::{
    Analysis, EngineConfig, EngineConfigBuilder, FrequencyOptions, GeneralCollocateOptions,
    SpecificCollocateOptions,
};
pub use error::{EngineError, Result};
pub use executor::{ExecutionMode, Executor};
pub use job::{Job, JobState};
pub use processor::{
    AnalysisResult, Analyzer, AnalyzerBuilder, FrequencyReport, GeneralCollocateReport,
    JobMetadata, Output, SpecificCollocateReport, TransitionReport,
};

// Re-export from core for convenience
pub use corpstat_core::{
    CountTable, Ngram, Phrase, RankedCount, ScoredCollocate, Sentence, SubjectScores, TagPair,
    Token, TransitionProbability, WindowSides,
};
