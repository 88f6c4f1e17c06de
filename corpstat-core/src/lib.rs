//! Mergeable counting algorithms for corpus statistics
//!
//! This crate holds the algorithmic half of corpstat: the data model,
//! sparse count tables, the three counting algorithms and the scorer.
//! Every partial result is a commutative monoid, so a corpus can be cut
//! into chunks, counted independently and merged in any order or grouping
//! with the same result as a single pass.
//!
//! # Example
//!
//! ```rust
//! use corpstat_core::{Chunk, Counter, FrequencyCounter, Monoid, Phrase, Sentence};
//!
//! let counter = FrequencyCounter::new(2).unwrap();
//! let left = Chunk::new(0, 0, vec![Sentence::from_words(["the", "quick", "fox"])]);
//! let right = Chunk::new(1, 1, vec![Sentence::from_words(["the", "quick", "dog"])]);
//!
//! let global = counter
//!     .count(&left)
//!     .unwrap()
//!     .combine(counter.count(&right).unwrap());
//!
//! assert_eq!(global.get(&Phrase::from("the quick")), 2);
//! ```

pub mod counter;
pub mod error;
pub mod monoid;
pub mod scorer;
pub mod table;
pub mod types;

pub use counter::{
    into_word_frequencies, CollocateCounter, CollocateCounts, Counter, FrequencyCounter,
    TransitionCounter, WindowSides,
};
pub use error::{CoreError, Result};
pub use monoid::{Monoid, MonoidReduce};
pub use scorer::{RankedCount, ScoredCollocate, SubjectScores, TransitionProbability};
pub use table::{CountTable, WordFrequencies};
pub use types::{Chunk, CollocateKey, Ngram, Phrase, Sentence, Side, TagPair, Token};
