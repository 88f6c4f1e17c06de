//! Counting algorithms
//!
//! Every algorithm consumes one [`Chunk`] and produces a partial result that
//! is a [`Monoid`], so the engine can run any of them through the same
//! worker pool and merge the partials without knowing which one it holds.

use crate::{error::Result, monoid::Monoid, types::Chunk};

pub mod collocate;
pub mod frequency;
pub mod transition;

pub use collocate::{CollocateCounter, CollocateCounts, WindowSides};
pub use frequency::{into_word_frequencies, FrequencyCounter};
pub use transition::TransitionCounter;

/// Consume a chunk, produce a partial table
pub trait Counter: Send + Sync {
    /// Partial result for one chunk
    type Partial: Monoid;

    /// Short name used in logs and error reports
    fn name(&self) -> &'static str;

    /// Count one chunk into a fresh partial table.
    ///
    /// Fails on the first malformed sentence; the reported sentence index is
    /// relative to the chunk.
    fn count(&self, chunk: &Chunk) -> Result<Self::Partial>;
}
