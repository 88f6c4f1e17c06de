//! Execution strategies for chunk counting

use crate::{
    config::EngineConfig,
    error::{EngineError, Result},
};
use corpstat_core::{Chunk, CoreError, Counter, Monoid};

#[cfg(feature = "serde")]
use serde::Serialize;

#[cfg(feature = "parallel")]
pub mod parallel;
pub mod sequential;

// Re-export executors
#[cfg(feature = "parallel")]
pub use parallel::ParallelExecutor;
pub use sequential::SequentialExecutor;

/// Execution mode selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(rename_all = "lowercase"))]
pub enum ExecutionMode {
    /// Single-threaded sequential processing
    Sequential,
    /// Multi-threaded parallel processing
    Parallel,
    /// Automatic selection based on chunk count
    Adaptive,
}

/// Trait for execution strategies
pub trait Executor: Send + Sync {
    /// Count every chunk, returning partials in chunk order.
    ///
    /// Stops at the first failing chunk; partials already produced are
    /// discarded.
    fn run<C: Counter>(&self, chunks: &[Chunk], counter: &C) -> Result<Vec<C::Partial>>;

    /// Merge partials into one global value
    fn reduce<M: Monoid>(&self, partials: Vec<M>) -> M;

    /// Get the execution mode
    fn mode(&self) -> ExecutionMode;

    /// Number of workers
    fn thread_count(&self) -> usize;
}

/// Pick sequential or parallel execution for a job.
///
/// A single chunk or a single thread gains nothing from a pool.
pub fn auto_select(chunk_count: usize, threads: usize) -> ExecutionMode {
    if chunk_count <= 1 || threads <= 1 {
        ExecutionMode::Sequential
    } else {
        #[cfg(feature = "parallel")]
        return ExecutionMode::Parallel;

        #[cfg(not(feature = "parallel"))]
        ExecutionMode::Sequential
    }
}

/// Count one chunk, translating failures to corpus positions
pub(crate) fn count_chunk<C: Counter>(counter: &C, chunk: &Chunk) -> Result<C::Partial> {
    counter.count(chunk).map_err(|source| {
        let sentence = match &source {
            CoreError::MalformedToken { sentence, .. } => chunk.start + sentence,
            _ => chunk.start,
        };
        log::debug!(
            "{} counter failed on chunk {} (sentences {}..{})",
            counter.name(),
            chunk.index,
            chunk.start,
            chunk.end()
        );
        EngineError::ChunkFailed {
            chunk: chunk.index,
            sentence,
            source,
        }
    })
}

/// The executor chosen for one job
#[derive(Debug)]
pub enum SelectedExecutor {
    /// Runs on the calling thread
    Sequential(SequentialExecutor),
    /// Runs on a dedicated worker pool
    #[cfg(feature = "parallel")]
    Parallel(ParallelExecutor),
}

impl SelectedExecutor {
    /// Resolve the configured mode for `chunk_count` chunks and build the
    /// executor. Each call builds its own pool.
    pub fn for_job(config: &EngineConfig, chunk_count: usize) -> Result<Self> {
        let threads = config.thread_count();
        let mode = match config.execution_mode {
            ExecutionMode::Adaptive => auto_select(chunk_count, threads),
            mode => mode,
        };

        match mode {
            #[cfg(feature = "parallel")]
            ExecutionMode::Parallel => Ok(SelectedExecutor::Parallel(ParallelExecutor::new(
                threads,
                config.pool_retries,
            )?)),
            #[cfg(not(feature = "parallel"))]
            ExecutionMode::Parallel => {
                log::warn!("parallel execution not compiled in; running sequentially");
                Ok(SelectedExecutor::Sequential(SequentialExecutor))
            }
            ExecutionMode::Sequential | ExecutionMode::Adaptive => {
                Ok(SelectedExecutor::Sequential(SequentialExecutor))
            }
        }
    }
}

impl Executor for SelectedExecutor {
    fn run<C: Counter>(&self, chunks: &[Chunk], counter: &C) -> Result<Vec<C::Partial>> {
        match self {
            SelectedExecutor::Sequential(executor) => executor.run(chunks, counter),
            #[cfg(feature = "parallel")]
            SelectedExecutor::Parallel(executor) => executor.run(chunks, counter),
        }
    }

    fn reduce<M: Monoid>(&self, partials: Vec<M>) -> M {
        match self {
            SelectedExecutor::Sequential(executor) => executor.reduce(partials),
            #[cfg(feature = "parallel")]
            SelectedExecutor::Parallel(executor) => executor.reduce(partials),
        }
    }

    fn mode(&self) -> ExecutionMode {
        match self {
            SelectedExecutor::Sequential(executor) => executor.mode(),
            #[cfg(feature = "parallel")]
            SelectedExecutor::Parallel(executor) => executor.mode(),
        }
    }

    fn thread_count(&self) -> usize {
        match self {
            SelectedExecutor::Sequential(executor) => executor.thread_count(),
            #[cfg(feature = "parallel")]
            SelectedExecutor::Parallel(executor) => executor.thread_count(),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use corpstat_core::{Chunk, Counter};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Wraps a counter and records how many chunks it was asked to count
    pub(crate) struct Recording<'a, C> {
        inner: C,
        seen: &'a AtomicUsize,
    }

    impl<'a, C> Recording<'a, C> {
        pub(crate) fn new(inner: C, seen: &'a AtomicUsize) -> Self {
            Self { inner, seen }
        }
    }

    impl<C: Counter> Counter for Recording<'_, C> {
        type Partial = C::Partial;

        fn name(&self) -> &'static str {
            "recording"
        }

        fn count(&self, chunk: &Chunk) -> corpstat_core::Result<Self::Partial> {
            self.seen.fetch_add(1, Ordering::SeqCst);
            self.inner.count(chunk)
        }
    }
}
