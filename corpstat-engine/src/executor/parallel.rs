//! Parallel execution strategy
//!
//! Each executor owns a dedicated rayon pool, so concurrent jobs never
//! share workers. Counting short-circuits on the first failing chunk and
//! chunks not yet started are skipped.

use crate::{
    error::{EngineError, Result},
    executor::{count_chunk, ExecutionMode, Executor},
};
use corpstat_core::{Chunk, Counter, Monoid, MonoidReduce};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::fmt;

/// Parallel multi-threaded executor
#[derive(Debug)]
pub struct ParallelExecutor {
    pool: ThreadPool,
    threads: usize,
}

impl ParallelExecutor {
    /// Build a pool of `threads` workers, retrying a failed build up to
    /// `retries` more times
    pub fn new(threads: usize, retries: usize) -> Result<Self> {
        let threads = threads.max(1);
        let pool = build_with_retries(retries, || {
            ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|i| format!("corpstat-worker-{i}"))
                .build()
        })?;

        log::debug!("worker pool ready: {threads} threads");
        Ok(Self { pool, threads })
    }
}

/// Run `build` until it succeeds, at most `retries + 1` times.
///
/// Every failure but the last is logged as a warning; the last escalates to
/// [`EngineError::ThreadPool`].
pub(crate) fn build_with_retries<T, E, F>(retries: usize, mut build: F) -> Result<T>
where
    E: fmt::Display,
    F: FnMut() -> std::result::Result<T, E>,
{
    let mut attempts = 0;
    loop {
        attempts += 1;
        match build() {
            Ok(built) => return Ok(built),
            Err(e) if attempts <= retries => {
                log::warn!("worker pool build failed (attempt {attempts}): {e}; retrying");
            }
            Err(e) => {
                return Err(EngineError::ThreadPool {
                    attempts,
                    reason: e.to_string(),
                });
            }
        }
    }
}

impl Executor for ParallelExecutor {
    fn run<C: Counter>(&self, chunks: &[Chunk], counter: &C) -> Result<Vec<C::Partial>> {
        self.pool.install(|| {
            chunks
                .par_iter()
                .map(|chunk| count_chunk(counter, chunk))
                .collect::<Result<Vec<_>>>()
        })
    }

    fn reduce<M: Monoid>(&self, partials: Vec<M>) -> M {
        self.pool.install(|| M::par_reduce(partials))
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Parallel
    }

    fn thread_count(&self) -> usize {
        self.threads
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{testing::Recording, SequentialExecutor};
    use corpstat_core::{FrequencyCounter, Sentence, Token};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn chunks(count: usize) -> Vec<Chunk> {
        (0..count)
            .map(|i| {
                Chunk::new(
                    i,
                    i * 2,
                    vec![
                        Sentence::from_words(["the", "quick", "fox"]),
                        Sentence::from_words([format!("w{}", i % 3), "fox".to_string()]),
                    ],
                )
            })
            .collect()
    }

    #[test]
    fn test_matches_sequential() {
        let chunks = chunks(17);
        let counter = FrequencyCounter::new(2).unwrap();
        let parallel = ParallelExecutor::new(4, 0).unwrap();

        let expected = SequentialExecutor.reduce(SequentialExecutor.run(&chunks, &counter).unwrap());
        let actual = parallel.reduce(parallel.run(&chunks, &counter).unwrap());

        assert_eq!(actual, expected);
        assert_eq!(parallel.thread_count(), 4);
        assert_eq!(parallel.mode(), ExecutionMode::Parallel);
    }

    #[test]
    fn test_failure_propagates() {
        let mut chunks = chunks(8);
        chunks[5]
            .sentences
            .push(Sentence::new(vec![Token::new("x"), Token::new("")]));

        let parallel = ParallelExecutor::new(3, 0).unwrap();
        let err = parallel
            .run(&chunks, &FrequencyCounter::new(1).unwrap())
            .unwrap_err();

        match err {
            EngineError::ChunkFailed {
                chunk, sentence, ..
            } => {
                assert_eq!(chunk, 5);
                assert_eq!(sentence, 12);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_build_succeeds_within_retries() {
        let mut calls = 0;
        let built = build_with_retries(2, || {
            calls += 1;
            if calls <= 2 {
                Err("no threads")
            } else {
                Ok(calls)
            }
        })
        .unwrap();

        assert_eq!(built, 3);
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_build_escalates_after_last_retry() {
        let mut calls = 0;
        let err = build_with_retries(2, || -> std::result::Result<(), &str> {
            calls += 1;
            Err("no threads")
        })
        .unwrap_err();

        assert_eq!(calls, 3);
        assert!(err.is_transient());
        match err {
            EngineError::ThreadPool { attempts, reason } => {
                assert_eq!(attempts, 3);
                assert_eq!(reason, "no threads");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_build_without_retries_tries_once() {
        let mut calls = 0;
        let err = build_with_retries(0, || -> std::result::Result<(), &str> {
            calls += 1;
            Err("no threads")
        })
        .unwrap_err();

        assert_eq!(calls, 1);
        assert!(matches!(err, EngineError::ThreadPool { attempts: 1, .. }));
    }

    #[test]
    fn test_failure_stops_queued_chunks() {
        let mut chunks = chunks(1_000);
        chunks[0]
            .sentences
            .insert(0, Sentence::new(vec![Token::new("")]));

        let seen = AtomicUsize::new(0);
        let counter = Recording::new(FrequencyCounter::new(1).unwrap(), &seen);
        let parallel = ParallelExecutor::new(1, 0).unwrap();

        let err = parallel.run(&chunks, &counter).unwrap_err();
        assert!(matches!(err, EngineError::ChunkFailed { chunk: 0, .. }));
        assert!(seen.load(Ordering::SeqCst) < 100);
    }
}
