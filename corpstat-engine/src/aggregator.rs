//! Merging of per-chunk partials into global tables

use crate::executor::Executor;
use corpstat_core::Monoid;
use std::time::Instant;

/// Folds partial results with the executor's reduction strategy.
///
/// Partials may arrive in any order; every partial type is a commutative
/// monoid, so the merged table does not depend on arrival order or on how
/// merges are grouped.
#[derive(Debug)]
pub struct Aggregator<'a, E> {
    executor: &'a E,
}

impl<'a, E: Executor> Aggregator<'a, E> {
    /// Aggregate on `executor`
    pub fn new(executor: &'a E) -> Self {
        Self { executor }
    }

    /// Merge `partials` into one global value; no partials yield the identity
    pub fn aggregate<M: Monoid>(&self, partials: Vec<M>) -> M {
        if partials.is_empty() {
            return M::identity();
        }

        let count = partials.len();
        let started = Instant::now();
        let merged = self.executor.reduce(partials);
        log::debug!(
            "merged {count} partial tables in {:.2}ms",
            started.elapsed().as_secs_f64() * 1000.0
        );
        merged
    }
}
