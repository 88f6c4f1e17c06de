//! Sequential execution strategy

use crate::{
    error::Result,
    executor::{count_chunk, ExecutionMode, Executor},
};
use corpstat_core::{Chunk, Counter, Monoid, MonoidReduce};

/// Sequential single-threaded executor
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialExecutor;

impl Executor for SequentialExecutor {
    fn run<C: Counter>(&self, chunks: &[Chunk], counter: &C) -> Result<Vec<C::Partial>> {
        let mut partials = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            partials.push(count_chunk(counter, chunk)?);
        }
        Ok(partials)
    }

    fn reduce<M: Monoid>(&self, partials: Vec<M>) -> M {
        M::reduce(partials)
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Sequential
    }

    fn thread_count(&self) -> usize {
        1
    }
}
