//! Job lifecycle tracking
//!
//! A job moves through its stages strictly in order:
//! `Pending -> Chunking -> Counting -> Aggregating -> Scoring -> Done`.
//! Any non-terminal stage may instead end in `Failed`, which records the
//! stage the failure happened in.

use crate::error::{EngineError, Result};
use std::fmt;
use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Lifecycle stage of an analysis job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(rename_all = "lowercase"))]
pub enum JobState {
    /// Accepted, not started
    Pending,
    /// Splitting the corpus into chunks
    Chunking,
    /// Counting chunks on the worker pool
    Counting,
    /// Merging partial tables
    Aggregating,
    /// Ranking the merged tables
    Scoring,
    /// Finished with a result
    Done,
    /// Finished with an error
    Failed,
}

impl JobState {
    /// The stage that follows this one on success
    pub fn next(self) -> Option<JobState> {
        match self {
            JobState::Pending => Some(JobState::Chunking),
            JobState::Chunking => Some(JobState::Counting),
            JobState::Counting => Some(JobState::Aggregating),
            JobState::Aggregating => Some(JobState::Scoring),
            JobState::Scoring => Some(JobState::Done),
            JobState::Done | JobState::Failed => None,
        }
    }

    /// Whether the job can no longer change state
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Done | JobState::Failed)
    }

    fn as_str(self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Chunking => "chunking",
            JobState::Counting => "counting",
            JobState::Aggregating => "aggregating",
            JobState::Scoring => "scoring",
            JobState::Done => "done",
            JobState::Failed => "failed",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State and stage timings of one running job
#[derive(Debug)]
pub struct Job {
    analysis: &'static str,
    state: JobState,
    failed_in: Option<JobState>,
    started: Instant,
    stage_started: Instant,
    timings: Vec<(JobState, Duration)>,
}

impl Job {
    /// Create a pending job for the named analysis
    pub fn new(analysis: &'static str) -> Self {
        let now = Instant::now();
        Self {
            analysis,
            state: JobState::Pending,
            failed_in: None,
            started: now,
            stage_started: now,
            timings: Vec::with_capacity(5),
        }
    }

    /// Analysis this job runs
    pub fn analysis(&self) -> &'static str {
        self.analysis
    }

    /// Current stage
    pub fn state(&self) -> JobState {
        self.state
    }

    /// Stage the job failed in, if it failed
    pub fn failed_in(&self) -> Option<JobState> {
        self.failed_in
    }

    /// Move to the next stage; anything but the successor is rejected
    pub fn advance(&mut self, to: JobState) -> Result<()> {
        if self.state.next() != Some(to) {
            return Err(EngineError::InvalidTransition {
                from: self.state,
                to,
            });
        }

        self.close_stage();
        log::debug!("{} job: {} -> {}", self.analysis, self.state, to);
        self.state = to;
        Ok(())
    }

    /// Mark the job failed and wrap `error` with the failing stage.
    ///
    /// Failing an already terminal job returns the error unchanged.
    pub fn fail(&mut self, error: EngineError) -> EngineError {
        if self.state.is_terminal() {
            return error;
        }

        let stage = self.state;
        self.close_stage();
        self.failed_in = Some(stage);
        self.state = JobState::Failed;
        log::error!("{} job failed during {}: {}", self.analysis, stage, error);

        EngineError::JobFailed {
            analysis: self.analysis,
            stage,
            source: Box::new(error),
        }
    }

    /// Pass `result` through, failing the job on error
    pub fn check<T>(&mut self, result: Result<T>) -> Result<T> {
        result.map_err(|error| self.fail(error))
    }

    /// Time spent in a completed stage
    pub fn stage_time(&self, stage: JobState) -> Duration {
        self.timings
            .iter()
            .filter(|(s, _)| *s == stage)
            .map(|(_, d)| *d)
            .sum()
    }

    /// Time since the job was created
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn close_stage(&mut self) {
        let now = Instant::now();
        self.timings.push((self.state, now - self.stage_started));
        self.stage_started = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpstat_core::CoreError;

    #[test]
    fn test_linear_progression() {
        let mut job = Job::new("frequency");
        for stage in [
            JobState::Chunking,
            JobState::Counting,
            JobState::Aggregating,
            JobState::Scoring,
            JobState::Done,
        ] {
            job.advance(stage).unwrap();
            assert_eq!(job.state(), stage);
        }
        assert!(job.state().is_terminal());
        assert_eq!(job.failed_in(), None);
    }

    #[test]
    fn test_skipping_a_stage_is_rejected() {
        let mut job = Job::new("transitions");
        job.advance(JobState::Chunking).unwrap();

        let err = job.advance(JobState::Aggregating).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidTransition {
                from: JobState::Chunking,
                to: JobState::Aggregating
            }
        ));
        assert_eq!(job.state(), JobState::Chunking);
    }

    #[test]
    fn test_done_is_terminal() {
        let mut job = Job::new("frequency");
        for stage in [
            JobState::Chunking,
            JobState::Counting,
            JobState::Aggregating,
            JobState::Scoring,
            JobState::Done,
        ] {
            job.advance(stage).unwrap();
        }
        assert!(job.advance(JobState::Failed).is_err());

        let err = job.fail(EngineError::ConfigError("late".to_string()));
        assert!(matches!(err, EngineError::ConfigError(_)));
        assert_eq!(job.state(), JobState::Done);
    }

    #[test]
    fn test_failure_records_stage() {
        let mut job = Job::new("frequency");
        job.advance(JobState::Chunking).unwrap();
        job.advance(JobState::Counting).unwrap();

        let result: Result<()> = job.check(Err(EngineError::ChunkFailed {
            chunk: 1,
            sentence: 7,
            source: CoreError::MalformedToken {
                sentence: 2,
                token: 0,
            },
        }));

        let err = result.unwrap_err();
        assert_eq!(err.failed_stage(), Some(JobState::Counting));
        assert_eq!(job.state(), JobState::Failed);
        assert_eq!(job.failed_in(), Some(JobState::Counting));
        assert!(job.advance(JobState::Aggregating).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(JobState::Aggregating.to_string(), "aggregating");
        assert_eq!(JobState::Pending.next(), Some(JobState::Chunking));
        assert_eq!(JobState::Failed.next(), None);
    }
}
