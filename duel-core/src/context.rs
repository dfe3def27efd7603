//! Execution context passed explicitly into every engine call.
//!
//! There is no ambient session: a run acquires one [`ExecutionContext`],
//! hands a shared reference to each engine invocation, and releases it when
//! the run is over.
//!
//! Threading:
//! - [`ExecutionContext`] is intentionally not `Sync`. It keeps a job counter
//!   in a `Cell`; every engine call is a blocking call on the run's thread.

use std::cell::Cell;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use duel_types::{DuelError, DuelResult, Engine, Stage, Task};
use tracing::{debug, info};

/// Default number of shuffle partitions used by the query engine.
pub const DEFAULT_PARTITIONS: usize = 8;

static NEXT_RUN_ID: AtomicU64 = AtomicU64::new(1);

/// Engine settings carried by the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Hash partitions for the query engine's group-by stage.
    pub partitions: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            partitions: DEFAULT_PARTITIONS,
        }
    }
}

/// Handle to the execution substrate for one run.
#[derive(Debug)]
pub struct ExecutionContext {
    run_id: u64,
    partitions: NonZeroUsize,
    jobs: Cell<u64>,
    acquired_at: Instant,
}

impl ExecutionContext {
    /// Acquires a context for one run.
    ///
    /// # Errors
    ///
    /// Returns [`DuelError::InvalidArgument`] if `partitions` is zero.
    pub fn acquire(config: &EngineConfig) -> DuelResult<Self> {
        let partitions = NonZeroUsize::new(config.partitions).ok_or_else(|| {
            DuelError::InvalidArgument {
                stage: Stage::Config,
                reason: "engine partitions must be at least 1".into(),
            }
        })?;

        let run_id = NEXT_RUN_ID.fetch_add(1, Ordering::Relaxed);
        info!(run_id, partitions = partitions.get(), "execution context acquired");

        Ok(Self {
            run_id,
            partitions,
            jobs: Cell::new(0),
            acquired_at: Instant::now(),
        })
    }

    /// Identifier of this run, unique within the process.
    #[inline]
    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    /// Number of hash partitions for grouping.
    #[inline]
    pub fn partitions(&self) -> usize {
        self.partitions.get()
    }

    /// Number of engine jobs executed so far.
    #[inline]
    pub fn jobs(&self) -> u64 {
        self.jobs.get()
    }

    /// Records the start of an engine job.
    pub(crate) fn begin_job(&self, task: Task, engine: Engine) {
        let job = self.jobs.get() + 1;
        self.jobs.set(job);
        debug!(run_id = self.run_id, job, %task, %engine, "engine job");
    }

    /// Ends the run's scope.
    pub fn release(self) {
        info!(
            run_id = self.run_id,
            jobs = self.jobs.get(),
            elapsed_s = self.acquired_at.elapsed().as_secs_f64(),
            "execution context released"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_partitions_rejected() {
        let err = ExecutionContext::acquire(&EngineConfig { partitions: 0 }).unwrap_err();
        assert!(matches!(err, DuelError::InvalidArgument { stage: Stage::Config, .. }));
    }

    #[test]
    fn run_ids_are_unique() {
        let a = ExecutionContext::acquire(&EngineConfig::default()).expect("acquire");
        let b = ExecutionContext::acquire(&EngineConfig::default()).expect("acquire");
        assert_ne!(a.run_id(), b.run_id());
        assert_eq!(a.partitions(), DEFAULT_PARTITIONS);
        a.release();
        b.release();
    }

    #[test]
    fn counts_jobs() {
        let ctx = ExecutionContext::acquire(&EngineConfig { partitions: 2 }).expect("acquire");
        assert_eq!(ctx.jobs(), 0);
        ctx.begin_job(Task::WordCount, Engine::Record);
        ctx.begin_job(Task::WordPairs, Engine::Query);
        assert_eq!(ctx.jobs(), 2);
    }
}
