//! Benchmark harness: repeated trials of one task under both engines.
//!
//! A [`TrialRunner`] owns the loop and the stopping policy; a
//! [`TrialSubject`] owns the work of a single trial. The same loop serves
//! both policies:
//!
//! - **EarlyStop**: stop at the first trial the record engine wins, or after
//!   the last planned trial
//! - **FixedTally**: run every planned trial and count record engine wins
//!
//! Trials are strictly sequential. A failing trial aborts the whole run and
//! the trials recorded so far are dropped: no outcome is ever produced for
//! an incomplete run.

mod pipeline;
mod subject;

pub use pipeline::{compare_once, compare_tasks, run_mode, Comparison, ModeReport};
pub use subject::{timed, PairRace, WordRace};

use std::time::Duration;

use duel_types::{
    BenchmarkOutcome, BenchmarkRun, DuelError, DuelResult, Engine, Stage, StopPolicy, Task,
    TrialResult,
};
use tracing::{debug, info, warn};

/// Default number of planned trials.
pub const DEFAULT_MAX_TRIALS: u32 = 100;

/// Measured durations of one trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Race {
    /// Record engine (strategy A).
    pub record: Duration,
    /// Query engine (strategy B).
    pub query: Duration,
}

/// Work executed once per trial.
pub trait TrialSubject {
    /// Task being benchmarked.
    fn task(&self) -> Task;

    /// Runs both engines once and returns their durations.
    ///
    /// `trial` is the 1-based trial index.
    fn race(&mut self, trial: u32) -> DuelResult<Race>;
}

/// Trial loop parameterized by a stopping policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialRunner {
    policy: StopPolicy,
    max_trials: u32,
}

impl TrialRunner {
    /// Creates a runner planning `max_trials` trials.
    ///
    /// # Errors
    ///
    /// Returns [`DuelError::InvalidArgument`] if `max_trials` is zero.
    pub fn new(policy: StopPolicy, max_trials: u32) -> DuelResult<Self> {
        if max_trials == 0 {
            return Err(DuelError::InvalidArgument {
                stage: Stage::Benchmark,
                reason: "a benchmark needs at least one trial".into(),
            });
        }
        Ok(Self { policy, max_trials })
    }

    /// Policy applied by this runner.
    #[inline]
    pub fn policy(&self) -> StopPolicy {
        self.policy
    }

    /// Number of planned trials.
    #[inline]
    pub fn max_trials(&self) -> u32 {
        self.max_trials
    }

    /// Runs trials until the policy's terminal condition.
    ///
    /// # Errors
    ///
    /// Propagates the first error raised by `subject`; the partial trial
    /// sequence is discarded.
    pub fn run<S>(&self, subject: &mut S) -> DuelResult<BenchmarkRun>
    where
        S: TrialSubject + ?Sized,
    {
        let task = subject.task();
        info!(policy = %self.policy, %task, max_trials = self.max_trials, "benchmark started");

        // `max_trials` is only an upper bound under early stop.
        let mut trials = Vec::with_capacity(self.max_trials.min(DEFAULT_MAX_TRIALS) as usize);

        for trial in 1..=self.max_trials {
            let race = subject.race(trial).inspect_err(|err| {
                warn!(trial, %task, error = %err, "trial failed, benchmark aborted");
            })?;

            let result = TrialResult::new(trial, race.record, race.query);
            debug!(
                trial,
                record_s = result.record.as_secs_f64(),
                query_s = result.query.as_secs_f64(),
                winner = %result.winner,
                "trial finished"
            );
            trials.push(result);

            if self.policy == StopPolicy::EarlyStop && result.winner == Engine::Record {
                let outcome = BenchmarkOutcome::EarlyStop {
                    stopped_at: Some(trial),
                    trials_run: trial,
                };
                info!(%outcome, "benchmark finished");
                return Ok(BenchmarkRun { trials, outcome });
            }
        }

        let outcome = match self.policy {
            StopPolicy::EarlyStop => BenchmarkOutcome::EarlyStop {
                stopped_at: None,
                trials_run: self.max_trials,
            },
            StopPolicy::FixedTally => BenchmarkOutcome::FixedTally {
                total_trials: self.max_trials,
                record_wins: trials
                    .iter()
                    .filter(|t| t.winner == Engine::Record)
                    .count() as u32,
            },
        };

        info!(%outcome, "benchmark finished");
        Ok(BenchmarkRun { trials, outcome })
    }
}
