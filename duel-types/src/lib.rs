//! Core types and errors for the corpus-duel workspace.
//!
//! This crate provides the value types shared between the engines, the
//! benchmark harness and the reporters. Keeping them separate ensures:
//!
//! - **Typed records**: every engine output is translated into the same shape
//! - **Cross-crate compatibility**: binaries and reporters share one vocabulary
//! - **Clean boundaries**: no algorithms live here, only data and errors

#![warn(missing_docs)]

use core::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

/// A normalized word: lowercase, restricted to the configured character
/// class, never empty.
pub type Token = String;

/// One of the two interchangeable aggregation engines.
///
/// `Record` is strategy A (imperative tally), `Query` is strategy B
/// (declarative group-and-aggregate plan).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Engine {
    /// Sequential record-at-a-time tally.
    Record,
    /// Relational plan: explode, partition, sort, group, count.
    Query,
}

impl Engine {
    /// Both engines, strategy A first.
    pub const ALL: [Engine; 2] = [Engine::Record, Engine::Query];

    /// Stable lowercase label used in logs and CSV output.
    #[inline]
    pub const fn label(self) -> &'static str {
        match self {
            Engine::Record => "record",
            Engine::Query => "query",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The statistic being computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    /// Total number of tokens.
    WordCount,
    /// Top-K most frequent tokens.
    WordFrequency,
    /// Frequency of adjacent token pairs within a line.
    WordPairs,
}

impl Task {
    /// Stable snake_case label used in logs and CSV output.
    #[inline]
    pub const fn label(self) -> &'static str {
        match self {
            Task::WordCount => "word_count",
            Task::WordFrequency => "word_frequency",
            Task::WordPairs => "word_pairs",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An ordered pair of adjacent tokens from the same line.
///
/// Direction matters: `(a, b)` and `(b, a)` are different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    /// Left-hand token.
    pub first: Token,
    /// Token immediately following `first`.
    pub second: Token,
}

impl PairKey {
    /// Creates a pair key from its two tokens.
    pub fn new(first: impl Into<Token>, second: impl Into<Token>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.first, self.second)
    }
}

/// A ranked aggregate entry.
///
/// Rank is 1-based. Ordering between entries is count descending, then key
/// ascending, so equal counts never depend on map iteration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranked<K> {
    /// The ranked key (a token or a pair).
    pub key: K,
    /// Number of occurrences.
    pub count: u64,
    /// 1-based position in the ranking.
    pub rank: u32,
}

impl<K> Ranked<K> {
    /// Creates a ranked entry.
    #[inline]
    pub fn new(key: K, count: u64, rank: u32) -> Self {
        Self { key, count, rank }
    }
}

impl<K: fmt::Display> fmt::Display for Ranked<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} ({})", self.rank, self.key, self.count)
    }
}

/// A ranked word.
pub type RankedEntry = Ranked<Token>;

/// A ranked adjacent pair.
pub type RankedPair = Ranked<PairKey>;

/// Wall-clock time of one engine on one task, measured once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimingRecord {
    /// Task that was timed.
    pub task: Task,
    /// Engine that ran it.
    pub engine: Engine,
    /// Elapsed wall-clock seconds.
    pub elapsed_seconds: f64,
}

impl TimingRecord {
    /// Creates a timing record from a measured duration.
    pub fn new(task: Task, engine: Engine, elapsed: Duration) -> Self {
        Self {
            task,
            engine,
            elapsed_seconds: elapsed.as_secs_f64(),
        }
    }
}

/// One benchmark repetition. Immutable once recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialResult {
    /// 1-based trial index.
    pub trial: u32,
    /// Duration of the record engine (strategy A).
    pub record: Duration,
    /// Duration of the query engine (strategy B).
    pub query: Duration,
    /// Faster engine. Ties go to the query engine.
    pub winner: Engine,
}

impl TrialResult {
    /// Records a trial and derives its winner.
    pub fn new(trial: u32, record: Duration, query: Duration) -> Self {
        let winner = if record < query {
            Engine::Record
        } else {
            Engine::Query
        };
        Self {
            trial,
            record,
            query,
            winner,
        }
    }
}

/// Benchmark termination policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopPolicy {
    /// Stop at the first trial the record engine wins.
    EarlyStop,
    /// Always run every trial and tally record engine wins.
    FixedTally,
}

impl StopPolicy {
    /// Stable snake_case label used in logs and file names.
    #[inline]
    pub const fn label(self) -> &'static str {
        match self {
            StopPolicy::EarlyStop => "early_stop",
            StopPolicy::FixedTally => "fixed_tally",
        }
    }
}

impl fmt::Display for StopPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Aggregate result of a completed benchmark run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchmarkOutcome {
    /// Result under [`StopPolicy::EarlyStop`].
    EarlyStop {
        /// First trial the record engine won, or `None` if it never did.
        stopped_at: Option<u32>,
        /// Number of trials executed.
        trials_run: u32,
    },
    /// Result under [`StopPolicy::FixedTally`].
    FixedTally {
        /// Number of trials executed (always the planned count).
        total_trials: u32,
        /// Trials won by the record engine.
        record_wins: u32,
    },
}

impl BenchmarkOutcome {
    /// The policy that produced this outcome.
    pub const fn policy(&self) -> StopPolicy {
        match self {
            BenchmarkOutcome::EarlyStop { .. } => StopPolicy::EarlyStop,
            BenchmarkOutcome::FixedTally { .. } => StopPolicy::FixedTally,
        }
    }

    /// Value for the summary row: the stopping trial (empty if none) or
    /// `wins/total`.
    pub fn outcome_value(&self) -> String {
        match self {
            BenchmarkOutcome::EarlyStop { stopped_at, .. } => {
                stopped_at.map(|t| t.to_string()).unwrap_or_default()
            }
            BenchmarkOutcome::FixedTally {
                total_trials,
                record_wins,
            } => format!("{record_wins}/{total_trials}"),
        }
    }
}

impl fmt::Display for BenchmarkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BenchmarkOutcome::EarlyStop {
                stopped_at: Some(trial),
                ..
            } => write!(f, "record engine won on trial {trial}"),
            BenchmarkOutcome::EarlyStop {
                stopped_at: None,
                trials_run,
            } => write!(f, "no record engine win in {trials_run} trials"),
            BenchmarkOutcome::FixedTally {
                total_trials,
                record_wins,
            } => write!(
                f,
                "record engine won {record_wins} of {total_trials} trials"
            ),
        }
    }
}

/// A finished benchmark: every recorded trial plus the derived outcome.
///
/// Only constructed when the run completed; aborted runs surface as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkRun {
    /// Trials in execution order.
    pub trials: Vec<TrialResult>,
    /// Outcome under the run's policy.
    pub outcome: BenchmarkOutcome,
}

/// Pipeline stage, used to name where a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading and checking the run configuration.
    Config,
    /// Reading the corpus.
    Load,
    /// Total word count.
    WordCount,
    /// Word frequency and top-K.
    WordFrequency,
    /// Adjacent pair counting.
    WordPairs,
    /// Benchmark trial loop.
    Benchmark,
    /// Writing results.
    Report,
}

impl From<Task> for Stage {
    fn from(task: Task) -> Self {
        match task {
            Task::WordCount => Stage::WordCount,
            Task::WordFrequency => Stage::WordFrequency,
            Task::WordPairs => Stage::WordPairs,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Config => "config",
            Stage::Load => "load",
            Stage::WordCount => "word count",
            Stage::WordFrequency => "word frequency",
            Stage::WordPairs => "word pairs",
            Stage::Benchmark => "benchmark",
            Stage::Report => "report",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by any stage of a run.
#[derive(Debug, thiserror::Error)]
pub enum DuelError {
    /// The corpus file is missing or unreadable.
    #[error("input not found: {path}: {source}")]
    InputNotFound {
        /// Path that was tried.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// An operation was attempted in a state where its result is meaningless.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A caller-supplied argument is out of range.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Stage that rejected the argument.
        stage: Stage,
        /// Which argument and why.
        reason: String,
    },

    /// The two engines disagree on the same task. Indicates a defect.
    #[error("engines disagree on {task}: {detail}")]
    StrategyMismatch {
        /// Task whose results differ.
        task: Task,
        /// First difference found.
        detail: String,
    },

    /// An engine call failed.
    #[error("{stage} stage failed: {reason}")]
    ExecutionFailure {
        /// Stage that was running.
        stage: Stage,
        /// What went wrong.
        reason: String,
    },

    /// Writing a result file failed.
    #[error("failed to write {path}: {reason}")]
    Output {
        /// Destination that could not be written.
        path: PathBuf,
        /// Underlying failure.
        reason: String,
    },
}

impl DuelError {
    /// The stage this error is attributed to.
    pub fn stage(&self) -> Stage {
        match self {
            DuelError::InputNotFound { .. } => Stage::Load,
            DuelError::InvalidState(_) => Stage::Benchmark,
            DuelError::InvalidArgument { stage, .. } => *stage,
            DuelError::StrategyMismatch { task, .. } => Stage::from(*task),
            DuelError::ExecutionFailure { stage, .. } => *stage,
            DuelError::Output { .. } => Stage::Report,
        }
    }
}

/// Result alias used across the workspace.
pub type DuelResult<T> = Result<T, DuelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn winner_is_strictly_faster_engine() {
        let a = TrialResult::new(1, Duration::from_millis(5), Duration::from_millis(9));
        assert_eq!(a.winner, Engine::Record);

        let b = TrialResult::new(2, Duration::from_millis(9), Duration::from_millis(5));
        assert_eq!(b.winner, Engine::Query);
    }

    #[test]
    fn tie_goes_to_query_engine() {
        let t = TrialResult::new(1, Duration::from_millis(7), Duration::from_millis(7));
        assert_eq!(t.winner, Engine::Query);
    }

    #[test]
    fn pair_key_is_directional() {
        let ab = PairKey::new("a", "b");
        let ba = PairKey::new("b", "a");
        assert_ne!(ab, ba);
        assert!(ab < ba);
        assert_eq!(ab.to_string(), "a|b");
    }

    #[test]
    fn outcome_values() {
        let stopped = BenchmarkOutcome::EarlyStop {
            stopped_at: Some(41),
            trials_run: 41,
        };
        assert_eq!(stopped.outcome_value(), "41");
        assert_eq!(stopped.policy(), StopPolicy::EarlyStop);

        let never = BenchmarkOutcome::EarlyStop {
            stopped_at: None,
            trials_run: 100,
        };
        assert_eq!(never.outcome_value(), "");
        assert!(never.to_string().contains("100"));

        let tally = BenchmarkOutcome::FixedTally {
            total_trials: 100,
            record_wins: 2,
        };
        assert_eq!(tally.outcome_value(), "2/100");
        assert_eq!(tally.policy(), StopPolicy::FixedTally);
    }

    #[test]
    fn invalid_argument_carries_its_stage() {
        let err = DuelError::InvalidArgument {
            stage: Stage::Config,
            reason: "top_k must be at least 1".into(),
        };
        assert_eq!(err.stage(), Stage::Config);
        assert_eq!(err.stage().to_string(), "config");
        assert_eq!(err.to_string(), "invalid argument: top_k must be at least 1");
    }

    #[test]
    fn errors_name_their_stage() {
        let err = DuelError::StrategyMismatch {
            task: Task::WordPairs,
            detail: "a|b: 2 vs 3".into(),
        };
        assert_eq!(err.stage(), Stage::WordPairs);
        assert!(err.to_string().contains("word_pairs"));

        let err = DuelError::ExecutionFailure {
            stage: Stage::WordCount,
            reason: "boom".into(),
        };
        assert_eq!(err.to_string(), "word count stage failed: boom");
    }

    #[test]
    fn labels_are_stable() {
        assert_eq!(Engine::Record.label(), "record");
        assert_eq!(Engine::Query.to_string(), "query");
        assert_eq!(Task::WordFrequency.label(), "word_frequency");
        assert_eq!(StopPolicy::FixedTally.label(), "fixed_tally");
    }
}
