//! One-shot engine comparison and the benchmark mode pipeline.

use std::time::Duration;

use duel_types::{
    BenchmarkRun, DuelResult, Engine, RankedEntry, RankedPair, StopPolicy, Task, TimingRecord,
};
use tracing::{info, warn};

use crate::bench::{timed, PairRace, TrialRunner};
use crate::context::ExecutionContext;
use crate::corpus::TokenizedCorpus;
use crate::engine::{self, verify};
use crate::rank;

/// Results of timing each task once under both engines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comparison {
    /// One record per task and engine, in execution order.
    pub timings: Vec<TimingRecord>,
    /// Total word count, if [`Task::WordCount`] ran.
    pub total_words: Option<u64>,
    /// Top words, if [`Task::WordFrequency`] ran.
    pub top_words: Vec<RankedEntry>,
    /// Top adjacent pairs, if [`Task::WordPairs`] ran.
    pub top_pairs: Vec<RankedPair>,
}

impl Comparison {
    /// Returns `true` if `task` was part of this comparison.
    pub fn ran(&self, task: Task) -> bool {
        self.timings.iter().any(|t| t.task == task)
    }

    /// Elapsed seconds of one engine on one task.
    pub fn elapsed(&self, task: Task, engine: Engine) -> Option<f64> {
        self.timings
            .iter()
            .find(|t| t.task == task && t.engine == engine)
            .map(|t| t.elapsed_seconds)
    }

    fn record(&mut self, task: Task, record: Duration, query: Duration) {
        self.timings.push(TimingRecord::new(task, Engine::Record, record));
        self.timings.push(TimingRecord::new(task, Engine::Query, query));
    }
}

/// Output of a benchmark mode: the single-shot word tasks plus the trial run.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeReport {
    /// Word count and word frequency, run once before the trial loop.
    pub preliminary: Comparison,
    /// The completed pair-counting benchmark.
    pub run: BenchmarkRun,
}

/// Times the given tasks once under each engine and cross-checks results.
///
/// An empty corpus is not an error here: every statistic is simply empty.
///
/// # Errors
///
/// Returns [`duel_types::DuelError::StrategyMismatch`] if the engines
/// disagree, [`duel_types::DuelError::InvalidArgument`] if `top_k` is zero,
/// and propagates engine failures.
pub fn compare_tasks(
    ctx: &ExecutionContext,
    corpus: &TokenizedCorpus,
    top_k: usize,
    tasks: &[Task],
) -> DuelResult<Comparison> {
    if corpus.is_empty() {
        warn!("corpus has no tokens, statistics will be empty");
    }

    let mut comparison = Comparison::default();

    for &task in tasks {
        info!(%task, "comparing engines");

        match task {
            Task::WordCount => {
                let (record_total, record) =
                    timed(|| engine::total_words(Engine::Record, ctx, corpus.tokens()))?;
                let (query_total, query) =
                    timed(|| engine::total_words(Engine::Query, ctx, corpus.tokens()))?;

                verify::verify_totals(record_total, query_total)?;
                comparison.total_words = Some(record_total);
                comparison.record(task, record, query);
            }
            Task::WordFrequency => {
                let frequency = |engine: Engine| {
                    timed(|| {
                        let counts = engine::count_words(engine, ctx, corpus.tokens())?;
                        let top = rank::top_k(&counts, top_k)?;
                        Ok((counts, top))
                    })
                };

                let ((record_counts, record_top), record) = frequency(Engine::Record)?;
                let ((query_counts, query_top), query) = frequency(Engine::Query)?;

                verify::verify_word_counts(&record_counts, &query_counts)?;
                verify::verify_ranked(task, &record_top, &query_top)?;
                comparison.top_words = record_top;
                comparison.record(task, record, query);
            }
            Task::WordPairs => {
                let pairs = |engine: Engine| {
                    timed(|| {
                        let counts = engine::count_pairs(engine, ctx, corpus)?;
                        let top = rank::top_k_pairs(&counts, top_k)?;
                        Ok((counts, top))
                    })
                };

                let ((record_counts, record_top), record) = pairs(Engine::Record)?;
                let ((query_counts, query_top), query) = pairs(Engine::Query)?;

                verify::verify_pair_counts(&record_counts, &query_counts)?;
                verify::verify_ranked(task, &record_top, &query_top)?;
                comparison.top_pairs = record_top;
                comparison.record(task, record, query);
            }
        }
    }

    Ok(comparison)
}

/// Times all three tasks once under both engines.
pub fn compare_once(
    ctx: &ExecutionContext,
    corpus: &TokenizedCorpus,
    top_k: usize,
) -> DuelResult<Comparison> {
    compare_tasks(
        ctx,
        corpus,
        top_k,
        &[Task::WordCount, Task::WordFrequency, Task::WordPairs],
    )
}

/// Runs a benchmark mode: word count and top-K once, then the pair trials.
///
/// # Errors
///
/// Fails fast with [`duel_types::DuelError::InvalidState`] on an empty
/// corpus, before any statistic is computed.
pub fn run_mode(
    policy: StopPolicy,
    ctx: &ExecutionContext,
    corpus: &TokenizedCorpus,
    top_k: usize,
    max_trials: u32,
) -> DuelResult<ModeReport> {
    let runner = TrialRunner::new(policy, max_trials)?;
    let mut subject = PairRace::new(ctx, corpus, top_k)?;

    let preliminary = compare_tasks(
        ctx,
        corpus,
        top_k,
        &[Task::WordCount, Task::WordFrequency],
    )?;
    let run = runner.run(&mut subject)?;

    Ok(ModeReport { preliminary, run })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::TextNormalizer;
    use crate::context::EngineConfig;
    use crate::corpus::Corpus;
    use duel_types::{BenchmarkOutcome, DuelError, Stage};

    const TEXT: &str = "The cat sat on the mat.\nThe cat, the dog!\n\nA dog sat.";

    fn ctx() -> ExecutionContext {
        ExecutionContext::acquire(&EngineConfig::default()).expect("acquire")
    }

    fn corpus(text: &str) -> TokenizedCorpus {
        Corpus::from_text(text).tokenize(&TextNormalizer::default())
    }

    #[test]
    fn compare_once_covers_every_task() {
        let ctx = ctx();
        let comparison = compare_once(&ctx, &corpus(TEXT), 3).expect("compare");

        assert_eq!(comparison.timings.len(), 6);
        assert_eq!(comparison.total_words, Some(13));
        assert_eq!(comparison.top_words[0].key, "the");
        assert_eq!(comparison.top_words[0].count, 4);
        assert_eq!(comparison.top_pairs[0].key.to_string(), "the|cat");
        assert_eq!(comparison.top_pairs[0].count, 2);

        for task in [Task::WordCount, Task::WordFrequency, Task::WordPairs] {
            assert!(comparison.ran(task));
            for engine in Engine::ALL {
                assert!(comparison.elapsed(task, engine).is_some());
            }
        }
    }

    #[test]
    fn compare_on_empty_corpus_yields_empty_statistics() {
        let ctx = ctx();
        let comparison = compare_once(&ctx, &corpus(""), 20).expect("compare");
        assert_eq!(comparison.total_words, Some(0));
        assert!(comparison.top_words.is_empty());
        assert!(comparison.top_pairs.is_empty());
    }

    #[test]
    fn compare_rejects_zero_k() {
        let ctx = ctx();
        let err = compare_once(&ctx, &corpus(TEXT), 0).unwrap_err();
        assert!(matches!(err, DuelError::InvalidArgument { .. }));
        assert_eq!(err.stage(), Stage::WordFrequency);
    }

    #[test]
    fn run_mode_reports_word_tasks_once() {
        let ctx = ctx();
        let report =
            run_mode(StopPolicy::FixedTally, &ctx, &corpus(TEXT), 5, 4).expect("mode");

        assert!(report.preliminary.ran(Task::WordCount));
        assert!(report.preliminary.ran(Task::WordFrequency));
        assert!(!report.preliminary.ran(Task::WordPairs));
        assert_eq!(report.run.trials.len(), 4);
        assert!(matches!(
            report.run.outcome,
            BenchmarkOutcome::FixedTally { total_trials: 4, .. }
        ));
    }

    #[test]
    fn run_mode_fails_fast_on_empty_corpus() {
        let ctx = ctx();
        let err = run_mode(StopPolicy::EarlyStop, &ctx, &corpus("!!!"), 20, 100).unwrap_err();
        assert!(matches!(err, DuelError::InvalidState(_)));
        assert_eq!(ctx.jobs(), 0);
    }
}
