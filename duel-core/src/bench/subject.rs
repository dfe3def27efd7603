//! Real trial subjects backed by the engines.

use std::time::{Duration, Instant};

use duel_types::{DuelError, DuelResult, Engine, Task};

use crate::bench::{Race, TrialSubject};
use crate::context::ExecutionContext;
use crate::corpus::TokenizedCorpus;
use crate::engine::{self, verify};
use crate::rank;

/// Runs `f` and measures its wall-clock duration.
pub fn timed<T>(f: impl FnOnce() -> DuelResult<T>) -> DuelResult<(T, Duration)> {
    let start = Instant::now();
    let value = f()?;
    Ok((value, start.elapsed()))
}

/// Word-frequency race: count every word, then rank the top `k`.
pub struct WordRace<'a> {
    ctx: &'a ExecutionContext,
    corpus: &'a TokenizedCorpus,
    top_k: usize,
}

impl<'a> WordRace<'a> {
    /// Prepares a word-frequency race.
    ///
    /// # Errors
    ///
    /// Returns [`DuelError::InvalidState`] if the corpus has no tokens.
    pub fn new(
        ctx: &'a ExecutionContext,
        corpus: &'a TokenizedCorpus,
        top_k: usize,
    ) -> DuelResult<Self> {
        if corpus.is_empty() {
            return Err(DuelError::InvalidState(
                "cannot benchmark word frequency on an empty corpus".into(),
            ));
        }
        Ok(Self { ctx, corpus, top_k })
    }
}

impl TrialSubject for WordRace<'_> {
    fn task(&self) -> Task {
        Task::WordFrequency
    }

    fn race(&mut self, _trial: u32) -> DuelResult<Race> {
        let run = |engine: Engine| {
            timed(|| {
                let counts = engine::count_words(engine, self.ctx, self.corpus.tokens())?;
                let top = rank::top_k(&counts, self.top_k)?;
                Ok((counts, top))
            })
        };

        let ((record_counts, record_top), record) = run(Engine::Record)?;
        let ((query_counts, query_top), query) = run(Engine::Query)?;

        verify::verify_word_counts(&record_counts, &query_counts)?;
        verify::verify_ranked(Task::WordFrequency, &record_top, &query_top)?;

        Ok(Race { record, query })
    }
}

/// Adjacent-pair race: count every pair, then rank the top `k`.
pub struct PairRace<'a> {
    ctx: &'a ExecutionContext,
    corpus: &'a TokenizedCorpus,
    top_k: usize,
}

impl<'a> PairRace<'a> {
    /// Prepares a pair race.
    ///
    /// # Errors
    ///
    /// Returns [`DuelError::InvalidState`] if the corpus has no tokens or no
    /// line holds two of them.
    pub fn new(
        ctx: &'a ExecutionContext,
        corpus: &'a TokenizedCorpus,
        top_k: usize,
    ) -> DuelResult<Self> {
        if corpus.is_empty() {
            return Err(DuelError::InvalidState(
                "cannot benchmark word pairs on an empty corpus".into(),
            ));
        }
        if corpus.pair_positions() == 0 {
            return Err(DuelError::InvalidState(
                "cannot benchmark word pairs: no line has two tokens".into(),
            ));
        }
        Ok(Self { ctx, corpus, top_k })
    }
}

impl TrialSubject for PairRace<'_> {
    fn task(&self) -> Task {
        Task::WordPairs
    }

    fn race(&mut self, _trial: u32) -> DuelResult<Race> {
        let run = |engine: Engine| {
            timed(|| {
                let counts = engine::count_pairs(engine, self.ctx, self.corpus)?;
                let top = rank::top_k_pairs(&counts, self.top_k)?;
                Ok((counts, top))
            })
        };

        let ((record_counts, record_top), record) = run(Engine::Record)?;
        let ((query_counts, query_top), query) = run(Engine::Query)?;

        verify::verify_pair_counts(&record_counts, &query_counts)?;
        verify::verify_ranked(Task::WordPairs, &record_top, &query_top)?;

        Ok(Race { record, query })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::TextNormalizer;
    use crate::bench::TrialRunner;
    use crate::context::EngineConfig;
    use crate::corpus::Corpus;
    use duel_types::{BenchmarkOutcome, StopPolicy};

    fn ctx() -> ExecutionContext {
        ExecutionContext::acquire(&EngineConfig::default()).expect("acquire")
    }

    fn corpus(text: &str) -> TokenizedCorpus {
        Corpus::from_text(text).tokenize(&TextNormalizer::default())
    }

    #[test]
    fn empty_corpus_is_invalid_state() {
        let ctx = ctx();
        let empty = corpus("");
        assert!(matches!(
            PairRace::new(&ctx, &empty, 20),
            Err(DuelError::InvalidState(_))
        ));
        assert!(matches!(
            WordRace::new(&ctx, &empty, 20),
            Err(DuelError::InvalidState(_))
        ));
    }

    #[test]
    fn single_word_lines_cannot_race_pairs() {
        let ctx = ctx();
        let lonely = corpus("one\ntwo\nthree");
        assert!(matches!(
            PairRace::new(&ctx, &lonely, 20),
            Err(DuelError::InvalidState(_))
        ));
        assert!(WordRace::new(&ctx, &lonely, 20).is_ok());
    }

    #[test]
    fn pair_race_runs_both_engines() {
        let ctx = ctx();
        let text = corpus("the cat sat on the mat\nthe cat ran");
        let mut race = PairRace::new(&ctx, &text, 5).expect("race");

        race.race(1).expect("trial");
        assert_eq!(ctx.jobs(), 2);
        assert_eq!(race.task(), Task::WordPairs);
    }

    #[test]
    fn fixed_tally_over_real_engines() {
        let ctx = ctx();
        let text = corpus("a b c a b c\nb c a\nc c c");
        let mut race = PairRace::new(&ctx, &text, 3).expect("race");

        let runner = TrialRunner::new(StopPolicy::FixedTally, 5).expect("runner");
        let run = runner.run(&mut race).expect("run");

        assert_eq!(run.trials.len(), 5);
        assert!(matches!(
            run.outcome,
            BenchmarkOutcome::FixedTally { total_trials: 5, .. }
        ));
        assert_eq!(ctx.jobs(), 10);
    }

    #[test]
    fn word_race_verifies_rankings() {
        let ctx = ctx();
        let text = corpus("x y z x y x");
        let mut race = WordRace::new(&ctx, &text, 2).expect("race");
        assert_eq!(race.task(), Task::WordFrequency);
        race.race(1).expect("trial");
    }

    #[test]
    fn timed_propagates_errors() {
        let result: DuelResult<((), Duration)> =
            timed(|| Err(DuelError::InvalidState("nope".into())));
        assert!(result.is_err());

        let (value, elapsed) = timed(|| Ok(42)).expect("timed");
        assert_eq!(value, 42);
        assert!(elapsed <= Duration::from_secs(1));
    }
}
