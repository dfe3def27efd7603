//! The two aggregation engines.
//!
//! Every statistic has one entry point taking an [`Engine`] tag, so both
//! strategies share a single contract and callers pick one by value:
//!
//! - [`Engine::Record`]: a single pass tally over tokens (strategy A)
//! - [`Engine::Query`]: a relational plan of explode, join, partition, sort
//!   and group (strategy B)
//!
//! Both must produce identical maps; [`verify`] turns any disagreement into
//! a [`duel_types::DuelError::StrategyMismatch`].

mod query;
mod record;
pub mod verify;

use duel_types::{DuelResult, Engine, PairKey, Task, Token};
use rustc_hash::FxHashMap;

use crate::context::ExecutionContext;
use crate::corpus::TokenizedCorpus;

pub use verify::{verify_pair_counts, verify_ranked, verify_totals, verify_word_counts};

/// Occurrences per distinct token.
pub type WordCount = FxHashMap<Token, u64>;

/// Occurrences per ordered adjacent pair.
pub type PairCount = FxHashMap<PairKey, u64>;

/// Total number of tokens.
pub fn total_words(engine: Engine, ctx: &ExecutionContext, tokens: &[Token]) -> DuelResult<u64> {
    ctx.begin_job(Task::WordCount, engine);
    match engine {
        Engine::Record => Ok(record::total_words(tokens)),
        Engine::Query => query::total_words(tokens),
    }
}

/// Occurrences of each distinct token.
///
/// An empty token sequence yields an empty map.
pub fn count_words(
    engine: Engine,
    ctx: &ExecutionContext,
    tokens: &[Token],
) -> DuelResult<WordCount> {
    ctx.begin_job(Task::WordFrequency, engine);
    match engine {
        Engine::Record => Ok(record::word_counts(tokens)),
        Engine::Query => query::word_counts(ctx, tokens),
    }
}

/// Occurrences of each ordered pair of adjacent tokens.
///
/// Pairs never span two lines: a line of `L` tokens contributes
/// `max(L - 1, 0)` pairs.
pub fn count_pairs(
    engine: Engine,
    ctx: &ExecutionContext,
    corpus: &TokenizedCorpus,
) -> DuelResult<PairCount> {
    ctx.begin_job(Task::WordPairs, engine);
    match engine {
        Engine::Record => Ok(record::pair_counts(corpus)),
        Engine::Query => query::pair_counts(ctx, corpus),
    }
}
