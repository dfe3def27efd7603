//! Cross-checks between the two engines.
//!
//! A disagreement is a defect, never a runtime condition: these checks
//! return [`DuelError::StrategyMismatch`] and never pick one side.

use std::fmt::Display;
use std::hash::Hash;

use duel_types::{DuelError, DuelResult, Ranked, Task};
use rustc_hash::FxHashMap;

use crate::engine::{PairCount, WordCount};

/// Checks that both engines counted the same number of tokens.
pub fn verify_totals(record: u64, query: u64) -> DuelResult<()> {
    if record == query {
        return Ok(());
    }
    Err(DuelError::StrategyMismatch {
        task: Task::WordCount,
        detail: format!("total words: record={record} query={query}"),
    })
}

/// Checks that both word-count maps hold the same keys and counts.
pub fn verify_word_counts(record: &WordCount, query: &WordCount) -> DuelResult<()> {
    verify_maps(Task::WordFrequency, record, query)
}

/// Checks that both pair-count maps hold the same keys and counts.
pub fn verify_pair_counts(record: &PairCount, query: &PairCount) -> DuelResult<()> {
    verify_maps(Task::WordPairs, record, query)
}

/// Checks that two rankings are identical entry by entry.
pub fn verify_ranked<K>(task: Task, record: &[Ranked<K>], query: &[Ranked<K>]) -> DuelResult<()>
where
    K: PartialEq + Display,
{
    if record == query {
        return Ok(());
    }

    let detail = match record.iter().zip(query).find(|(a, b)| a != b) {
        Some((a, b)) => format!("ranked entry differs: record={a} query={b}"),
        None => format!(
            "ranking length differs: record={} query={}",
            record.len(),
            query.len()
        ),
    };
    Err(DuelError::StrategyMismatch { task, detail })
}

fn verify_maps<K>(
    task: Task,
    record: &FxHashMap<K, u64>,
    query: &FxHashMap<K, u64>,
) -> DuelResult<()>
where
    K: Eq + Hash + Ord + Display,
{
    if record == query {
        return Ok(());
    }

    // Report the smallest differing key so the message is reproducible.
    let first = record
        .keys()
        .chain(query.keys())
        .filter(|key| record.get(*key) != query.get(*key))
        .min();

    let detail = match first {
        Some(key) => format!(
            "{key}: record={} query={}",
            describe(record.get(key)),
            describe(query.get(key))
        ),
        None => "maps differ".to_owned(),
    };
    Err(DuelError::StrategyMismatch { task, detail })
}

fn describe(count: Option<&u64>) -> String {
    count.map_or_else(|| "missing".to_owned(), u64::to_string)
}
