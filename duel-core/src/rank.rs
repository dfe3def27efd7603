//! Top-K selection over count maps.
//!
//! Entries are ordered by count (descending), then by key (ascending), so the
//! ranking is a total order that never depends on hash map iteration order.

use std::cmp::Ordering;
use std::hash::Hash;

use duel_types::{DuelError, DuelResult, Ranked, RankedEntry, RankedPair, Stage};
use rustc_hash::FxHashMap;

use crate::engine::{PairCount, WordCount};

/// Default number of entries in a ranking.
pub const DEFAULT_TOP_K: usize = 20;

#[inline(always)]
fn by_rank<K: Ord>(a: &(&K, u64), b: &(&K, u64)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0))
}

/// Ranks the `k` most frequent keys of any count map.
///
/// Returns `min(k, counts.len())` entries with 1-based ranks.
///
/// # Errors
///
/// Returns [`DuelError::InvalidArgument`] attributed to `stage` if `k` is
/// zero.
pub fn top_k_by<K>(
    counts: &FxHashMap<K, u64>,
    k: usize,
    stage: Stage,
) -> DuelResult<Vec<Ranked<K>>>
where
    K: Ord + Hash + Clone,
{
    if k == 0 {
        return Err(DuelError::InvalidArgument {
            stage,
            reason: "top-k requires k of at least 1".into(),
        });
    }

    let mut entries: Vec<(&K, u64)> = counts.iter().map(|(key, &count)| (key, count)).collect();

    if entries.len() > k {
        entries.select_nth_unstable_by(k - 1, by_rank);
        entries.truncate(k);
    }
    entries.sort_unstable_by(by_rank);

    Ok(entries
        .into_iter()
        .enumerate()
        .map(|(i, (key, count))| {
            let rank = u32::try_from(i + 1).unwrap_or(u32::MAX);
            Ranked::new(key.clone(), count, rank)
        })
        .collect())
}

/// Ranks the `k` most frequent words.
///
/// ```
/// use duel_core::engine::WordCount;
/// use duel_core::rank::top_k;
///
/// let counts: WordCount = [("cat", 3), ("dog", 3), ("ant", 5)]
///     .into_iter()
///     .map(|(w, c)| (w.to_string(), c))
///     .collect();
///
/// let top = top_k(&counts, 2).unwrap();
/// assert_eq!(top[0].key, "ant");
/// assert_eq!(top[1].key, "cat");
/// ```
pub fn top_k(counts: &WordCount, k: usize) -> DuelResult<Vec<RankedEntry>> {
    top_k_by(counts, k, Stage::WordFrequency)
}

/// Ranks the `k` most frequent adjacent pairs, ties broken by
/// `(first, second)`.
pub fn top_k_pairs(counts: &PairCount, k: usize) -> DuelResult<Vec<RankedPair>> {
    top_k_by(counts, k, Stage::WordPairs)
}

/// Turns a ranking back into a count map.
pub fn to_word_count(ranked: &[RankedEntry]) -> WordCount {
    ranked
        .iter()
        .map(|entry| (entry.key.clone(), entry.count))
        .collect()
}

/// Turns a pair ranking back into a count map.
pub fn to_pair_count(ranked: &[RankedPair]) -> PairCount {
    ranked
        .iter()
        .map(|entry| (entry.key.clone(), entry.count))
        .collect()
}
