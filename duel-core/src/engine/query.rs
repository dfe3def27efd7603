//! Query engine: statistics as a small relational plan.
//!
//! Each statistic is evaluated the way a SQL engine would run it:
//!
//! ```text
//! SELECT word, COUNT(*) FROM words GROUP BY word
//!
//! SELECT l.word, r.word, COUNT(*)
//! FROM words l JOIN words r ON r.line = l.line AND r.pos = l.pos + 1
//! GROUP BY l.word, r.word
//! ```
//!
//! Operators:
//! - **explode**: one row per token, `(line, pos, word)`, sorted by
//!   `(line, pos)` by construction
//! - **adjacent join**: merge join of the row set with itself on
//!   `(line, pos + 1) = (line', pos')`
//! - **group count**: hash-partition rows into the context's shuffle
//!   partitions, sort each partition, then count runs of equal keys
//!
//! The grouped output is translated back into the same map shape the record
//! engine produces.

use std::hash::{BuildHasher, Hash};

use duel_types::{DuelError, DuelResult, PairKey, Stage, Token};
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;

use crate::context::{ExecutionContext, DEFAULT_PARTITIONS};
use crate::corpus::TokenizedCorpus;
use crate::engine::{PairCount, WordCount};

type Partitions<R> = SmallVec<[Vec<R>; DEFAULT_PARTITIONS]>;

/// Row of the exploded word table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WordRow<'a> {
    line: u32,
    pos: u32,
    word: &'a str,
}

impl WordRow<'_> {
    #[inline(always)]
    fn key(&self) -> (u32, u64) {
        (self.line, u64::from(self.pos))
    }
}

/// `SELECT word FROM tokens WHERE word != ''`
fn scan_words(tokens: &[Token]) -> Vec<&str> {
    tokens
        .iter()
        .map(String::as_str)
        .filter(|w| !w.is_empty())
        .collect()
}

fn explode(corpus: &TokenizedCorpus) -> DuelResult<Vec<WordRow<'_>>> {
    let mut rows = Vec::with_capacity(corpus.token_count());

    for (line, tokens) in corpus.lines().enumerate() {
        let line = u32::try_from(line).map_err(|_| row_overflow("line index"))?;
        for (pos, word) in tokens.iter().enumerate() {
            let pos = u32::try_from(pos).map_err(|_| row_overflow("token position"))?;
            rows.push(WordRow {
                line,
                pos,
                word: word.as_str(),
            });
        }
    }

    Ok(rows)
}

fn row_overflow(what: &str) -> DuelError {
    DuelError::ExecutionFailure {
        stage: Stage::WordPairs,
        reason: format!("{what} does not fit a 32-bit row key"),
    }
}

/// Positional self-join: pairs every row with the row one position later on
/// the same line.
fn adjacent_join<'a>(rows: &[WordRow<'a>]) -> Vec<(&'a str, &'a str)> {
    debug_assert!(
        rows.windows(2).all(|w| w[0].key() < w[1].key()),
        "adjacent_join: rows must be sorted by (line, pos)"
    );

    let mut out = Vec::with_capacity(rows.len());
    let mut right = 0usize;

    for left in rows {
        let (line, pos) = left.key();
        let wanted = (line, pos + 1);

        while right < rows.len() && rows[right].key() < wanted {
            right += 1;
        }

        if right < rows.len() && rows[right].key() == wanted {
            out.push((left.word, rows[right].word));
        }
    }

    out
}

/// `GROUP BY key` + `COUNT(*)` over a shuffled, sorted row set.
fn group_count<K: Hash + Ord>(rows: Vec<K>, partitions: usize) -> Vec<(K, u64)> {
    let hasher = FxBuildHasher;
    let buckets = partitions.max(1);

    let mut shuffled: Partitions<K> = (0..buckets).map(|_| Vec::new()).collect();
    for row in rows {
        let p = (hasher.hash_one(&row) % buckets as u64) as usize;
        shuffled[p].push(row);
    }

    let mut grouped = Vec::new();

    for mut partition in shuffled {
        partition.sort_unstable();

        let mut rows = partition.into_iter();
        let Some(mut current) = rows.next() else {
            continue;
        };
        let mut count = 1u64;

        for row in rows {
            if row == current {
                count += 1;
            } else {
                grouped.push((std::mem::replace(&mut current, row), count));
                count = 1;
            }
        }

        grouped.push((current, count));
    }

    grouped
}

/// `SELECT COUNT(*) FROM words`
pub(crate) fn total_words(tokens: &[Token]) -> DuelResult<u64> {
    Ok(scan_words(tokens).len() as u64)
}

pub(crate) fn word_counts(ctx: &ExecutionContext, tokens: &[Token]) -> DuelResult<WordCount> {
    let grouped = group_count(scan_words(tokens), ctx.partitions());

    let mut counts = WordCount::with_capacity_and_hasher(grouped.len(), Default::default());
    counts.extend(
        grouped
            .into_iter()
            .map(|(word, count)| (word.to_owned(), count)),
    );
    Ok(counts)
}

pub(crate) fn pair_counts(
    ctx: &ExecutionContext,
    corpus: &TokenizedCorpus,
) -> DuelResult<PairCount> {
    let rows = explode(corpus)?;
    let joined = adjacent_join(&rows);
    let grouped = group_count(joined, ctx.partitions());

    let mut counts = PairCount::with_capacity_and_hasher(grouped.len(), Default::default());
    counts.extend(
        grouped
            .into_iter()
            .map(|((first, second), count)| (PairKey::new(first, second), count)),
    );
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_count_counts_runs_across_partitions() {
        let rows = vec!["b", "a", "c", "a", "b", "a"];
        for partitions in [1, 2, 8, 13] {
            let mut grouped = group_count(rows.clone(), partitions);
            grouped.sort_unstable();
            assert_eq!(grouped, vec![("a", 3), ("b", 2), ("c", 1)]);
        }
    }

    #[test]
    fn group_count_empty() {
        let grouped: Vec<(&str, u64)> = group_count(Vec::new(), 8);
        assert!(grouped.is_empty());
    }

    #[test]
    fn explode_assigns_line_and_position() {
        let corpus = TokenizedCorpus::from_lines(vec![vec!["a", "b"], vec![], vec!["c"]]);
        let rows = explode(&corpus).expect("explode");
        let keys: Vec<_> = rows.iter().map(|r| (r.line, r.pos, r.word)).collect();
        assert_eq!(keys, vec![(0, 0, "a"), (0, 1, "b"), (2, 0, "c")]);
    }

    #[test]
    fn adjacent_join_never_crosses_lines() {
        let corpus =
            TokenizedCorpus::from_lines(vec![vec!["the", "cat"], vec!["sat"], vec!["on", "a", "mat"]]);
        let rows = explode(&corpus).expect("explode");
        let joined = adjacent_join(&rows);
        assert_eq!(joined, vec![("the", "cat"), ("on", "a"), ("a", "mat")]);
    }

    #[test]
    fn scan_filters_empty_words() {
        let tokens = vec![String::from("a"), String::new(), String::from("b")];
        assert_eq!(scan_words(&tokens), vec!["a", "b"]);
        assert_eq!(total_words(&tokens).expect("count"), 2);
    }
}
