//! Record engine: one sequential pass, one running tally per key.

use duel_types::{PairKey, Token};
use rustc_hash::FxHashMap;

use crate::corpus::TokenizedCorpus;
use crate::engine::{PairCount, WordCount};

pub(crate) fn total_words(tokens: &[Token]) -> u64 {
    tokens.iter().filter(|t| !t.is_empty()).count() as u64
}

pub(crate) fn word_counts(tokens: &[Token]) -> WordCount {
    let mut counts = WordCount::default();

    for token in tokens.iter().filter(|t| !t.is_empty()) {
        match counts.get_mut(token.as_str()) {
            Some(count) => *count += 1,
            None => {
                counts.insert(token.clone(), 1);
            }
        }
    }

    counts
}

pub(crate) fn pair_counts(corpus: &TokenizedCorpus) -> PairCount {
    // Borrowed keys while tallying; owned only once per distinct pair.
    let mut tally: FxHashMap<(&str, &str), u64> = FxHashMap::default();

    for line in corpus.lines() {
        for window in line.windows(2) {
            *tally.entry((window[0].as_str(), window[1].as_str())).or_insert(0) += 1;
        }
    }

    let mut counts = PairCount::with_capacity_and_hasher(tally.len(), Default::default());
    counts.extend(
        tally
            .into_iter()
            .map(|((first, second), count)| (PairKey::new(first, second), count)),
    );
    counts
}
