//! Corpus loading and line-preserving tokenization.
//!
//! A [`Corpus`] is the raw text as an ordered list of lines. Tokenizing it
//! produces a [`TokenizedCorpus`]: every token stored once in a flat buffer,
//! with one span per source line so pair counting can respect line
//! boundaries while word counting sees a single token stream.
//!
//! ## Memory Layout
//!
//! ```text
//! tokens: [the][cat][sat][on][the][mat][a][dog]
//!          ^              ^                 ^
//! spans:  (0,3)          (3,3)             (6,2)
//! ```

use std::fs;
use std::path::Path;

use duel_types::{DuelError, DuelResult, Token};
use tracing::{debug, info};

use memchr::memchr2_iter;

use crate::analyzer::{TextNormalizer, Tokenizer};

/// Raw corpus text, one entry per line. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    lines: Vec<String>,
}

impl Corpus {
    /// Splits text into lines on `\n`, `\r\n` or a lone `\r`.
    ///
    /// A final line break does not start an empty line.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: split_lines(text),
        }
    }

    /// Builds a corpus from already separated lines.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Reads a UTF-8 plain-text file.
    ///
    /// # Errors
    ///
    /// Returns [`DuelError::InputNotFound`] if the file is missing, unreadable,
    /// or not valid UTF-8.
    pub fn load(path: impl AsRef<Path>) -> DuelResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| DuelError::InputNotFound {
            path: path.to_path_buf(),
            source,
        })?;

        let corpus = Self::from_text(&text);
        info!(
            path = %path.display(),
            bytes = text.len(),
            lines = corpus.len(),
            "corpus loaded"
        );
        Ok(corpus)
    }

    /// Raw lines in source order.
    #[inline]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if the corpus has no lines.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Normalizes and tokenizes every line, preserving line boundaries.
    pub fn tokenize(&self, normalizer: &TextNormalizer) -> TokenizedCorpus {
        let tokenizer = Tokenizer::new();
        let mut norm_buf = String::with_capacity(256);
        let mut out = TokenizedCorpus::default();
        out.spans.reserve(self.lines.len());

        for line in &self.lines {
            normalizer.normalize_into(line, &mut norm_buf);
            let start = out.tokens.len();
            tokenizer.tokenize(&norm_buf, |text, _| out.tokens.push(text.to_owned()));
            out.spans.push(LineSpan {
                start,
                len: out.tokens.len() - start,
            });
        }

        debug!(
            lines = out.line_count(),
            tokens = out.token_count(),
            "corpus tokenized"
        );
        out
    }

    /// Flat token sequence with line boundaries discarded.
    pub fn tokens(&self, normalizer: &TextNormalizer) -> Vec<Token> {
        self.tokenize(normalizer).into_tokens()
    }

    /// Token sequence per line.
    pub fn token_lines(&self, normalizer: &TextNormalizer) -> Vec<Vec<Token>> {
        self.tokenize(normalizer)
            .lines()
            .map(<[Token]>::to_vec)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineSpan {
    start: usize,
    len: usize,
}

fn split_lines(text: &str) -> Vec<String> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;

    for end in memchr2_iter(b'\n', b'\r', bytes) {
        // The `\n` of a `\r\n` pair was consumed with its `\r`.
        if end < start {
            continue;
        }
        lines.push(text[start..end].to_owned());
        start = if bytes[end] == b'\r' && bytes.get(end + 1) == Some(&b'\n') {
            end + 2
        } else {
            end + 1
        };
    }
    if start < text.len() {
        lines.push(text[start..].to_owned());
    }

    lines
}

/// Tokens of a corpus with their line boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizedCorpus {
    tokens: Vec<Token>,
    spans: Vec<LineSpan>,
}

impl TokenizedCorpus {
    /// Builds a tokenized corpus from per-line token lists.
    ///
    /// Empty strings are skipped so the non-empty token invariant holds.
    pub fn from_lines<L, T>(lines: L) -> Self
    where
        L: IntoIterator,
        L::Item: IntoIterator<Item = T>,
        T: Into<Token>,
    {
        let mut out = Self::default();
        for line in lines {
            let start = out.tokens.len();
            out.tokens.extend(
                line.into_iter()
                    .map(Into::into)
                    .filter(|t: &Token| !t.is_empty()),
            );
            out.spans.push(LineSpan {
                start,
                len: out.tokens.len() - start,
            });
        }
        out
    }

    /// All tokens in corpus order.
    #[inline]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Consumes the corpus, returning the flat token sequence.
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Tokens of each line, in order. Lines without tokens yield empty slices.
    pub fn lines(&self) -> impl ExactSizeIterator<Item = &[Token]> + '_ {
        self.spans
            .iter()
            .map(|span| &self.tokens[span.start..span.start + span.len])
    }

    /// Number of source lines, including those without tokens.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.spans.len()
    }

    /// Total number of tokens.
    #[inline]
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Number of adjacent positions: the sum of `max(len - 1, 0)` per line.
    pub fn pair_positions(&self) -> usize {
        self.spans.iter().map(|s| s.len.saturating_sub(1)).sum()
    }

    /// Returns `true` if no line produced a token.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
