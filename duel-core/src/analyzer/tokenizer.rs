//! Streaming tokenizer.
//!
//! Splits normalized text into tokens without allocating. It is the second
//! stage of the text pipeline: the normalizer produces a clean line, the
//! tokenizer emits each word with its position in that line.
//!
//! ```ignore
//! ("the", 0)
//! ("cat", 1)
//! ("sat", 2)
//! ```
//!
//! ## The Input Contract
//!
//! The tokenizer expects **pre-normalized** input:
//! - No leading or trailing whitespace
//! - No consecutive spaces between words
//!
//! Violations panic in debug builds with a message naming the contract.

use memchr::memchr_iter;

/// Streaming tokenizer - splits normalized text into tokens.
///
/// Tokens are slices of the input; the callback decides whether to copy them.
///
/// ```
/// use duel_core::analyzer::Tokenizer;
///
/// let mut count = 0;
/// Tokenizer::new().tokenize("hello world foo", |_text, _pos| count += 1);
/// assert_eq!(count, 3);
/// ```
#[derive(Debug, Copy, Clone, Default)]
pub struct Tokenizer;

impl Tokenizer {
    /// Creates a new tokenizer.
    #[inline]
    pub const fn new() -> Self {
        Self
    }

    /// Tokenizes normalized input and emits `(text, position)`.
    ///
    /// Positions are 0-based within the input. After emitting a token at
    /// position `u32::MAX`, further emissions stop.
    #[inline(always)]
    pub fn tokenize<'n, F>(&self, normalized: &'n str, mut emit: F)
    where
        F: FnMut(&'n str, u32),
    {
        let bytes = normalized.as_bytes();

        debug_assert!(
            bytes.first().is_none_or(|&b| b != b' '),
            "tokenizer: leading whitespace: normalizer contract violated"
        );

        debug_assert!(
            bytes.last().is_none_or(|&b| b != b' '),
            "tokenizer: trailing whitespace: normalizer contract violated"
        );

        debug_assert!(
            !normalized.contains("  "),
            "tokenizer: consecutive spaces: normalizer contract violated"
        );

        if bytes.is_empty() {
            return;
        }

        let mut start = 0usize;
        let mut pos = 0u32;

        // Splitting on an ASCII space always lands on a char boundary.
        for i in memchr_iter(b' ', bytes) {
            if start < i {
                emit(&normalized[start..i], pos);
                if pos == u32::MAX {
                    return;
                }
                pos += 1;
            }
            start = i + 1;
        }

        if start < bytes.len() {
            emit(&normalized[start..], pos);
        }
    }
}
