use std::str;

/// Table entry for bytes removed from the output.
const DROP: u8 = 0x00;
/// Table entry for bytes that separate tokens.
const SEP: u8 = b' ';

/// Builds a byte classification table for one character class.
///
/// Each entry is either [`DROP`], [`SEP`], or the lowercased byte to emit.
/// Every byte >= 0x80 (any part of a multi-byte UTF-8 sequence) is dropped,
/// so the output is always ASCII.
const fn build_table(keep_digits: bool) -> [u8; 256] {
    let mut table = [DROP; 256];
    let mut b = 0usize;
    while b < 256 {
        let byte = b as u8;
        table[b] = if is_ascii_ws(byte) {
            SEP
        } else if byte.is_ascii_uppercase() {
            byte.to_ascii_lowercase()
        } else if byte.is_ascii_lowercase() || (keep_digits && byte.is_ascii_digit()) {
            byte
        } else {
            DROP
        };
        b += 1;
    }
    table
}

static ALPHABETIC_TABLE: [u8; 256] = build_table(false);
static ALPHANUMERIC_TABLE: [u8; 256] = build_table(true);

/// Whitespace as matched by `\s` in a Java-style regex: space, tab, newline,
/// carriage return, vertical tab and form feed.
#[inline(always)]
const fn is_ascii_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

/// Characters that survive normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharClass {
    /// ASCII letters only. Digits are removed like punctuation.
    #[default]
    Alphabetic,
    /// ASCII letters and digits.
    Alphanumeric,
}

impl CharClass {
    #[inline(always)]
    fn table(self) -> &'static [u8; 256] {
        match self {
            CharClass::Alphabetic => &ALPHABETIC_TABLE,
            CharClass::Alphanumeric => &ALPHANUMERIC_TABLE,
        }
    }
}

/// Configuration options for text normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NormalizerConfig {
    /// Which characters are kept in tokens.
    pub class: CharClass,
}

/// Line normalizer for word statistics.
///
/// Performs the following operations:
/// - Lowercases ASCII letters
/// - Removes every character outside the configured [`CharClass`]
///   (punctuation, symbols, and all non-ASCII text)
/// - Collapses runs of ASCII whitespace into single spaces
/// - Removes leading/trailing whitespace
///
/// Removed characters do not split words: `"don't"` becomes `"dont"`.
/// The output is deterministic and independent of locale.
///
/// # Examples
///
/// ```
/// use duel_core::analyzer::TextNormalizer;
///
/// let normalizer = TextNormalizer::default();
/// assert_eq!(normalizer.normalize("  The Cat,  the CAT!  "), "the cat the cat");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer {
    config: NormalizerConfig,
}

impl TextNormalizer {
    /// Creates a new normalizer with the specified configuration.
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration.
    #[inline]
    pub fn config(&self) -> NormalizerConfig {
        self.config
    }

    /// Normalizes text into an existing String buffer.
    ///
    /// Clears the buffer before writing and reuses its capacity when it is
    /// large enough.
    #[inline]
    pub fn normalize_into(&self, input: &str, out: &mut String) {
        out.clear();
        out.reserve(input.len());

        let table = self.config.class.table();
        let mut pending_space = false;

        for &b in input.as_bytes() {
            match table[b as usize] {
                DROP => {}
                SEP => pending_space = !out.is_empty(),
                lowered => {
                    if pending_space {
                        out.push(' ');
                        pending_space = false;
                    }
                    out.push(lowered as char);
                }
            }
        }
    }

    /// Normalizes text and returns a new String.
    #[inline]
    pub fn normalize(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        self.normalize_into(input, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(input: &str) -> String {
        TextNormalizer::default().normalize(input)
    }

    fn norm_alnum(input: &str) -> String {
        TextNormalizer::new(NormalizerConfig {
            class: CharClass::Alphanumeric,
        })
        .normalize(input)
    }

    #[test]
    fn ascii_basic_lowercase() {
        assert_eq!(norm("HELLO"), "hello");
        assert_eq!(norm("HeLlO"), "hello");
    }

    #[test]
    fn ascii_full_alphabet() {
        let upper: String = (b'A'..=b'Z').map(|b| b as char).collect();
        let lower: String = (b'a'..=b'z').map(|b| b as char).collect();
        assert_eq!(norm(&upper), lower);
    }

    #[test]
    fn punctuation_removed_without_splitting() {
        assert_eq!(norm("The Cat, the CAT!"), "the cat the cat");
        assert_eq!(norm("don't"), "dont");
        assert_eq!(norm("foo-bar_baz"), "foobarbaz");
    }

    #[test]
    fn digits_depend_on_class() {
        assert_eq!(norm("123 ABC!"), "abc");
        assert_eq!(norm("chapter 12b"), "chapter b");
        assert_eq!(norm_alnum("123 ABC!"), "123 abc");
        assert_eq!(norm_alnum("chapter 12b"), "chapter 12b");
    }

    #[test]
    fn whitespace_collapse() {
        assert_eq!(norm("hello   world"), "hello world");
        assert_eq!(norm("hello\t\nworld"), "hello world");
        assert_eq!(norm("hello \r\n world"), "hello world");
        assert_eq!(norm("hello\x0B\x0Cworld"), "hello world");
    }

    #[test]
    fn leading_and_trailing_whitespace_removed() {
        assert_eq!(norm("   hello"), "hello");
        assert_eq!(norm("hello   "), "hello");
        assert_eq!(norm("  , hello ,  "), "hello");
    }

    #[test]
    fn only_whitespace_or_punctuation() {
        assert_eq!(norm("   "), "");
        assert_eq!(norm("\n\t\r"), "");
        assert_eq!(norm("... !!! ???"), "");
    }

    #[test]
    fn punctuation_between_spaces_leaves_single_space() {
        assert_eq!(norm("hello - world"), "hello world");
    }

    #[test]
    fn non_ascii_removed() {
        assert_eq!(norm("café"), "caf");
        assert_eq!(norm("naïve"), "nave");
        assert_eq!(norm("Hello 🌍 World"), "hello world");
        assert_eq!(norm("你好世界"), "");
    }

    #[test]
    fn unicode_lowercase_to_ascii_is_not_applied() {
        // Dotted capital I and the Kelvin sign lowercase to ASCII under
        // Unicode rules; the byte table drops them like any non-ASCII char.
        assert_eq!(norm("\u{0130}stanbul"), "stanbul");
        assert_eq!(norm("300 \u{212A}"), "");
        assert_eq!(norm("\u{212A}elvin"), "elvin");
    }

    #[test]
    fn non_breaking_space_is_not_whitespace() {
        assert_eq!(norm("a\u{00A0}b"), "ab");
    }

    #[test]
    fn output_always_ascii() {
        let inputs = ["hello", "café", "İstanbul", "ΠΡΟΒΛΗΜΑ", "مرحبا", "こんにちは"];
        for input in inputs {
            let out = norm(input);
            assert!(out.is_ascii());
            assert!(str::from_utf8(out.as_bytes()).is_ok());
        }
    }

    #[test]
    fn idempotent() {
        let n = TextNormalizer::default();
        for s in ["hello world", "foo   bar", "ÜBER Café!", "a - b"] {
            let once = n.normalize(s);
            let twice = n.normalize(&once);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn no_double_or_edge_spaces() {
        let out = norm("  hello ,  world ;  test  ");
        assert!(!out.contains("  "));
        assert!(!out.starts_with(' '));
        assert!(!out.ends_with(' '));
    }

    #[test]
    fn normalize_into_reuses_capacity() {
        let normalizer = TextNormalizer::default();
        let mut buf = String::with_capacity(64);
        let cap = buf.capacity();

        normalizer.normalize_into("HELLO", &mut buf);
        assert_eq!(buf, "hello");
        assert_eq!(buf.capacity(), cap);

        normalizer.normalize_into("WORLD", &mut buf);
        assert_eq!(buf, "world");
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    fn empty_input() {
        assert_eq!(norm(""), "");
    }

    #[test]
    fn config_round_trips() {
        let config = NormalizerConfig {
            class: CharClass::Alphanumeric,
        };
        assert_eq!(TextNormalizer::new(config).config(), config);
        assert_eq!(NormalizerConfig::default().class, CharClass::Alphabetic);
    }
}
