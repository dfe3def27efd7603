//! Text analysis pipeline.
//!
//! This module provides the text processing components:
//! - **Normalizer**: Lowercases a raw line and strips everything outside the
//!   configured character class
//! - **Tokenizer**: Splits a normalized line into word tokens

pub mod normalizer;
pub mod tokenizer;

pub use normalizer::{CharClass, NormalizerConfig, TextNormalizer};
pub use tokenizer::Tokenizer;
