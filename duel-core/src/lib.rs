//! # corpus-duel
//!
//! Word statistics over a plain-text corpus, computed by two independent
//! engines and raced against each other.
//!
//! - **Record engine**: one imperative pass with a hash tally
//! - **Query engine**: a relational plan (explode, partition, sort, group,
//!   self-join) over token rows
//!
//! Both engines compute the total word count, word frequencies and ordered
//! adjacent-pair frequencies, and must agree exactly. The [`bench`] harness
//! times them over repeated trials under an early-stop or fixed-tally policy.
//!
//! ```
//! use duel_core::analyzer::TextNormalizer;
//! use duel_core::context::{EngineConfig, ExecutionContext};
//! use duel_core::corpus::Corpus;
//! use duel_core::{engine, rank};
//! use duel_types::Engine;
//!
//! let corpus = Corpus::from_text("The cat, the dog!").tokenize(&TextNormalizer::default());
//! let ctx = ExecutionContext::acquire(&EngineConfig::default()).unwrap();
//!
//! let counts = engine::count_words(Engine::Query, &ctx, corpus.tokens()).unwrap();
//! let top = rank::top_k(&counts, 1).unwrap();
//! assert_eq!(top[0].key, "the");
//! assert_eq!(top[0].count, 2);
//! ctx.release();
//! ```

pub mod analyzer;
pub mod app;
pub mod bench;
pub mod config;
pub mod context;
pub mod corpus;
pub mod engine;
pub mod logging;
pub mod rank;
pub mod report;


pub use duel_types::{DuelError, DuelResult};
