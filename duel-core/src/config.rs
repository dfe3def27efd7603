//! Run configuration.
//!
//! Defaults reproduce the reference run: the book corpus in the working
//! directory, CSV output under `results/`, top 20 words, 100 trials and
//! 8 shuffle partitions. Each value can be overridden from the environment:
//!
//! | variable          | field                 | format              |
//! |-------------------|-----------------------|---------------------|
//! | `DUEL_CORPUS`     | `corpus_path`         | path                |
//! | `DUEL_OUTPUT_DIR` | `output_dir`          | path                |
//! | `DUEL_TOP_K`      | `top_k`               | positive integer    |
//! | `DUEL_MAX_TRIALS` | `max_trials`          | positive integer    |
//! | `DUEL_PARTITIONS` | `engine.partitions`   | positive integer    |
//! | `DUEL_CHARSET`    | `normalizer.class`    | `alpha` or `alnum`  |

use std::path::PathBuf;
use std::str::FromStr;

use duel_types::{DuelError, DuelResult, Stage};

use crate::analyzer::{CharClass, NormalizerConfig};
use crate::bench::DEFAULT_MAX_TRIALS;
use crate::context::EngineConfig;
use crate::rank::DEFAULT_TOP_K;

/// Corpus file read when `DUEL_CORPUS` is unset.
pub const DEFAULT_CORPUS: &str = "ModernOperatingSystems_clean.txt";
/// Output directory used when `DUEL_OUTPUT_DIR` is unset.
pub const DEFAULT_OUTPUT_DIR: &str = "results";

/// Settings shared by all entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuelConfig {
    /// Plain-text corpus to analyze.
    pub corpus_path: PathBuf,
    /// Directory receiving the CSV files.
    pub output_dir: PathBuf,
    /// Number of ranked words and pairs to report.
    pub top_k: usize,
    /// Planned trials for the benchmark modes.
    pub max_trials: u32,
    /// Execution context settings.
    pub engine: EngineConfig,
    /// Character class kept by the normalizer.
    pub normalizer: NormalizerConfig,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            corpus_path: PathBuf::from(DEFAULT_CORPUS),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            top_k: DEFAULT_TOP_K,
            max_trials: DEFAULT_MAX_TRIALS,
            engine: EngineConfig::default(),
            normalizer: NormalizerConfig::default(),
        }
    }
}

impl DuelConfig {
    /// Reads overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`DuelError::InvalidArgument`] for malformed or zero values.
    pub fn from_env() -> DuelResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads overrides through `lookup`, starting from the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`DuelError::InvalidArgument`] for malformed or zero values.
    pub fn from_lookup<F>(lookup: F) -> DuelResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("DUEL_CORPUS") {
            config.corpus_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup("DUEL_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup("DUEL_TOP_K") {
            config.top_k = parse_var("DUEL_TOP_K", &raw)?;
        }
        if let Some(raw) = lookup("DUEL_MAX_TRIALS") {
            config.max_trials = parse_var("DUEL_MAX_TRIALS", &raw)?;
        }
        if let Some(raw) = lookup("DUEL_PARTITIONS") {
            config.engine.partitions = parse_var("DUEL_PARTITIONS", &raw)?;
        }
        if let Some(raw) = lookup("DUEL_CHARSET") {
            config.normalizer.class = parse_charset(&raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks that every count is positive.
    ///
    /// # Errors
    ///
    /// Returns [`DuelError::InvalidArgument`] naming the offending field.
    pub fn validate(&self) -> DuelResult<()> {
        if self.top_k == 0 {
            return Err(invalid("top_k must be at least 1"));
        }
        if self.max_trials == 0 {
            return Err(invalid("max_trials must be at least 1"));
        }
        if self.engine.partitions == 0 {
            return Err(invalid("partitions must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> DuelError {
    DuelError::InvalidArgument {
        stage: Stage::Config,
        reason: reason.into(),
    }
}

fn parse_var<T: FromStr>(key: &str, raw: &str) -> DuelResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| invalid(format!("{key}: cannot parse {raw:?}")))
}

fn parse_charset(raw: &str) -> DuelResult<CharClass> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "alpha" | "alphabetic" => Ok(CharClass::Alphabetic),
        "alnum" | "alphanumeric" => Ok(CharClass::Alphanumeric),
        other => Err(invalid(format!(
            "DUEL_CHARSET: expected alpha or alnum, got {other:?}"
        ))),
    }
}
