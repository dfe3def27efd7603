//! Entry-point pipelines shared by the binaries.
//!
//! Every pipeline follows the same stages: validate the configuration, load
//! and tokenize the corpus, acquire an execution context, run the work,
//! release the context (also on failure) and hand the results to the
//! reporters. Nothing is reported unless the work completed.

use duel_types::{DuelResult, StopPolicy};
use tracing::info;

use crate::analyzer::TextNormalizer;
use crate::bench::{self, Comparison, ModeReport};
use crate::config::DuelConfig;
use crate::context::ExecutionContext;
use crate::corpus::{Corpus, TokenizedCorpus};
use crate::report::{ConsoleReporter, CsvReporter, Reporters, ResultReporter};

/// CSV files under the configured output directory plus a stdout summary.
pub fn default_reporters(config: &DuelConfig) -> Reporters {
    Reporters::new()
        .with(CsvReporter::new(&config.output_dir))
        .with(ConsoleReporter::stdout())
}

/// One-shot comparison of both engines on all three tasks.
///
/// # Errors
///
/// Fails on invalid configuration, a missing corpus, engine disagreement or
/// an output error.
pub fn compare(config: &DuelConfig) -> DuelResult<Comparison> {
    compare_with(config, &mut default_reporters(config))
}

/// Like [`compare`], reporting to `reporter`.
pub fn compare_with(
    config: &DuelConfig,
    reporter: &mut dyn ResultReporter,
) -> DuelResult<Comparison> {
    let corpus = prepare(config)?;

    let ctx = ExecutionContext::acquire(&config.engine)?;
    let result = bench::compare_once(&ctx, &corpus, config.top_k);
    ctx.release();
    let comparison = result?;

    reporter.report_comparison(&comparison)?;
    Ok(comparison)
}

/// Benchmark mode: word tasks once, then the pair trials under `policy`.
///
/// # Errors
///
/// Fails on invalid configuration, a missing or empty corpus, a failed
/// trial or an output error.
pub fn benchmark(config: &DuelConfig, policy: StopPolicy) -> DuelResult<ModeReport> {
    benchmark_with(config, policy, &mut default_reporters(config))
}

/// Like [`benchmark`], reporting to `reporter`.
pub fn benchmark_with(
    config: &DuelConfig,
    policy: StopPolicy,
    reporter: &mut dyn ResultReporter,
) -> DuelResult<ModeReport> {
    let corpus = prepare(config)?;

    let ctx = ExecutionContext::acquire(&config.engine)?;
    let result = bench::run_mode(policy, &ctx, &corpus, config.top_k, config.max_trials);
    ctx.release();
    let report = result?;

    reporter.report_comparison(&report.preliminary)?;
    reporter.report_benchmark(&report.run)?;
    Ok(report)
}

fn prepare(config: &DuelConfig) -> DuelResult<TokenizedCorpus> {
    config.validate()?;

    let corpus = Corpus::load(&config.corpus_path)?;
    let tokenized = corpus.tokenize(&TextNormalizer::new(config.normalizer));
    info!(
        lines = tokenized.line_count(),
        tokens = tokenized.token_count(),
        pairs = tokenized.pair_positions(),
        "corpus normalized"
    );
    Ok(tokenized)
}
