//! CSV output, one file per result table.
//!
//! | file                     | columns                                              |
//! |--------------------------|------------------------------------------------------|
//! | `runtime_comparison.csv` | `task, engine, elapsed_seconds`                      |
//! | `word_count.csv`         | `engine, total_words`                                |
//! | `word_frequency.csv`     | `rank, word, frequency`                              |
//! | `word_pairs.csv`         | `rank, pair, count`                                  |
//! | `trials.csv`             | `trial_index, record_seconds, query_seconds, winner` |
//! | `summary.csv`            | `mode, outcome_value`                                |
//!
//! Benchmark tables are prefixed with the mode label
//! (`early_stop_trials.csv`, ...), so the outputs of all three entry points
//! can share one directory.

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use duel_types::{BenchmarkRun, DuelError, DuelResult, Engine, StopPolicy, Task};
use serde::Serialize;
use tracing::info;

use crate::bench::Comparison;
use crate::report::ResultReporter;

#[derive(Serialize)]
struct WordCountRow {
    engine: Engine,
    total_words: u64,
}

#[derive(Serialize)]
struct RankedWordRow<'a> {
    rank: u32,
    word: &'a str,
    frequency: u64,
}

#[derive(Serialize)]
struct RankedPairRow {
    rank: u32,
    pair: String,
    count: u64,
}

#[derive(Serialize)]
struct TrialRow {
    trial_index: u32,
    record_seconds: f64,
    query_seconds: f64,
    winner: Engine,
}

#[derive(Serialize)]
struct SummaryRow {
    mode: StopPolicy,
    outcome_value: String,
}

/// Writes results as CSV files under one directory.
#[derive(Debug, Clone)]
pub struct CsvReporter {
    dir: PathBuf,
}

impl CsvReporter {
    /// Writes files into `dir`, creating it when missing.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of a table file.
    pub fn path_of(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{table}.csv"))
    }

    fn write_table<T, I>(&self, table: &str, header: &[&str], rows: I) -> DuelResult<()>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        fs::create_dir_all(&self.dir).map_err(|e| output_error(&self.dir, e))?;

        let path = self.path_of(table);
        let mut writer = ::csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .map_err(|e| output_error(&path, e))?;

        // Written explicitly so tables without rows still carry a header.
        writer
            .write_record(header)
            .map_err(|e| output_error(&path, e))?;

        let mut written = 0usize;
        for row in rows {
            writer.serialize(row).map_err(|e| output_error(&path, e))?;
            written += 1;
        }
        writer.flush().map_err(|e| output_error(&path, e))?;

        info!(path = %path.display(), rows = written, "csv written");
        Ok(())
    }
}

fn output_error(path: &Path, err: impl Display) -> DuelError {
    DuelError::Output {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

impl ResultReporter for CsvReporter {
    fn report_comparison(&mut self, comparison: &Comparison) -> DuelResult<()> {
        self.write_table(
            "runtime_comparison",
            &["task", "engine", "elapsed_seconds"],
            comparison.timings.iter(),
        )?;

        if let Some(total_words) = comparison.total_words {
            self.write_table(
                "word_count",
                &["engine", "total_words"],
                Engine::ALL.map(|engine| WordCountRow {
                    engine,
                    total_words,
                }),
            )?;
        }

        if comparison.ran(Task::WordFrequency) {
            self.write_table(
                "word_frequency",
                &["rank", "word", "frequency"],
                comparison.top_words.iter().map(|e| RankedWordRow {
                    rank: e.rank,
                    word: &e.key,
                    frequency: e.count,
                }),
            )?;
        }

        if comparison.ran(Task::WordPairs) {
            self.write_table(
                "word_pairs",
                &["rank", "pair", "count"],
                comparison.top_pairs.iter().map(|e| RankedPairRow {
                    rank: e.rank,
                    pair: e.key.to_string(),
                    count: e.count,
                }),
            )?;
        }

        Ok(())
    }

    fn report_benchmark(&mut self, run: &BenchmarkRun) -> DuelResult<()> {
        let mode = run.outcome.policy();

        self.write_table(
            &format!("{}_trials", mode.label()),
            &["trial_index", "record_seconds", "query_seconds", "winner"],
            run.trials.iter().map(|t| TrialRow {
                trial_index: t.trial,
                record_seconds: t.record.as_secs_f64(),
                query_seconds: t.query.as_secs_f64(),
                winner: t.winner,
            }),
        )?;

        self.write_table(
            &format!("{}_summary", mode.label()),
            &["mode", "outcome_value"],
            [SummaryRow {
                mode,
                outcome_value: run.outcome.outcome_value(),
            }],
        )
    }
}
