//! Human-readable summary in a framed benchmark-tool layout.

use std::io::{self, Write};

use duel_types::{BenchmarkRun, DuelError, DuelResult, Engine, Task};

use crate::bench::Comparison;
use crate::report::ResultReporter;

const RULE: &str = "--------------------------------";

/// Prints results to a writer (stdout for the binaries).
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl ConsoleReporter<io::Stdout> {
    /// Reporter writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    /// Reporter writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consumes the reporter and returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_comparison(&mut self, comparison: &Comparison) -> io::Result<()> {
        let out = &mut self.out;

        for task in [Task::WordCount, Task::WordFrequency, Task::WordPairs] {
            let (Some(record), Some(query)) = (
                comparison.elapsed(task, Engine::Record),
                comparison.elapsed(task, Engine::Query),
            ) else {
                continue;
            };

            let winner = if record < query {
                Engine::Record
            } else {
                Engine::Query
            };

            writeln!(out, "{RULE}")?;
            writeln!(out, "Task        : {task}")?;
            writeln!(out, "Record      : {record:.3} s")?;
            writeln!(out, "Query       : {query:.3} s")?;
            writeln!(out, "Faster      : {winner}")?;
            writeln!(out, "{RULE}\n")?;
        }

        if let Some(total) = comparison.total_words {
            writeln!(out, "Total words : {}", fmt_count(total))?;
        }

        if !comparison.top_words.is_empty() {
            writeln!(out, "\n=== Top words ===")?;
            for entry in &comparison.top_words {
                writeln!(out, "{:>3}. {:<20} {}", entry.rank, entry.key, fmt_count(entry.count))?;
            }
        }

        if !comparison.top_pairs.is_empty() {
            writeln!(out, "\n=== Top pairs ===")?;
            for entry in &comparison.top_pairs {
                let pair = entry.key.to_string();
                writeln!(out, "{:>3}. {:<30} {}", entry.rank, pair, fmt_count(entry.count))?;
            }
        }

        out.flush()
    }

    fn write_benchmark(&mut self, run: &BenchmarkRun) -> io::Result<()> {
        let out = &mut self.out;
        let record_wins = run
            .trials
            .iter()
            .filter(|t| t.winner == Engine::Record)
            .count() as u64;

        writeln!(out, "{RULE}")?;
        writeln!(out, "Mode        : {}", run.outcome.policy())?;
        writeln!(out, "Trials      : {}", fmt_count(run.trials.len() as u64))?;
        writeln!(out, "Record wins : {}", fmt_count(record_wins))?;

        if let (Some(first), Some(last)) = (run.trials.first(), run.trials.last()) {
            writeln!(
                out,
                "First trial : record {:.3} s, query {:.3} s",
                first.record.as_secs_f64(),
                first.query.as_secs_f64()
            )?;
            if last.trial != first.trial {
                writeln!(
                    out,
                    "Last trial  : record {:.3} s, query {:.3} s",
                    last.record.as_secs_f64(),
                    last.query.as_secs_f64()
                )?;
            }
        }

        writeln!(out, "Outcome     : {}", run.outcome)?;
        writeln!(out, "{RULE}\n")?;
        out.flush()
    }
}

fn console_error(err: io::Error) -> DuelError {
    DuelError::Output {
        path: "<console>".into(),
        reason: err.to_string(),
    }
}

impl<W: Write> ResultReporter for ConsoleReporter<W> {
    fn report_comparison(&mut self, comparison: &Comparison) -> DuelResult<()> {
        self.write_comparison(comparison).map_err(console_error)
    }

    fn report_benchmark(&mut self, run: &BenchmarkRun) -> DuelResult<()> {
        self.write_benchmark(run).map_err(console_error)
    }
}

/// Formats a count with `_` thousands separators.
pub(crate) fn fmt_count(n: u64) -> String {
    let s = n.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);

    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push('_');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use duel_types::{BenchmarkOutcome, PairKey, Ranked, TimingRecord, TrialResult};
    use std::time::Duration;

    fn render_comparison(comparison: &Comparison) -> String {
        let mut reporter = ConsoleReporter::new(Vec::new());
        reporter.report_comparison(comparison).expect("report");
        String::from_utf8(reporter.into_inner()).expect("utf8")
    }

    #[test]
    fn fmt_count_groups_thousands() {
        assert_eq!(fmt_count(0), "0");
        assert_eq!(fmt_count(999), "999");
        assert_eq!(fmt_count(1000), "1_000");
        assert_eq!(fmt_count(1234567), "1_234_567");
    }

    #[test]
    fn comparison_names_faster_engine() {
        let comparison = Comparison {
            timings: vec![
                TimingRecord::new(Task::WordCount, Engine::Record, Duration::from_millis(5)),
                TimingRecord::new(Task::WordCount, Engine::Query, Duration::from_millis(80)),
            ],
            total_words: Some(12_345),
            top_words: vec![Ranked::new("the".into(), 4, 1)],
            top_pairs: vec![Ranked::new(PairKey::new("the", "cat"), 2, 1)],
        };

        let text = render_comparison(&comparison);
        assert!(text.contains("Task        : word_count"));
        assert!(text.contains("Faster      : record"));
        assert!(text.contains("Total words : 12_345"));
        assert!(text.contains("the|cat"));
        assert!(!text.contains("word_pairs"));
    }

    #[test]
    fn benchmark_summary_shows_outcome() {
        let run = BenchmarkRun {
            trials: vec![
                TrialResult::new(1, Duration::from_millis(30), Duration::from_millis(20)),
                TrialResult::new(2, Duration::from_millis(10), Duration::from_millis(20)),
            ],
            outcome: BenchmarkOutcome::EarlyStop {
                stopped_at: Some(2),
                trials_run: 2,
            },
        };

        let mut reporter = ConsoleReporter::new(Vec::new());
        reporter.report_benchmark(&run).expect("report");
        let text = String::from_utf8(reporter.into_inner()).expect("utf8");

        assert!(text.contains("Mode        : early_stop"));
        assert!(text.contains("Record wins : 1"));
        assert!(text.contains("Last trial"));
        assert!(text.contains("record engine won on trial 2"));
    }
}
