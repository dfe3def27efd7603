//! Result reporting.
//!
//! The harness and engines never write anything themselves; completed
//! results are handed to a [`ResultReporter`]:
//!
//! - [`CsvReporter`]: one CSV file per result table
//! - [`ConsoleReporter`]: a human-readable summary on any writer
//! - [`Reporters`]: fans out to several reporters in order

mod console;
mod csv;

pub use self::console::ConsoleReporter;
pub use self::csv::CsvReporter;

use duel_types::{BenchmarkRun, DuelResult};

use crate::bench::Comparison;

/// Consumer of finished results.
pub trait ResultReporter {
    /// Reports a one-shot comparison of the engines.
    fn report_comparison(&mut self, comparison: &Comparison) -> DuelResult<()>;

    /// Reports a completed benchmark run.
    fn report_benchmark(&mut self, run: &BenchmarkRun) -> DuelResult<()>;
}

/// Forwards every report to each reporter, stopping at the first failure.
#[derive(Default)]
pub struct Reporters {
    sinks: Vec<Box<dyn ResultReporter>>,
}

impl Reporters {
    /// Creates an empty fan-out.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a reporter.
    #[must_use]
    pub fn with(mut self, reporter: impl ResultReporter + 'static) -> Self {
        self.sinks.push(Box::new(reporter));
        self
    }

    /// Number of reporters.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Returns `true` if no reporter was added.
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl ResultReporter for Reporters {
    fn report_comparison(&mut self, comparison: &Comparison) -> DuelResult<()> {
        self.sinks
            .iter_mut()
            .try_for_each(|sink| sink.report_comparison(comparison))
    }

    fn report_benchmark(&mut self, run: &BenchmarkRun) -> DuelResult<()> {
        self.sinks
            .iter_mut()
            .try_for_each(|sink| sink.report_benchmark(run))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duel_types::{BenchmarkOutcome, DuelError};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recording {
        log: Rc<RefCell<Vec<&'static str>>>,
        name: &'static str,
        fail: bool,
    }

    impl ResultReporter for Recording {
        fn report_comparison(&mut self, _: &Comparison) -> DuelResult<()> {
            self.log.borrow_mut().push(self.name);
            if self.fail {
                return Err(DuelError::InvalidState("sink down".into()));
            }
            Ok(())
        }

        fn report_benchmark(&mut self, _: &BenchmarkRun) -> DuelResult<()> {
            self.log.borrow_mut().push(self.name);
            Ok(())
        }
    }

    #[test]
    fn fans_out_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut reporters = Reporters::new()
            .with(Recording {
                log: log.clone(),
                name: "first",
                fail: false,
            })
            .with(Recording {
                log: log.clone(),
                name: "second",
                fail: false,
            });
        assert_eq!(reporters.len(), 2);

        let run = BenchmarkRun {
            trials: Vec::new(),
            outcome: BenchmarkOutcome::FixedTally {
                total_trials: 0,
                record_wins: 0,
            },
        };
        reporters.report_benchmark(&run).expect("report");
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn stops_at_first_failure() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut reporters = Reporters::new()
            .with(Recording {
                log: log.clone(),
                name: "broken",
                fail: true,
            })
            .with(Recording {
                log: log.clone(),
                name: "never",
                fail: false,
            });

        assert!(reporters.report_comparison(&Comparison::default()).is_err());
        assert_eq!(*log.borrow(), vec!["broken"]);
    }
}
