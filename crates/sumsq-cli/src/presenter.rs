//! CLI result presenter and batch listener.

use indicatif::MultiProgress;

use sumsq_core::executor::SumError;
use sumsq_core::outcome::{StrategyId, StrategyOutcome};
use sumsq_orchestration::interfaces::{BatchListener, BatchReport, BatchSummary, ResultPresenter};

use crate::output::{format_duration, format_number, format_total};
use crate::ui;

/// Message shown when the batch input is rejected.
pub const INVALID_INPUT_MESSAGE: &str = "Please enter a valid number";

/// CLI result presenter.
///
/// Doubles as the batch listener, so strategy lines appear as soon as each
/// strategy finishes.
pub struct CLIResultPresenter {
    verbose: bool,
    quiet: bool,
    details: bool,
    multi: Option<MultiProgress>,
}

impl CLIResultPresenter {
    #[must_use]
    pub fn new(verbose: bool, quiet: bool, details: bool) -> Self {
        Self {
            verbose,
            quiet,
            details,
            multi: None,
        }
    }

    /// Print through the given progress bars instead of directly to stdout.
    #[must_use]
    pub fn with_progress(mut self, multi: MultiProgress) -> Self {
        self.multi = Some(multi);
        self
    }

    fn emit(&self, line: &str) {
        match &self.multi {
            Some(multi) if !multi.is_hidden() => {
                let _ = multi.println(line);
            }
            _ => println!("{line}"),
        }
    }

    fn outcome_line(&self, outcome: &StrategyOutcome, details: bool) -> String {
        let mut line = format!(
            "{:<15} n={} total={} elapsed={}",
            outcome.strategy.display_name(),
            format_number(outcome.n),
            format_total(&outcome.total, self.verbose),
            format_duration(outcome.elapsed),
        );
        if details {
            line.push_str(&format!(
                " tasks={} digits={} bits={}",
                outcome.tasks,
                outcome.total_decimal().len(),
                outcome.total.bits()
            ));
        }
        line
    }
}

impl ResultPresenter for CLIResultPresenter {
    fn present_outcome(&self, outcome: &StrategyOutcome, details: bool) {
        if self.quiet {
            return;
        }
        self.emit(&self.outcome_line(outcome, details));
    }

    fn present_batch(&self, report: &BatchReport, details: bool) {
        if self.quiet {
            if let Some(first) = report.outcomes.first() {
                println!("{}", first.total_decimal());
            }
            return;
        }
        // Single-strategy batches were already shown line by line.
        if report.outcomes.len() + report.failures.len() < 2 {
            return;
        }

        println!("{}", ui::header(&format!("Batch {} comparison", report.batch)));
        println!("{:-<60}", "");
        for outcome in &report.outcomes {
            println!("  {}", self.outcome_line(outcome, details));
        }
        for failure in &report.failures {
            println!(
                "  {:<15} {}",
                failure.strategy.display_name(),
                ui::error(&failure.error.to_string())
            );
        }
        println!(
            "  {:<15} {}",
            "Batch",
            format_duration(report.elapsed)
        );
    }

    fn present_error(&self, error: &str) {
        ui::print_error(error);
    }
}

impl BatchListener for CLIResultPresenter {
    fn on_strategy_complete(&self, outcome: &StrategyOutcome) {
        self.present_outcome(outcome, self.details);
    }

    fn on_strategy_failed(&self, strategy: StrategyId, error: &SumError) {
        self.present_error(&format!("{strategy}: {error}"));
    }

    fn on_batch_complete(&self, summary: &BatchSummary) {
        if self.quiet {
            return;
        }
        let text = format!(
            "Batch {} complete: {}/{} strategies succeeded in {}",
            summary.batch,
            summary.completed,
            summary.reported(),
            format_duration(summary.elapsed)
        );
        if summary.failed == 0 {
            self.emit(&ui::success(&text));
        } else {
            self.emit(&ui::warning(&text));
        }
    }

    fn on_validation_failed(&self, error: &SumError) {
        self.present_error(INVALID_INPUT_MESSAGE);
        if self.verbose {
            self.present_error(&error.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use num_bigint::BigUint;
    use sumsq_orchestration::interfaces::StrategyFailure;

    use super::*;

    fn outcome() -> StrategyOutcome {
        StrategyOutcome {
            strategy: StrategyId::ThreadPerTask,
            n: 1_000_000,
            tasks: 4,
            total: BigUint::from(333_333_833_333_500_000u64),
            elapsed: Duration::from_millis(12),
        }
    }

    #[test]
    fn outcome_line_contains_fields() {
        let presenter = CLIResultPresenter::new(false, false, false);
        let line = presenter.outcome_line(&outcome(), false);
        assert!(line.starts_with("ThreadPerTask"));
        assert!(line.contains("n=1,000,000"));
        assert!(line.contains("total=333333833333500000"));
        assert!(!line.contains("tasks="));
    }

    #[test]
    fn detailed_line_adds_sizes() {
        let presenter = CLIResultPresenter::new(false, false, true);
        let line = presenter.outcome_line(&outcome(), true);
        assert!(line.contains("tasks=4"));
        assert!(line.contains("digits=18"));
    }

    #[test]
    fn listener_callbacks_do_not_panic() {
        let presenter = CLIResultPresenter::new(true, false, true);
        presenter.on_strategy_complete(&outcome());
        presenter.on_strategy_failed(StrategyId::FutureBased, &SumError::Interrupted);
        presenter.on_validation_failed(&SumError::InvalidInput("n must be positive, got 0".into()));
        presenter.on_batch_complete(&BatchSummary {
            batch: 1,
            n: 10,
            task_count: 3,
            completed: 2,
            failed: 1,
            elapsed: Duration::from_millis(3),
        });
    }

    #[test]
    fn present_batch_quiet_and_normal() {
        let report = BatchReport {
            batch: 2,
            n: 1_000_000,
            task_count: 4,
            outcomes: vec![outcome()],
            failures: vec![StrategyFailure {
                strategy: StrategyId::DedicatedQueue,
                error: SumError::Timeout("5s".into()),
            }],
            elapsed: Duration::from_millis(20),
        };
        CLIResultPresenter::new(false, true, false).present_batch(&report, false);
        CLIResultPresenter::new(false, false, false).present_batch(&report, true);
    }

    #[test]
    fn hidden_progress_falls_back_to_stdout() {
        let multi = MultiProgress::with_draw_target(indicatif::ProgressDrawTarget::hidden());
        let presenter = CLIResultPresenter::new(false, false, false).with_progress(multi);
        presenter.present_outcome(&outcome(), false);
    }
}
