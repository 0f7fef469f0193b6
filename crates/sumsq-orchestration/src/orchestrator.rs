//! Result analysis for finished batches.

use tracing::warn;

use sumsq_core::executor::SumError;
use sumsq_core::range::closed_form_sum_of_squares;

use crate::interfaces::BatchReport;

/// Check that every successful strategy produced `n(n+1)(2n+1)/6`.
///
/// Failed strategies are ignored; a report without any outcome is an error.
pub fn analyze_batch_results(report: &BatchReport) -> Result<(), SumError> {
    if report.outcomes.is_empty() {
        return Err(SumError::Calculation("no valid results".into()));
    }

    let expected = closed_form_sum_of_squares(report.n);
    let mut mismatched = false;
    for outcome in &report.outcomes {
        if outcome.total != expected {
            warn!(
                strategy = %outcome.strategy,
                got = %outcome.total,
                expected = %expected,
                "total disagrees with closed form"
            );
            mismatched = true;
        }
    }

    if mismatched {
        Err(SumError::Mismatch)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use num_bigint::BigUint;
    use sumsq_core::outcome::{StrategyId, StrategyOutcome};

    use super::*;
    use crate::interfaces::StrategyFailure;

    fn outcome(strategy: StrategyId, total: u32) -> StrategyOutcome {
        StrategyOutcome {
            strategy,
            n: 10,
            tasks: 3,
            total: BigUint::from(total),
            elapsed: Duration::from_millis(1),
        }
    }

    fn report(outcomes: Vec<StrategyOutcome>, failures: Vec<StrategyFailure>) -> BatchReport {
        BatchReport {
            batch: 1,
            n: 10,
            task_count: 3,
            outcomes,
            failures,
            elapsed: Duration::from_millis(3),
        }
    }

    #[test]
    fn analyze_matching_results() {
        let report = report(
            StrategyId::ALL.iter().map(|&id| outcome(id, 385)).collect(),
            Vec::new(),
        );
        assert!(analyze_batch_results(&report).is_ok());
    }

    #[test]
    fn analyze_third_result_mismatches() {
        let report = report(
            vec![
                outcome(StrategyId::ThreadPerTask, 385),
                outcome(StrategyId::DedicatedQueue, 385),
                outcome(StrategyId::FutureBased, 386),
            ],
            Vec::new(),
        );
        assert!(matches!(analyze_batch_results(&report), Err(SumError::Mismatch)));
    }

    #[test]
    fn analyze_ignores_failures() {
        let report = report(
            vec![outcome(StrategyId::ThreadPerTask, 385)],
            vec![StrategyFailure {
                strategy: StrategyId::FutureBased,
                error: SumError::Interrupted,
            }],
        );
        assert!(analyze_batch_results(&report).is_ok());
    }

    #[test]
    fn analyze_empty_results() {
        let report = report(Vec::new(), Vec::new());
        assert!(matches!(
            analyze_batch_results(&report),
            Err(SumError::Calculation(_))
        ));
    }
}
