//! Orchestration interfaces and batch results.

use std::time::Duration;

use serde::{Serialize, Serializer};

use sumsq_core::executor::SumError;
use sumsq_core::outcome::{StrategyId, StrategyOutcome};

/// Callbacks fired while a batch runs.
///
/// Strategy callbacks arrive from the pool threads running the executors,
/// concurrently and in completion order.
pub trait BatchListener: Send + Sync {
    /// A strategy produced its total.
    fn on_strategy_complete(&self, outcome: &StrategyOutcome);

    /// A strategy failed. It still counts towards batch completion.
    fn on_strategy_failed(&self, _strategy: StrategyId, _error: &SumError) {}

    /// Every strategy of the batch has reported. Fired once per batch.
    fn on_batch_complete(&self, summary: &BatchSummary);

    /// The batch was rejected before any strategy ran.
    fn on_validation_failed(&self, _error: &SumError) {}
}

/// Trait for presenting results to the user.
pub trait ResultPresenter: Send + Sync {
    /// Present one strategy's outcome.
    fn present_outcome(&self, outcome: &StrategyOutcome, details: bool);

    /// Present a finished batch.
    fn present_batch(&self, report: &BatchReport, details: bool);

    /// Present an error.
    fn present_error(&self, error: &str);
}

/// A strategy that did not produce a total.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyFailure {
    /// Strategy that failed.
    pub strategy: StrategyId,
    /// Why it failed.
    #[serde(serialize_with = "serialize_display")]
    pub error: SumError,
}

/// Everything one `run_batch` call produced.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// 1-based sequence number of the batch on its coordinator.
    pub batch: u64,
    /// Upper bound of `[1, n]`.
    pub n: i64,
    /// Requested task count per strategy.
    pub task_count: i32,
    /// Successful outcomes, in strategy order.
    pub outcomes: Vec<StrategyOutcome>,
    /// Failed strategies, in strategy order.
    pub failures: Vec<StrategyFailure>,
    /// Wall-clock time of the whole batch.
    #[serde(rename = "elapsed_millis", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl BatchReport {
    /// Whether every strategy produced a total.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Outcome of one strategy, if it succeeded.
    #[must_use]
    pub fn outcome(&self, strategy: StrategyId) -> Option<&StrategyOutcome> {
        self.outcomes.iter().find(|o| o.strategy == strategy)
    }

    /// Counts handed to `on_batch_complete`.
    #[must_use]
    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            batch: self.batch,
            n: self.n,
            task_count: self.task_count,
            completed: self.outcomes.len(),
            failed: self.failures.len(),
            elapsed: self.elapsed,
        }
    }
}

/// Compact description of a finished batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    /// 1-based sequence number of the batch.
    pub batch: u64,
    /// Upper bound of `[1, n]`.
    pub n: i64,
    /// Requested task count per strategy.
    pub task_count: i32,
    /// Strategies that produced a total.
    pub completed: usize,
    /// Strategies that failed.
    pub failed: usize,
    /// Wall-clock time of the batch.
    pub elapsed: Duration,
}

impl BatchSummary {
    /// Strategies that reported, successfully or not.
    #[must_use]
    pub fn reported(&self) -> usize {
        self.completed + self.failed
    }
}

/// Listener that ignores every callback.
pub struct NullBatchListener;

impl BatchListener for NullBatchListener {
    fn on_strategy_complete(&self, _outcome: &StrategyOutcome) {}
    fn on_batch_complete(&self, _summary: &BatchSummary) {}
}

fn serialize_display<S: Serializer>(value: &SumError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_millis<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(i64::try_from(value.as_millis()).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;

    use super::*;

    fn report() -> BatchReport {
        BatchReport {
            batch: 1,
            n: 10,
            task_count: 3,
            outcomes: vec![StrategyOutcome {
                strategy: StrategyId::ThreadPerTask,
                n: 10,
                tasks: 3,
                total: BigUint::from(385u32),
                elapsed: Duration::from_millis(4),
            }],
            failures: vec![StrategyFailure {
                strategy: StrategyId::FutureBased,
                error: SumError::Interrupted,
            }],
            elapsed: Duration::from_millis(9),
        }
    }

    #[test]
    fn null_listener() {
        let listener = NullBatchListener;
        listener.on_strategy_complete(&report().outcomes[0]);
        listener.on_strategy_failed(StrategyId::FutureBased, &SumError::Interrupted);
        listener.on_batch_complete(&report().summary());
        listener.on_validation_failed(&SumError::InvalidInput("n=0".into()));
    }

    #[test]
    fn summary_counts() {
        let summary = report().summary();
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.reported(), 2);
        assert_eq!(summary.batch, 1);
    }

    #[test]
    fn report_lookup() {
        let report = report();
        assert!(!report.is_success());
        assert!(report.outcome(StrategyId::ThreadPerTask).is_some());
        assert!(report.outcome(StrategyId::DedicatedQueue).is_none());
    }

    #[test]
    fn report_serializes_errors_as_text() {
        let json = serde_json::to_value(report()).unwrap();
        assert_eq!(json["failures"][0]["strategy"], "futures");
        assert_eq!(json["failures"][0]["error"], "wait for workers was interrupted");
        assert_eq!(json["outcomes"][0]["total"], "385");
        assert_eq!(json["elapsed_millis"], 9);
    }
}
