//! Strategy executor traits and the `StrategyRunner` decorator.
//!
//! `StrategyExecutor` is the public trait consumed by orchestration.
//! `CoreStrategy` is the internal trait implemented by each concurrency
//! primitive. `StrategyRunner` wraps a `CoreStrategy` with validation,
//! partitioning, collector setup and timing, so that logic exists once.

use std::sync::Arc;
use std::time::Instant;

use num_bigint::BigUint;
use tracing::{debug, info};

use crate::collector::ResultCollector;
use crate::observer::ProgressObserver;
use crate::options::Options;
use crate::outcome::{StrategyId, StrategyOutcome};
use crate::partition::divide_into_ranges;
use crate::progress::CancellationToken;
use crate::range::Range;

/// Error type for sum-of-squares strategies and batches.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SumError {
    /// Non-positive bound or task count, or a malformed range.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Aggregation failed.
    #[error("calculation error: {0}")]
    Calculation(String),

    /// A worker unit failed before depositing its partial result.
    #[error("{strategy} worker failed: {reason}")]
    WorkerFailed {
        /// Strategy whose worker failed.
        strategy: StrategyId,
        /// What went wrong.
        reason: String,
    },

    /// Waiting for workers was interrupted.
    #[error("wait for workers was interrupted")]
    Interrupted,

    /// Workers did not finish within the join timeout.
    #[error("workers did not finish within {0}")]
    Timeout(String),

    /// Strategy totals disagree with each other or with the closed form.
    #[error("strategy totals do not match")]
    Mismatch,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A batch is already running on this coordinator.
    #[error("a batch is already in progress")]
    BatchInProgress,
}

/// Public trait for strategy executors, consumed by orchestration.
pub trait StrategyExecutor: Send + Sync {
    /// Sum the squares of `[1, n]` split across `task_count` concurrent tasks.
    fn execute(
        &self,
        cancel: &CancellationToken,
        observer: &Arc<dyn ProgressObserver>,
        n: i64,
        task_count: i32,
        opts: &Options,
    ) -> Result<StrategyOutcome, SumError>;

    /// Identifier of the concurrency strategy.
    fn id(&self) -> StrategyId;

    /// Human-readable name.
    fn name(&self) -> &str {
        self.id().display_name()
    }
}

/// Everything a strategy needs while its workers run.
pub struct DispatchContext<'a> {
    /// Interrupts joins that honour cancellation.
    pub cancel: &'a CancellationToken,
    /// Receives one update per collected partial result.
    pub observer: Arc<dyn ProgressObserver>,
    /// Execution options.
    pub opts: &'a Options,
}

/// Internal trait for concurrency primitives.
/// Wrapped by `StrategyRunner`, which partitions and times the run.
pub trait CoreStrategy: Send + Sync {
    /// Run one worker unit per range, wait for all of them, and reduce the
    /// collector into the total.
    fn dispatch(
        &self,
        ranges: &[Range],
        collector: &Arc<ResultCollector<BigUint>>,
        ctx: &DispatchContext<'_>,
    ) -> Result<BigUint, SumError>;

    /// Identifier of this strategy.
    fn id(&self) -> StrategyId;
}

/// Decorator that turns a `CoreStrategy` into a `StrategyExecutor`.
pub struct StrategyRunner {
    inner: Arc<dyn CoreStrategy>,
}

impl StrategyRunner {
    /// Wrap the given core strategy.
    #[must_use]
    pub fn new(inner: Arc<dyn CoreStrategy>) -> Self {
        Self { inner }
    }
}

impl StrategyExecutor for StrategyRunner {
    fn execute(
        &self,
        cancel: &CancellationToken,
        observer: &Arc<dyn ProgressObserver>,
        n: i64,
        task_count: i32,
        opts: &Options,
    ) -> Result<StrategyOutcome, SumError> {
        let strategy = self.inner.id();
        if n <= 0 || task_count <= 0 {
            return Err(SumError::InvalidInput(format!(
                "n and task count must be positive (n={n}, tasks={task_count})"
            )));
        }
        cancel.check_cancelled()?;

        let ranges = divide_into_ranges(n, task_count);
        let collector = Arc::new(ResultCollector::new(ranges.len()));
        let ctx = DispatchContext {
            cancel,
            observer: Arc::clone(observer),
            opts,
        };

        debug!(%strategy, n, tasks = ranges.len(), "dispatching workers");
        let start = Instant::now();
        let total = self.inner.dispatch(&ranges, &collector, &ctx)?;
        let elapsed = start.elapsed();

        let outcome = StrategyOutcome {
            strategy,
            n,
            tasks: ranges.len(),
            total,
            elapsed,
        };
        info!(
            %strategy,
            n,
            tasks = outcome.tasks,
            elapsed_ms = outcome.elapsed_millis(),
            "strategy finished"
        );
        Ok(outcome)
    }

    fn id(&self) -> StrategyId {
        self.inner.id()
    }
}
