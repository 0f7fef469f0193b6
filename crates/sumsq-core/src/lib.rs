//! # sumsq-core
//!
//! Core library for SumSq-rs: partitions `[1, N]` into contiguous ranges and
//! sums their squares concurrently with three interchangeable strategies
//! (thread per task, dedicated queues, futures).

pub mod collector;
pub mod constants;
pub mod dedicated_queue;
pub mod executor;
pub mod future_based;
pub mod latch;
pub mod observer;
pub mod observers;
pub mod options;
pub mod outcome;
pub mod partition;
pub mod progress;
pub mod range;
pub mod registry;
pub(crate) mod serial_queue;
pub mod thread_per_task;
pub mod worker;

// Re-exports
pub use collector::ResultCollector;
pub use constants::{exit_codes, DEFAULT_N, DEFAULT_TASK_COUNT, PROGRESS_REPORT_THRESHOLD};
pub use executor::{CoreStrategy, StrategyExecutor, StrategyRunner, SumError};
pub use observer::{ProgressObserver, ProgressSubject};
pub use options::Options;
pub use outcome::{StrategyId, StrategyOutcome};
pub use partition::divide_into_ranges;
pub use progress::{CancellationToken, ProgressUpdate};
pub use range::{closed_form_sum_of_squares, Range};
pub use registry::{DefaultFactory, StrategyFactory};

use std::sync::Arc;

use num_bigint::BigUint;

/// Sum the squares of `[1, n]` across `tasks` threads.
///
/// Convenience wrapper over the thread-per-task strategy. For progress,
/// cancellation or another strategy, use a `StrategyExecutor` directly.
///
/// # Example
/// ```
/// assert_eq!(sumsq_core::sum_of_squares(10, 3).unwrap().to_string(), "385");
/// assert!(sumsq_core::sum_of_squares(0, 3).is_err());
/// ```
pub fn sum_of_squares(n: i64, tasks: i32) -> Result<BigUint, SumError> {
    let executor = StrategyRunner::new(Arc::new(thread_per_task::ThreadPerTask::new()));
    let observer: Arc<dyn ProgressObserver> = Arc::new(observers::NoOpObserver::new());
    executor
        .execute(&CancellationToken::new(), &observer, n, tasks, &Options::default())
        .map(|outcome| outcome.total)
}
