//! Constants for batch defaults and executor tuning.

use std::time::Duration;

/// Default upper bound N when none is given.
pub const DEFAULT_N: i64 = 1_000_000;

/// Default number of concurrent tasks per strategy.
pub const DEFAULT_TASK_COUNT: i32 = 4;

/// Number of strategies in a full batch.
pub const STRATEGY_COUNT: usize = 3;

/// Minimum progress change (1%) before reporting an update.
pub const PROGRESS_REPORT_THRESHOLD: f64 = 0.01;

/// Slice length for interruptible waits.
///
/// Every strategy re-checks the cancellation token this often while joining.
pub const LATCH_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Default bound on how long a strategy may wait for its workers.
pub const DEFAULT_JOIN_TIMEOUT: Duration = Duration::from_secs(300);

/// Thread name prefix for thread-per-task workers.
pub const WORKER_THREAD_PREFIX: &str = "sumsq-worker";

/// Thread name prefix for dedicated serial queues.
pub const QUEUE_THREAD_PREFIX: &str = "sumsq-queue";

/// Thread name prefix for the future-based runtime.
pub const FUTURE_THREAD_PREFIX: &str = "sumsq-future";

/// Exit codes for the command-line front end.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// A strategy did not finish before its join timeout.
    pub const ERROR_TIMEOUT: i32 = 2;
    /// Strategy totals did not match each other or the closed form.
    pub const ERROR_MISMATCH: i32 = 3;
    /// Invalid configuration or input.
    pub const ERROR_CONFIG: i32 = 4;
    /// Interrupted by the user (Ctrl+C).
    pub const ERROR_INTERRUPTED: i32 = 130;
}
