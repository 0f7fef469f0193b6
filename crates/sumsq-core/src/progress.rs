//! Progress updates and cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::executor::SumError;
use crate::outcome::StrategyId;

/// Progress update sent from worker units to observers.
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    /// Strategy whose worker produced this update.
    pub strategy: StrategyId,
    /// Fraction of ranges finished, in [0.0, 1.0].
    pub progress: f64,
    /// Number of ranges whose partial result has been collected.
    pub completed_ranges: usize,
    /// Number of ranges in this execution.
    pub total_ranges: usize,
    /// Whether this is the final update for the strategy.
    pub done: bool,
}

impl ProgressUpdate {
    /// Create an update for `completed` of `total` ranges.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(strategy: StrategyId, completed: usize, total: usize) -> Self {
        let progress = if total == 0 {
            1.0
        } else {
            completed as f64 / total as f64
        };
        Self {
            strategy,
            progress,
            completed_ranges: completed,
            total_ranges: total,
            done: completed >= total,
        }
    }
}

/// Cooperative cancellation token using an atomic flag.
///
/// Cancellation is sticky: once set, every later check observes it.
///
/// # Example
/// ```
/// use sumsq_core::progress::CancellationToken;
///
/// let token = CancellationToken::new();
/// assert!(token.check_cancelled().is_ok());
///
/// token.cancel();
/// assert!(token.is_cancelled());
/// assert!(token.check_cancelled().is_err());
/// ```
#[derive(Clone, Debug)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new, untriggered token.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Check if cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Return `SumError::Interrupted` if cancellation was requested.
    pub fn check_cancelled(&self) -> Result<(), SumError> {
        if self.is_cancelled() {
            Err(SumError::Interrupted)
        } else {
            Ok(())
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
