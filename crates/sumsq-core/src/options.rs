//! Execution options shared by all strategies.

use std::time::Duration;

use crate::constants::DEFAULT_JOIN_TIMEOUT;

/// Options for strategy execution.
#[derive(Debug, Clone)]
pub struct Options {
    /// Upper bound on how long a strategy waits for its workers
    /// (`None` waits indefinitely).
    pub join_timeout: Option<Duration>,
    /// Threads summing ranges in the future-based strategy (0 = one per CPU).
    ///
    /// That strategy builds its runtime once; later values are ignored.
    pub future_threads: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            join_timeout: Some(DEFAULT_JOIN_TIMEOUT),
            future_threads: 0,
        }
    }
}

impl Options {
    /// Normalize options, applying defaults where values are zero.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        if self.future_threads == 0 {
            self.future_threads = std::thread::available_parallelism()
                .map(std::num::NonZeroUsize::get)
                .unwrap_or(1);
        }
        if self.join_timeout == Some(Duration::ZERO) {
            self.join_timeout = Some(DEFAULT_JOIN_TIMEOUT);
        }
        self
    }
}
