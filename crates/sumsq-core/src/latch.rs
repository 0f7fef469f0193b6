//! Countdown latch used to join thread-per-task workers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::constants::LATCH_POLL_INTERVAL;
use crate::executor::SumError;
use crate::progress::CancellationToken;

/// Blocks waiters until `count_down` has been called `count` times.
pub struct CountDownLatch {
    count: Mutex<usize>,
    zero: Condvar,
}

impl CountDownLatch {
    /// Create a latch that opens after `count` count-downs.
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self {
            count: Mutex::new(count),
            zero: Condvar::new(),
        }
    }

    /// Decrement the count, waking all waiters when it reaches zero.
    /// Extra calls after zero are ignored.
    pub fn count_down(&self) {
        let mut count = self.count.lock();
        if *count == 0 {
            return;
        }
        *count -= 1;
        if *count == 0 {
            self.zero.notify_all();
        }
    }

    /// Remaining count.
    #[must_use]
    pub fn count(&self) -> usize {
        *self.count.lock()
    }

    /// Block until the count reaches zero.
    pub fn wait(&self) {
        let mut count = self.count.lock();
        while *count > 0 {
            self.zero.wait(&mut count);
        }
    }

    /// Block until the count reaches zero, the token is cancelled, or the
    /// timeout elapses.
    ///
    /// Cancellation yields `SumError::Interrupted` and leaves the token set.
    pub fn wait_interruptibly(
        &self,
        cancel: &CancellationToken,
        timeout: Option<Duration>,
    ) -> Result<(), SumError> {
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut count = self.count.lock();
        while *count > 0 {
            if cancel.is_cancelled() {
                return Err(SumError::Interrupted);
            }
            let slice = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(SumError::Timeout(format!(
                            "{:?}",
                            timeout.unwrap_or_default()
                        )));
                    }
                    (deadline - now).min(LATCH_POLL_INTERVAL)
                }
                None => LATCH_POLL_INTERVAL,
            };
            self.zero.wait_for(&mut count, slice);
        }
        Ok(())
    }

    /// Guard that counts down once when dropped, including during unwinding.
    #[must_use]
    pub fn guard(self: &Arc<Self>) -> LatchGuard {
        LatchGuard {
            latch: Arc::clone(self),
        }
    }
}

/// Counts its latch down on drop.
pub struct LatchGuard {
    latch: Arc<CountDownLatch>,
}

impl Drop for LatchGuard {
    fn drop(&mut self) {
        self.latch.count_down();
    }
}
