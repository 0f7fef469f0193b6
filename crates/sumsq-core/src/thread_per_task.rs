//! Thread-per-task strategy: one OS thread per range, joined by a latch.

use std::sync::Arc;
use std::thread;

use num_bigint::BigUint;
use tracing::warn;

use crate::collector::ResultCollector;
use crate::constants::WORKER_THREAD_PREFIX;
use crate::executor::{CoreStrategy, DispatchContext, SumError};
use crate::latch::CountDownLatch;
use crate::outcome::StrategyId;
use crate::range::Range;
use crate::worker::WorkerUnit;

/// Launches a named thread per range; each counts a shared latch down when
/// it exits, and the dispatching thread blocks until the latch opens.
pub struct ThreadPerTask;

impl ThreadPerTask {
    /// Create the strategy.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for ThreadPerTask {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreStrategy for ThreadPerTask {
    fn dispatch(
        &self,
        ranges: &[Range],
        collector: &Arc<ResultCollector<BigUint>>,
        ctx: &DispatchContext<'_>,
    ) -> Result<BigUint, SumError> {
        let strategy = self.id();
        let latch = Arc::new(CountDownLatch::new(ranges.len()));
        let mut handles = Vec::with_capacity(ranges.len());

        for (i, worker) in WorkerUnit::for_ranges(strategy, ranges, collector, &ctx.observer).enumerate() {
            let guard = latch.guard();
            let handle = thread::Builder::new()
                .name(format!("{WORKER_THREAD_PREFIX}-{i}"))
                .spawn(move || {
                    let _guard = guard;
                    worker.run();
                })
                .map_err(|e| SumError::WorkerFailed {
                    strategy,
                    reason: format!("failed to spawn thread: {e}"),
                })?;
            handles.push(handle);
        }

        if let Err(err) = latch.wait_interruptibly(ctx.cancel, ctx.opts.join_timeout) {
            warn!(
                %strategy,
                pending = latch.count(),
                error = %err,
                "abandoning worker threads"
            );
            return Err(err);
        }

        // The latch is open, so every thread is exiting; joining surfaces panics.
        for handle in handles {
            if handle.join().is_err() {
                return Err(SumError::WorkerFailed {
                    strategy,
                    reason: "worker thread panicked".into(),
                });
            }
        }

        collector.drain_total()
    }

    fn id(&self) -> StrategyId {
        StrategyId::ThreadPerTask
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{StrategyExecutor, StrategyRunner};
    use crate::observer::ProgressObserver;
    use crate::observers::{NoOpObserver, PanicOnFirstUpdate};
    use crate::options::Options;
    use crate::partition::divide_into_ranges;
    use crate::progress::CancellationToken;

    fn run(n: i64, tasks: i32) -> Result<BigUint, SumError> {
        let observer: Arc<dyn ProgressObserver> = Arc::new(NoOpObserver::new());
        StrategyRunner::new(Arc::new(ThreadPerTask::new()))
            .execute(&CancellationToken::new(), &observer, n, tasks, &Options::default())
            .map(|o| o.total)
    }

    #[test]
    fn sums_ten_with_three_threads() {
        assert_eq!(run(10, 3).unwrap(), BigUint::from(385u32));
    }

    #[test]
    fn more_tasks_than_numbers() {
        assert_eq!(run(1, 5).unwrap(), BigUint::from(1u32));
    }

    #[test]
    fn many_threads() {
        assert_eq!(
            run(100_000, 64).unwrap(),
            crate::range::closed_form_sum_of_squares(100_000)
        );
    }

    #[test]
    fn cancelled_token_interrupts_join() {
        let ranges = divide_into_ranges(50_000_000, 2);
        let collector = Arc::new(ResultCollector::new(ranges.len()));
        let cancel = CancellationToken::new();
        cancel.cancel();
        let opts = Options::default();
        let ctx = DispatchContext {
            cancel: &cancel,
            observer: Arc::new(NoOpObserver::new()),
            opts: &opts,
        };
        let result = ThreadPerTask::new().dispatch(&ranges, &collector, &ctx);
        assert!(matches!(result, Err(SumError::Interrupted)));
    }

    #[test]
    fn panicking_worker_fails_strategy() {
        let observer: Arc<dyn ProgressObserver> = Arc::new(PanicOnFirstUpdate::new());
        let result = StrategyRunner::new(Arc::new(ThreadPerTask::new())).execute(
            &CancellationToken::new(),
            &observer,
            1_000,
            4,
            &Options::default(),
        );
        assert!(matches!(
            result,
            Err(SumError::WorkerFailed {
                strategy: StrategyId::ThreadPerTask,
                ..
            })
        ));
    }
}
