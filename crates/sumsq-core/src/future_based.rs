//! Future-based strategy: one task per range on a shared tokio runtime,
//! joined with `try_join_all`.
//!
//! Range sums run on the runtime's blocking pool so the async workers stay
//! free to drive the timer; the join timeout and the cancellation watcher
//! therefore fire while ranges are still being summed.

use std::sync::{Arc, OnceLock};

use futures::future::try_join_all;
use num_bigint::BigUint;
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, warn};

use crate::collector::ResultCollector;
use crate::constants::{FUTURE_THREAD_PREFIX, LATCH_POLL_INTERVAL};
use crate::executor::{CoreStrategy, DispatchContext, SumError};
use crate::outcome::StrategyId;
use crate::progress::CancellationToken;
use crate::range::Range;
use crate::worker::WorkerUnit;

/// Spawns each worker on the runtime's blocking pool and awaits the combined
/// future of their join handles.
///
/// The runtime is built on first use and reused for later executions; its
/// size is fixed by the options of that first run.
pub struct FutureBased {
    runtime: OnceLock<Runtime>,
    threads: OnceLock<usize>,
}

impl FutureBased {
    /// Create the strategy. No threads are started until the first dispatch.
    #[must_use]
    pub fn new() -> Self {
        Self {
            runtime: OnceLock::new(),
            threads: OnceLock::new(),
        }
    }

    fn runtime(&self, threads: usize) -> Result<&Runtime, SumError> {
        if let Some(rt) = self.runtime.get() {
            if self.threads.get().is_some_and(|&running| running != threads) {
                debug!(requested = threads, "future runtime already started; keeping its size");
            }
            return Ok(rt);
        }
        let size = threads.max(1);
        let rt = Builder::new_multi_thread()
            .worker_threads(size)
            .max_blocking_threads(size)
            .thread_name(FUTURE_THREAD_PREFIX)
            .enable_time()
            .build()
            .map_err(|e| SumError::Calculation(format!("failed to start runtime: {e}")))?;
        // A racing dispatch may have installed its runtime first; keep that one.
        Ok(self.runtime.get_or_init(|| {
            let _ = self.threads.set(threads);
            debug!(threads = size, "future runtime started");
            rt
        }))
    }
}

impl Default for FutureBased {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for FutureBased {
    fn drop(&mut self) {
        // Abandoned ranges keep running on detached blocking threads.
        if let Some(rt) = self.runtime.take() {
            rt.shutdown_background();
        }
    }
}

impl CoreStrategy for FutureBased {
    fn dispatch(
        &self,
        ranges: &[Range],
        collector: &Arc<ResultCollector<BigUint>>,
        ctx: &DispatchContext<'_>,
    ) -> Result<BigUint, SumError> {
        let strategy = self.id();
        let opts = ctx.opts.clone().normalize();
        let runtime = self.runtime(opts.future_threads)?;

        let tasks: Vec<_> = WorkerUnit::for_ranges(strategy, ranges, collector, &ctx.observer)
            .map(|worker| runtime.spawn_blocking(move || worker.run()))
            .collect();

        let cancel = ctx.cancel.clone();
        let joined = runtime.block_on(async move {
            let all = async {
                tokio::select! {
                    biased;
                    () = cancelled(&cancel) => Err(SumError::Interrupted),
                    sizes = try_join_all(tasks) => sizes.map_err(|e| SumError::WorkerFailed {
                        strategy,
                        reason: e.to_string(),
                    }),
                }
            };
            match opts.join_timeout {
                Some(limit) => tokio::time::timeout(limit, all)
                    .await
                    .unwrap_or_else(|_| Err(SumError::Timeout(format!("{limit:?}")))),
                None => all.await,
            }
        });

        let sizes = joined.inspect_err(|err| {
            if !matches!(err, SumError::WorkerFailed { .. }) {
                warn!(%strategy, error = %err, "abandoning future tasks");
            }
        })?;

        let covered: u64 = sizes.iter().sum();
        let expected: u64 = ranges.iter().map(Range::size).sum();
        if covered != expected {
            return Err(SumError::Calculation(format!(
                "tasks covered {covered} integers, expected {expected}"
            )));
        }

        collector.drain_total()
    }

    fn id(&self) -> StrategyId {
        StrategyId::FutureBased
    }
}

/// Resolves once the token is cancelled.
async fn cancelled(cancel: &CancellationToken) {
    while !cancel.is_cancelled() {
        tokio::time::sleep(LATCH_POLL_INTERVAL).await;
    }
}
