//! Dedicated-queue strategy: one single-threaded event loop per range plus a
//! coordinator queue that reduces the partial results.
//!
//! Each worker runs on its own queue and decrements a shared counter when it
//! has deposited its partial. The worker that brings the counter to zero
//! posts the reduction to the coordinator, which hands the total back to the
//! dispatching thread over a rendezvous channel.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use num_bigint::BigUint;
use tracing::{debug, warn};

use crate::collector::ResultCollector;
use crate::constants::{LATCH_POLL_INTERVAL, QUEUE_THREAD_PREFIX};
use crate::executor::{CoreStrategy, DispatchContext, SumError};
use crate::outcome::StrategyId;
use crate::progress::CancellationToken;
use crate::range::Range;
use crate::serial_queue::SerialQueue;
use crate::worker::WorkerUnit;

/// Runs every range on its own `SerialQueue` and reduces on a coordinator.
pub struct DedicatedQueue;

impl DedicatedQueue {
    /// Create the strategy.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for DedicatedQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreStrategy for DedicatedQueue {
    fn dispatch(
        &self,
        ranges: &[Range],
        collector: &Arc<ResultCollector<BigUint>>,
        ctx: &DispatchContext<'_>,
    ) -> Result<BigUint, SumError> {
        let strategy = self.id();
        let coordinator = SerialQueue::spawn(format!("{QUEUE_THREAD_PREFIX}-coordinator"))?;
        let remaining = Arc::new(AtomicUsize::new(ranges.len()));
        let (done_tx, done_rx) = bounded::<Result<BigUint, SumError>>(1);

        let mut queues = Vec::with_capacity(ranges.len());
        for (i, worker) in WorkerUnit::for_ranges(strategy, ranges, collector, &ctx.observer).enumerate() {
            let queue = SerialQueue::spawn(format!("{QUEUE_THREAD_PREFIX}-{i}"))?;
            let coordinator = coordinator.handle();
            let remaining = Arc::clone(&remaining);
            let collector = Arc::clone(collector);
            let done_tx = done_tx.clone();

            queue.post(move || {
                worker.run();
                if remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
                    let posted = coordinator.post(move || {
                        // Receiver gone means the dispatcher gave up waiting.
                        let _ = done_tx.send(collector.drain_total());
                    });
                    if let Err(err) = posted {
                        warn!(error = %err, "could not reach coordinator queue");
                    }
                }
            })?;
            queues.push(queue);
        }
        // Only the workers' clones remain; if one panics, the channel disconnects.
        drop(done_tx);

        match wait_for_total(&done_rx, ctx.cancel, ctx.opts.join_timeout) {
            Ok(total) => {
                for queue in queues {
                    queue.shutdown();
                }
                coordinator.shutdown();
                debug!(%strategy, "queues shut down");
                total
            }
            Err(WaitError::Disconnected) => {
                for queue in queues {
                    queue.shutdown();
                }
                coordinator.shutdown();
                Err(SumError::WorkerFailed {
                    strategy,
                    reason: format!(
                        "{} of {} ranges never reported",
                        remaining.load(Ordering::Acquire),
                        ranges.len()
                    ),
                })
            }
            Err(WaitError::Abandoned(err)) => {
                warn!(
                    %strategy,
                    pending = remaining.load(Ordering::Acquire),
                    error = %err,
                    "abandoning worker queues"
                );
                Err(err)
            }
        }
    }

    fn id(&self) -> StrategyId {
        StrategyId::DedicatedQueue
    }
}

enum WaitError {
    Disconnected,
    Abandoned(SumError),
}

fn wait_for_total(
    rx: &Receiver<Result<BigUint, SumError>>,
    cancel: &CancellationToken,
    timeout: Option<Duration>,
) -> Result<Result<BigUint, SumError>, WaitError> {
    let deadline = timeout.map(|t| Instant::now() + t);
    loop {
        if cancel.is_cancelled() {
            return Err(WaitError::Abandoned(SumError::Interrupted));
        }
        let slice = match deadline {
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    return Err(WaitError::Abandoned(SumError::Timeout(format!(
                        "{:?}",
                        timeout.unwrap_or_default()
                    ))));
                }
                (deadline - now).min(LATCH_POLL_INTERVAL)
            }
            None => LATCH_POLL_INTERVAL,
        };
        match rx.recv_timeout(slice) {
            Ok(total) => return Ok(total),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return Err(WaitError::Disconnected),
        }
    }
}
