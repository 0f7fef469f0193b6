//! Concrete observer implementations.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crossbeam_channel::Sender;
use tracing::{debug, info};

use crate::constants::{PROGRESS_REPORT_THRESHOLD, STRATEGY_COUNT};
use crate::observer::ProgressObserver;
use crate::progress::ProgressUpdate;

/// Last reported progress per strategy, stored as `f64` bits.
struct LastReported([AtomicU64; STRATEGY_COUNT]);

impl LastReported {
    fn new() -> Self {
        Self([AtomicU64::new(0), AtomicU64::new(0), AtomicU64::new(0)])
    }

    fn should_report(&self, update: &ProgressUpdate) -> bool {
        let slot = &self.0[update.strategy.index()];
        if update.completed_ranges <= 1 {
            // First range of a new execution; forget the previous run.
            slot.store(0f64.to_bits(), Ordering::Relaxed);
        }
        let last = f64::from_bits(slot.load(Ordering::Relaxed));
        update.done || (update.progress - last) >= PROGRESS_REPORT_THRESHOLD
    }

    fn store(&self, update: &ProgressUpdate) {
        self.0[update.strategy.index()].store(update.progress.to_bits(), Ordering::Relaxed);
    }
}

/// Observer that sends updates through a channel (non-blocking).
pub struct ChannelObserver {
    sender: Sender<ProgressUpdate>,
    last_reported: LastReported,
}

impl ChannelObserver {
    /// Create a new channel observer.
    #[must_use]
    pub fn new(sender: Sender<ProgressUpdate>) -> Self {
        Self {
            sender,
            last_reported: LastReported::new(),
        }
    }
}

impl ProgressObserver for ChannelObserver {
    fn on_progress(&self, update: &ProgressUpdate) {
        if self.last_reported.should_report(update) {
            // A full or closed channel drops the update; workers never wait.
            let _ = self.sender.try_send(update.clone());
            self.last_reported.store(update);
        }
    }
}

/// Observer that logs progress updates with temporal throttling.
pub struct LoggingObserver {
    last_reported: LastReported,
    min_interval_ms: u64,
    last_time: AtomicU64,
    origin: Instant,
}

impl LoggingObserver {
    /// Create a new logging observer with the given minimum interval.
    #[must_use]
    pub fn new(min_interval_ms: u64) -> Self {
        Self {
            last_reported: LastReported::new(),
            min_interval_ms,
            last_time: AtomicU64::new(0),
            origin: Instant::now(),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn now_ms(&self) -> u64 {
        // Offset by the interval so the very first update always passes.
        self.origin.elapsed().as_millis() as u64 + self.min_interval_ms
    }
}

impl ProgressObserver for LoggingObserver {
    fn on_progress(&self, update: &ProgressUpdate) {
        let now = self.now_ms();
        let last_time = self.last_time.load(Ordering::Relaxed);
        if now.saturating_sub(last_time) < self.min_interval_ms && !update.done {
            return;
        }

        if self.last_reported.should_report(update) {
            if update.done {
                info!(
                    strategy = %update.strategy,
                    ranges = update.total_ranges,
                    "all ranges collected"
                );
            } else {
                debug!(
                    strategy = %update.strategy,
                    progress = format!("{:.1}%", update.progress * 100.0),
                    completed = update.completed_ranges,
                    total = update.total_ranges,
                    "progress update"
                );
            }
            self.last_reported.store(update);
            self.last_time.store(now, Ordering::Relaxed);
        }
    }
}

/// Discards every progress update.
pub struct NoOpObserver;

impl NoOpObserver {
    /// Create a new no-op observer that discards all progress updates.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for NoOpObserver {
    fn on_progress(&self, _update: &ProgressUpdate) {}
}

/// Panics on the first update it receives, failing that worker.
#[cfg(test)]
pub(crate) struct PanicOnFirstUpdate(std::sync::atomic::AtomicBool);

#[cfg(test)]
impl PanicOnFirstUpdate {
    pub(crate) fn new() -> Self {
        Self(std::sync::atomic::AtomicBool::new(false))
    }
}

#[cfg(test)]
impl ProgressObserver for PanicOnFirstUpdate {
    fn on_progress(&self, _update: &ProgressUpdate) {
        if !self.0.swap(true, Ordering::SeqCst) {
            panic!("observer failure");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::StrategyId;

    #[test]
    fn noop_observer_does_nothing() {
        let observer = NoOpObserver::default();
        observer.on_progress(&ProgressUpdate::new(StrategyId::ThreadPerTask, 1, 2));
    }

    #[test]
    fn channel_observer_sends() {
        let (tx, rx) = crossbeam_channel::bounded(10);
        let observer = ChannelObserver::new(tx);
        observer.on_progress(&ProgressUpdate::new(StrategyId::DedicatedQueue, 1, 2));

        let received = rx.try_recv().unwrap();
        assert_eq!(received.strategy, StrategyId::DedicatedQueue);
        assert_eq!(received.completed_ranges, 1);
    }

    #[test]
    fn channel_observer_throttles_per_strategy() {
        let (tx, rx) = crossbeam_channel::bounded(10);
        let observer = ChannelObserver::new(tx);

        // 1/200 = 0.5% is below the 1% threshold
        observer.on_progress(&ProgressUpdate::new(StrategyId::ThreadPerTask, 1, 200));
        assert!(rx.try_recv().is_err());

        // 3/200 = 1.5% passes
        observer.on_progress(&ProgressUpdate::new(StrategyId::ThreadPerTask, 3, 200));
        assert!(rx.try_recv().is_ok());

        // Another strategy keeps its own baseline
        observer.on_progress(&ProgressUpdate::new(StrategyId::FutureBased, 3, 200));
        assert!(rx.try_recv().is_ok());

        // 4/200 is only 0.5% above the last ThreadPerTask report
        observer.on_progress(&ProgressUpdate::new(StrategyId::ThreadPerTask, 4, 200));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn channel_observer_always_sends_done() {
        let (tx, rx) = crossbeam_channel::bounded(10);
        let observer = ChannelObserver::new(tx);

        observer.on_progress(&ProgressUpdate::new(StrategyId::FutureBased, 199, 200));
        let _ = rx.try_recv();

        observer.on_progress(&ProgressUpdate::new(StrategyId::FutureBased, 200, 200));
        assert!(rx.try_recv().unwrap().done);
    }

    #[test]
    fn channel_observer_reports_again_on_next_execution() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let observer = ChannelObserver::new(tx);

        for _ in 0..2 {
            for completed in 1..=4 {
                observer.on_progress(&ProgressUpdate::new(StrategyId::ThreadPerTask, completed, 4));
            }
            let sent: Vec<usize> = rx.try_iter().map(|u| u.completed_ranges).collect();
            assert_eq!(sent, vec![1, 2, 3, 4]);
        }
    }

    #[test]
    fn channel_observer_full_channel_does_not_panic() {
        let (tx, _rx) = crossbeam_channel::bounded(1);
        let observer = ChannelObserver::new(tx);
        observer.on_progress(&ProgressUpdate::new(StrategyId::ThreadPerTask, 1, 4));
        observer.on_progress(&ProgressUpdate::new(StrategyId::ThreadPerTask, 2, 4));
    }

    #[test]
    fn channel_observer_closed_channel_does_not_panic() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        drop(rx);
        let observer = ChannelObserver::new(tx);
        observer.on_progress(&ProgressUpdate::new(StrategyId::ThreadPerTask, 4, 4));
    }

    #[test]
    fn logging_observer_accepts_first_update() {
        let observer = LoggingObserver::new(60_000);
        observer.on_progress(&ProgressUpdate::new(StrategyId::ThreadPerTask, 1, 4));
        assert_ne!(observer.last_time.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn logging_observer_done_bypasses_time_throttle() {
        let observer = LoggingObserver::new(60_000);
        observer.on_progress(&ProgressUpdate::new(StrategyId::DedicatedQueue, 1, 4));
        let first = observer.last_time.load(Ordering::Relaxed);
        observer.on_progress(&ProgressUpdate::new(StrategyId::DedicatedQueue, 4, 4));
        assert!(observer.last_time.load(Ordering::Relaxed) >= first);
    }
}
