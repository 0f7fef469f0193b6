//! Worker unit: the piece of work one concurrent task performs.

use std::sync::Arc;

use num_bigint::BigUint;
use tracing::debug;

use crate::collector::ResultCollector;
use crate::observer::ProgressObserver;
use crate::outcome::StrategyId;
use crate::progress::ProgressUpdate;
use crate::range::Range;

/// Computes one range's sum of squares and deposits it into the shared
/// collector. Completion signalling is left to the owning strategy.
pub struct WorkerUnit {
    strategy: StrategyId,
    range: Range,
    collector: Arc<ResultCollector<BigUint>>,
    observer: Arc<dyn ProgressObserver>,
}

impl WorkerUnit {
    /// Create a worker for one range.
    #[must_use]
    pub fn new(
        strategy: StrategyId,
        range: Range,
        collector: Arc<ResultCollector<BigUint>>,
        observer: Arc<dyn ProgressObserver>,
    ) -> Self {
        Self {
            strategy,
            range,
            collector,
            observer,
        }
    }

    /// One worker per range, all sharing `collector` and `observer`.
    pub fn for_ranges<'a>(
        strategy: StrategyId,
        ranges: &'a [Range],
        collector: &'a Arc<ResultCollector<BigUint>>,
        observer: &'a Arc<dyn ProgressObserver>,
    ) -> impl Iterator<Item = WorkerUnit> + 'a {
        ranges.iter().map(move |&range| {
            WorkerUnit::new(strategy, range, Arc::clone(collector), Arc::clone(observer))
        })
    }

    /// The range this worker covers.
    #[must_use]
    pub fn range(&self) -> Range {
        self.range
    }

    /// Compute the partial sum, append it exactly once, and report progress.
    ///
    /// Returns how many integers were covered.
    pub fn run(self) -> u64 {
        let partial = self.range.sum_of_squares();
        let completed = self.collector.push(partial);

        let thread = std::thread::current();
        debug!(
            strategy = %self.strategy,
            thread = thread.name().unwrap_or("unnamed"),
            range = %self.range,
            "worker finished"
        );

        self.observer.on_progress(&ProgressUpdate::new(
            self.strategy,
            completed,
            self.collector.expected(),
        ));
        self.range.size()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::observers::NoOpObserver;
    use crate::partition::divide_into_ranges;

    struct LastCompleted(AtomicUsize);

    impl ProgressObserver for LastCompleted {
        fn on_progress(&self, update: &ProgressUpdate) {
            self.0.store(update.completed_ranges, Ordering::SeqCst);
        }
    }

    #[test]
    fn run_deposits_exactly_one_partial() {
        let collector = Arc::new(ResultCollector::new(1));
        let observer: Arc<dyn ProgressObserver> = Arc::new(NoOpObserver::new());
        let range = Range::new(5, 7).unwrap();
        let worker = WorkerUnit::new(StrategyId::ThreadPerTask, range, collector.clone(), observer);
        assert_eq!(worker.range(), range);
        assert_eq!(worker.run(), 3);
        assert_eq!(collector.len(), 1);
        assert_eq!(collector.drain_total().unwrap(), BigUint::from(110u32));
    }

    #[test]
    fn run_reports_progress() {
        let ranges = divide_into_ranges(10, 3);
        let collector = Arc::new(ResultCollector::new(ranges.len()));
        let last = Arc::new(LastCompleted(AtomicUsize::new(0)));
        let observer: Arc<dyn ProgressObserver> = last.clone();

        let covered: u64 = WorkerUnit::for_ranges(StrategyId::DedicatedQueue, &ranges, &collector, &observer)
            .map(WorkerUnit::run)
            .sum();

        assert_eq!(covered, 10);
        assert_eq!(last.0.load(Ordering::SeqCst), 3);
        assert_eq!(collector.drain_total().unwrap(), BigUint::from(385u32));
    }
}
