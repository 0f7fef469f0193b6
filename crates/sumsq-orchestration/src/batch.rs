//! Batch coordinator: runs every selected strategy once and tracks completion.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::{info, warn};

use sumsq_core::executor::{StrategyExecutor, SumError};
use sumsq_core::observer::ProgressObserver;
use sumsq_core::observers::NoOpObserver;
use sumsq_core::options::Options;
use sumsq_core::outcome::StrategyOutcome;
use sumsq_core::progress::CancellationToken;

use crate::completion::CompletionCounter;
use crate::interfaces::{BatchListener, BatchReport, StrategyFailure};

/// Runs batches of strategy executions and notifies a listener.
///
/// A coordinator runs one batch at a time; its `CompletionCounter` is reset
/// at the start of each batch.
pub struct BatchCoordinator {
    executors: Vec<Arc<dyn StrategyExecutor>>,
    opts: Options,
    cancel: CancellationToken,
    observer: Arc<dyn ProgressObserver>,
    counter: CompletionCounter,
    running: AtomicBool,
    batches: AtomicU64,
}

impl BatchCoordinator {
    /// Create a coordinator for the given executors.
    #[must_use]
    pub fn new(executors: Vec<Arc<dyn StrategyExecutor>>, opts: Options, cancel: CancellationToken) -> Self {
        let expected = executors.len();
        Self {
            executors,
            opts: opts.normalize(),
            cancel,
            observer: Arc::new(NoOpObserver::new()),
            counter: CompletionCounter::new(expected),
            running: AtomicBool::new(false),
            batches: AtomicU64::new(0),
        }
    }

    /// Attach a progress observer handed to every executor.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Executors run by each batch.
    #[must_use]
    pub fn executors(&self) -> &[Arc<dyn StrategyExecutor>] {
        &self.executors
    }

    /// Completion counter of the current or most recent batch.
    #[must_use]
    pub fn counter(&self) -> &CompletionCounter {
        &self.counter
    }

    /// Number of batches started so far.
    #[must_use]
    pub fn batches_run(&self) -> u64 {
        self.batches.load(Ordering::SeqCst)
    }

    /// Sum the squares of `[1, n]` with every executor, concurrently.
    ///
    /// Invalid input is reported through `on_validation_failed` and nothing
    /// runs. Otherwise each strategy reports through `on_strategy_complete`
    /// or `on_strategy_failed`, and `on_batch_complete` fires once after the
    /// last one.
    pub fn run_batch(
        &self,
        n: i64,
        task_count: i32,
        listener: &dyn BatchListener,
    ) -> Result<BatchReport, SumError> {
        if let Err(err) = validate(n, task_count) {
            warn!(n, task_count, "rejected batch input");
            listener.on_validation_failed(&err);
            return Err(err);
        }
        if self.executors.is_empty() {
            return Err(SumError::Config("no strategies selected".into()));
        }

        let _running = RunningGuard::acquire(&self.running)?;
        let batch = self.batches.fetch_add(1, Ordering::SeqCst) + 1;
        self.counter.reset(self.executors.len());
        info!(batch, n, task_count, strategies = self.executors.len(), "batch started");

        let start = Instant::now();
        let results: Vec<(Result<StrategyOutcome, StrategyFailure>, bool)> = self
            .executors
            .par_iter()
            .map(|executor| {
                let result = executor.execute(&self.cancel, &self.observer, n, task_count, &self.opts);
                let result = match result {
                    Ok(outcome) => {
                        listener.on_strategy_complete(&outcome);
                        Ok(outcome)
                    }
                    Err(error) => {
                        warn!(strategy = %executor.id(), %error, "strategy failed");
                        listener.on_strategy_failed(executor.id(), &error);
                        Err(StrategyFailure {
                            strategy: executor.id(),
                            error,
                        })
                    }
                };
                (result, self.counter.record())
            })
            .collect();

        let mut report = BatchReport {
            batch,
            n,
            task_count,
            outcomes: Vec::with_capacity(results.len()),
            failures: Vec::new(),
            elapsed: start.elapsed(),
        };
        let mut completed = false;
        for (result, done) in results {
            completed |= done;
            match result {
                Ok(outcome) => report.outcomes.push(outcome),
                Err(failure) => report.failures.push(failure),
            }
        }

        info!(
            batch,
            completed = report.outcomes.len(),
            failed = report.failures.len(),
            elapsed_ms = u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX),
            "batch finished"
        );
        if completed {
            listener.on_batch_complete(&report.summary());
        }
        Ok(report)
    }
}

fn validate(n: i64, task_count: i32) -> Result<(), SumError> {
    if n <= 0 {
        return Err(SumError::InvalidInput(format!("n must be positive, got {n}")));
    }
    if task_count <= 0 {
        return Err(SumError::InvalidInput(format!(
            "task count must be positive, got {task_count}"
        )));
    }
    Ok(())
}

/// Holds the coordinator's running flag for the duration of a batch.
struct RunningGuard<'a>(&'a AtomicBool);

impl<'a> RunningGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, SumError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SumError::BatchInProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
