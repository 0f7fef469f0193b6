//! Golden file integration tests.
//!
//! Reads tests/testdata/sum_of_squares_golden.json and verifies the closed
//! form, each strategy, and full batches against known totals.

use std::sync::Arc;

use num_bigint::BigUint;
use serde::Deserialize;

use sumsq_core::collector::ResultCollector;
use sumsq_core::dedicated_queue::DedicatedQueue;
use sumsq_core::executor::{CoreStrategy, DispatchContext, StrategyExecutor};
use sumsq_core::future_based::FutureBased;
use sumsq_core::observer::ProgressObserver;
use sumsq_core::observers::NoOpObserver;
use sumsq_core::options::Options;
use sumsq_core::outcome::StrategyId;
use sumsq_core::partition::divide_into_ranges;
use sumsq_core::progress::CancellationToken;
use sumsq_core::range::closed_form_sum_of_squares;
use sumsq_core::registry::{DefaultFactory, StrategyFactory};
use sumsq_core::thread_per_task::ThreadPerTask;
use sumsq_orchestration::{analyze_batch_results, BatchCoordinator, NullBatchListener};

// ---------------------------------------------------------------------------
// Golden data structures
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct GoldenData {
    #[allow(dead_code)]
    description: String,
    values: Vec<GoldenEntry>,
}

#[derive(Deserialize)]
struct GoldenEntry {
    n: i64,
    #[serde(default)]
    tasks: Vec<i32>,
    sum: String,
}

impl GoldenEntry {
    fn expected(&self) -> BigUint {
        self.sum.parse().expect("golden sum is not a decimal integer")
    }
}

fn load_golden_data() -> GoldenData {
    let path = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/testdata/sum_of_squares_golden.json"
    );
    let data = std::fs::read_to_string(path).expect("failed to read golden file");
    serde_json::from_str(&data).expect("failed to parse golden JSON")
}

fn options() -> Options {
    Options {
        future_threads: 2,
        ..Options::default()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn compute_with_core(core: &dyn CoreStrategy, n: i64, tasks: i32) -> BigUint {
    let ranges = divide_into_ranges(n, tasks);
    let collector = Arc::new(ResultCollector::new(ranges.len()));
    let cancel = CancellationToken::new();
    let opts = options();
    let ctx = DispatchContext {
        cancel: &cancel,
        observer: Arc::new(NoOpObserver::new()),
        opts: &opts,
    };
    core.dispatch(&ranges, &collector, &ctx).unwrap()
}

fn compute_with_executor(executor: &dyn StrategyExecutor, n: i64, tasks: i32) -> BigUint {
    let cancel = CancellationToken::new();
    let observer: Arc<dyn ProgressObserver> = Arc::new(NoOpObserver::new());
    executor
        .execute(&cancel, &observer, n, tasks, &options())
        .unwrap()
        .total
}

fn golden_core(name: &str, core: &dyn CoreStrategy) {
    for entry in &load_golden_data().values {
        for &tasks in &entry.tasks {
            assert_eq!(
                compute_with_core(core, entry.n, tasks),
                entry.expected(),
                "{name} mismatch at n={} tasks={tasks}",
                entry.n,
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Golden: closed form, including values past u64
// ---------------------------------------------------------------------------

#[test]
fn golden_closed_form() {
    for entry in &load_golden_data().values {
        assert_eq!(
            closed_form_sum_of_squares(entry.n),
            entry.expected(),
            "closed form mismatch at n={}",
            entry.n
        );
    }
}

// ---------------------------------------------------------------------------
// Golden: each core strategy
// ---------------------------------------------------------------------------

#[test]
fn golden_thread_per_task() {
    golden_core("ThreadPerTask", &ThreadPerTask::new());
}

#[test]
fn golden_dedicated_queue() {
    golden_core("DedicatedQueue", &DedicatedQueue::new());
}

#[test]
fn golden_future_based() {
    golden_core("FutureBased", &FutureBased::new());
}

// ---------------------------------------------------------------------------
// Golden: registry executors and full batches
// ---------------------------------------------------------------------------

#[test]
fn golden_factory_executors() {
    let factory = DefaultFactory::new();
    for entry in &load_golden_data().values {
        for &tasks in &entry.tasks {
            for id in StrategyId::ALL {
                assert_eq!(
                    compute_with_executor(factory.get(id).as_ref(), entry.n, tasks),
                    entry.expected(),
                    "{id} mismatch at n={} tasks={tasks}",
                    entry.n,
                );
            }
        }
    }
}

#[test]
fn golden_batches() {
    let factory = DefaultFactory::new();
    let coordinator = BatchCoordinator::new(factory.all(), options(), CancellationToken::new());
    for entry in &load_golden_data().values {
        for &tasks in &entry.tasks {
            let report = coordinator.run_batch(entry.n, tasks, &NullBatchListener).unwrap();
            assert!(report.is_success(), "batch failed at n={}", entry.n);
            assert!(analyze_batch_results(&report).is_ok());
            for outcome in &report.outcomes {
                assert_eq!(outcome.total_decimal(), entry.sum);
            }
        }
    }
}
