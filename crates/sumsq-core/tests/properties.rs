//! Property-based tests for partitioning and the three strategies.
//!
//! Strategies are driven through `CoreStrategy` with hand-built ranges, so
//! these tests bypass the `StrategyRunner` validation layer.

use std::sync::Arc;

use num_bigint::BigUint;
use proptest::prelude::*;

use sumsq_core::collector::ResultCollector;
use sumsq_core::dedicated_queue::DedicatedQueue;
use sumsq_core::executor::{CoreStrategy, DispatchContext};
use sumsq_core::future_based::FutureBased;
use sumsq_core::observers::NoOpObserver;
use sumsq_core::options::Options;
use sumsq_core::partition::divide_into_ranges;
use sumsq_core::progress::CancellationToken;
use sumsq_core::range::closed_form_sum_of_squares;
use sumsq_core::thread_per_task::ThreadPerTask;

fn compute_core(strategy: &dyn CoreStrategy, n: i64, tasks: i32) -> BigUint {
    let ranges = divide_into_ranges(n, tasks);
    let collector = Arc::new(ResultCollector::new(ranges.len()));
    let cancel = CancellationToken::new();
    let opts = Options {
        future_threads: 2,
        ..Options::default()
    };
    let ctx = DispatchContext {
        cancel: &cancel,
        observer: Arc::new(NoOpObserver::new()),
        opts: &opts,
    };
    strategy.dispatch(&ranges, &collector, &ctx).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Ranges are contiguous, start at 1, end at n, and differ in size by at most one.
    #[test]
    fn partition_covers_exactly(n in 1i64..100_000, k in 1i32..200) {
        let ranges = divide_into_ranges(n, k);
        let expected = usize::try_from(i64::from(k).min(n)).unwrap();
        prop_assert_eq!(ranges.len(), expected);
        prop_assert_eq!(ranges[0].first(), 1);
        prop_assert_eq!(ranges[ranges.len() - 1].last(), n);
        for pair in ranges.windows(2) {
            prop_assert_eq!(pair[0].last() + 1, pair[1].first());
        }
        let min = ranges.iter().map(|r| r.size()).min().unwrap();
        let max = ranges.iter().map(|r| r.size()).max().unwrap();
        prop_assert!(max - min <= 1, "sizes {}..{} for n={} k={}", min, max, n, k);
    }

    /// Larger ranges come first.
    #[test]
    fn partition_sizes_non_increasing(n in 1i64..10_000, k in 1i32..64) {
        let ranges = divide_into_ranges(n, k);
        for pair in ranges.windows(2) {
            prop_assert!(pair[0].size() >= pair[1].size());
        }
    }

    /// Summing the partials of any partition gives the closed form.
    #[test]
    fn partials_sum_to_closed_form(n in 1i64..20_000, k in 1i32..50) {
        let total: BigUint = divide_into_ranges(n, k).iter().map(|r| r.sum_of_squares()).sum();
        prop_assert_eq!(total, closed_form_sum_of_squares(n));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    /// All three strategies agree with each other and the closed form.
    #[test]
    fn all_strategies_agree(n in 1i64..50_000, k in 1i32..24) {
        let expected = closed_form_sum_of_squares(n);
        let threads = compute_core(&ThreadPerTask::new(), n, k);
        let queues = compute_core(&DedicatedQueue::new(), n, k);
        let futures = compute_core(&FutureBased::new(), n, k);

        prop_assert_eq!(&threads, &expected, "ThreadPerTask wrong at n={} k={}", n, k);
        prop_assert_eq!(&queues, &expected, "DedicatedQueue wrong at n={} k={}", n, k);
        prop_assert_eq!(&futures, &expected, "FutureBased wrong at n={} k={}", n, k);
    }
}
