//! Batch-scoped completion counter.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts finished strategies and reports exactly once when the batch is done.
///
/// Owned by a `BatchCoordinator` and reset at the start of every batch.
#[derive(Debug)]
pub struct CompletionCounter {
    count: AtomicUsize,
    expected: AtomicUsize,
}

impl CompletionCounter {
    /// Create a counter that completes after `expected` records.
    #[must_use]
    pub fn new(expected: usize) -> Self {
        Self {
            count: AtomicUsize::new(0),
            expected: AtomicUsize::new(expected),
        }
    }

    /// Zero the count and set a new target.
    pub fn reset(&self, expected: usize) {
        self.expected.store(expected, Ordering::SeqCst);
        self.count.store(0, Ordering::SeqCst);
    }

    /// Record one finished strategy.
    ///
    /// Returns `true` for the record that reaches the target and `false` for
    /// every other call, including any past the target.
    pub fn record(&self) -> bool {
        let expected = self.expected.load(Ordering::SeqCst);
        let previous = self
            .count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |c| {
                (c < expected).then_some(c + 1)
            });
        matches!(previous, Ok(c) if c + 1 == expected)
    }

    /// Strategies recorded so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Target count.
    #[must_use]
    pub fn expected(&self) -> usize {
        self.expected.load(Ordering::SeqCst)
    }

    /// Whether the target has been reached.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.count() >= self.expected()
    }
}
