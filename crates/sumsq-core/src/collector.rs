//! Thread-safe collector for partial results.
//!
//! One collector is created per strategy execution and shared by all of its
//! workers. Workers only append; the aggregation step drains it exactly once.

use num_bigint::BigUint;
use num_traits::Zero;
use parking_lot::Mutex;
use tracing::warn;

use crate::executor::SumError;

struct Inner<T> {
    partials: Vec<T>,
    drained: bool,
}

/// Mutex-guarded bag of partial results.
pub struct ResultCollector<T> {
    inner: Mutex<Inner<T>>,
    expected: usize,
}

impl<T: Send> ResultCollector<T> {
    /// Create a collector expecting `expected` partial results.
    #[must_use]
    pub fn new(expected: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                partials: Vec::with_capacity(expected),
                drained: false,
            }),
            expected,
        }
    }

    /// Append one partial result and return how many have been collected.
    ///
    /// Appends arriving after the collector was drained are dropped.
    pub fn push(&self, partial: T) -> usize {
        let mut inner = self.inner.lock();
        if inner.drained {
            warn!("partial result arrived after aggregation; dropping it");
            return inner.partials.len();
        }
        inner.partials.push(partial);
        inner.partials.len()
    }

    /// Number of partial results collected so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().partials.len()
    }

    /// Whether nothing has been collected yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().partials.is_empty()
    }

    /// Number of partial results this collector waits for.
    #[must_use]
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Drain every partial result and fold them with an associative operation.
    ///
    /// Fails if the collector was already drained or if fewer partials than
    /// expected arrived (a worker died before depositing its result).
    pub fn drain_fold<A, F>(&self, init: A, fold: F) -> Result<A, SumError>
    where
        F: FnMut(A, T) -> A,
    {
        let partials = {
            let mut inner = self.inner.lock();
            if inner.drained {
                return Err(SumError::Calculation(
                    "result collector already drained".into(),
                ));
            }
            inner.drained = true;
            std::mem::take(&mut inner.partials)
        };

        if partials.len() != self.expected {
            return Err(SumError::Calculation(format!(
                "collected {} of {} partial results",
                partials.len(),
                self.expected
            )));
        }

        Ok(partials.into_iter().fold(init, fold))
    }
}

impl ResultCollector<BigUint> {
    /// Drain and sum all partial sums.
    pub fn drain_total(&self) -> Result<BigUint, SumError> {
        self.drain_fold(BigUint::zero(), |acc, partial| acc + partial)
    }
}
