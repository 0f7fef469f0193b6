//! Closed integer ranges and their sums of squares.

use std::fmt;

use num_bigint::BigUint;
use num_traits::Zero;
use serde::Serialize;

use crate::executor::SumError;

/// An immutable closed interval `[first, last]` of positive integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Range {
    first: i64,
    last: i64,
}

impl Range {
    /// Create a range, rejecting `first < 1` and `first > last`.
    pub fn new(first: i64, last: i64) -> Result<Self, SumError> {
        if first < 1 || first > last {
            return Err(SumError::InvalidInput(format!(
                "invalid range [{first}, {last}]"
            )));
        }
        Ok(Self { first, last })
    }

    /// Construct without validation; callers guarantee `1 <= first <= last`.
    pub(crate) fn from_bounds(first: i64, last: i64) -> Self {
        debug_assert!(first >= 1 && first <= last);
        Self { first, last }
    }

    /// Create the range `[1, last]`.
    pub fn up_to(last: i64) -> Result<Self, SumError> {
        Self::new(1, last)
    }

    /// First number in the range.
    #[must_use]
    pub fn first(&self) -> i64 {
        self.first
    }

    /// Last number in the range (inclusive).
    #[must_use]
    pub fn last(&self) -> i64 {
        self.last
    }

    /// Number of integers covered. Always at least 1.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.last.abs_diff(self.first) + 1
    }

    /// Compute `Σ i²` for every `i` in the range.
    ///
    /// Squares are accumulated in a `u128` and flushed into the big
    /// integer only when the word would overflow, so the scan stays linear
    /// and exact for any `i64` bounds.
    #[must_use]
    pub fn sum_of_squares(&self) -> BigUint {
        let mut sum = BigUint::zero();
        let mut acc: u128 = 0;
        for i in self.first..=self.last {
            let i = u128::from(i.unsigned_abs());
            let square = i * i;
            match acc.checked_add(square) {
                Some(next) => acc = next,
                None => {
                    sum += acc;
                    acc = square;
                }
            }
        }
        sum += acc;
        sum
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.first, self.last)
    }
}

/// Closed form `n(n+1)(2n+1)/6`, used to verify strategy totals.
///
/// Returns zero for `n <= 0`.
#[must_use]
pub fn closed_form_sum_of_squares(n: i64) -> BigUint {
    if n <= 0 {
        return BigUint::zero();
    }
    let n = BigUint::from(n.unsigned_abs());
    let n1 = &n + 1u32;
    let two_n1 = &n * 2u32 + 1u32;
    n * n1 * two_n1 / 6u32
}
