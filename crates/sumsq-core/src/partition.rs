//! Range partitioner: splits `[1, N]` into near-equal contiguous ranges.

use tracing::debug;

use crate::range::Range;

/// Divide `[1, last_number]` into at most `number_of_ranges` contiguous ranges.
///
/// Non-positive inputs yield an empty vector. When `number_of_ranges`
/// exceeds `last_number` the count is clamped to `last_number`, so every
/// range holds at least one element. The first `last_number % k` ranges get
/// one extra element; sizes never differ by more than one.
///
/// # Example
/// ```
/// use sumsq_core::partition::divide_into_ranges;
///
/// let ranges = divide_into_ranges(10, 3);
/// let bounds: Vec<_> = ranges.iter().map(|r| (r.first(), r.last())).collect();
/// assert_eq!(bounds, vec![(1, 4), (5, 7), (8, 10)]);
/// ```
#[must_use]
pub fn divide_into_ranges(last_number: i64, number_of_ranges: i32) -> Vec<Range> {
    if last_number <= 0 || number_of_ranges <= 0 {
        return Vec::new();
    }

    let requested = i64::from(number_of_ranges);
    let count = requested.min(last_number);
    if count < requested {
        debug!(
            last_number,
            requested, count, "clamped range count to the number of elements"
        );
    }

    let base = last_number / count;
    let mut remainder = last_number % count;
    let mut ranges = Vec::with_capacity(usize::try_from(count).unwrap_or_default());
    let mut first = 1i64;
    for _ in 0..count {
        let mut last = first + (base - 1);
        if remainder > 0 {
            last += 1;
            remainder -= 1;
        }
        ranges.push(Range::from_bounds(first, last));
        if last == last_number {
            break;
        }
        first = last + 1;
    }
    ranges
}
