use core::ops::{Bound, RangeBounds};

/// Resolves `range` against a length of `len` into `start..end`.
///
/// # Panics
/// Panics if `start > end` or `end > len`, like slice indexing does.
#[inline]
pub(crate) fn resolve_range(range: &impl RangeBounds<usize>, len: usize) -> (usize, usize) {
    let start = match range.start_bound() {
        Bound::Included(&i) => i,
        Bound::Excluded(&i) => i.checked_add(1).expect("range start overflow"),
        Bound::Unbounded => 0,
    };

    let end = match range.end_bound() {
        Bound::Included(&i) => i.checked_add(1).expect("range end overflow"),
        Bound::Excluded(&i) => i,
        Bound::Unbounded => len,
    };

    assert!(start <= end, "range start {start} is greater than range end {end}");
    assert!(end <= len, "range end {end} is out of bounds for length {len}");
    (start, end)
}

/// Emits a `trace` event for a region migration when the `tracing` feature is on.
macro_rules! trace_migration {
    ($($arg:tt)+) => {
        #[cfg(feature = "tracing")]
        {
            tracing::trace!(target: "spillvec", $($arg)+);
        }
    };
}

pub(crate) use trace_migration;
