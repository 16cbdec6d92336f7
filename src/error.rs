use core::alloc::Layout;
use core::fmt;

/// Error type for the fallible growth paths (`try_push`, `try_insert`, ...).
///
/// When one of these is returned the container is exactly as it was before the call:
/// same length, same capacity, same active region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionAllocErr {
    /// `len + additional`, the planned capacity, or its byte size overflowed.
    CapacityOverflow,
    /// The allocator refused the request.
    AllocErr {
        /// The layout that was requested from the allocator.
        layout: Layout,
    },
}

impl fmt::Display for CollectionAllocErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityOverflow => f.write_str("capacity overflow"),
            Self::AllocErr { layout } => write!(
                f,
                "memory allocation of {} bytes (align {}) failed",
                layout.size(),
                layout.align()
            ),
        }
    }
}

impl core::error::Error for CollectionAllocErr {}

/// Returned by [`SpillVec::at`](crate::SpillVec::at) when `index >= len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfRange {
    pub index: usize,
    pub len: usize,
}

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "index {} is out of range for a vector of length {}",
            self.index, self.len
        )
    }
}

impl core::error::Error for OutOfRange {}

/// Unwraps the result of a growth path for the panicking API.
#[inline]
pub(crate) fn infallible<T>(result: Result<T, CollectionAllocErr>) -> T {
    match result {
        Ok(value) => value,
        Err(CollectionAllocErr::CapacityOverflow) => panic!("capacity overflow"),
        Err(CollectionAllocErr::AllocErr { layout }) => alloc::alloc::handle_alloc_error(layout),
    }
}
