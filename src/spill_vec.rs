use alloc::vec::Vec;
use core::{
    alloc::Layout,
    fmt,
    iter::{self, FusedIterator},
    mem::{self, ManuallyDrop},
    ops::RangeBounds,
    ptr,
};

use crate::error::{CollectionAllocErr, OutOfRange, infallible};
use crate::inline_buf::{self, InlineBuf};
use crate::utils::{resolve_range, trace_migration};

/// The active storage region. The variant always agrees with `len > N`.
enum Region<T, const N: usize> {
    Inline(InlineBuf<T, N>),
    Spilled(Vec<T>),
}

/// A vector that keeps up to `N` elements inside the value itself and moves
/// them to a heap allocation once it holds more than `N`.
///
/// Exactly one storage region is active at a time, and which one is decided
/// by the length alone:
///
/// - `len <= N`: the inline region is active, no heap memory is held and
///   `capacity() == N`.
/// - `len > N`: the heap region is active and `capacity() >= len`.
///
/// Every mutator restores this before it returns, including the ones that
/// shrink (`pop`, `remove`, `erase_range`, `truncate`, `clear`): a heap vector
/// that drops back to `N` elements or fewer moves them inline and frees its
/// allocation.
///
/// When growth is needed the new heap capacity is `⌊3 · (len + additional) / 2⌋`,
/// where `additional` is the exact number of elements being added.
///
/// # Example
///
/// ```
/// use spillvec::{SpillVec, spillvec};
///
/// let mut vec: SpillVec<i32, 2> = SpillVec::new();
/// vec.push(1);
/// vec.push(2);
/// assert!(vec.is_inline());
/// assert_eq!(vec.capacity(), 2);
///
/// // The third element does not fit inline.
/// vec.push(3);
/// assert!(vec.is_spilled());
/// assert_eq!(vec.capacity(), 4);
///
/// // Back to two elements: the data moves inline again.
/// assert_eq!(vec.erase(1), 1);
/// assert!(vec.is_inline());
/// assert_eq!(vec, [1, 3]);
/// ```
pub struct SpillVec<T, const N: usize = 16>(Region<T, N>);

/// Creates a [`SpillVec`] containing the arguments.
///
/// The syntax is similar to [`vec!`](https://doc.rust-lang.org/std/macro.vec.html).
///
/// # Examples
///
/// ```
/// # use spillvec::{spillvec, SpillVec};
/// let vec: SpillVec<String, 4> = spillvec![];
/// let vec: SpillVec<i64, 4> = spillvec![7; 6];
/// assert!(vec.is_spilled());
/// let vec: SpillVec<_, 4> = spillvec![1, 2, 3];
/// assert!(vec.is_inline());
/// ```
#[macro_export]
macro_rules! spillvec {
    [] => { $crate::SpillVec::new() };
    [$elem:expr; $n:expr] => { $crate::SpillVec::from_elem($elem, $n) };
    [$($item:expr),+ $(,)?] => { $crate::SpillVec::from([ $($item),+ ]) };
}

/// Capacity of the heap region that has to hold `len + additional` elements.
#[inline]
pub(crate) const fn plan_growth(len: usize, additional: usize) -> Option<usize> {
    match len.checked_add(additional) {
        Some(total) => match total.checked_mul(3) {
            Some(scaled) => Some(scaled / 2),
            None => None,
        },
        None => None,
    }
}

/// Allocates an empty heap region of exactly `capacity` slots.
fn allocate<T>(capacity: usize) -> Result<Vec<T>, CollectionAllocErr> {
    let layout = Layout::array::<T>(capacity).map_err(|_| CollectionAllocErr::CapacityOverflow)?;
    let mut buf = Vec::new();
    buf.try_reserve_exact(capacity)
        .map_err(|_| CollectionAllocErr::AllocErr { layout })?;
    Ok(buf)
}

impl<T, const N: usize> SpillVec<T, N> {
    /// Constructs a new, empty `SpillVec` using the inline region.
    ///
    /// # Examples
    ///
    /// ```
    /// # use spillvec::SpillVec;
    /// let vec: SpillVec<i32, 8> = SpillVec::new();
    /// assert_eq!(vec.capacity(), 8);
    /// ```
    #[inline]
    pub const fn new() -> Self {
        Self(Region::Inline(InlineBuf::new()))
    }

    /// Returns `true` if the elements live in the heap region.
    #[inline(always)]
    pub const fn is_spilled(&self) -> bool {
        matches!(self.0, Region::Spilled(_))
    }

    /// Returns `true` if the elements live in the inline region.
    #[inline(always)]
    pub const fn is_inline(&self) -> bool {
        !self.is_spilled()
    }

    /// Returns the number of elements in the vector.
    #[inline]
    pub const fn len(&self) -> usize {
        match &self.0 {
            Region::Inline(buf) => buf.len(),
            Region::Spilled(vec) => vec.len(),
        }
    }

    /// Returns `true` if the vector contains no elements.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of elements the active region can hold.
    ///
    /// This is exactly `N` while inline. While spilled it is the capacity
    /// chosen by the last growth (`usize::MAX` for zero-sized types).
    #[inline]
    pub const fn capacity(&self) -> usize {
        match &self.0 {
            Region::Inline(_) => N,
            Region::Spilled(vec) => vec.capacity(),
        }
    }

    /// Returns a raw pointer to the start of the active region.
    ///
    /// The pointer is invalidated by any call that changes the length.
    #[inline]
    pub const fn as_ptr(&self) -> *const T {
        match &self.0 {
            Region::Inline(buf) => buf.as_ptr(),
            Region::Spilled(vec) => vec.as_ptr(),
        }
    }

    /// Returns a raw mutable pointer to the start of the active region.
    #[inline]
    pub const fn as_mut_ptr(&mut self) -> *mut T {
        match &mut self.0 {
            Region::Inline(buf) => buf.as_mut_ptr(),
            Region::Spilled(vec) => vec.as_mut_ptr(),
        }
    }

    /// Extracts a slice of the live elements, wherever they are stored.
    #[inline]
    pub const fn as_slice(&self) -> &[T] {
        match &self.0 {
            Region::Inline(buf) => buf.as_slice(),
            Region::Spilled(vec) => vec.as_slice(),
        }
    }

    /// Extracts a mutable slice of the live elements.
    #[inline]
    pub const fn as_mut_slice(&mut self) -> &mut [T] {
        match &mut self.0 {
            Region::Inline(buf) => buf.as_mut_slice(),
            Region::Spilled(vec) => vec.as_mut_slice(),
        }
    }

    /// Bounds-checked access to the element at `index`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use spillvec::{spillvec, SpillVec, OutOfRange};
    /// let vec: SpillVec<_, 4> = spillvec![10, 20];
    /// assert_eq!(vec.at(1), Ok(&20));
    /// assert_eq!(vec.at(2), Err(OutOfRange { index: 2, len: 2 }));
    /// ```
    #[inline]
    pub fn at(&self, index: usize) -> Result<&T, OutOfRange> {
        let len = self.len();
        self.as_slice().get(index).ok_or(OutOfRange { index, len })
    }

    /// Bounds-checked mutable access to the element at `index`.
    #[inline]
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, OutOfRange> {
        let len = self.len();
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(OutOfRange { index, len })
    }

    /// Converts into a [`Vec`], reusing the heap region if there is one.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        match self.0 {
            Region::Inline(buf) => buf.into_iter().collect(),
            Region::Spilled(vec) => vec,
        }
    }

    /// # Safety
    /// `new_len` must fit the active region, and the slots before it must be
    /// initialized while the ones after it are treated as moved-out.
    #[inline]
    unsafe fn set_len(&mut self, new_len: usize) {
        // SAFETY: forwarded to the caller.
        unsafe {
            match &mut self.0 {
                Region::Inline(buf) => buf.set_len(new_len),
                Region::Spilled(vec) => vec.set_len(new_len),
            }
        }
    }

    #[inline(always)]
    fn debug_check_region(&self) {
        debug_assert_eq!(
            self.is_spilled(),
            self.len() > N,
            "active region disagrees with the length"
        );
        debug_assert!(self.len() <= self.capacity());
    }

    /// Moves `count` values read from `src` into the vector at `index`.
    ///
    /// The new region is allocated before anything moves, so on `Err` the
    /// vector is untouched.
    ///
    /// # Safety
    /// - `index <= len`.
    /// - `src` points at `count` initialized values outside the vector. On `Ok`
    ///   they belong to the vector and must not be dropped by the caller; on
    ///   `Err` they were not read.
    unsafe fn insert_raw(
        &mut self,
        index: usize,
        src: *const T,
        count: usize,
    ) -> Result<(), CollectionAllocErr> {
        let len = self.len();
        debug_assert!(index <= len);
        if count == 0 {
            return Ok(());
        }

        let new_len = len
            .checked_add(count)
            .ok_or(CollectionAllocErr::CapacityOverflow)?;

        if new_len > self.capacity() {
            let capacity = plan_growth(len, count).ok_or(CollectionAllocErr::CapacityOverflow)?;
            let mut fresh = allocate::<T>(capacity)?;

            trace_migration!(
                spilled = self.is_spilled(),
                len,
                additional = count,
                capacity,
                "moving elements into a new heap region"
            );

            // SAFETY: `fresh` has room for `new_len`; each source range is live and
            // is moved exactly once, after which the old region forgets it.
            unsafe {
                let old = self.as_mut_ptr();
                let dst = fresh.as_mut_ptr();
                ptr::copy_nonoverlapping(old, dst, index);
                ptr::copy_nonoverlapping(src, dst.add(index), count);
                ptr::copy_nonoverlapping(old.add(index), dst.add(index + count), len - index);
                self.set_len(0);
                fresh.set_len(new_len);
            }
            self.0 = Region::Spilled(fresh);
        } else {
            // SAFETY: `new_len <= capacity`, and the tail is shifted before the gap is filled.
            unsafe {
                let gap = self.as_mut_ptr().add(index);
                ptr::copy(gap, gap.add(count), len - index);
                ptr::copy_nonoverlapping(src, gap, count);
                self.set_len(new_len);
            }
        }

        self.debug_check_region();
        Ok(())
    }

    /// Closes the slots `[start, end)`, whose values the caller already moved out.
    ///
    /// A heap vector whose remaining length fits in `N` is rebuilt inline and
    /// its allocation released.
    ///
    /// # Safety
    /// `start <= end <= len`, and `[start, end)` holds no live values.
    unsafe fn close_gap(&mut self, start: usize, end: usize) {
        let len = self.len();
        let new_len = len - (end - start);

        match &mut self.0 {
            Region::Spilled(vec) if new_len <= N => {
                let mut inline = InlineBuf::new();
                // SAFETY: `new_len <= N`; the live prefix and suffix move exactly once.
                unsafe {
                    let src = vec.as_ptr();
                    let dst = inline.as_mut_ptr();
                    ptr::copy_nonoverlapping(src, dst, start);
                    ptr::copy_nonoverlapping(src.add(end), dst.add(start), len - end);
                    inline.set_len(new_len);
                    vec.set_len(0);
                }
                trace_migration!(len = new_len, "moving elements back into the inline region");
                self.0 = Region::Inline(inline);
            }
            _ => {
                // SAFETY: the tail is live and the destination is inside the region.
                unsafe {
                    let base = self.as_mut_ptr();
                    ptr::copy(base.add(end), base.add(start), len - end);
                    self.set_len(new_len);
                }
            }
        }

        self.debug_check_region();
    }

    /// Fallible version of [`push`](SpillVec::push).
    ///
    /// On error `value` is dropped and the vector is left as it was.
    pub fn try_push(&mut self, value: T) -> Result<(), CollectionAllocErr> {
        match &mut self.0 {
            Region::Inline(buf) if buf.len() < N => {
                // SAFETY: len < N
                unsafe { buf.push_unchecked(value) };
                return Ok(());
            }
            Region::Spilled(vec) if vec.len() < vec.capacity() => {
                vec.push(value);
                return Ok(());
            }
            _ => {}
        }

        let len = self.len();
        self.try_insert_one(len, value)
    }

    /// Appends an element to the back.
    ///
    /// If the active region is full, a heap region of `⌊3 · (len + 1) / 2⌋` slots is
    /// allocated and the elements move there.
    ///
    /// # Panics
    /// Panics if the new capacity overflows. Aborts through
    /// [`handle_alloc_error`](alloc::alloc::handle_alloc_error) if allocation fails.
    ///
    /// # Examples
    ///
    /// ```
    /// # use spillvec::{spillvec, SpillVec};
    /// let mut vec: SpillVec<_, 3> = spillvec![1, 2, 3];
    /// vec.push(4);
    /// assert_eq!(vec, [1, 2, 3, 4]);
    /// assert_eq!(vec.capacity(), 6);
    /// ```
    #[inline]
    pub fn push(&mut self, value: T) {
        infallible(self.try_push(value))
    }

    fn try_insert_one(&mut self, index: usize, value: T) -> Result<(), CollectionAllocErr> {
        let value = ManuallyDrop::new(value);
        // SAFETY: `index <= len` is checked by every caller; `value` is only
        // released by us when the insertion did not take it.
        match unsafe { self.insert_raw(index, &*value as *const T, 1) } {
            Ok(()) => Ok(()),
            Err(err) => {
                drop(ManuallyDrop::into_inner(value));
                Err(err)
            }
        }
    }

    /// Fallible version of [`insert`](SpillVec::insert).
    ///
    /// On error `element` is dropped and the vector is left as it was.
    ///
    /// # Panics
    /// Panics if `index > len`.
    pub fn try_insert(&mut self, index: usize, element: T) -> Result<usize, CollectionAllocErr> {
        let len = self.len();
        assert!(index <= len, "insertion index (is {index}) should be <= len (is {len})");
        self.try_insert_one(index, element)?;
        Ok(index)
    }

    /// Inserts an element at position `index`, shifting everything after it to the right.
    ///
    /// Returns the index of the inserted element.
    ///
    /// # Panics
    /// Panics if `index > len`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use spillvec::{spillvec, SpillVec};
    /// let mut vec: SpillVec<_, 4> = spillvec!['a', 'b', 'c'];
    ///
    /// assert_eq!(vec.insert(1, 'd'), 1);
    /// assert_eq!(vec, ['a', 'd', 'b', 'c']);
    /// assert!(vec.is_inline());
    ///
    /// vec.insert(4, 'e');
    /// assert_eq!(vec, ['a', 'd', 'b', 'c', 'e']);
    /// assert!(vec.is_spilled());
    /// ```
    #[inline]
    pub fn insert(&mut self, index: usize, element: T) -> usize {
        infallible(self.try_insert(index, element))
    }

    /// Fallible version of [`insert_many`](SpillVec::insert_many).
    ///
    /// The items are collected before the vector is touched, so a panicking
    /// iterator or a failed allocation leaves the vector as it was.
    ///
    /// # Panics
    /// Panics if `index > len`.
    pub fn try_insert_many<I>(&mut self, index: usize, items: I) -> Result<usize, CollectionAllocErr>
    where
        I: IntoIterator<Item = T>,
    {
        let len = self.len();
        assert!(index <= len, "insertion index (is {index}) should be <= len (is {len})");

        let mut staged: SpillVec<T, N> = SpillVec::new();
        for item in items {
            staged.try_push(item)?;
        }

        // SAFETY: `staged` is a separate vector; once its values are moved in,
        // it only releases its storage.
        unsafe {
            self.insert_raw(index, staged.as_ptr(), staged.len())?;
            staged.set_len(0);
        }
        Ok(index)
    }

    /// Inserts every item of `items` starting at `index`, preserving their order.
    ///
    /// Returns the index of the first inserted element; inserting nothing returns
    /// `index` and leaves the vector unchanged.
    ///
    /// # Panics
    /// Panics if `index > len`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use spillvec::{spillvec, SpillVec};
    /// let mut vec: SpillVec<_, 4> = spillvec![1, 5];
    /// assert_eq!(vec.insert_many(1, [2, 3, 4]), 1);
    /// assert_eq!(vec, [1, 2, 3, 4, 5]);
    /// assert_eq!(vec.capacity(), 7);
    /// ```
    #[inline]
    pub fn insert_many<I>(&mut self, index: usize, items: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        infallible(self.try_insert_many(index, items))
    }

    /// Removes the last element and returns it, or `None` if the vector is empty.
    ///
    /// Popping the `N + 1`-th element moves the remaining `N` back inline.
    ///
    /// # Examples
    ///
    /// ```
    /// # use spillvec::{spillvec, SpillVec};
    /// let mut vec: SpillVec<_, 2> = spillvec![1, 2, 3];
    /// assert_eq!(vec.pop(), Some(3));
    /// assert!(vec.is_inline());
    /// assert_eq!(vec.capacity(), 2);
    /// ```
    pub fn pop(&mut self) -> Option<T> {
        let len = self.len();
        if len == 0 {
            return None;
        }
        // SAFETY: the last slot is live; it is read once and then closed.
        unsafe {
            let value = ptr::read(self.as_ptr().add(len - 1));
            self.close_gap(len - 1, len);
            Some(value)
        }
    }

    /// Removes and returns the element at `index`, shifting everything after it to the left.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> T {
        let len = self.len();
        assert!(index < len, "removal index (is {index}) should be < len (is {len})");
        // SAFETY: the slot is live; it is read once and then closed.
        unsafe {
            let value = ptr::read(self.as_ptr().add(index));
            self.close_gap(index, index + 1);
            value
        }
    }

    /// Drops the element at `index` and returns the index that now holds the
    /// element that followed it.
    ///
    /// `erase(len)` does nothing and returns `len`.
    ///
    /// # Panics
    /// Panics if `index > len`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use spillvec::{spillvec, SpillVec};
    /// let mut vec: SpillVec<_, 4> = spillvec![1, 2, 3];
    /// assert_eq!(vec.erase(1), 1);
    /// assert_eq!(vec, [1, 3]);
    /// assert_eq!(vec.erase(2), 2);
    /// assert_eq!(vec, [1, 3]);
    /// ```
    pub fn erase(&mut self, index: usize) -> usize {
        let len = self.len();
        assert!(index <= len, "erase index (is {index}) should be <= len (is {len})");
        if index < len {
            drop(self.remove(index));
        }
        index
    }

    /// Drops the elements in `range` and returns the index that now holds the
    /// element that followed the range.
    ///
    /// If the vector is spilled and the remaining elements fit in `N`, they are
    /// moved inline and the heap region is released.
    ///
    /// # Panics
    /// Panics if the range start is greater than its end or the end is past `len`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use spillvec::{spillvec, SpillVec};
    /// let mut vec: SpillVec<_, 3> = spillvec![1, 2, 3, 4, 5, 6];
    /// assert_eq!(vec.erase_range(1..4), 1);
    /// assert_eq!(vec, [1, 5, 6]);
    /// assert!(vec.is_inline());
    /// ```
    pub fn erase_range<R: RangeBounds<usize>>(&mut self, range: R) -> usize {
        let len = self.len();
        let (start, end) = resolve_range(&range, len);
        let count = end - start;
        if count == 0 {
            return start;
        }
        let new_len = len - count;

        match &mut self.0 {
            Region::Spilled(vec) if new_len <= N => {
                let mut inline = InlineBuf::new();
                // SAFETY: survivors move inline first; afterwards only the erased
                // span is left, moved to the front of the old buffer so that
                // dropping the buffer drops exactly those values.
                unsafe {
                    let src = vec.as_mut_ptr();
                    let dst = inline.as_mut_ptr();
                    ptr::copy_nonoverlapping(src, dst, start);
                    ptr::copy_nonoverlapping(src.add(end), dst.add(start), len - end);
                    inline.set_len(new_len);
                    ptr::copy(src.add(start), src, count);
                    vec.set_len(count);
                }
                trace_migration!(len = new_len, "moving elements back into the inline region");
                let released = mem::replace(&mut self.0, Region::Inline(inline));
                drop(released);
            }
            _ => {
                self.as_mut_slice()[start..].rotate_left(count);
                // SAFETY: the erased values now sit in `[new_len, len)`; they are
                // dropped after the length stops covering them.
                unsafe {
                    let tail = self.as_mut_ptr().add(new_len);
                    self.set_len(new_len);
                    ptr::drop_in_place(ptr::slice_from_raw_parts_mut(tail, count));
                }
            }
        }

        self.debug_check_region();
        start
    }

    /// Shortens the vector to `len` elements, dropping the rest.
    ///
    /// Has no effect if `len >= self.len()`.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        if len < self.len() {
            self.erase_range(len..);
        }
    }

    /// Removes every element and releases the heap region, if any.
    ///
    /// The vector is inline afterwards with `capacity() == N`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use spillvec::{spillvec, SpillVec};
    /// let mut vec: SpillVec<_, 2> = spillvec![1, 2, 3, 4];
    /// vec.clear();
    /// assert!(vec.is_empty());
    /// assert!(vec.is_inline());
    /// assert_eq!(vec.capacity(), 2);
    /// ```
    pub fn clear(&mut self) {
        match &mut self.0 {
            Region::Inline(buf) => buf.clear(),
            Region::Spilled(_vec) => {
                trace_migration!(capacity = _vec.capacity(), "releasing the heap region");
                let released = mem::replace(&mut self.0, Region::Inline(InlineBuf::new()));
                drop(released);
            }
        }
    }

    /// Builds a vector from an iterator that yields exactly `count` items.
    ///
    /// More than `N` items are placed in a heap region of `⌊3 · count / 2⌋` slots.
    fn collect_exact<I: Iterator<Item = T>>(count: usize, items: I) -> Self {
        if count <= N {
            let mut buf = InlineBuf::new();
            for item in items.take(count) {
                // SAFETY: at most `count <= N` items.
                unsafe { buf.push_unchecked(item) };
            }
            Self(Region::Inline(buf))
        } else {
            let capacity = infallible(plan_growth(count, 0).ok_or(CollectionAllocErr::CapacityOverflow));
            let mut vec = infallible(allocate(capacity));
            vec.extend(items.take(count));
            let vec = Self(Region::Spilled(vec));
            vec.debug_check_region();
            vec
        }
    }

    /// Rebuilds a vector filled one push at a time so that its capacity is the
    /// one `collect_exact` would have chosen for the same length.
    pub(crate) fn from_staged(staged: Self) -> Self {
        let len = staged.len();
        if staged.is_inline() || plan_growth(len, 0) == Some(staged.capacity()) {
            return staged;
        }
        Self::collect_exact(len, staged.into_iter())
    }
}

impl<T: Clone, const N: usize> SpillVec<T, N> {
    /// Creates a vector with `count` clones of `elem`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use spillvec::SpillVec;
    /// let vec: SpillVec<i32, 4> = SpillVec::from_elem(1, 4);
    /// assert!(vec.is_inline());
    ///
    /// let vec: SpillVec<i32, 4> = SpillVec::from_elem(1, 6);
    /// assert_eq!(vec.capacity(), 9);
    /// ```
    #[inline]
    pub fn from_elem(elem: T, count: usize) -> Self {
        Self::collect_exact(count, iter::repeat_n(elem, count))
    }

    /// Creates a vector holding clones of the elements of `items`.
    #[inline]
    pub fn from_slice(items: &[T]) -> Self {
        Self::collect_exact(items.len(), items.iter().cloned())
    }

    /// Fallible version of [`insert_from_slice`](SpillVec::insert_from_slice).
    #[inline]
    pub fn try_insert_from_slice(
        &mut self,
        index: usize,
        items: &[T],
    ) -> Result<usize, CollectionAllocErr> {
        self.try_insert_many(index, items.iter().cloned())
    }

    /// Inserts clones of `items` starting at `index`.
    ///
    /// # Panics
    /// Panics if `index > len`.
    #[inline]
    pub fn insert_from_slice(&mut self, index: usize, items: &[T]) -> usize {
        self.insert_many(index, items.iter().cloned())
    }

    /// Clones and appends every element of `items`.
    #[inline]
    pub fn extend_from_slice(&mut self, items: &[T]) {
        let len = self.len();
        self.insert_from_slice(len, items);
    }

    /// Resizes the vector to `new_len`, filling new slots with clones of `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use spillvec::{spillvec, SpillVec};
    /// let mut vec: SpillVec<_, 3> = spillvec!["hello"];
    /// vec.resize(4, "world");
    /// assert_eq!(vec, ["hello", "world", "world", "world"]);
    /// assert!(vec.is_spilled());
    ///
    /// vec.resize(1, "");
    /// assert_eq!(vec, ["hello"]);
    /// assert!(vec.is_inline());
    /// ```
    pub fn resize(&mut self, new_len: usize, value: T) {
        let len = self.len();
        if new_len <= len {
            self.truncate(new_len);
        } else {
            self.insert_many(len, iter::repeat_n(value, new_len - len));
        }
    }
}

impl<T, const N: usize> Default for SpillVec<T, N> {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, const N: usize> Clone for SpillVec<T, N> {
    /// A spilled source is copied into a heap region of the same capacity.
    fn clone(&self) -> Self {
        match &self.0 {
            Region::Inline(buf) => Self(Region::Inline(buf.clone())),
            Region::Spilled(vec) => {
                let mut copy = infallible(allocate(vec.capacity()));
                copy.extend_from_slice(vec);
                Self(Region::Spilled(copy))
            }
        }
    }

    /// Releases this vector's heap region before copying `source` in.
    fn clone_from(&mut self, source: &Self) {
        self.clear();
        match &source.0 {
            Region::Inline(src) => {
                let Region::Inline(buf) = &mut self.0 else {
                    unreachable!("a cleared vector is inline");
                };
                for item in src.as_slice() {
                    // SAFETY: `src` holds at most `N` elements.
                    unsafe { buf.push_unchecked(item.clone()) };
                }
            }
            Region::Spilled(src) => {
                let mut copy = infallible(allocate(src.capacity()));
                copy.extend_from_slice(src);
                self.0 = Region::Spilled(copy);
            }
        }
    }
}

impl<T, const N: usize> Extend<T> for SpillVec<T, N> {
    /// Appends the items as one bulk insertion, so growth is planned for
    /// their exact count.
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let len = self.len();
        self.insert_many(len, iter);
    }
}

impl<'a, T: 'a + Copy, const N: usize> Extend<&'a T> for SpillVec<T, N> {
    #[inline]
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        let len = self.len();
        self.insert_many(len, iter.into_iter().copied());
    }
}

impl<T, const N: usize> FromIterator<T> for SpillVec<T, N> {
    /// More than `N` items end up in a heap region of `⌊3 · count / 2⌋` slots,
    /// as with [`from_slice`](SpillVec::from_slice).
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut staged = Self::new();
        for item in iter {
            staged.push(item);
        }
        Self::from_staged(staged)
    }
}

impl<T: Clone, const N: usize> From<&[T]> for SpillVec<T, N> {
    #[inline]
    fn from(value: &[T]) -> Self {
        Self::from_slice(value)
    }
}

impl<T: Clone, const N: usize, const P: usize> From<&[T; P]> for SpillVec<T, N> {
    #[inline]
    fn from(value: &[T; P]) -> Self {
        Self::from_slice(value)
    }
}

impl<T, const N: usize, const P: usize> From<[T; P]> for SpillVec<T, N> {
    fn from(value: [T; P]) -> Self {
        if P <= N {
            let value = ManuallyDrop::new(value);
            let mut buf = InlineBuf::new();
            // SAFETY: `P <= N`, and the array is forgotten so each value moves once.
            unsafe {
                ptr::copy_nonoverlapping(value.as_ptr(), buf.as_mut_ptr(), P);
                buf.set_len(P);
            }
            Self(Region::Inline(buf))
        } else {
            Self::collect_exact(P, value.into_iter())
        }
    }
}

impl<T, const N: usize> From<Vec<T>> for SpillVec<T, N> {
    /// Keeps the allocation if the vector has more than `N` elements,
    /// otherwise moves them inline and frees it.
    ///
    /// A reused allocation keeps the capacity it had in the `Vec`, which need
    /// not be `⌊3 · len / 2⌋`. The next growth plans from the length as usual.
    fn from(mut value: Vec<T>) -> Self {
        let len = value.len();
        if len > N {
            return Self(Region::Spilled(value));
        }
        let mut buf = InlineBuf::new();
        // SAFETY: `len <= N`; the values move once and `value` forgets them.
        unsafe {
            ptr::copy_nonoverlapping(value.as_ptr(), buf.as_mut_ptr(), len);
            buf.set_len(len);
            value.set_len(0);
        }
        Self(Region::Inline(buf))
    }
}

impl<T, const N: usize> From<SpillVec<T, N>> for Vec<T> {
    #[inline]
    fn from(value: SpillVec<T, N>) -> Self {
        value.into_vec()
    }
}

impl<T, const N: usize> core::ops::Deref for SpillVec<T, N> {
    type Target = [T];
    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, const N: usize> core::ops::DerefMut for SpillVec<T, N> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, I: core::slice::SliceIndex<[T]>, const N: usize> core::ops::Index<I> for SpillVec<T, N> {
    type Output = I::Output;
    #[inline]
    fn index(&self, index: I) -> &Self::Output {
        core::ops::Index::index(self.as_slice(), index)
    }
}

impl<T, I: core::slice::SliceIndex<[T]>, const N: usize> core::ops::IndexMut<I>
    for SpillVec<T, N>
{
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        core::ops::IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for SpillVec<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}

impl<T, const N: usize> AsRef<[T]> for SpillVec<T, N> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, const N: usize> AsMut<[T]> for SpillVec<T, N> {
    #[inline]
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, const N: usize> core::borrow::Borrow<[T]> for SpillVec<T, N> {
    #[inline]
    fn borrow(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, const N: usize> core::borrow::BorrowMut<[T]> for SpillVec<T, N> {
    #[inline]
    fn borrow_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: core::hash::Hash, const N: usize> core::hash::Hash for SpillVec<T, N> {
    #[inline]
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        core::hash::Hash::hash(self.as_slice(), state);
    }
}

impl<T, U, const N: usize, const P: usize> PartialEq<SpillVec<U, P>> for SpillVec<T, N>
where
    T: PartialEq<U>,
{
    /// Lengths are compared first; elements only when they match.
    #[inline]
    fn eq(&self, other: &SpillVec<U, P>) -> bool {
        self.len() == other.len() && self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, const N: usize> Eq for SpillVec<T, N> {}

impl<T, U, const N: usize> PartialEq<[U]> for SpillVec<T, N>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U, const N: usize> PartialEq<&[U]> for SpillVec<T, N>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T, U, const N: usize, const P: usize> PartialEq<[U; P]> for SpillVec<T, N>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &[U; P]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, U, const N: usize, const P: usize> PartialEq<&[U; P]> for SpillVec<T, N>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &&[U; P]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, U, const N: usize> PartialEq<Vec<U>> for SpillVec<T, N>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &Vec<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialOrd, const N: usize> PartialOrd for SpillVec<T, N> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord, const N: usize> Ord for SpillVec<T, N> {
    #[inline]
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a SpillVec<T, N> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a mut SpillVec<T, N> {
    type Item = &'a mut T;
    type IntoIter = core::slice::IterMut<'a, T>;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

impl<T, const N: usize> IntoIterator for SpillVec<T, N> {
    type Item = T;
    type IntoIter = IntoIter<T, N>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        match self.0 {
            Region::Inline(buf) => IntoIter(IntoIterInner::Inline(buf.into_iter())),
            Region::Spilled(vec) => IntoIter(IntoIterInner::Spilled(vec.into_iter())),
        }
    }
}

/// An iterator that consumes a [`SpillVec`] and yields its items by value.
pub struct IntoIter<T, const N: usize>(IntoIterInner<T, N>);

enum IntoIterInner<T, const N: usize> {
    Inline(inline_buf::IntoIter<T, N>),
    Spilled(alloc::vec::IntoIter<T>),
}

impl<T, const N: usize> IntoIter<T, N> {
    /// Returns the remaining items as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        match &self.0 {
            IntoIterInner::Inline(iter) => iter.as_slice(),
            IntoIterInner::Spilled(iter) => iter.as_slice(),
        }
    }

    /// Returns the remaining items as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        match &mut self.0 {
            IntoIterInner::Inline(iter) => iter.as_mut_slice(),
            IntoIterInner::Spilled(iter) => iter.as_mut_slice(),
        }
    }
}

impl<T, const N: usize> Iterator for IntoIter<T, N> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        match &mut self.0 {
            IntoIterInner::Inline(iter) => iter.next(),
            IntoIterInner::Spilled(iter) => iter.next(),
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.0 {
            IntoIterInner::Inline(iter) => iter.size_hint(),
            IntoIterInner::Spilled(iter) => iter.size_hint(),
        }
    }
}

impl<T, const N: usize> DoubleEndedIterator for IntoIter<T, N> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        match &mut self.0 {
            IntoIterInner::Inline(iter) => iter.next_back(),
            IntoIterInner::Spilled(iter) => iter.next_back(),
        }
    }
}

impl<T, const N: usize> ExactSizeIterator for IntoIter<T, N> {}

impl<T, const N: usize> FusedIterator for IntoIter<T, N> {}

impl<T: Clone, const N: usize> Clone for IntoIter<T, N> {
    fn clone(&self) -> Self {
        match &self.0 {
            IntoIterInner::Inline(iter) => IntoIter(IntoIterInner::Inline(iter.clone())),
            IntoIterInner::Spilled(iter) => IntoIter(IntoIterInner::Spilled(iter.clone())),
        }
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for IntoIter<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::spillvec;
    use alloc::{rc::Rc, string::String, vec};
    use std::panic::{AssertUnwindSafe, catch_unwind};

    fn assert_region<T, const N: usize>(vec: &SpillVec<T, N>) {
        assert!(vec.len() <= vec.capacity());
        assert_eq!(vec.is_inline(), vec.len() <= N);
        assert_eq!(vec.is_inline(), vec.capacity() == N);
    }

    /// Clones normally unless it carries the value `u32::MAX`.
    #[derive(Debug, PartialEq)]
    struct Fragile(u32);

    impl Clone for Fragile {
        fn clone(&self) -> Self {
            assert!(self.0 != u32::MAX, "clone of a fragile value");
            Fragile(self.0)
        }
    }

    #[test]
    fn growth_formula() {
        assert_eq!(plan_growth(0, 0), Some(0));
        assert_eq!(plan_growth(2, 1), Some(4));
        assert_eq!(plan_growth(16, 1), Some(25));
        assert_eq!(plan_growth(4, 3), Some(10));
        assert_eq!(plan_growth(usize::MAX, 1), None);
        assert_eq!(plan_growth(usize::MAX / 2, 0), None);
    }

    #[test]
    fn allocate_is_exact() {
        let buf = allocate::<u32>(25).unwrap();
        assert_eq!(buf.capacity(), 25);
        assert!(buf.is_empty());
    }

    #[test]
    fn allocate_reports_overflow_and_failure() {
        assert_eq!(
            allocate::<u64>(usize::MAX).unwrap_err(),
            CollectionAllocErr::CapacityOverflow
        );
        assert!(matches!(
            allocate::<u8>(isize::MAX as usize),
            Err(CollectionAllocErr::AllocErr { .. })
        ));
    }

    #[test]
    fn small_scenario() {
        let mut vec: SpillVec<i32, 2> = SpillVec::new();
        assert_region(&vec);

        vec.push(1);
        assert_eq!(vec.len(), 1);
        assert!(vec.is_inline());

        vec.push(2);
        assert_eq!(vec.len(), 2);
        assert!(vec.is_inline());
        assert_eq!(vec.capacity(), 2);

        vec.push(3);
        assert_eq!(vec.len(), 3);
        assert!(vec.is_spilled());
        assert_eq!(vec.capacity(), 4);

        assert_eq!(vec.erase(1), 1);
        assert_eq!(vec.len(), 2);
        assert!(vec.is_inline());
        assert_eq!(vec.capacity(), 2);
        assert_eq!(vec, [1, 3]);
    }

    #[test]
    fn push_past_default_capacity() {
        let mut vec: SpillVec<usize> = (0..16).collect();
        assert!(vec.is_inline());
        assert_eq!(vec.capacity(), 16);

        vec.push(16);
        assert!(vec.is_spilled());
        assert_eq!(vec.capacity(), 25);
        assert_eq!(vec.len(), 17);
        assert!(vec.iter().copied().eq(0..17));
    }

    #[test]
    fn spilled_growth_uses_plan() {
        let mut vec: SpillVec<u8, 2> = SpillVec::new();
        let mut seen = vec![];
        for value in 0..40 {
            vec.push(value);
            assert_region(&vec);
            if seen.last() != Some(&vec.capacity()) {
                seen.push(vec.capacity());
            }
        }
        // 2 -> ⌊3·3/2⌋ = 4 -> ⌊3·5/2⌋ = 7 -> 12 -> 19 -> 30 -> 46
        assert_eq!(seen, [2, 4, 7, 12, 19, 30, 46]);
    }

    #[test]
    fn pop_crossing_back_inline() {
        let mut vec: SpillVec<i32, 4> = spillvec![1, 2, 3, 4, 5];
        assert!(vec.is_spilled());

        assert_eq!(vec.pop(), Some(5));
        assert!(vec.is_inline());
        assert_eq!(vec.capacity(), 4);
        assert_eq!(vec, [1, 2, 3, 4]);

        while vec.pop().is_some() {
            assert_region(&vec);
        }
        assert_eq!(vec.pop(), None);
        assert!(vec.is_empty());
    }

    #[test]
    fn pop_far_above_threshold_stays_spilled() {
        let mut vec: SpillVec<i32, 2> = (0..10).collect();
        let capacity = vec.capacity();
        assert_eq!(vec.pop(), Some(9));
        assert!(vec.is_spilled());
        assert_eq!(vec.capacity(), capacity);
    }

    #[test]
    fn insert_without_growth() {
        let mut vec: SpillVec<i32, 8> = spillvec![1, 2, 4];
        assert_eq!(vec.insert(2, 3), 2);
        assert_eq!(vec.insert(0, 0), 0);
        assert_eq!(vec.insert(5, 5), 5);
        assert_eq!(vec, [0, 1, 2, 3, 4, 5]);
        assert!(vec.is_inline());
    }

    #[test]
    fn insert_with_growth() {
        let mut vec: SpillVec<i32, 3> = spillvec![1, 3, 4];
        assert_eq!(vec.insert(1, 2), 1);
        assert_eq!(vec, [1, 2, 3, 4]);
        assert!(vec.is_spilled());
        assert_eq!(vec.capacity(), 6);
    }

    #[test]
    #[should_panic(expected = "insertion index")]
    fn insert_past_end() {
        let mut vec: SpillVec<i32, 3> = spillvec![1];
        vec.insert(2, 0);
    }

    fn check_bulk_insert<const N: usize>(len: usize, at: usize, count: usize) {
        let original: Vec<usize> = (0..len).collect();
        let inserted: Vec<usize> = (100..100 + count).collect();

        let mut vec: SpillVec<usize, N> = SpillVec::from_slice(&original);
        let grows = len + count > vec.capacity();
        let capacity = vec.capacity();

        assert_eq!(vec.insert_from_slice(at, &inserted), at);
        assert_eq!(vec.len(), len + count);
        assert_eq!(vec[..at], original[..at]);
        assert_eq!(vec[at..at + count], inserted[..]);
        assert_eq!(vec[at + count..], original[at..]);
        assert_region(&vec);
        if grows {
            assert_eq!(vec.capacity(), plan_growth(len, count).unwrap());
        } else {
            assert_eq!(vec.capacity(), capacity);
        }

        // Erasing what was just inserted restores the content.
        assert_eq!(vec.erase_range(at..at + count), at);
        assert_eq!(vec, original);
        assert_region(&vec);
    }

    #[test]
    fn bulk_insert_in_every_configuration() {
        // inline -> inline, inline -> heap, heap -> heap in place, heap -> bigger heap
        check_bulk_insert::<8>(3, 1, 2);
        check_bulk_insert::<8>(6, 3, 5);
        check_bulk_insert::<8>(0, 0, 9);
        check_bulk_insert::<4>(10, 4, 2);
        check_bulk_insert::<4>(10, 10, 30);
        check_bulk_insert::<4>(10, 0, 1);
    }

    #[test]
    fn empty_bulk_insert_is_noop() {
        let mut vec: SpillVec<i32, 2> = spillvec![1, 2];
        assert_eq!(vec.insert_many(1, iter::empty()), 1);
        assert_eq!(vec, [1, 2]);
        assert!(vec.is_inline());
    }

    #[test]
    fn bulk_insert_keeps_vector_on_clone_panic() {
        let mut vec: SpillVec<Fragile, 2> = SpillVec::new();
        vec.push(Fragile(1));
        vec.push(Fragile(2));

        let items = [Fragile(7), Fragile(u32::MAX), Fragile(9)];
        let result = catch_unwind(AssertUnwindSafe(|| vec.insert_from_slice(1, &items)));
        assert!(result.is_err());
        assert_eq!(vec, [Fragile(1), Fragile(2)]);
        assert!(vec.is_inline());
    }

    #[test]
    fn remove_and_erase() {
        let mut vec: SpillVec<char, 4> = spillvec!['a', 'b', 'c', 'd', 'e', 'f'];
        assert_eq!(vec.remove(0), 'a');
        assert!(vec.is_spilled());
        assert_eq!(vec.erase(4), 4);
        assert!(vec.is_inline());
        assert_eq!(vec, ['b', 'c', 'd', 'e']);
        assert_eq!(vec.erase(4), 4);
        assert_eq!(vec.len(), 4);
    }

    #[test]
    fn single_and_range_erase_agree_on_threshold() {
        let mut single: SpillVec<i32, 3> = spillvec![1, 2, 3, 4];
        let mut range = single.clone();
        single.erase(1);
        range.erase_range(1..2);
        assert_eq!(single, range);
        assert!(single.is_inline());
        assert!(range.is_inline());
    }

    #[test]
    fn erase_range_drops_exactly_the_range() {
        let tracker = Rc::new(());
        let mut vec: SpillVec<Rc<()>, 3> = SpillVec::from_elem(Rc::clone(&tracker), 8);
        assert_eq!(Rc::strong_count(&tracker), 9);

        // heap -> heap
        vec.erase_range(0..2);
        assert_eq!(Rc::strong_count(&tracker), 7);
        assert!(vec.is_spilled());

        // heap -> inline
        vec.erase_range(1..=3);
        assert_eq!(Rc::strong_count(&tracker), 4);
        assert!(vec.is_inline());

        // inline -> inline
        vec.erase_range(..2);
        assert_eq!(Rc::strong_count(&tracker), 2);

        drop(vec);
        assert_eq!(Rc::strong_count(&tracker), 1);
    }

    #[test]
    fn erase_empty_range() {
        let mut vec: SpillVec<i32, 2> = spillvec![1, 2, 3];
        assert_eq!(vec.erase_range(1..1), 1);
        assert_eq!(vec, [1, 2, 3]);
        assert!(vec.is_spilled());
    }

    #[test]
    fn truncate_and_resize() {
        let mut vec: SpillVec<i32, 3> = spillvec![0; 2];
        vec.resize(5, 7);
        assert_eq!(vec, [0, 0, 7, 7, 7]);
        assert_eq!(vec.capacity(), 7);

        vec.truncate(10);
        assert_eq!(vec.len(), 5);

        vec.truncate(3);
        assert_eq!(vec, [0, 0, 7]);
        assert!(vec.is_inline());
    }

    #[test]
    fn clear_is_idempotent() {
        let mut vec: SpillVec<String, 2> = SpillVec::new();
        vec.clear();
        assert_eq!(vec.len(), 0);
        assert_eq!(vec.capacity(), 2);

        vec.extend(["a", "b", "c"].map(String::from));
        assert!(vec.is_spilled());
        vec.clear();
        assert!(vec.is_empty());
        assert!(vec.is_inline());
        assert_eq!(vec.capacity(), 2);
        vec.clear();
        assert_eq!(vec.capacity(), 2);
    }

    #[test]
    fn clone_copies_capacity_and_is_independent() {
        let source: SpillVec<i32, 2> = (0..5).collect();
        let mut copy = source.clone();
        assert_eq!(copy, source);
        assert_eq!(copy.capacity(), source.capacity());

        copy[0] = 100;
        copy.push(5);
        assert_eq!(source, [0, 1, 2, 3, 4]);

        let small: SpillVec<i32, 2> = spillvec![1];
        let copy = small.clone();
        assert!(copy.is_inline());
        assert_eq!(copy, [1]);
    }

    #[test]
    fn clone_from_switches_regions() {
        let spilled: SpillVec<String, 2> = ["a", "b", "c"].map(String::from).into();
        let inline: SpillVec<String, 2> = ["x"].map(String::from).into();

        let mut target = spilled.clone();
        target.clone_from(&inline);
        assert!(target.is_inline());
        assert_eq!(target.capacity(), 2);
        assert_eq!(target, inline);

        target.clone_from(&spilled);
        assert!(target.is_spilled());
        assert_eq!(target.capacity(), spilled.capacity());
        assert_eq!(target, spilled);
    }

    #[test]
    fn construction_capacities() {
        let vec: SpillVec<u8, 4> = SpillVec::from_slice(&[1, 2, 3, 4]);
        assert!(vec.is_inline());

        let vec: SpillVec<u8, 4> = SpillVec::from_slice(&[1, 2, 3, 4, 5]);
        assert_eq!(vec.capacity(), 7);

        let vec: SpillVec<u8, 4> = [1, 2, 3, 4, 5, 6].into();
        assert_eq!(vec.capacity(), 9);

        let vec: SpillVec<u8, 4> = SpillVec::from_elem(0, 0);
        assert!(vec.is_empty());
        assert!(vec.is_inline());
    }

    #[test]
    fn from_vec_picks_region() {
        let vec: SpillVec<i32, 4> = Vec::from([1, 2, 3]).into();
        assert!(vec.is_inline());
        assert_eq!(vec, [1, 2, 3]);

        let vec: SpillVec<i32, 2> = Vec::from([1, 2, 3]).into();
        assert!(vec.is_spilled());
        assert_eq!(vec.into_vec(), [1, 2, 3]);

        let mut source = Vec::with_capacity(20);
        source.extend([1, 2, 3]);
        let capacity = source.capacity();
        let mut vec: SpillVec<i32, 2> = source.into();
        assert_eq!(vec.capacity(), capacity);
        vec.truncate(2);
        assert!(vec.is_inline());
    }

    #[test]
    fn bulk_construction_plans_once() {
        let from_slice: SpillVec<u32, 2> = SpillVec::from_slice(&[0, 1, 2, 3, 4, 5]);
        let collected: SpillVec<u32, 2> = (0..6).collect();
        let mut extended: SpillVec<u32, 2> = SpillVec::new();
        extended.extend(0..6);
        let mut by_ref: SpillVec<u32, 2> = SpillVec::new();
        by_ref.extend(&[0, 1, 2, 3, 4, 5]);
        let mut appended: SpillVec<u32, 2> = SpillVec::new();
        appended.extend_from_slice(&[0, 1, 2, 3, 4, 5]);

        assert_eq!(from_slice.capacity(), 9);
        for vec in [&collected, &extended, &by_ref, &appended] {
            assert_eq!(vec.capacity(), from_slice.capacity());
            assert_eq!(*vec, from_slice);
        }

        let small: SpillVec<u32, 8> = (0..6).collect();
        assert!(small.is_inline());
        assert_eq!(small.capacity(), 8);
    }

    #[test]
    fn extend_grows_by_batch() {
        let mut vec: SpillVec<u32, 2> = spillvec![0, 1, 2];
        assert_eq!(vec.capacity(), 4);
        vec.extend(3..7);
        assert_eq!(vec.capacity(), plan_growth(3, 4).unwrap());
        assert_eq!(vec.capacity(), 10);
        assert!(vec.iter().copied().eq(0..7));

        // Fits in the current region, no new plan.
        vec.extend([7, 8]);
        assert_eq!(vec.capacity(), 10);

        let mut vec: SpillVec<u32, 4> = spillvec![0, 1];
        vec.extend(2..4);
        assert!(vec.is_inline());
        vec.extend(iter::empty::<u32>());
        assert_eq!(vec, [0, 1, 2, 3]);
    }

    #[test]
    fn checked_access() {
        let mut vec: SpillVec<i32, 2> = spillvec![1, 2, 3];
        assert_eq!(vec.at(2), Ok(&3));
        assert_eq!(vec.at(3), Err(OutOfRange { index: 3, len: 3 }));

        *vec.at_mut(0).unwrap() = 10;
        assert_eq!(vec.at_mut(5), Err(OutOfRange { index: 5, len: 3 }));
        assert_eq!(vec, [10, 2, 3]);
    }

    #[test]
    fn equality_and_membership() {
        let a: SpillVec<i32, 2> = spillvec![1, 2, 3];
        let b: SpillVec<i32, 8> = spillvec![1, 2, 3];
        let c: SpillVec<i32, 2> = spillvec![1, 2];
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.contains(&3));
        assert!(!c.contains(&3));
        assert!(c < a);
    }

    #[test]
    fn iteration_order() {
        let vec: SpillVec<i32, 2> = spillvec![1, 2, 3, 4];
        assert_eq!(vec.iter().rev().copied().collect::<Vec<_>>(), [4, 3, 2, 1]);

        let mut iter = vec.into_iter();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.next_back(), Some(4));
        assert_eq!(iter.as_slice(), [1, 2, 3]);
        assert_eq!(iter.collect::<Vec<_>>(), [1, 2, 3]);

        let vec: SpillVec<i32, 8> = spillvec![1, 2];
        let iter = vec.into_iter();
        assert_eq!(iter.clone().collect::<Vec<_>>(), [1, 2]);
    }

    #[test]
    fn drops_every_element_once() {
        let tracker = Rc::new(());
        {
            let mut vec: SpillVec<Rc<()>, 2> = SpillVec::new();
            for _ in 0..6 {
                vec.push(Rc::clone(&tracker));
            }
            drop(vec.pop());
            drop(vec.remove(0));
            vec.insert(1, Rc::clone(&tracker));
            assert_eq!(Rc::strong_count(&tracker), 6);
        }
        assert_eq!(Rc::strong_count(&tracker), 1);
    }

    #[test]
    fn zero_sized_elements() {
        let mut vec: SpillVec<(), 2> = SpillVec::new();
        for _ in 0..10 {
            vec.push(());
        }
        assert!(vec.is_spilled());
        assert_eq!(vec.len(), 10);
        vec.truncate(1);
        assert!(vec.is_inline());
        assert_eq!(vec.len(), 1);
    }

    #[test]
    fn zero_inline_capacity() {
        let mut vec: SpillVec<i32, 0> = SpillVec::new();
        assert!(vec.is_inline());
        vec.push(1);
        assert!(vec.is_spilled());
        assert_eq!(vec.capacity(), 1);
        vec.pop();
        assert!(vec.is_inline());
        assert_eq!(vec.capacity(), 0);
    }
}
