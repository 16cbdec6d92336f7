//! The inline region: `N` slots that live inside the container value itself.

use core::{
    iter::FusedIterator,
    mem::{ManuallyDrop, MaybeUninit},
    ptr, slice,
};

/// Fixed-capacity storage embedded in the owning value.
///
/// Only the first `len` slots are initialized. It never allocates and is never
/// released separately from its owner; dropping it drops the live prefix.
pub(crate) struct InlineBuf<T, const N: usize> {
    data: [MaybeUninit<T>; N],
    len: usize,
}

impl<T, const N: usize> Drop for InlineBuf<T, N> {
    fn drop(&mut self) {
        if self.len > 0 {
            // SAFETY: the first `len` slots are initialized.
            unsafe {
                ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.as_mut_ptr(), self.len));
            }
        }
    }
}

impl<T, const N: usize> InlineBuf<T, N> {
    #[inline]
    pub(crate) const fn new() -> Self {
        Self {
            // SAFETY: an array of `MaybeUninit` needs no initialization.
            data: unsafe { MaybeUninit::<[MaybeUninit<T>; N]>::uninit().assume_init() },
            len: 0,
        }
    }

    #[inline(always)]
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub(crate) const fn as_ptr(&self) -> *const T {
        &raw const self.data as *const T
    }

    #[inline(always)]
    pub(crate) const fn as_mut_ptr(&mut self) -> *mut T {
        &raw mut self.data as *mut T
    }

    /// # Safety
    /// `new_len <= N`, and the slots `[0, new_len)` must be initialized
    /// while the slots past it are treated as moved-out.
    #[inline(always)]
    pub(crate) const unsafe fn set_len(&mut self, new_len: usize) {
        debug_assert!(new_len <= N);
        self.len = new_len;
    }

    #[inline]
    pub(crate) const fn as_slice(&self) -> &[T] {
        // SAFETY: the first `len` slots are initialized.
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len) }
    }

    #[inline]
    pub(crate) const fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: the first `len` slots are initialized.
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), self.len) }
    }

    /// # Safety
    /// `len < N`.
    #[inline(always)]
    pub(crate) unsafe fn push_unchecked(&mut self, value: T) {
        debug_assert!(self.len < N, "length overflow during `push`");
        // SAFETY: the slot at `len` is in bounds and unoccupied.
        unsafe { ptr::write(self.as_mut_ptr().add(self.len), value) };
        self.len += 1;
    }

    /// Drops every element; the length is reset first so a panicking
    /// destructor cannot cause a double drop.
    pub(crate) fn clear(&mut self) {
        let len = self.len;
        if len > 0 {
            self.len = 0;
            // SAFETY: those `len` elements were live and are no longer tracked.
            unsafe {
                ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.as_mut_ptr(), len));
            }
        }
    }
}

impl<T: Clone, const N: usize> Clone for InlineBuf<T, N> {
    fn clone(&self) -> Self {
        let mut buf = Self::new();
        for item in self.as_slice() {
            // SAFETY: `buf` never holds more than `self.len() <= N` elements.
            unsafe { buf.push_unchecked(item.clone()) };
        }
        buf
    }
}

/// By-value iterator over an [`InlineBuf`].
pub(crate) struct IntoIter<T, const N: usize> {
    buf: ManuallyDrop<InlineBuf<T, N>>,
    index: usize,
}

impl<T, const N: usize> IntoIterator for InlineBuf<T, N> {
    type Item = T;
    type IntoIter = IntoIter<T, N>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            buf: ManuallyDrop::new(self),
            index: 0,
        }
    }
}

impl<T, const N: usize> IntoIter<T, N> {
    pub(crate) fn as_slice(&self) -> &[T] {
        let len = self.buf.len - self.index;
        // SAFETY: `[index, len)` is still initialized and not yet yielded.
        unsafe { slice::from_raw_parts(self.buf.as_ptr().add(self.index), len) }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.buf.len - self.index;
        // SAFETY: as above.
        unsafe { slice::from_raw_parts_mut(self.buf.as_mut_ptr().add(self.index), len) }
    }
}

impl<T, const N: usize> Iterator for IntoIter<T, N> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        if self.index < self.buf.len {
            self.index += 1;
            // SAFETY: the slot is initialized and is read exactly once.
            unsafe { Some(ptr::read(self.buf.as_ptr().add(self.index - 1))) }
        } else {
            None
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buf.len - self.index;
        (remaining, Some(remaining))
    }
}

impl<T, const N: usize> DoubleEndedIterator for IntoIter<T, N> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        if self.index < self.buf.len {
            self.buf.len -= 1;
            // SAFETY: the slot is initialized and is read exactly once.
            unsafe { Some(ptr::read(self.buf.as_ptr().add(self.buf.len))) }
        } else {
            None
        }
    }
}

impl<T, const N: usize> ExactSizeIterator for IntoIter<T, N> {}

impl<T, const N: usize> FusedIterator for IntoIter<T, N> {}

impl<T, const N: usize> Drop for IntoIter<T, N> {
    fn drop(&mut self) {
        let remaining = self.buf.len - self.index;
        if remaining > 0 {
            // SAFETY: `[index, len)` has not been yielded.
            unsafe {
                ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                    self.buf.as_mut_ptr().add(self.index),
                    remaining,
                ));
            }
        }
    }
}

impl<T: Clone, const N: usize> Clone for IntoIter<T, N> {
    fn clone(&self) -> Self {
        let mut buf = InlineBuf::new();
        for item in self.as_slice() {
            // SAFETY: at most `N` elements remain.
            unsafe { buf.push_unchecked(item.clone()) };
        }
        buf.into_iter()
    }
}
