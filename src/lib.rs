//! ## Intro
//!
//! A vector that stores its first `N` elements inside the value itself and
//! transparently spills to a heap allocation once it holds more than that.
//!
//! Most sequences in real programs are short. Keeping them inline avoids the
//! allocator entirely for the common case, while still behaving like a normal
//! resizable array when one of them grows.
//!
//! ```
//! # use spillvec::{SpillVec, spillvec};
//! let mut vec: SpillVec<i32, 4> = spillvec![1, 2, 3];
//! assert!(vec.is_inline());
//!
//! // Growing past the inline capacity moves the data to the heap ...
//! vec.extend([4, 5, 6]);
//! assert!(vec.is_spilled());
//!
//! // ... and shrinking back to `N` elements moves it inline again.
//! vec.truncate(4);
//! assert!(vec.is_inline());
//! assert_eq!(vec, [1, 2, 3, 4]);
//! ```
//!
//! ## Storage rules
//!
//! - The length alone decides where the elements live: inline while
//!   `len <= N`, on the heap while `len > N`.
//! - Inline, [`capacity`](SpillVec::capacity) is exactly `N`. There is no
//!   way to reserve heap memory for a vector that still fits inline.
//! - Growth allocates `⌊3 · (len + additional) / 2⌋` slots, where `additional`
//!   is the number of elements being added by the triggering call.
//! - Every `try_*` method reports allocation failure as a
//!   [`CollectionAllocErr`] and leaves the vector exactly as it was.
//!
//! `N` defaults to 16; [`MiniVec`] is a shorthand for `N = 8`.
//!
//! ## `no_std` support
//!
//! This crate requires only `core` and `alloc`.
//!
//! ## Optional features
//!
//! ### `std`
//!
//! Implements [`std::io::Write`] for `SpillVec<u8, N>`.
//!
//! ### `serde`
//!
//! [`SpillVec`] implements `Serialize` and `Deserialize` as a sequence.
//!
//! ### `tracing`
//!
//! Emits `trace`-level events (target `spillvec`) whenever elements move
//! between the inline and heap regions or a heap region is released.
//!
//! [`std::io::Write`]: https://doc.rust-lang.org/std/io/trait.Write.html
#![no_std]

extern crate alloc;

mod utils;

mod error;
mod inline_buf;

pub mod spill_vec;

#[cfg(feature = "serde")]
mod serde;

#[cfg(feature = "std")]
mod std_io;

pub use error::{CollectionAllocErr, OutOfRange};

#[doc(inline)]
pub use spill_vec::SpillVec;

/// A [`SpillVec`] with 8 inline slots.
///
/// # Examples
///
/// ```
/// # use spillvec::MiniVec;
/// let mut vec: MiniVec<u32> = MiniVec::new();
/// vec.extend(0..8);
/// assert!(vec.is_inline());
///
/// vec.push(8);
/// assert!(vec.is_spilled());
/// assert_eq!(vec.capacity(), 13);
/// ```
pub type MiniVec<T> = SpillVec<T, 8>;
