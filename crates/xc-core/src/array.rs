//! Growable contiguous array.
//!
//! [`Array`] owns one heap buffer. The first `size` slots hold initialized
//! values; the remaining `capacity - size` slots are allocated but
//! uninitialized. The buffer is allocated lazily on the first push, grows by
//! doubling, and never shrinks except through [`Array::clear`], which releases
//! it entirely.
//!
//! # Examples
//!
//! ```
//! use xc_core::Array;
//!
//! let mut values = Array::new();
//! values.push_many([10, 20, 30, 40, 50]);
//! values.pop_back();
//! values.pop_back();
//!
//! assert_eq!(values.size(), 3);
//! assert_eq!(values.as_slice(), &[10, 20, 30]);
//! ```
//!
//! # Indexing
//!
//! `array[i]` is bounds-checked and panics outside `[0, size)`. The
//! unchecked accessors from the slice API (`get_unchecked`,
//! `get_unchecked_mut`) remain available for hot loops that have already
//! proven their indices.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;
use std::slice;

use crate::alloc::{Allocator, DefaultAllocator, handle_alloc_failure};
use crate::buffer::RawBuffer;
use crate::error::{AllocError, Result};

/// A growable, contiguous sequence of `T`.
pub struct Array<T, A: Allocator = DefaultAllocator> {
    buf: RawBuffer<T, A>,
    len: usize,
}

impl<T> Array<T> {
    /// Creates an empty array without allocating.
    #[must_use]
    pub const fn new() -> Self {
        Array {
            buf: RawBuffer::new_in(DefaultAllocator),
            len: 0,
        }
    }

    /// Creates an empty array with room for at least `capacity` values.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, DefaultAllocator)
    }
}

impl<T: Default> Array<T> {
    /// Fills a new array from a two-call enumeration query.
    ///
    /// `query` is called first with `None` and must store the element count
    /// in its `&mut usize` argument. The array is then resized to that count
    /// and `query` is called again with the storage; it may lower the count
    /// if fewer elements were written, and the array is truncated to match.
    ///
    /// ```
    /// use xc_core::Array;
    ///
    /// let devices = ["integrated", "discrete"];
    /// let names: Array<&str> = Array::from_enumeration(|count, out| match out {
    ///     None => *count = devices.len(),
    ///     Some(slots) => slots.copy_from_slice(&devices[..slots.len()]),
    /// });
    /// assert_eq!(names.as_slice(), &devices);
    /// ```
    pub fn from_enumeration<F>(mut query: F) -> Self
    where
        F: FnMut(&mut usize, Option<&mut [T]>),
    {
        let mut count = 0;
        query(&mut count, None);

        let mut array = Self::new();
        array.resize(count);
        query(&mut count, Some(array.as_mut_slice()));
        if count < array.size() {
            array.resize(count);
        }
        array
    }
}

impl<T, A: Allocator> Array<T, A> {
    /// Creates an empty array that allocates through `alloc`.
    #[must_use]
    pub const fn new_in(alloc: A) -> Self {
        Array {
            buf: RawBuffer::new_in(alloc),
            len: 0,
        }
    }

    /// Creates an empty array with room for at least `capacity` values.
    #[must_use]
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        let mut array = Self::new_in(alloc);
        array.reserve(capacity);
        array
    }

    /// Number of initialized values.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.len
    }

    /// Number of initialized values.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the array holds no values.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots in the backing buffer.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Pointer to the first element. Dangling while nothing is allocated.
    #[inline]
    #[must_use]
    pub const fn as_ptr(&self) -> *const T {
        self.buf.as_ptr().cast_const()
    }

    /// Mutable pointer to the first element.
    #[inline]
    #[must_use]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.as_ptr()
    }

    /// The initialized values as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots `[0, len)` are initialized and the pointer is
        // non-null and aligned even when nothing is allocated.
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len) }
    }

    /// The initialized values as a mutable slice.
    #[inline]
    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`, with exclusive access through `&mut self`.
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), self.len) }
    }

    #[inline]
    fn slot(&self, index: usize) -> NonNull<T> {
        // SAFETY: every caller passes `index < capacity`.
        unsafe { self.buf.slot(index) }
    }

    /// Makes room for `additional` more values using the doubling schedule.
    fn grow_for(&mut self, additional: usize) {
        let Some(required) = self.len.checked_add(additional) else {
            handle_alloc_failure(AllocError::CapacityOverflow);
        };
        if required > self.capacity() {
            let doubled = self.capacity().max(1).saturating_mul(2);
            self.reserve(required.max(doubled));
        }
    }

    /// Appends `value`, doubling the capacity when the buffer is full.
    ///
    /// The first push allocates two slots.
    pub fn push_back(&mut self, value: T) {
        self.grow_for(1);
        // SAFETY: `grow_for` guarantees `len < capacity`, and the slot past
        // the last element is uninitialized.
        unsafe { self.buf.allocator().construct(self.slot(self.len), value) };
        self.len += 1;
    }

    /// Appends every value of `values` in order with a single reservation.
    pub fn push_many<const N: usize>(&mut self, values: [T; N]) {
        self.grow_for(N);
        for value in values {
            // SAFETY: `grow_for` reserved room for all `N` values.
            unsafe { self.buf.allocator().construct(self.slot(self.len), value) };
            self.len += 1;
        }
    }

    /// Destroys the last value. Does nothing on an empty array.
    pub fn pop_back(&mut self) {
        if self.len == 0 {
            return;
        }
        self.len -= 1;
        // SAFETY: slot `len` held the last initialized value and is no longer
        // reachable through the array.
        unsafe { self.buf.allocator().destroy(self.slot(self.len)) };
    }

    /// Grows the buffer to hold at least `capacity` values.
    ///
    /// Never shrinks. Existing values are moved into the new buffer.
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow; aborts if the allocator refuses.
    pub fn reserve(&mut self, capacity: usize) {
        if let Err(err) = self.try_reserve(capacity) {
            handle_alloc_failure(err);
        }
    }

    /// Fallible [`reserve`](Self::reserve). On error the array is unchanged.
    pub fn try_reserve(&mut self, capacity: usize) -> Result<()> {
        if capacity <= self.capacity() {
            return Ok(());
        }

        let alloc = self.buf.allocator().clone();
        let mut fresh = RawBuffer::try_with_capacity_in(capacity, alloc)?;
        for index in 0..self.len {
            // SAFETY: `index < len <= old capacity < new capacity`; each value
            // is read exactly once and the old slots are then forgotten.
            unsafe {
                let value = self.slot(index).as_ptr().read();
                fresh.allocator().construct(fresh.slot(index), value);
            }
        }
        std::mem::swap(&mut self.buf, &mut fresh);

        crate::trace_event!(
            "array reallocated {} -> {} slots ({} live)",
            fresh.capacity(),
            self.capacity(),
            self.len
        );
        Ok(())
    }

    /// Resizes to `size`, filling new slots with values from `fill`.
    pub fn resize_with<F: FnMut() -> T>(&mut self, size: usize, mut fill: F) {
        if size < self.len {
            let old_len = self.len;
            self.len = size;
            for index in size..old_len {
                // SAFETY: slots `[size, old_len)` were initialized and are now
                // outside the array.
                unsafe { self.buf.allocator().destroy(self.slot(index)) };
            }
        } else if size > self.len {
            self.reserve(size);
            while self.len < size {
                // SAFETY: `len < size <= capacity`.
                unsafe { self.buf.allocator().construct(self.slot(self.len), fill()) };
                self.len += 1;
            }
        }
    }

    /// Resizes to `size`, default-constructing new values.
    pub fn resize(&mut self, size: usize)
    where
        T: Default,
    {
        self.resize_with(size, T::default);
    }

    /// Destroys every value and releases the buffer.
    pub fn clear(&mut self) {
        let old_len = self.len;
        self.len = 0;
        for index in 0..old_len {
            // SAFETY: slots `[0, old_len)` were initialized.
            unsafe { self.buf.allocator().destroy(self.slot(index)) };
        }

        if self.buf.is_allocated() {
            let alloc = self.buf.allocator().clone();
            self.buf = RawBuffer::new_in(alloc);
        }
    }
}

impl<T, A: Allocator> Drop for Array<T, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, A: Allocator> Default for Array<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T, A: Allocator> Deref for Array<T, A> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator> DerefMut for Array<T, A> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Clone, A: Allocator> Clone for Array<T, A> {
    fn clone(&self) -> Self {
        let mut copy = Self::with_capacity_in(self.len, self.buf.allocator().clone());
        for value in self.iter() {
            copy.push_back(value.clone());
        }
        copy
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for Array<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, A: Allocator, B: Allocator> PartialEq<Array<T, B>> for Array<T, A> {
    fn eq(&self, other: &Array<T, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, A: Allocator> Eq for Array<T, A> {}

impl<T: PartialEq, A: Allocator> PartialEq<[T]> for Array<T, A> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T, A: Allocator> Extend<T> for Array<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        if let Some(wanted) = self.len.checked_add(lower) {
            self.reserve(wanted);
        }
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T, A: Allocator> FromIterator<T> for Array<T, A> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::default();
        array.extend(iter);
        array
    }
}

impl<T, const N: usize> From<[T; N]> for Array<T> {
    fn from(values: [T; N]) -> Self {
        let mut array = Self::new();
        array.push_many(values);
        array
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a Array<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut Array<T, A> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
