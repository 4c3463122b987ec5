//! Owning raw buffer.
//!
//! [`RawBuffer`] owns exactly one allocation of `capacity` slots and releases
//! it exactly once, when the buffer is dropped. It never reads, writes, or
//! drops the values in its slots: tracking which slots are initialized is the
//! job of the container built on top of it.
//!
//! Growing a container therefore means building a fresh `RawBuffer`, moving
//! the live values across, and swapping the two; the old allocation is
//! released when the replaced buffer goes out of scope, on every exit path.

use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use crate::alloc::{Allocator, DefaultAllocator};
use crate::error::Result;

/// A heap allocation of `capacity` possibly-uninitialized `T` slots.
pub struct RawBuffer<T, A: Allocator = DefaultAllocator> {
    ptr: NonNull<T>,
    capacity: usize,
    alloc: A,
    _owns: PhantomData<T>,
}

// SAFETY: the buffer is uniquely owned; sending or sharing it is exactly as
// safe as sending or sharing the `T` values it may hold.
unsafe impl<T: Send, A: Allocator + Send> Send for RawBuffer<T, A> {}
// SAFETY: see above.
unsafe impl<T: Sync, A: Allocator + Sync> Sync for RawBuffer<T, A> {}

impl<T, A: Allocator> RawBuffer<T, A> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    /// Creates a buffer that owns no allocation.
    #[must_use]
    pub const fn new_in(alloc: A) -> Self {
        RawBuffer {
            ptr: NonNull::dangling(),
            capacity: if Self::IS_ZST { usize::MAX } else { 0 },
            alloc,
            _owns: PhantomData,
        }
    }

    /// Allocates room for `capacity` values, treating failure as fatal.
    #[must_use]
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        let ptr = alloc.allocate(capacity);
        Self::from_parts(ptr, capacity, alloc)
    }

    /// Allocates room for `capacity` values.
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self> {
        let ptr = alloc.try_allocate(capacity)?;
        Ok(Self::from_parts(ptr, capacity, alloc))
    }

    /// Allocates room for `capacity` values with every byte set to zero.
    #[must_use]
    pub fn zeroed_in(capacity: usize, alloc: A) -> Self {
        let ptr = alloc.allocate_zeroed(capacity);
        Self::from_parts(ptr, capacity, alloc)
    }

    fn from_parts(ptr: NonNull<T>, capacity: usize, alloc: A) -> Self {
        RawBuffer {
            ptr,
            capacity: if Self::IS_ZST { usize::MAX } else { capacity },
            alloc,
            _owns: PhantomData,
        }
    }

    /// Number of slots. Zero-sized `T` reports `usize::MAX`.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns true if this buffer owns a real allocation.
    #[inline]
    #[must_use]
    pub const fn is_allocated(&self) -> bool {
        !Self::IS_ZST && self.capacity != 0
    }

    /// Pointer to the first slot (dangling when nothing is allocated).
    #[inline]
    #[must_use]
    pub const fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Pointer to slot `index`.
    ///
    /// # Safety
    ///
    /// `index` must be at most `capacity` (one past the end is allowed for
    /// address computations, not for access).
    #[inline]
    #[must_use]
    pub unsafe fn slot(&self, index: usize) -> NonNull<T> {
        debug_assert!(index <= self.capacity, "slot {index} out of {}", self.capacity);
        // SAFETY: the caller keeps `index` inside the allocation.
        unsafe { self.ptr.add(index) }
    }

    /// The allocator that owns this buffer's memory.
    #[inline]
    #[must_use]
    pub const fn allocator(&self) -> &A {
        &self.alloc
    }
}

impl<T, A: Allocator> Default for RawBuffer<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T, A: Allocator> Drop for RawBuffer<T, A> {
    fn drop(&mut self) {
        if self.is_allocated() {
            // SAFETY: `ptr` was allocated by `alloc` for `capacity` slots and
            // this is the only place it is released.
            unsafe { self.alloc.deallocate(self.ptr, self.capacity) }
        }
    }
}

impl<T, A: Allocator> std::fmt::Debug for RawBuffer<T, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawBuffer")
            .field("ptr", &self.ptr)
            .field("capacity", &self.capacity)
            .finish()
    }
}
