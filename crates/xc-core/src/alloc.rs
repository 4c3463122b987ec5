//! Stateless allocator abstraction.
//!
//! An [`Allocator`] hands out raw, uninitialized buffers and places or tears
//! down individual values inside them. It holds no per-instance state, so any
//! number of containers can share one value without coordination.
//!
//! # Failure
//!
//! [`Allocator::allocate`] never returns an invalid buffer. A request whose
//! layout overflows panics with `capacity overflow`, and an allocator refusal
//! aborts through [`std::alloc::handle_alloc_error`]. Callers that want to
//! observe failure use [`Allocator::try_allocate`] instead.
//!
//! # Examples
//!
//! ```
//! use xc_core::alloc::{Allocator, DefaultAllocator};
//!
//! let alloc = DefaultAllocator;
//! let slot = alloc.allocate::<u64>(1);
//!
//! unsafe {
//!     alloc.construct(slot, 42);
//!     assert_eq!(*slot.as_ptr(), 42);
//!     alloc.destroy(slot);
//!     alloc.deallocate(slot, 1);
//! }
//! ```

use std::alloc::{self, Layout};
use std::ptr::{self, NonNull};

use crate::error::{AllocError, Result};

/// Raw buffer allocation plus per-slot construction and destruction.
///
/// Implementors must be stateless in the sense that a buffer allocated
/// through one value can be released through any clone of it.
pub trait Allocator: Clone + Default {
    /// Allocates an uninitialized buffer for `count` values of `T`.
    ///
    /// A zero-byte request (`count == 0` or zero-sized `T`) returns a
    /// dangling, well-aligned pointer that must not be dereferenced.
    fn try_allocate<T>(&self, count: usize) -> Result<NonNull<T>>;

    /// Like [`try_allocate`](Self::try_allocate), but every byte of the
    /// buffer is zero.
    fn try_allocate_zeroed<T>(&self, count: usize) -> Result<NonNull<T>>;

    /// Releases a buffer previously returned for `count` values of `T`.
    ///
    /// Zero-byte buffers are ignored.
    ///
    /// # Safety
    ///
    /// `ptr` must come from this allocator (or a clone of it) with the same
    /// `T` and `count`, and must not be released twice.
    unsafe fn deallocate<T>(&self, ptr: NonNull<T>, count: usize);

    /// Allocates `count` values of `T`, treating failure as fatal.
    fn allocate<T>(&self, count: usize) -> NonNull<T> {
        match self.try_allocate(count) {
            Ok(ptr) => ptr,
            Err(err) => handle_alloc_failure(err),
        }
    }

    /// Allocates `count` zeroed values of `T`, treating failure as fatal.
    fn allocate_zeroed<T>(&self, count: usize) -> NonNull<T> {
        match self.try_allocate_zeroed(count) {
            Ok(ptr) => ptr,
            Err(err) => handle_alloc_failure(err),
        }
    }

    /// Writes `value` into `slot` without reading or dropping the old
    /// contents.
    ///
    /// # Safety
    ///
    /// `slot` must be valid for writes and properly aligned. Any value
    /// already in the slot is overwritten without being dropped.
    #[inline]
    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        // SAFETY: the caller guarantees `slot` is writable and aligned.
        unsafe { slot.as_ptr().write(value) }
    }

    /// Writes `T::default()` into `slot`.
    ///
    /// # Safety
    ///
    /// Same contract as [`construct`](Self::construct).
    #[inline]
    unsafe fn construct_default<T: Default>(&self, slot: NonNull<T>) {
        // SAFETY: forwarded caller contract.
        unsafe { self.construct(slot, T::default()) }
    }

    /// Runs the drop glue of the value in `slot`.
    ///
    /// # Safety
    ///
    /// `slot` must hold an initialized value that is not used again.
    #[inline]
    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        // SAFETY: the caller guarantees `slot` holds a live value.
        unsafe { ptr::drop_in_place(slot.as_ptr()) }
    }
}

/// The process allocator behind `std::alloc`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DefaultAllocator;

impl DefaultAllocator {
    fn layout_for<T>(count: usize) -> Result<Layout> {
        Layout::array::<T>(count).map_err(|_| AllocError::CapacityOverflow)
    }

    fn try_allocate_with<T>(
        count: usize,
        raw_alloc: unsafe fn(Layout) -> *mut u8,
    ) -> Result<NonNull<T>> {
        let layout = Self::layout_for::<T>(count)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }

        // SAFETY: `layout` has a non-zero size (checked above).
        let raw = unsafe { raw_alloc(layout) };
        NonNull::new(raw.cast::<T>()).ok_or(AllocError::AllocFailed {
            size: layout.size(),
            align: layout.align(),
        })
    }
}

impl Allocator for DefaultAllocator {
    #[inline]
    fn try_allocate<T>(&self, count: usize) -> Result<NonNull<T>> {
        Self::try_allocate_with(count, alloc::alloc)
    }

    #[inline]
    fn try_allocate_zeroed<T>(&self, count: usize) -> Result<NonNull<T>> {
        Self::try_allocate_with(count, alloc::alloc_zeroed)
    }

    #[inline]
    unsafe fn deallocate<T>(&self, ptr: NonNull<T>, count: usize) {
        let Ok(layout) = Self::layout_for::<T>(count) else {
            // Such a buffer could never have been handed out.
            return;
        };
        if layout.size() == 0 {
            return;
        }

        // SAFETY: the caller guarantees `ptr` was allocated with this layout.
        unsafe { alloc::dealloc(ptr.as_ptr().cast::<u8>(), layout) }
    }
}

/// Diverges on an allocation failure reported by `try_allocate`.
///
/// Layout overflow panics; allocator refusal goes through
/// [`std::alloc::handle_alloc_error`], which aborts by default.
#[cold]
#[inline(never)]
pub fn handle_alloc_failure(err: AllocError) -> ! {
    match err {
        AllocError::CapacityOverflow => panic!("capacity overflow"),
        AllocError::AllocFailed { size, align } => match Layout::from_size_align(size, align) {
            Ok(layout) => alloc::handle_alloc_error(layout),
            Err(_) => panic!("{err}"),
        },
    }
}
