// Common test utilities for integration tests
//
// Drop-tracking elements and a counting allocator for the leak tests.

#![allow(dead_code)]

use std::cell::Cell;
use std::ptr::NonNull;
use std::rc::Rc;

use xc_core::alloc::{Allocator, DefaultAllocator};
use xc_core::error::Result;

/// Element that bumps a shared counter when dropped.
#[derive(Debug)]
pub struct Tracked {
    pub id: u64,
    drops: Rc<Cell<usize>>,
}

impl Tracked {
    pub fn new(id: u64, drops: &Rc<Cell<usize>>) -> Self {
        Tracked {
            id,
            drops: Rc::clone(drops),
        }
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        Tracked::new(self.id, &self.drops)
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

/// Creates a fresh drop counter.
pub fn drop_counter() -> Rc<Cell<usize>> {
    Rc::new(Cell::new(0))
}

thread_local! {
    static LIVE_BUFFERS: Cell<isize> = const { Cell::new(0) };
    static ALLOCATIONS: Cell<usize> = const { Cell::new(0) };
}

/// Allocator that counts live buffers per thread.
///
/// Zero-byte requests are not counted, matching `DefaultAllocator`, which
/// never touches the heap for them.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountingAllocator;

impl CountingAllocator {
    /// Buffers allocated and not yet released on this thread.
    pub fn live_buffers() -> isize {
        LIVE_BUFFERS.with(Cell::get)
    }

    /// Total non-empty allocations made on this thread.
    pub fn allocations() -> usize {
        ALLOCATIONS.with(Cell::get)
    }

    fn counts<T>(count: usize) -> bool {
        count != 0 && size_of::<T>() != 0
    }

    fn track<T>(count: usize, result: Result<NonNull<T>>) -> Result<NonNull<T>> {
        if result.is_ok() && Self::counts::<T>(count) {
            LIVE_BUFFERS.with(|live| live.set(live.get() + 1));
            ALLOCATIONS.with(|total| total.set(total.get() + 1));
        }
        result
    }
}

impl Allocator for CountingAllocator {
    fn try_allocate<T>(&self, count: usize) -> Result<NonNull<T>> {
        Self::track(count, DefaultAllocator.try_allocate(count))
    }

    fn try_allocate_zeroed<T>(&self, count: usize) -> Result<NonNull<T>> {
        Self::track(count, DefaultAllocator.try_allocate_zeroed(count))
    }

    unsafe fn deallocate<T>(&self, ptr: NonNull<T>, count: usize) {
        if Self::counts::<T>(count) {
            LIVE_BUFFERS.with(|live| live.set(live.get() - 1));
        }
        // SAFETY: forwarded caller contract; the buffer came from
        // `DefaultAllocator` through `try_allocate`.
        unsafe { DefaultAllocator.deallocate(ptr, count) }
    }
}
