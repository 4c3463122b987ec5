//! Heap-backed occupancy bitmap: one bit per slot, eight slots per byte.

use crate::alloc::{Allocator, DefaultAllocator};
use crate::buffer::RawBuffer;

/// Number of bytes needed to hold `slots` bits.
#[inline]
#[must_use]
pub const fn byte_len(slots: usize) -> usize {
    slots.div_ceil(8)
}

/// A fixed-length bitmap that starts with every bit clear.
pub struct Occupancy<A: Allocator = DefaultAllocator> {
    bytes: RawBuffer<u8, A>,
    slots: usize,
}

impl Occupancy {
    /// Creates a bitmap for `slots` slots with the default allocator.
    #[must_use]
    pub fn new(slots: usize) -> Self {
        Self::new_in(slots, DefaultAllocator)
    }
}

impl<A: Allocator> Occupancy<A> {
    /// Creates a bitmap for `slots` slots, all clear.
    #[must_use]
    pub fn new_in(slots: usize, alloc: A) -> Self {
        Occupancy {
            bytes: RawBuffer::zeroed_in(byte_len(slots), alloc),
            slots,
        }
    }

    /// Number of slots tracked.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.slots
    }

    /// Returns true if the bitmap tracks no slots.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.slots == 0
    }

    /// The packed bytes, least significant bit first.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: the buffer holds `byte_len(slots)` bytes, all initialized
        // (zeroed on allocation and only modified through this type).
        unsafe { std::slice::from_raw_parts(self.bytes.as_ptr(), byte_len(self.slots)) }
    }

    #[inline]
    fn as_bytes_mut(&mut self) -> &mut [u8] {
        // SAFETY: as in `as_bytes`, and `&mut self` gives exclusive access.
        unsafe { std::slice::from_raw_parts_mut(self.bytes.as_ptr(), byte_len(self.slots)) }
    }

    /// Returns the bit for `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[inline]
    #[must_use]
    pub fn is_set(&self, index: usize) -> bool {
        assert!(index < self.slots, "slot {index} out of range for {} slots", self.slots);
        (self.as_bytes()[index / 8] >> (index % 8)) & 1 == 1
    }

    /// Sets the bit for `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[inline]
    pub fn set(&mut self, index: usize) {
        assert!(index < self.slots, "slot {index} out of range for {} slots", self.slots);
        self.as_bytes_mut()[index / 8] |= 1 << (index % 8);
    }

    /// Clears the bit for `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[inline]
    pub fn clear(&mut self, index: usize) {
        assert!(index < self.slots, "slot {index} out of range for {} slots", self.slots);
        self.as_bytes_mut()[index / 8] &= !(1 << (index % 8));
    }

    /// Clears every bit.
    pub fn clear_all(&mut self) {
        self.as_bytes_mut().fill(0);
    }

    /// Number of set bits.
    #[must_use]
    pub fn count_ones(&self) -> usize {
        self.as_bytes().iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Iterates over the indices of set bits in ascending order.
    #[must_use]
    pub fn iter_ones(&self) -> IterOnes<'_> {
        IterOnes {
            bytes: self.as_bytes(),
            byte: 0,
            pending: self.as_bytes().first().copied().unwrap_or(0),
        }
    }
}

impl<A: Allocator> std::fmt::Debug for Occupancy<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Occupancy")
            .field("slots", &self.slots)
            .field("set", &self.count_ones())
            .finish()
    }
}

/// Iterator over set bit indices, see [`Occupancy::iter_ones`].
pub struct IterOnes<'a> {
    bytes: &'a [u8],
    byte: usize,
    pending: u8,
}

impl Iterator for IterOnes<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if self.pending != 0 {
                let bit = self.pending.trailing_zeros() as usize;
                self.pending &= self.pending - 1;
                return Some(self.byte * 8 + bit);
            }
            self.byte += 1;
            self.pending = *self.bytes.get(self.byte)?;
        }
    }
}
