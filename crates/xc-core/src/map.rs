//! Open-addressing hash map with quadratic probing.
//!
//! Entries live in one flat buffer; a separate [`Occupancy`] bitmap records
//! which slots are live. The bit is the only authority on liveness: a removed
//! entry is dropped and its bit cleared, but the slot is not otherwise reset.
//!
//! # Probing
//!
//! The home slot of a key is `hash64(key.key_bits()) % capacity`. From there
//! the probe advances by successive squares (`+1`, `+4`, `+9`, ...) until it
//! reaches either a free slot or the slot holding the key. With power-of-two
//! capacities this sequence reaches every slot within `2 * capacity` steps,
//! and the map is never full, so the probe always terminates.
//!
//! # Removal
//!
//! There is no tombstone state. Removing a key that sits on another key's
//! probe path cuts that path short: the other key stays stored but
//! [`HashMap::find`] can stop at the freed slot and miss it. Inserting the
//! missed key again stores a second copy in front of the first; the next
//! resize keeps the copy lookup could reach and drops the other.
//!
//! ```
//! use xc_core::HashMap;
//!
//! // 4 and 8 share home slot 0 in a 16-slot table.
//! let mut map = HashMap::new();
//! map.insert(4u64, "four");
//! map.insert(8u64, "eight");
//! assert!(map.remove(&4));
//!
//! assert_eq!(map.find(&8), None);
//! assert_eq!(map.len(), 1);
//! ```
//!
//! # Growth
//!
//! The map starts with 16 slots and doubles whenever an insert finds
//! `size >= 0.75 * capacity`, rehashing every live entry into the new table.

use std::fmt;
use std::mem;
use std::ptr::{self, NonNull};

use crate::alloc::{Allocator, DefaultAllocator};
use crate::bitmap::{IterOnes, Occupancy};
use crate::buffer::RawBuffer;
use crate::hash::{HashKey, hash64};

/// Number of slots in a new map.
pub const INITIAL_CAPACITY: usize = 16;

/// Largest entry count allowed for `capacity` slots (75%).
#[inline]
#[must_use]
pub const fn threshold_for(capacity: usize) -> usize {
    capacity - capacity / 4
}

struct Entry<K, V> {
    key: K,
    value: V,
}

/// A hash map from `K` to `V` using quadratic probing.
pub struct HashMap<K, V, A: Allocator = DefaultAllocator> {
    entries: RawBuffer<Entry<K, V>, A>,
    occupancy: Occupancy<A>,
    capacity: usize,
    size: usize,
    threshold: usize,
}

impl<K, V> HashMap<K, V> {
    /// Creates a map with [`INITIAL_CAPACITY`] slots.
    #[must_use]
    pub fn new() -> Self {
        Self::new_in(DefaultAllocator)
    }

    /// Creates a map that can hold `entries` entries before it grows.
    #[must_use]
    pub fn with_capacity(entries: usize) -> Self {
        Self::with_capacity_in(entries, DefaultAllocator)
    }
}

impl<K, V, A: Allocator> HashMap<K, V, A> {
    /// Creates a map with [`INITIAL_CAPACITY`] slots allocated through `alloc`.
    #[must_use]
    pub fn new_in(alloc: A) -> Self {
        Self::with_slots(INITIAL_CAPACITY, alloc)
    }

    /// Creates a map that can hold `entries` entries before it grows.
    #[must_use]
    pub fn with_capacity_in(entries: usize, alloc: A) -> Self {
        let mut slots = INITIAL_CAPACITY;
        while threshold_for(slots) < entries {
            slots = slots
                .checked_mul(2)
                .unwrap_or_else(|| panic!("capacity overflow"));
        }
        Self::with_slots(slots, alloc)
    }

    fn with_slots(slots: usize, alloc: A) -> Self {
        debug_assert!(slots.is_power_of_two());
        HashMap {
            entries: RawBuffer::with_capacity_in(slots, alloc.clone()),
            occupancy: Occupancy::new_in(slots, alloc),
            capacity: slots,
            size: 0,
            threshold: threshold_for(slots),
        }
    }

    /// Number of live entries.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Number of live entries.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Returns true if the map has no live entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of slots.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entry count at which the next insert grows the table.
    #[inline]
    #[must_use]
    pub const fn threshold(&self) -> usize {
        self.threshold
    }

    #[inline]
    fn slot(&self, index: usize) -> NonNull<Entry<K, V>> {
        debug_assert!(index < self.capacity);
        // SAFETY: `index < capacity`, the number of allocated slots.
        unsafe { self.entries.slot(index) }
    }

    /// Shared access to a live entry.
    #[inline]
    fn entry(&self, index: usize) -> &Entry<K, V> {
        debug_assert!(self.occupancy.is_set(index));
        // SAFETY: the occupancy bit is set, so the slot is initialized.
        unsafe { self.slot(index).as_ref() }
    }

    /// Exclusive access to a live entry.
    #[inline]
    fn entry_mut(&mut self, index: usize) -> &mut Entry<K, V> {
        debug_assert!(self.occupancy.is_set(index));
        // SAFETY: as in `entry`, with `&mut self` for exclusivity.
        unsafe { self.slot(index).as_mut() }
    }

    /// Drops every live entry and clears the bitmap. Capacity is kept.
    pub fn clear(&mut self) {
        self.destroy_live_entries();
        self.occupancy.clear_all();
        self.size = 0;
        crate::trace_event!("map cleared ({} slots kept)", self.capacity);
    }

    fn destroy_live_entries(&mut self) {
        for index in self.occupancy.iter_ones() {
            // SAFETY: the bit is set, so the slot holds a live entry. Bits
            // are cleared by the caller before the slot can be read again.
            unsafe { self.entries.allocator().destroy(self.entries.slot(index)) };
        }
    }

    /// Iterates over live `(key, value)` pairs in slot order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V, A> {
        Iter {
            map: self,
            live: self.occupancy.iter_ones(),
            remaining: self.size,
        }
    }
}

impl<K: HashKey + PartialEq, V, A: Allocator> HashMap<K, V, A> {
    /// Walks the probe sequence for `key` in a table of `capacity` slots.
    ///
    /// Returns the first slot that is either free or holds `key`.
    fn probe_in(
        entries: &RawBuffer<Entry<K, V>, A>,
        occupancy: &Occupancy<A>,
        capacity: usize,
        key: &K,
    ) -> usize {
        let mut index = (hash64(key.key_bits()) % capacity as u64) as usize;
        let mut probe = 1usize;
        // SAFETY: `index < capacity` and the bit is checked before the slot
        // is read.
        while occupancy.is_set(index) && unsafe { entries.slot(index).as_ref() }.key != *key {
            index = (index + (probe * probe) % capacity) % capacity;
            probe += 1;
        }
        index
    }

    #[inline]
    fn probe(&self, key: &K) -> usize {
        Self::probe_in(&self.entries, &self.occupancy, self.capacity, key)
    }

    /// Inserts `value` under `key`.
    ///
    /// Grows the table first when the load threshold has been reached. If
    /// `key` is already present its value is replaced and the old value is
    /// returned; the entry count is unchanged in that case.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.size >= self.threshold {
            self.resize();
        }

        let index = self.probe(&key);
        if self.occupancy.is_set(index) {
            return Some(mem::replace(&mut self.entry_mut(index).value, value));
        }

        // SAFETY: the slot is free (bit clear), so nothing is overwritten.
        unsafe { self.entries.allocator().construct(self.slot(index), Entry { key, value }) };
        self.occupancy.set(index);
        self.size += 1;
        None
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn find(&self, key: &K) -> Option<&V> {
        let index = self.probe(key);
        self.occupancy
            .is_set(index)
            .then(|| &self.entry(index).value)
    }

    /// Returns the value stored under `key` for modification.
    #[must_use]
    pub fn find_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.probe(key);
        if self.occupancy.is_set(index) {
            Some(&mut self.entry_mut(index).value)
        } else {
            None
        }
    }

    /// Returns true if `find(key)` would succeed.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Removes `key`, dropping its entry. Returns false if it was not found.
    pub fn remove(&mut self, key: &K) -> bool {
        let index = self.probe(key);
        if !self.occupancy.is_set(index) {
            return false;
        }

        self.occupancy.clear(index);
        self.size -= 1;
        // SAFETY: the bit was set, so the slot held a live entry; it is now
        // unreachable because the bit is clear.
        unsafe { self.entries.allocator().destroy(self.slot(index)) };
        true
    }

    /// Doubles the slot count and moves every live entry to its new probe
    /// position.
    fn resize(&mut self) {
        let new_capacity = self
            .capacity
            .checked_mul(2)
            .unwrap_or_else(|| panic!("capacity overflow"));
        let alloc = self.entries.allocator().clone();

        let old_entries = mem::replace(
            &mut self.entries,
            RawBuffer::with_capacity_in(new_capacity, alloc.clone()),
        );
        let old_occupancy = mem::replace(&mut self.occupancy, Occupancy::new_in(new_capacity, alloc));
        let old_capacity = mem::replace(&mut self.capacity, new_capacity);
        self.threshold = threshold_for(new_capacity);

        // Entries that lookup could reach go first. A key stranded behind a
        // removed slot and then inserted again has two copies; the reachable
        // one holds the newer value and wins.
        let (reachable, stranded): (Vec<usize>, Vec<usize>) =
            old_occupancy.iter_ones().partition(|&index| {
                // SAFETY: the old bit is set, so the old slot is initialized.
                let key = unsafe { &old_entries.slot(index).as_ref().key };
                Self::probe_in(&old_entries, &old_occupancy, old_capacity, key) == index
            });

        for index in reachable.into_iter().chain(stranded) {
            // SAFETY: the old bit is set, so the old slot is initialized. It
            // is read exactly once; `old_entries` only frees memory on drop.
            let entry = unsafe { old_entries.slot(index).as_ptr().read() };
            let target = self.probe(&entry.key);
            if self.occupancy.is_set(target) {
                // Stale duplicate of a key that was inserted again.
                drop(entry);
                self.size -= 1;
                continue;
            }
            // SAFETY: the bit is clear, so nothing is overwritten.
            unsafe { self.entries.allocator().construct(self.slot(target), entry) };
            self.occupancy.set(target);
        }

        crate::trace_event!(
            "map resized {} -> {} slots ({} entries, threshold {})",
            old_capacity,
            new_capacity,
            self.size,
            self.threshold
        );
    }
}

impl<K, V, A: Allocator> Drop for HashMap<K, V, A> {
    fn drop(&mut self) {
        self.destroy_live_entries();
    }
}

impl<K, V> Default for HashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: HashKey + PartialEq + Clone, V: Clone, A: Allocator> Clone for HashMap<K, V, A> {
    fn clone(&self) -> Self {
        let mut copy = Self::with_slots(self.capacity, self.entries.allocator().clone());
        // Same precedence as `resize`: the copy lookup reaches wins over a
        // stale duplicate.
        let (reachable, stranded): (Vec<_>, Vec<_>) = self
            .iter()
            .partition(|&(key, value)| self.find(key).is_some_and(|found| ptr::eq(found, value)));
        for (key, value) in reachable.into_iter().chain(stranded) {
            if !copy.contains_key(key) {
                copy.insert(key.clone(), value.clone());
            }
        }
        copy
    }
}

impl<K: fmt::Debug, V: fmt::Debug, A: Allocator> fmt::Debug for HashMap<K, V, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: HashKey + PartialEq, V> FromIterator<(K, V)> for HashMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// Iterator over live entries, see [`HashMap::iter`].
pub struct Iter<'a, K, V, A: Allocator = DefaultAllocator> {
    map: &'a HashMap<K, V, A>,
    live: IterOnes<'a>,
    remaining: usize,
}

impl<'a, K, V, A: Allocator> Iterator for Iter<'a, K, V, A> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.live.next()?;
        self.remaining -= 1;
        let entry = self.map.entry(index);
        Some((&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, A: Allocator> ExactSizeIterator for Iter<'_, K, V, A> {}

impl<'a, K, V, A: Allocator> IntoIterator for &'a HashMap<K, V, A> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
