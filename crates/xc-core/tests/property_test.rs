//! Property-based tests for the containers.
//!
//! `HashMap` is checked against `hashbrown::HashMap` and `Array` against
//! `Vec` over arbitrary operation sequences.
//!
//! Run with: `cargo test -p xc-core --test property_test`

use proptest::prelude::*;
use xc_core::map::threshold_for;
use xc_core::{Array, ByteString, HashMap, hash_bytes};

#[derive(Debug, Clone)]
enum MapOp {
    Insert(u16, u32),
    Remove(u16),
    Find(u16),
}

fn map_op() -> impl Strategy<Value = MapOp> {
    // A narrow key range forces collisions, replacements and removals of
    // present keys.
    prop_oneof![
        3 => (0u16..512, any::<u32>()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        1 => (0u16..512).prop_map(MapOp::Remove),
        1 => (0u16..512).prop_map(MapOp::Find),
    ]
}

#[derive(Debug, Clone)]
enum ArrayOp {
    Push(i64),
    Pop,
    Resize(usize),
    Reserve(usize),
}

fn array_op() -> impl Strategy<Value = ArrayOp> {
    prop_oneof![
        4 => any::<i64>().prop_map(ArrayOp::Push),
        2 => Just(ArrayOp::Pop),
        1 => (0usize..64).prop_map(ArrayOp::Resize),
        1 => (0usize..128).prop_map(ArrayOp::Reserve),
    ]
}

proptest! {
    /// Insert-only workloads never lose a key, whatever the collisions.
    #[test]
    fn test_map_insert_then_find(entries in prop::collection::vec((any::<u64>(), any::<u64>()), 0..400)) {
        let mut map = HashMap::new();
        let mut model = hashbrown::HashMap::new();

        for &(key, value) in &entries {
            prop_assert_eq!(map.insert(key, value), model.insert(key, value));
        }

        prop_assert_eq!(map.size(), model.len());
        for (key, value) in &model {
            prop_assert_eq!(map.find(key), Some(value));
        }
    }

    /// The load threshold holds after every insert.
    #[test]
    fn test_map_load_factor(keys in prop::collection::vec(any::<u32>(), 1..600)) {
        let mut map = HashMap::new();
        let mut capacity = map.capacity();
        for key in keys {
            map.insert(key, ());
            prop_assert!(map.size() <= threshold_for(map.capacity()));
            prop_assert!(map.capacity() >= capacity);
            prop_assert!(map.capacity().is_power_of_two());
            capacity = map.capacity();
        }
    }

    /// Every lookup answer from just before a resize is unchanged after it.
    #[test]
    fn test_map_resize_preserves_lookups(
        keys in prop::collection::hash_set(any::<u64>(), 100),
        doublings in 0u32..3,
    ) {
        let slots = 16usize << doublings;
        let mut keys = keys.into_iter();
        let mut map = HashMap::new();
        for key in keys.by_ref().take(threshold_for(slots)) {
            map.insert(key, key.wrapping_mul(31));
        }
        prop_assert_eq!(map.capacity(), slots);
        prop_assert_eq!(map.size(), map.threshold());

        let before: Vec<(u64, Option<u64>)> =
            map.iter().map(|(k, _)| (*k, map.find(k).copied())).collect();

        let extra = keys.next().expect("100 distinct keys");
        map.insert(extra, 0);
        prop_assert_eq!(map.capacity(), slots * 2);

        for (key, value) in before {
            prop_assert_eq!(map.find(&key).copied(), value);
        }
        prop_assert_eq!(map.find(&extra), Some(&0));
    }

    /// Mixed workloads agree with the model on keys inserted after the last
    /// removal.
    ///
    /// A removal can strand any key whose probe sequence crossed the freed
    /// slot, so older keys are only checked for storage, not for lookup.
    #[test]
    fn test_map_mixed_operations(ops in prop::collection::vec(map_op(), 0..300)) {
        let mut map = HashMap::new();
        let mut model = hashbrown::HashMap::new();
        let mut inserted_since_remove = hashbrown::HashSet::new();

        for op in ops {
            match op {
                MapOp::Insert(key, value) => {
                    map.insert(key, value);
                    model.insert(key, value);
                    inserted_since_remove.insert(key);
                }
                MapOp::Remove(key) => {
                    map.remove(&key);
                    model.remove(&key);
                    inserted_since_remove.clear();
                }
                MapOp::Find(key) => {
                    if inserted_since_remove.contains(&key) {
                        prop_assert_eq!(map.find(&key), model.get(&key));
                    }
                }
            }
            prop_assert!(map.size() >= model.len());
        }

        prop_assert_eq!(map.iter().count(), map.size());
        for key in model.keys() {
            prop_assert!(map.iter().any(|(k, _)| k == key));
        }
        for key in &inserted_since_remove {
            prop_assert_eq!(map.find(key), model.get(key));
        }
    }

    /// Byte strings as keys hash by content, not by address.
    #[test]
    fn test_map_byte_string_keys(words in prop::collection::hash_set("[a-z]{1,12}", 0..64)) {
        let mut map = HashMap::new();
        for (index, word) in words.iter().enumerate() {
            map.insert(ByteString::from(word.as_str()), index);
        }
        for (index, word) in words.iter().enumerate() {
            prop_assert_eq!(map.find(&ByteString::from(word.as_str())), Some(&index));
        }
    }

    #[test]
    fn test_array_matches_vec(ops in prop::collection::vec(array_op(), 0..200)) {
        let mut array = Array::new();
        let mut model = Vec::new();

        for op in ops {
            let before = array.capacity();
            match op {
                ArrayOp::Push(value) => {
                    array.push_back(value);
                    model.push(value);
                }
                ArrayOp::Pop => {
                    if !model.is_empty() {
                        array.pop_back();
                        model.pop();
                    }
                }
                ArrayOp::Resize(size) => {
                    array.resize(size);
                    model.resize(size, 0);
                }
                ArrayOp::Reserve(capacity) => {
                    array.reserve(capacity);
                    prop_assert!(array.capacity() >= capacity);
                }
            }
            prop_assert!(array.capacity() >= before);
            prop_assert!(array.size() <= array.capacity());
            prop_assert_eq!(array.as_slice(), model.as_slice());
        }
    }

    #[test]
    fn test_array_collect_preserves_order(values in prop::collection::vec(any::<u8>(), 0..256)) {
        let array: Array<u8> = values.iter().copied().collect();
        prop_assert_eq!(array.size(), values.len());
        prop_assert_eq!(&array[..], values.as_slice());
    }

    #[test]
    fn test_byte_string_round_trip(bytes in prop::collection::vec(any::<u8>(), 0..128)) {
        let s = ByteString::from_bytes(&bytes);
        prop_assert_eq!(s.as_bytes(), bytes.as_slice());
        prop_assert_eq!(s.as_bytes_with_nul().len(), bytes.len() + 1);
        prop_assert_eq!(s.as_bytes_with_nul()[bytes.len()], 0);
        prop_assert_eq!(s.digest(), hash_bytes(&bytes, bytes.len() as u64));
    }
}

/// Keys 4 and 8 share home slot 0 in a 16-slot table. Removing the first
/// leaves a hole in front of the second, and lookup stops at the hole.
#[test]
fn test_remove_breaks_probe_chain_regression() {
    let mut map = HashMap::new();
    map.insert(4u64, "four");
    map.insert(8u64, "eight");
    assert_eq!(map.capacity(), 16);

    assert!(map.remove(&4));
    assert_eq!(map.size(), 1);
    assert_eq!(map.find(&8), None);
    assert_eq!(map.iter().map(|(k, _)| *k).collect::<Vec<_>>(), vec![8]);

    // Re-inserting 8 lands in the freed home slot; the stranded copy is still
    // counted until the next resize drops it.
    map.insert(8u64, "eight again");
    assert_eq!(map.find(&8), Some(&"eight again"));
    assert_eq!(map.size(), 2);
}
