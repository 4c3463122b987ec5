//! Fixed-seed 64-bit mixing functions.
//!
//! [`hash64`] scrambles a single integer and [`hash_bytes`] folds a byte
//! sequence into a digest. Both are deterministic across runs, which keeps
//! map layouts reproducible from one frame to the next.
//!
//! # Examples
//!
//! ```
//! use xc_core::hash::{hash64, hash_bytes};
//!
//! assert_eq!(hash64(7), hash64(7));
//! assert_ne!(hash64(7), hash64(8));
//! assert_ne!(hash_bytes(b"abc", 0), hash_bytes(b"abc", 3));
//! ```

const KEY_OFFSET: u64 = 0x60be_e2be_e120_fc15;
const KEY_MUL_A: u64 = 0x2545_f491_4f6c_dd1d;
const KEY_MUL_B: u64 = 0x85eb_ca6b_6f2b_afc5;

const BYTE_MUL: u64 = 0xe703_7ed1_a0b4_28db;
const BYTE_ADD: u64 = 0xa076_1d64_78bd_642f;
const FINAL_MUL: u64 = 0x8ebc_6af0_9c88_c6e3;

/// Mixes a 64-bit key into a 64-bit digest.
#[inline]
#[must_use]
pub const fn hash64(key: u64) -> u64 {
    let mut key = key.wrapping_add(KEY_OFFSET);
    key ^= key >> 33;
    key = key.wrapping_mul(KEY_MUL_A);
    key ^= key >> 29;
    key = key.wrapping_mul(KEY_MUL_B);
    key ^= key >> 32;
    key
}

/// Folds `bytes` into a 64-bit digest starting from `seed`.
///
/// Each byte is taken as an unsigned value.
#[must_use]
pub const fn hash_bytes(bytes: &[u8], seed: u64) -> u64 {
    let mut state = seed;
    let mut i = 0;
    while i < bytes.len() {
        state ^= bytes[i] as u64;
        state = state.wrapping_mul(BYTE_MUL);
        state = state.wrapping_add(BYTE_ADD);
        i += 1;
    }

    state ^= state >> 47;
    state = state.wrapping_mul(FINAL_MUL);
    state ^= state >> 47;
    state
}

/// Keys that can be reduced to the 64 bits a [`HashMap`](crate::map::HashMap)
/// hashes.
///
/// Two equal keys must return the same bits. Distinct keys may collide; the
/// map compares keys with `PartialEq` before treating a slot as a match.
pub trait HashKey {
    /// The 64-bit surrogate fed to [`hash64`].
    fn key_bits(&self) -> u64;
}

macro_rules! impl_hash_key_as_u64 {
    ($($ty:ty),* $(,)?) => {
        $(
            impl HashKey for $ty {
                #[inline]
                fn key_bits(&self) -> u64 {
                    *self as u64
                }
            }
        )*
    };
}

impl_hash_key_as_u64!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, char);

impl HashKey for bool {
    #[inline]
    fn key_bits(&self) -> u64 {
        u64::from(*self)
    }
}

impl<K: HashKey + ?Sized> HashKey for &K {
    #[inline]
    fn key_bits(&self) -> u64 {
        (**self).key_bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash64_known_values() {
        assert_eq!(hash64(0), 0x09a4_2e95_0b3c_bf95);
        assert_eq!(hash64(1), 0x6d25_783d_227d_6167);
        assert_eq!(hash64(4) % 16, 0);
        assert_eq!(hash64(8) % 16, 0);
    }

    #[test]
    fn test_hash64_is_const() {
        const DIGEST: u64 = hash64(42);
        assert_eq!(DIGEST, hash64(42));
    }

    #[test]
    fn test_hash_bytes_depends_on_seed_and_content() {
        assert_eq!(hash_bytes(b"renderer", 8), hash_bytes(b"renderer", 8));
        assert_ne!(hash_bytes(b"renderer", 8), hash_bytes(b"renderer", 9));
        assert_ne!(hash_bytes(b"abc", 0), hash_bytes(b"abd", 0));
    }

    #[test]
    fn test_hash_bytes_treats_bytes_as_unsigned() {
        let high = hash_bytes(&[0xff], 0);
        let mut state: u64 = 0xff;
        state = state.wrapping_mul(BYTE_MUL).wrapping_add(BYTE_ADD);
        state ^= state >> 47;
        state = state.wrapping_mul(FINAL_MUL);
        state ^= state >> 47;
        assert_eq!(high, state);
    }

    #[test]
    fn test_key_bits_casts() {
        assert_eq!(42u8.key_bits(), 42);
        assert_eq!((-1i32).key_bits(), u64::MAX);
        assert_eq!('a'.key_bits(), 97);
        assert_eq!(true.key_bits(), 1);
        assert_eq!((&7usize).key_bits(), 7);
    }
}
