//! Heap-backed byte string.
//!
//! A [`ByteString`] owns a buffer of exactly `size + 1` bytes: the content
//! followed by a zero terminator. There is no spare capacity, no sharing and
//! no reference counting; every copy allocates. Empty strings own no buffer
//! at all but still expose a terminated view.
//!
//! The bytes are wiped to zero before the buffer is released, so freed memory
//! never keeps a stale copy of the content.
//!
//! # Examples
//!
//! ```
//! use xc_core::ByteString;
//!
//! let title = ByteString::from("xc engine");
//! let copy = title.clone();
//!
//! assert_eq!(title, copy);
//! assert_eq!(title.size(), 9);
//! assert_eq!(title.as_bytes_with_nul().last(), Some(&0));
//! assert_eq!(title.digest(), copy.digest());
//! ```

use std::ffi::CStr;
use std::fmt;

use zeroize::Zeroize;

use crate::alloc::{Allocator, DefaultAllocator};
use crate::buffer::RawBuffer;
use crate::hash::{HashKey, hash_bytes};

/// An owned, zero-terminated byte string.
pub struct ByteString<A: Allocator = DefaultAllocator> {
    buf: RawBuffer<u8, A>,
    len: usize,
}

impl ByteString {
    /// Creates an empty string without allocating.
    #[must_use]
    pub const fn new() -> Self {
        Self::new_in(DefaultAllocator)
    }

    /// Copies `bytes` into a new string.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::from_bytes_in(bytes, DefaultAllocator)
    }

    /// Copies a zero-terminated source, excluding its terminator.
    #[must_use]
    pub fn from_c_str(source: &CStr) -> Self {
        Self::from_bytes(source.to_bytes())
    }
}

impl<A: Allocator> ByteString<A> {
    /// Creates an empty string that allocates through `alloc`.
    #[must_use]
    pub const fn new_in(alloc: A) -> Self {
        ByteString {
            buf: RawBuffer::new_in(alloc),
            len: 0,
        }
    }

    /// Copies `bytes` into a new string allocated through `alloc`.
    #[must_use]
    pub fn from_bytes_in(bytes: &[u8], alloc: A) -> Self {
        if bytes.is_empty() {
            return Self::new_in(alloc);
        }

        let buf = RawBuffer::with_capacity_in(bytes.len() + 1, alloc);
        // SAFETY: the buffer holds `len + 1` bytes and does not overlap the
        // borrowed source.
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf.as_ptr(), bytes.len());
            buf.as_ptr().add(bytes.len()).write(0);
        }

        ByteString {
            buf,
            len: bytes.len(),
        }
    }

    /// Length in bytes, excluding the terminator.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.len
    }

    /// Length in bytes, excluding the terminator.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the string has no content.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The content, without the terminator.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        let with_nul = self.as_bytes_with_nul();
        &with_nul[..with_nul.len() - 1]
    }

    /// The content followed by its zero terminator.
    #[must_use]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        if self.len == 0 {
            return b"\0";
        }
        // SAFETY: a non-empty string owns exactly `len + 1` initialized bytes.
        unsafe { std::slice::from_raw_parts(self.buf.as_ptr(), self.len + 1) }
    }

    /// Pointer to the zero-terminated content, valid while `self` is.
    #[inline]
    #[must_use]
    pub fn as_ptr(&self) -> *const u8 {
        self.as_bytes_with_nul().as_ptr()
    }

    /// The content as a C string, or `None` if it contains an interior zero.
    #[must_use]
    pub fn as_c_str(&self) -> Option<&CStr> {
        CStr::from_bytes_with_nul(self.as_bytes_with_nul()).ok()
    }

    /// 64-bit digest of the content, seeded with its length.
    #[inline]
    #[must_use]
    pub fn digest(&self) -> u64 {
        hash_bytes(self.as_bytes(), self.len as u64)
    }

    /// Zeroes the content and sets the length to zero. The buffer is kept.
    fn wipe(&mut self) {
        if self.len != 0 {
            // SAFETY: the first `len` bytes are initialized, inside the buffer,
            // and exclusively borrowed through `&mut self`.
            let content = unsafe { std::slice::from_raw_parts_mut(self.buf.as_ptr(), self.len) };
            content.zeroize();
        }
        self.len = 0;
    }

    /// Wipes the content and releases the buffer.
    fn release(&mut self) {
        self.wipe();
        if self.buf.is_allocated() {
            let alloc = self.buf.allocator().clone();
            self.buf = RawBuffer::new_in(alloc);
        }
    }
}

impl<A: Allocator> Drop for ByteString<A> {
    fn drop(&mut self) {
        self.wipe();
    }
}

impl<A: Allocator> Clone for ByteString<A> {
    fn clone(&self) -> Self {
        Self::from_bytes_in(self.as_bytes(), self.buf.allocator().clone())
    }

    fn clone_from(&mut self, source: &Self) {
        self.release();
        *self = source.clone();
    }
}

impl<A: Allocator> Default for ByteString<A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<A: Allocator, B: Allocator> PartialEq<ByteString<B>> for ByteString<A> {
    fn eq(&self, other: &ByteString<B>) -> bool {
        self.len == other.len && self.as_bytes() == other.as_bytes()
    }
}

impl<A: Allocator> Eq for ByteString<A> {}

impl<A: Allocator> PartialEq<[u8]> for ByteString<A> {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl<A: Allocator> PartialEq<str> for ByteString<A> {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<A: Allocator> PartialEq<&str> for ByteString<A> {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<A: Allocator> std::hash::Hash for ByteString<A> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl<A: Allocator> HashKey for ByteString<A> {
    #[inline]
    fn key_bits(&self) -> u64 {
        self.digest()
    }
}

impl From<&str> for ByteString {
    fn from(s: &str) -> Self {
        Self::from_bytes(s.as_bytes())
    }
}

impl From<&[u8]> for ByteString {
    fn from(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<&CStr> for ByteString {
    fn from(source: &CStr) -> Self {
        Self::from_c_str(source)
    }
}

impl<A: Allocator> fmt::Display for ByteString<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&String::from_utf8_lossy(self.as_bytes()), f)
    }
}

impl<A: Allocator> fmt::Debug for ByteString<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&String::from_utf8_lossy(self.as_bytes()), f)
    }
}
