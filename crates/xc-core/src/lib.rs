//! `xc` core foundation library
//!
//! Containers and utilities shared by the engine and renderer layers:
//!
//! - **Allocation**: a stateless [`Allocator`] over the global heap
//! - **Dynamic arrays**: contiguous, growable [`Array`]
//! - **Hash maps**: open-addressing [`HashMap`] with an occupancy bitmap
//! - **Byte strings**: owned, zero-terminated [`ByteString`]
//! - **Hashing**: fixed-seed [`hash64`] and [`hash_bytes`]
//! - **Delegates**: type-erased single-dispatch [`Delegate`]
//! - **Math**: `#[repr(C)]` vector and matrix aggregates
//!
//! Growth events are logged at trace level through `xc-log` when the `log`
//! feature is enabled (the default).

#[cfg(feature = "log")]
macro_rules! trace_event {
    ($($arg:tt)*) => {
        ::xc_log::trace!($($arg)*)
    };
}

#[cfg(not(feature = "log"))]
macro_rules! trace_event {
    ($($arg:tt)*) => {
        if false {
            let _ = format_args!($($arg)*);
        }
    };
}

pub(crate) use trace_event;

pub mod alloc;
pub mod array;
pub mod bitmap;
pub mod buffer;
pub mod delegate;
pub mod error;
pub mod hash;
pub mod map;
pub mod math;
pub mod string;

pub use alloc::{Allocator, DefaultAllocator};
pub use array::Array;
pub use buffer::RawBuffer;
pub use delegate::Delegate;
pub use error::AllocError;
pub use hash::{HashKey, hash_bytes, hash64};
pub use map::HashMap;
pub use math::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};
pub use string::ByteString;

#[cfg(feature = "log")]
pub use xc_log as log;
