//! Error types for the fallible allocation paths.
//!
//! Only the `try_*` entry points report errors. The regular container
//! operations treat allocation failure as fatal (see
//! [`Allocator::allocate`](crate::alloc::Allocator::allocate)); a missing
//! key is an `Option`/`bool` outcome, never an error.

use std::fmt;

/// Errors reported by [`Allocator::try_allocate`](crate::alloc::Allocator::try_allocate)
/// and [`Array::try_reserve`](crate::array::Array::try_reserve).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    /// The requested element count does not fit in a valid layout.
    CapacityOverflow,

    /// The underlying allocator refused the request.
    AllocFailed {
        /// Requested size in bytes.
        size: usize,
        /// Requested alignment in bytes.
        align: usize,
    },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocError::CapacityOverflow => write!(f, "capacity overflow"),
            AllocError::AllocFailed { size, align } => write!(
                f,
                "allocation of {size} bytes (align {align}) failed: out of memory"
            ),
        }
    }
}

impl std::error::Error for AllocError {}

/// Result alias for the fallible allocation paths.
pub type Result<T> = std::result::Result<T, AllocError>;
