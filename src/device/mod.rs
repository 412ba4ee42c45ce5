//! Device models for the associative processor.
//!
//! This module provides:
//! - The physical N×N storage array ([`AssociativeMemory`])
//! - Word-wide registers ([`Register`]) used as buffer and mask
//!
//! # Architecture Overview
//!
//! ```text
//!   +---------------------------------------------+
//!   |           AssociativeProcessor               |
//!   |                                              |
//!   |   +-----------+          +-----------+       |
//!   |   |  buffer   |          |   mask    |       |
//!   |   +-----------+          +-----------+       |
//!   |          ^  |  diagonal read / write         |
//!   +----------|--v--------------------------------+
//!              |  |
//!   +-------------------------------+
//!   |   AssociativeMemory  (N x N)  |
//!   +-------------------------------+
//! ```
//!
//! # Example
//!
//! ```
//! use assoc_proc::device::{AssociativeMemory, Register, DEFAULT_DIMENSION};
//!
//! let mut mem = AssociativeMemory::zeroed(DEFAULT_DIMENSION);
//! mem.set(3, 2, true);
//! assert!(mem.get(3, 2));
//!
//! let reg = Register::new(DEFAULT_DIMENSION, "buffer");
//! assert_eq!(reg.load().count_ones(), 0);
//! ```

pub mod memory;
pub mod registers;

pub use memory::{AssociativeMemory, MemoryError};
pub use registers::Register;

/// Memory dimension used when nothing else is configured.
pub const DEFAULT_DIMENSION: usize = 16;

/// Largest supported dimension. Words must still have a `u64` decimal form.
pub const MAX_DIMENSION: usize = crate::bits::MAX_DECIMAL_WIDTH;

/// Check whether `dimension` can be used to build a memory.
pub fn is_valid_dimension(dimension: usize) -> bool {
    (1..=MAX_DIMENSION).contains(&dimension)
}
