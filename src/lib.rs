//! assoc-proc library
//!
//! Functional model of an associative (content-addressable) memory
//! processor: a square bit array addressed diagonally, a buffer and a mask
//! register, and word-parallel logic, search and masked arithmetic.

pub mod bits;
pub mod config;
pub mod device;
pub mod processor;

pub use bits::BitVector;
pub use device::{AssociativeMemory, Register};
pub use processor::{AssociativeProcessor, LoadMode, LogicFunction, ProcessorError, StoreMode};
