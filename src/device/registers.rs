//! Word-wide processor registers.
//!
//! The processor owns two of these:
//!
//! - **buffer**: left operand and accumulator for logical and arithmetic work
//! - **mask**: selects which bit positions take part in a masked transfer
//!
//! Registers have copy-in/copy-out semantics. [`Register::save`] copies the
//! caller's bits into the register's own storage and [`Register::load`]
//! hands back a fresh copy, so no vector is ever shared between a register
//! and its caller.

use std::fmt;

use crate::bits::BitVector;

/// Fixed-width register. The name is only used in dumps and logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Register {
    name: &'static str,
    bits: BitVector,
}

impl Register {
    /// Create a zeroed register of `width` bits.
    pub fn new(width: usize, name: &'static str) -> Self {
        Self {
            name,
            bits: BitVector::zeros(width),
        }
    }

    /// Overwrite the register contents element-wise.
    ///
    /// Panics if `bits` does not have exactly the register width.
    pub fn save(&mut self, bits: &BitVector) {
        assert_eq!(
            bits.len(),
            self.bits.len(),
            "register {}: cannot save {} bits into a {}-bit register",
            self.name,
            bits.len(),
            self.bits.len()
        );
        self.bits.clone_from(bits);
        log::trace!("{} Save", self);
    }

    /// Independent copy of the register contents.
    pub fn load(&self) -> BitVector {
        log::trace!("{} Load", self);
        self.bits.clone()
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Register[{}][{}]", self.name, self.bits)
    }
}

impl fmt::Debug for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
