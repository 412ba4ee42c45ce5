//! Fixed-length bit vectors and the bit-serial utilities built on them.
//!
//! Every word, register and search result in the processor is a
//! [`BitVector`]. Index 0 is the most significant bit throughout, so the
//! textual form `"0011"` reads the same way it is stored:
//!
//! ```text
//!   index:  0   1   2   3
//!   bit:    0   0   1   1     -> decimal 3
//!           ^MSB          ^LSB
//! ```
//!
//! The free functions in this module ([`not`], [`and`], [`or`], [`add`],
//! [`compare`], [`to_decimal`]) operate element-wise or bit-serially on
//! equal-length vectors. Passing operands of different lengths is a
//! programming error and panics.
//!
//! # Example
//!
//! ```
//! use assoc_proc::bits::{self, BitVector};
//!
//! let a: BitVector = "0111".parse().unwrap();
//! let b: BitVector = "0011".parse().unwrap();
//!
//! let sum = bits::add(&a, &b);
//! assert_eq!(sum.to_string(), "01010");
//! assert_eq!(bits::to_decimal(&sum), 10);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Index, Range};
use std::str::FromStr;

use thiserror::Error;

/// Widest vector that still has a decimal (`u64`) form.
pub const MAX_DECIMAL_WIDTH: usize = 64;

/// Error returned when parsing a bit string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseBitsError {
    /// A character other than `0` or `1` was found.
    #[error("invalid bit character '{found}' at position {position}")]
    InvalidCharacter {
        /// Character offset within the input.
        position: usize,
        /// The offending character.
        found: char,
    },
}

/// An ordered, fixed-length sequence of bits, MSB first.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct BitVector {
    bits: Vec<bool>,
}

impl BitVector {
    /// Wrap an existing sequence of bits.
    pub fn new(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// All-zero vector of the given length.
    pub fn zeros(len: usize) -> Self {
        Self { bits: vec![false; len] }
    }

    /// All-one vector of the given length.
    pub fn ones(len: usize) -> Self {
        Self { bits: vec![true; len] }
    }

    /// Big-endian binary form of `value`, truncated or zero-extended to `len` bits.
    pub fn from_value(value: u64, len: usize) -> Self {
        let bits = (0..len)
            .map(|i| {
                let shift = len - 1 - i;
                shift < MAX_DECIMAL_WIDTH && (value >> shift) & 1 == 1
            })
            .collect();
        Self { bits }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Read one bit. Panics if `index` is out of range.
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        self.bits[index]
    }

    /// Overwrite one bit. Panics if `index` is out of range.
    #[inline]
    pub fn set(&mut self, index: usize, bit: bool) {
        self.bits[index] = bit;
    }

    /// Copy out a contiguous sub-range as a new vector.
    pub fn slice(&self, range: Range<usize>) -> BitVector {
        Self::new(self.bits[range].to_vec())
    }

    /// Overwrite `self[start..start + src.len()]` with `src`.
    pub fn splice(&mut self, start: usize, src: &BitVector) {
        self.bits[start..start + src.len()].copy_from_slice(&src.bits);
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }
}

impl From<Vec<bool>> for BitVector {
    fn from(bits: Vec<bool>) -> Self {
        Self::new(bits)
    }
}

impl From<&[bool]> for BitVector {
    fn from(bits: &[bool]) -> Self {
        Self::new(bits.to_vec())
    }
}

impl FromIterator<bool> for BitVector {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Index<usize> for BitVector {
    type Output = bool;

    fn index(&self, index: usize) -> &bool {
        &self.bits[index]
    }
}

impl FromStr for BitVector {
    type Err = ParseBitsError;

    /// Parse a string of `0`/`1` characters. `_` is accepted as a visual separator.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .enumerate()
            .filter(|(_, c)| *c != '_')
            .map(|(position, c)| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                found => Err(ParseBitsError::InvalidCharacter { position, found }),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }
}

impl fmt::Display for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in &self.bits {
            f.write_str(if *bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitVector({})", self)
    }
}

/// Format a word address the way every dump and log line shows it: `[0x1a]`.
pub fn format_address(address: usize) -> String {
    format!("[{:#x}]", address)
}

#[inline]
fn assert_same_len(op: &str, a: &BitVector, b: &BitVector) {
    assert_eq!(
        a.len(),
        b.len(),
        "{}: operand length mismatch ({} vs {})",
        op,
        a.len(),
        b.len()
    );
}

/// Element-wise complement.
pub fn not(v: &BitVector) -> BitVector {
    v.iter().map(|b| !b).collect()
}

/// Element-wise conjunction. Panics on length mismatch.
pub fn and(a: &BitVector, b: &BitVector) -> BitVector {
    assert_same_len("and", a, b);
    a.iter().zip(b.iter()).map(|(x, y)| x && y).collect()
}

/// Element-wise disjunction. Panics on length mismatch.
pub fn or(a: &BitVector, b: &BitVector) -> BitVector {
    assert_same_len("or", a, b);
    a.iter().zip(b.iter()).map(|(x, y)| x || y).collect()
}

/// Ripple-carry addition.
///
/// Bits are summed from the last index (LSB) towards index 0 with the carry
/// moving left. The result is always one bit wider than the operands: the
/// carry out of the MSB becomes a new leading bit, `0` when there is none.
/// Panics on length mismatch.
pub fn add(a: &BitVector, b: &BitVector) -> BitVector {
    assert_same_len("add", a, b);

    let mut sum = vec![false; a.len() + 1];
    let mut carry = false;
    for i in (0..a.len()).rev() {
        let (x, y) = (a[i], b[i]);
        sum[i + 1] = x ^ y ^ carry;
        carry = (x && y) || (carry && (x ^ y));
    }
    sum[0] = carry;
    BitVector::new(sum)
}

/// Unsigned comparison, MSB first: the first differing bit decides.
/// Panics on length mismatch.
pub fn compare(a: &BitVector, b: &BitVector) -> Ordering {
    assert_same_len("compare", a, b);
    a.iter()
        .zip(b.iter())
        .find(|(x, y)| x != y)
        .map(|(x, _)| if x { Ordering::Greater } else { Ordering::Less })
        .unwrap_or(Ordering::Equal)
}

/// Big-endian unsigned value of the vector.
///
/// Panics if the vector is wider than [`MAX_DECIMAL_WIDTH`].
pub fn to_decimal(v: &BitVector) -> u64 {
    assert!(
        v.len() <= MAX_DECIMAL_WIDTH,
        "to_decimal: {} bits do not fit in u64",
        v.len()
    );
    v.iter().fold(0u64, |acc, bit| (acc << 1) | bit as u64)
}
