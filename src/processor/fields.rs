//! Word field layout used by the masked sum.
//!
//! ```text
//!   bit:  0  1  2 | 3  4  5  6 | 7  8  9 10 | 11 12 13 14 15
//!        [  Vj   ] [    Aj    ] [    Bj    ] [      Sj      ]
//! ```
//!
//! `Vj` is the tag compared against the mask register, `Aj` and `Bj` are
//! the 4-bit summands and `Sj` receives their 5-bit sum.

use std::ops::Range;

use crate::bits::{self, BitVector};

pub const TAG: Range<usize> = 0..3;
pub const FIELD_A: Range<usize> = 3..7;
pub const FIELD_B: Range<usize> = 7..11;
pub const FIELD_SUM: Range<usize> = 11..16;

/// Narrowest word that holds all four fields.
pub const REQUIRED_WIDTH: usize = FIELD_SUM.end;

/// True when the word's tag equals the first bits of `key`.
pub fn tag_matches(word: &BitVector, key: &BitVector) -> bool {
    TAG.clone().all(|i| word[i] == key[i])
}

/// Summands and result of one masked-sum step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSum {
    pub a: BitVector,
    pub b: BitVector,
    pub sum: BitVector,
}

impl FieldSum {
    /// Extract `Aj`, `Bj` from `word` and add them.
    pub fn of(word: &BitVector) -> Self {
        let a = word.slice(FIELD_A);
        let b = word.slice(FIELD_B);
        let sum = bits::add(&a, &b);
        debug_assert_eq!(sum.len(), FIELD_SUM.len());
        Self { a, b, sum }
    }

    /// Copy of `word` with `Sj` replaced by the sum; every other bit is kept.
    pub fn apply_to(&self, word: &BitVector) -> BitVector {
        let mut updated = word.clone();
        updated.splice(FIELD_SUM.start, &self.sum);
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bv(s: &str) -> BitVector {
        s.parse().unwrap()
    }

    #[test]
    fn test_layout_is_contiguous() {
        assert_eq!(TAG.end, FIELD_A.start);
        assert_eq!(FIELD_A.end, FIELD_B.start);
        assert_eq!(FIELD_B.end, FIELD_SUM.start);
        assert_eq!(REQUIRED_WIDTH, 16);
    }

    #[test]
    fn test_tag_matches_only_first_three_bits() {
        let word = bv("101_0000_0000_00000");
        assert!(tag_matches(&word, &bv("101_1111_1111_11111")));
        assert!(!tag_matches(&word, &bv("100_0000_0000_00000")));
    }

    #[test]
    fn test_field_sum() {
        // Aj = 0111 (7), Bj = 0101 (5) -> Sj = 01100 (12)
        let word = bv("110_0111_0101_11111");
        let step = FieldSum::of(&word);
        assert_eq!(step.a, bv("0111"));
        assert_eq!(step.b, bv("0101"));
        assert_eq!(step.sum, bv("01100"));
        assert_eq!(step.apply_to(&word), bv("110_0111_0101_01100"));
    }

    #[test]
    fn test_field_sum_with_carry_out() {
        let word = bv("000_1111_1111_00000");
        let step = FieldSum::of(&word);
        assert_eq!(step.sum, bv("11110"));
    }
}
