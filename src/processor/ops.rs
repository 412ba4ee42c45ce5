//! Operation selectors for the processor.
//!
//! - [`LoadMode`]: how a word read from memory lands in a register
//! - [`StoreMode`]: which register (and whether masked) is written back
//! - [`LogicFunction`]: the sixteen two-input Boolean functions applied
//!   bit-by-bit between the buffer and a memory word

use std::fmt;

/// Memory-to-register transfer mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadMode {
    /// `buffer <- word`
    ToBuffer,
    /// `buffer <- mask_filter(word, buffer)`
    MaskedToBuffer,
    /// `mask <- mask_filter(word, mask)`
    MaskedToMask,
}

impl LoadMode {
    pub const ALL: [LoadMode; 3] = [Self::ToBuffer, Self::MaskedToBuffer, Self::MaskedToMask];

    pub fn name(&self) -> &'static str {
        match self {
            Self::ToBuffer => "TO_BUFFER",
            Self::MaskedToBuffer => "MASKED_TO_BUFFER",
            Self::MaskedToMask => "MASKED_TO_MASK",
        }
    }
}

impl fmt::Display for LoadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Register-to-memory transfer mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreMode {
    /// `word <- buffer`
    FromBuffer,
    /// `word <- mask`
    FromMask,
    /// `word <- mask_filter(buffer, word)`
    MaskedFromBuffer,
}

impl StoreMode {
    pub const ALL: [StoreMode; 3] = [Self::FromBuffer, Self::FromMask, Self::MaskedFromBuffer];

    pub fn name(&self) -> &'static str {
        match self {
            Self::FromBuffer => "FROM_BUFFER",
            Self::FromMask => "FROM_MASK",
            Self::MaskedFromBuffer => "MASKED_FROM_BUFFER",
        }
    }
}

impl fmt::Display for StoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Two-input Boolean function `f(x1, x2)`.
///
/// Functions are numbered `f0..f15` by their truth table read as a 4-bit
/// number over the rows `(x1, x2) = 00, 01, 10, 11`, first row most
/// significant. For example `f2 = 0b0010` is true only for `(1, 0)`.
///
/// | fn  | formula    | name                  |
/// |-----|------------|-----------------------|
/// | f0  | `0`        | constant zero         |
/// | f1  | `x1*x2`    | conjunction           |
/// | f2  | `x1*!x2`   | inhibition            |
/// | f3  | `x1`       | first argument        |
/// | f4  | `!x1*x2`   | reverse inhibition    |
/// | f5  | `x2`       | second argument       |
/// | f6  | `x1^x2`    | exclusive or          |
/// | f7  | `x1+x2`    | disjunction           |
/// | f8  | `!(x1+x2)` | Peirce arrow (NOR)    |
/// | f9  | `x1==x2`   | equivalence           |
/// | f10 | `!x2`      | negation of x2        |
/// | f11 | `x1+!x2`   | reverse implication   |
/// | f12 | `!x1`      | negation of x1        |
/// | f13 | `!x1+x2`   | implication           |
/// | f14 | `!(x1*x2)` | Sheffer stroke (NAND) |
/// | f15 | `1`        | constant one          |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicFunction {
    Zero,
    Conjunction,
    Inhibition,
    FirstArgument,
    ReverseInhibition,
    SecondArgument,
    ExclusiveOr,
    Disjunction,
    PeirceArrow,
    Equivalence,
    NotSecond,
    ReverseImplication,
    NotFirst,
    Implication,
    ShefferStroke,
    One,
}

impl LogicFunction {
    pub const ALL: [LogicFunction; 16] = [
        Self::Zero,
        Self::Conjunction,
        Self::Inhibition,
        Self::FirstArgument,
        Self::ReverseInhibition,
        Self::SecondArgument,
        Self::ExclusiveOr,
        Self::Disjunction,
        Self::PeirceArrow,
        Self::Equivalence,
        Self::NotSecond,
        Self::ReverseImplication,
        Self::NotFirst,
        Self::Implication,
        Self::ShefferStroke,
        Self::One,
    ];

    /// Function number `0..=15`; equals its truth table.
    #[inline]
    pub fn index(&self) -> u8 {
        *self as u8
    }

    /// Look up `f{index}`.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Evaluate the function for a single pair of bits.
    #[inline]
    pub fn apply(&self, x1: bool, x2: bool) -> bool {
        let row = ((x1 as u8) << 1) | x2 as u8;
        (self.index() >> (3 - row)) & 1 == 1
    }

    pub fn formula(&self) -> &'static str {
        match self {
            Self::Zero => "0",
            Self::Conjunction => "x1*x2",
            Self::Inhibition => "x1*!x2",
            Self::FirstArgument => "x1",
            Self::ReverseInhibition => "!x1*x2",
            Self::SecondArgument => "x2",
            Self::ExclusiveOr => "x1^x2",
            Self::Disjunction => "x1+x2",
            Self::PeirceArrow => "!(x1+x2)",
            Self::Equivalence => "x1==x2",
            Self::NotSecond => "!x2",
            Self::ReverseImplication => "x1+!x2",
            Self::NotFirst => "!x1",
            Self::Implication => "!x1+x2",
            Self::ShefferStroke => "!(x1*x2)",
            Self::One => "1",
        }
    }
}

impl fmt::Display for LogicFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{}", self.index())
    }
}
