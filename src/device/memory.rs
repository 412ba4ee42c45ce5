//! The physical associative storage array.
//!
//! An N×N grid of independent bits. The grid knows nothing about words:
//! word identity only exists through the diagonal mapping applied by the
//! processor (see [`crate::processor::addressing`]). The only operations
//! exposed here are single-cell [`get`](AssociativeMemory::get) /
//! [`set`](AssociativeMemory::set) and [`size`](AssociativeMemory::size).
//!
//! ```text
//!          col 0  col 1  col 2  col 3
//!   row 0 [  w0.0   w1.3   w2.2   w3.1 ]
//!   row 1 [  w0.1   w1.0   w2.3   w3.2 ]
//!   row 2 [  w0.2   w1.1   w2.0   w3.3 ]
//!   row 3 [  w0.3   w1.2   w2.1   w3.0 ]
//!
//!   wA.P = bit P of the word at address A
//! ```
//!
//! A freshly constructed memory is randomized cell by cell, modelling an
//! uninitialized store.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use super::{is_valid_dimension, MAX_DIMENSION};
use crate::bits::{format_address, BitVector};

/// Errors from building a memory out of an explicit grid.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// The grid had no rows.
    #[error("memory grid is empty")]
    Empty,

    /// A row length does not match the number of rows.
    #[error("memory grid is not square: {rows} rows but row {row} has {len} cells")]
    NotSquare {
        /// Number of rows in the grid.
        rows: usize,
        /// Index of the first offending row.
        row: usize,
        /// Length of that row.
        len: usize,
    },

    /// The grid is wider than a word can be decoded into a number.
    #[error("memory grid is {size}x{size}, at most {max}x{max} is supported")]
    TooLarge {
        /// Number of rows in the grid.
        size: usize,
        /// Largest supported dimension.
        max: usize,
    },
}

/// Square bit array addressed by `(row, col)`.
#[derive(Clone, PartialEq, Eq)]
pub struct AssociativeMemory {
    size: usize,
    /// Row-major storage, `size * size` cells.
    cells: Vec<bool>,
}

impl AssociativeMemory {
    /// Randomized memory seeded from the thread RNG.
    pub fn random(size: usize) -> Self {
        Self::from_rng(size, &mut rand::thread_rng())
    }

    /// Randomized memory with a reproducible seed.
    pub fn seeded(size: usize, seed: u64) -> Self {
        Self::from_rng(size, &mut StdRng::seed_from_u64(seed))
    }

    /// Randomized memory drawing every cell independently from `rng`.
    ///
    /// Panics if `size` is zero or above [`MAX_DIMENSION`].
    pub fn from_rng<R: Rng>(size: usize, rng: &mut R) -> Self {
        assert_dimension(size);
        log::info!("initialize Memory {}x{}", size, size);
        let cells = (0..size * size).map(|_| rng.gen_bool(0.5)).collect();
        Self { size, cells }
    }

    /// All-zero memory. Same dimension limits as [`from_rng`](Self::from_rng).
    pub fn zeroed(size: usize) -> Self {
        assert_dimension(size);
        log::info!("initialize zeroed Memory {}x{}", size, size);
        Self {
            size,
            cells: vec![false; size * size],
        }
    }

    /// Build a memory from an explicit grid of rows.
    pub fn from_grid(grid: Vec<Vec<bool>>) -> Result<Self, MemoryError> {
        let rows = grid.len();
        if rows == 0 {
            return Err(MemoryError::Empty);
        }
        if !is_valid_dimension(rows) {
            return Err(MemoryError::TooLarge {
                size: rows,
                max: MAX_DIMENSION,
            });
        }
        if let Some((row, r)) = grid.iter().enumerate().find(|(_, r)| r.len() != rows) {
            return Err(MemoryError::NotSquare {
                rows,
                row,
                len: r.len(),
            });
        }

        log::info!("initialize Memory {}x{} from explicit grid", rows, rows);
        Ok(Self {
            size: rows,
            cells: grid.into_iter().flatten().collect(),
        })
    }

    /// Dimension N of the N×N grid.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Read a cell. Panics if `row` or `col` is outside `[0, N)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> bool {
        let bit = self.cells[self.offset(row, col)];
        log::trace!("Get {}:{} -> {}", row, col, bit as u8);
        bit
    }

    /// Write a cell. Panics if `row` or `col` is outside `[0, N)`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, bit: bool) {
        log::trace!("Set {}:{} <- {}", row, col, bit as u8);
        let offset = self.offset(row, col);
        self.cells[offset] = bit;
    }

    /// One physical row as stored (not a logical word).
    pub fn row(&self, row: usize) -> BitVector {
        let start = self.offset(row, 0);
        BitVector::from(&self.cells[start..start + self.size])
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.size && col < self.size,
            "cell ({}, {}) outside {}x{} memory",
            row,
            col,
            self.size,
            self.size
        );
        row * self.size + col
    }
}

fn assert_dimension(size: usize) {
    assert!(
        is_valid_dimension(size),
        "memory dimension {} outside 1..={}",
        size,
        MAX_DIMENSION
    );
}

impl fmt::Display for AssociativeMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Memory{{")?;
        for row in 0..self.size {
            writeln!(f, "{} {}", format_address(row), self.row(row))?;
        }
        write!(f, "}}")
    }
}

impl fmt::Debug for AssociativeMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssociativeMemory {{ size: {} }}", self.size)
    }
}
