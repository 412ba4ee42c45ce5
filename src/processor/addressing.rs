//! Diagonal address translation.
//!
//! A logical word at address `a` occupies column `a` of the grid, rotated
//! so that its bit 0 sits on the main diagonal:
//!
//! ```text
//!   bit p of word a  ->  cell ((a + p) mod N, a)
//! ```
//!
//! The mapping is a pure function of `(address, position, N)`.

/// Grid cell `(row, col)` holding bit `position` of the word at `address`.
#[inline]
pub fn diagonal_cell(address: usize, position: usize, size: usize) -> (usize, usize) {
    ((address + position) % size, address)
}

/// All `N` cells of the word at `address`, in bit order.
pub fn word_cells(address: usize, size: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..size).map(move |p| diagonal_cell(address, p, size))
}
