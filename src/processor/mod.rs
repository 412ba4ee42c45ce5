//! The associative processor.
//!
//! Drives the diagonal memory through two registers and exposes
//! word-oriented operations that act on all stored words at once.
//!
//! # Data Flow
//!
//! ```text
//!   address ──► diagonal read ──► word ──► (mask merge) ──► buffer / mask
//!                                                              │
//!   memory  ◄── diagonal write ◄── word ◄── (mask merge) ◄─────┘
//! ```
//!
//! [`read`](AssociativeProcessor::read) and
//! [`write`](AssociativeProcessor::write) are the only paths between the
//! word view and the physical grid. Everything else is expressed in terms of
//! them plus register logic.
//!
//! # Operations
//!
//! - **Transfer**: [`load_bit_slice`](AssociativeProcessor::load_bit_slice),
//!   [`store_bit_slice`](AssociativeProcessor::store_bit_slice),
//!   [`move_bit_slice`](AssociativeProcessor::move_bit_slice)
//! - **Logic**: [`exec_logical_operation`](AssociativeProcessor::exec_logical_operation)
//! - **Search**: [`slices_in_interval`](AssociativeProcessor::slices_in_interval)
//! - **Arithmetic**: [`masked_sum`](AssociativeProcessor::masked_sum)
//! - **Inspection**: [`memory_as_normal`](AssociativeProcessor::memory_as_normal),
//!   [`registers_dump`](AssociativeProcessor::registers_dump)
//!
//! # Example
//!
//! ```
//! use assoc_proc::device::AssociativeMemory;
//! use assoc_proc::processor::{AssociativeProcessor, LoadMode, LogicFunction, StoreMode};
//!
//! let mut cpu = AssociativeProcessor::new(AssociativeMemory::seeded(16, 1));
//!
//! // 0x2 = f7(0x0, 0x1)
//! cpu.load_bit_slice(0x0, LoadMode::ToBuffer)?;
//! cpu.exec_logical_operation(0x1, LogicFunction::Disjunction)?;
//! cpu.store_bit_slice(0x2, StoreMode::FromBuffer)?;
//!
//! println!("{}", cpu.memory_as_normal());
//! # Ok::<(), assoc_proc::processor::ProcessorError>(())
//! ```

pub mod addressing;
pub mod error;
pub mod fields;
pub mod ops;

use std::cmp::Ordering;

use crate::bits::{self, format_address, BitVector};
use crate::device::{AssociativeMemory, Register};

pub use error::ProcessorError;
pub use fields::FieldSum;
pub use ops::{LoadMode, LogicFunction, StoreMode};

/// Associative processor over a diagonally addressed memory.
///
/// Owns the memory and both registers for its whole lifetime. Registers
/// are only reachable through copies ([`buffer`](Self::buffer),
/// [`mask`](Self::mask)).
pub struct AssociativeProcessor {
    memory: AssociativeMemory,
    buffer: Register,
    mask: Register,
}

impl AssociativeProcessor {
    /// Wrap `memory`. The buffer starts zeroed and the mask all-ones, so
    /// masked transfers behave like plain ones until the mask is changed.
    pub fn new(memory: AssociativeMemory) -> Self {
        let size = memory.size();
        let buffer = Register::new(size, "buffer");
        let mut mask = Register::new(size, "mask");
        mask.save(&BitVector::ones(size));

        log::info!("initialize AssociativeProcessor over {}-word memory", size);
        Self {
            memory,
            buffer,
            mask,
        }
    }

    /// Number of words, which is also the word width.
    #[inline]
    pub fn size(&self) -> usize {
        self.memory.size()
    }

    /// The physical grid (diagonal layout).
    pub fn memory(&self) -> &AssociativeMemory {
        &self.memory
    }

    /// Copy of the buffer register.
    pub fn buffer(&self) -> BitVector {
        self.buffer.load()
    }

    /// Copy of the mask register.
    pub fn mask(&self) -> BitVector {
        self.mask.load()
    }

    fn check_address(&self, address: usize) -> Result<(), ProcessorError> {
        if address < self.size() {
            Ok(())
        } else {
            Err(ProcessorError::AddressOutOfRange {
                address,
                size: self.size(),
            })
        }
    }

    // --- word access ---------------------------------------------------

    /// Assemble the logical word at `address` from its diagonal cells.
    pub fn read(&self, address: usize) -> Result<BitVector, ProcessorError> {
        self.check_address(address)?;
        let word: BitVector = addressing::word_cells(address, self.size())
            .map(|(row, col)| self.memory.get(row, col))
            .collect();
        log::info!("READ {} {}", format_address(address), word);
        Ok(word)
    }

    /// Scatter `bits` over the diagonal cells of `address`.
    ///
    /// Panics if `bits` is not exactly one word wide.
    pub fn write(&mut self, address: usize, bits: &BitVector) -> Result<(), ProcessorError> {
        self.check_address(address)?;
        assert_eq!(
            bits.len(),
            self.size(),
            "write: {}-bit value for {}-bit word",
            bits.len(),
            self.size()
        );
        for (p, (row, col)) in addressing::word_cells(address, self.size()).enumerate() {
            self.memory.set(row, col, bits[p]);
        }
        log::info!("WRITE {} {}", format_address(address), bits);
        Ok(())
    }

    /// Take `candidate[i]` where the mask bit is set, `previous[i]` elsewhere.
    fn mask_filter(&self, candidate: &BitVector, previous: &BitVector) -> BitVector {
        let mask = self.mask.load();
        mask.iter()
            .zip(candidate.iter().zip(previous.iter()))
            .map(|(m, (c, p))| if m { c } else { p })
            .collect()
    }

    // --- transfers -----------------------------------------------------

    /// Read the word at `address` into a register.
    pub fn load_bit_slice(&mut self, address: usize, mode: LoadMode) -> Result<(), ProcessorError> {
        log::info!("LoadBitSlice {} {}", format_address(address), mode);
        let word = self.read(address)?;
        match mode {
            LoadMode::ToBuffer => self.buffer.save(&word),
            LoadMode::MaskedToBuffer => {
                let merged = self.mask_filter(&word, &self.buffer.load());
                self.buffer.save(&merged);
            }
            LoadMode::MaskedToMask => {
                let merged = self.mask_filter(&word, &self.mask.load());
                self.mask.save(&merged);
            }
        }
        Ok(())
    }

    /// Write a register (optionally merged under the mask) to `address`.
    pub fn store_bit_slice(&mut self, address: usize, mode: StoreMode) -> Result<(), ProcessorError> {
        log::info!("StoreBitSlice {} {}", format_address(address), mode);
        let value = match mode {
            StoreMode::FromBuffer => self.buffer.load(),
            StoreMode::FromMask => self.mask.load(),
            StoreMode::MaskedFromBuffer => {
                let current = self.read(address)?;
                self.mask_filter(&self.buffer.load(), &current)
            }
        };
        self.write(address, &value)
    }

    /// Copy the word at `from` to `to` through the buffer.
    ///
    /// The buffer keeps the moved word afterwards.
    pub fn move_bit_slice(&mut self, from: usize, to: usize) -> Result<(), ProcessorError> {
        log::info!("MoveBitSlice from: {} to: {}", format_address(from), format_address(to));
        self.check_address(to)?;
        self.load_bit_slice(from, LoadMode::ToBuffer)?;
        self.store_bit_slice(to, StoreMode::FromBuffer)
    }

    // --- logic ---------------------------------------------------------

    /// `buffer <- func(buffer, word[address])`, bit by bit.
    pub fn exec_logical_operation(
        &mut self,
        address: usize,
        func: LogicFunction,
    ) -> Result<(), ProcessorError> {
        let x1 = self.buffer.load();
        let x2 = self.read(address)?;
        let result: BitVector = x1.iter().zip(x2.iter()).map(|(a, b)| func.apply(a, b)).collect();
        log::info!(
            "ExecLogicalOperation {} | {} | {} {} {} -> {}",
            func,
            func.formula(),
            x1,
            format_address(address),
            x2,
            result
        );
        self.buffer.save(&result);
        Ok(())
    }

    // --- search --------------------------------------------------------

    /// Flag every word strictly between the words at `lower` and `upper`.
    ///
    /// The two bound words are ordered first, so argument order does not
    /// matter. Afterwards bit `i` of the buffer is set iff the word at
    /// address `i` is strictly greater than the smaller bound and strictly
    /// less than the larger one. The resulting flags are also returned.
    pub fn slices_in_interval(
        &mut self,
        lower: usize,
        upper: usize,
    ) -> Result<BitVector, ProcessorError> {
        self.check_address(lower)?;
        self.check_address(upper)?;

        let mut low = self.read(lower)?;
        let mut high = self.read(upper)?;
        if bits::compare(&low, &high) == Ordering::Greater {
            std::mem::swap(&mut low, &mut high);
        }
        log::info!("GetSlicesInInterval {} < x < {}", low, high);

        let mut flags = BitVector::zeros(self.size());
        for address in 0..self.size() {
            let word = self.read(address)?;
            let inside = bits::compare(&word, &low) == Ordering::Greater
                && bits::compare(&word, &high) == Ordering::Less;
            log::debug!("compare {} < {} < {} is {}", low, word, high, inside);
            flags.set(address, inside);
        }

        self.buffer.save(&flags);
        Ok(flags)
    }

    // --- arithmetic ----------------------------------------------------

    /// Add `Aj + Bj` into `Sj` for every word whose tag `Vj` matches the
    /// first bits of the mask register.
    ///
    /// Each updated word passes through the buffer on its way back to
    /// memory, so the buffer ends up holding the last updated word.
    /// Unmatched words are not written. Returns the number of updated words.
    pub fn masked_sum(&mut self) -> Result<usize, ProcessorError> {
        if self.size() < fields::REQUIRED_WIDTH {
            return Err(ProcessorError::WordTooNarrow {
                required: fields::REQUIRED_WIDTH,
                size: self.size(),
            });
        }

        log::info!("MaskedSum {}", self.mask);
        let key = self.mask.load();
        let mut updated = 0;
        for address in 0..self.size() {
            let word = self.read(address)?;
            if !fields::tag_matches(&word, &key) {
                continue;
            }

            let step = FieldSum::of(&word);
            log::info!("Sum {} + {} = {}", step.a, step.b, step.sum);
            self.buffer.save(&step.apply_to(&word));
            self.store_bit_slice(address, StoreMode::FromBuffer)?;
            updated += 1;
        }

        log::debug!("MaskedSum updated {} words", updated);
        Ok(updated)
    }

    // --- inspection ----------------------------------------------------

    /// Every word in address order, as stored logically.
    pub fn normal_words(&self) -> Vec<BitVector> {
        (0..self.size())
            .map(|address| {
                addressing::word_cells(address, self.size())
                    .map(|(row, col)| self.memory.get(row, col))
                    .collect()
            })
            .collect()
    }

    /// Word-oriented dump: one `[0x..] bits [decimal]` line per address.
    pub fn memory_as_normal(&self) -> String {
        let rows: String = self
            .normal_words()
            .iter()
            .enumerate()
            .map(|(address, word)| {
                format!("{} {} [{}]\n", format_address(address), word, bits::to_decimal(word))
            })
            .collect();
        format!("NormalMemory{{\n{}}}\n", rows)
    }

    /// Both registers, one per line.
    pub fn registers_dump(&self) -> String {
        format!("{}\n{}", self.buffer, self.mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bv(s: &str) -> BitVector {
        s.parse().unwrap()
    }

    /// Processor over a zeroed memory with the given words written in.
    fn with_words(size: usize, words: &[&str]) -> AssociativeProcessor {
        let mut cpu = AssociativeProcessor::new(AssociativeMemory::zeroed(size));
        for (address, w) in words.iter().enumerate() {
            cpu.write(address, &bv(w)).unwrap();
        }
        cpu
    }

    #[test]
    fn test_new_processor_registers() {
        let cpu = AssociativeProcessor::new(AssociativeMemory::zeroed(8));
        assert_eq!(cpu.buffer(), BitVector::zeros(8));
        assert_eq!(cpu.mask(), BitVector::ones(8));
    }

    #[test]
    fn test_read_uses_diagonal_layout() {
        let mut mem = AssociativeMemory::zeroed(4);
        // word 1 = 1000: bit 0 lives at row 1, col 1
        mem.set(1, 1, true);
        // word 2 = 0001: bit 3 lives at row (2 + 3) % 4 = 1, col 2
        mem.set(1, 2, true);
        let cpu = AssociativeProcessor::new(mem);
        assert_eq!(cpu.read(0).unwrap(), bv("0000"));
        assert_eq!(cpu.read(1).unwrap(), bv("1000"));
        assert_eq!(cpu.read(2).unwrap(), bv("0001"));
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let mut cpu = AssociativeProcessor::new(AssociativeMemory::seeded(16, 3));
        let value = bv("1011_0010_1110_0001");
        for address in 0..16 {
            cpu.write(address, &value).unwrap();
            assert_eq!(cpu.read(address).unwrap(), value);
        }
    }

    #[test]
    fn test_write_only_touches_its_column() {
        let mut cpu = with_words(4, &["0000", "0000", "0000", "0000"]);
        cpu.write(2, &bv("1111")).unwrap();
        for row in 0..4 {
            for col in 0..4 {
                assert_eq!(cpu.memory().get(row, col), col == 2);
            }
        }
    }

    #[test]
    fn test_out_of_range_address_is_rejected() {
        let mut cpu = AssociativeProcessor::new(AssociativeMemory::zeroed(4));
        let err = ProcessorError::AddressOutOfRange { address: 4, size: 4 };
        assert_eq!(cpu.read(4), Err(err.clone()));
        assert_eq!(cpu.load_bit_slice(4, LoadMode::ToBuffer), Err(err.clone()));
        assert_eq!(cpu.store_bit_slice(4, StoreMode::FromMask), Err(err.clone()));
        assert_eq!(cpu.exec_logical_operation(4, LogicFunction::One), Err(err.clone()));
        assert_eq!(cpu.slices_in_interval(0, 4), Err(err.clone()));
        assert_eq!(cpu.move_bit_slice(0, 4), Err(err));
    }

    #[test]
    fn test_failed_move_leaves_buffer_alone() {
        let mut cpu = with_words(4, &["1111"]);
        assert!(cpu.move_bit_slice(0, 9).is_err());
        assert_eq!(cpu.buffer(), bv("0000"));
    }

    #[test]
    fn test_mask_filter_transparent_and_identity() {
        let mut cpu = with_words(4, &["0000", "1111", "0110"]);
        let candidate = bv("1010");
        let previous = bv("0101");
        assert_eq!(cpu.mask_filter(&candidate, &previous), candidate);

        // mask <- word 0 (all zero) through the transparent mask
        cpu.load_bit_slice(0, LoadMode::MaskedToMask).unwrap();
        assert_eq!(cpu.mask(), bv("0000"));
        assert_eq!(cpu.mask_filter(&candidate, &previous), previous);
    }

    #[test]
    fn test_mask_filter_mixes_by_position() {
        // mask 0011, candidate 0110, previous 1001 -> 1010
        let mut cpu = with_words(4, &["0011"]);
        cpu.load_bit_slice(0, LoadMode::MaskedToMask).unwrap();
        assert_eq!(cpu.mask_filter(&bv("0110"), &bv("1001")), bv("1010"));
    }

    #[test]
    fn test_load_modes() {
        let mut cpu = with_words(4, &["1100", "0101", "0011"]);

        cpu.load_bit_slice(0, LoadMode::ToBuffer).unwrap();
        assert_eq!(cpu.buffer(), bv("1100"));

        // mask <- 0011 & 1111-mask => 0011
        cpu.load_bit_slice(2, LoadMode::MaskedToMask).unwrap();
        assert_eq!(cpu.mask(), bv("0011"));

        // only the last two buffer bits are replaced by word 1
        cpu.load_bit_slice(1, LoadMode::MaskedToBuffer).unwrap();
        assert_eq!(cpu.buffer(), bv("1101"));

        // mask refinement: masked positions take word 1's bits
        cpu.load_bit_slice(1, LoadMode::MaskedToMask).unwrap();
        assert_eq!(cpu.mask(), bv("0001"));
    }

    #[test]
    fn test_store_modes() {
        let mut cpu = with_words(4, &["1010", "0000", "0110", "1111"]);
        cpu.load_bit_slice(0, LoadMode::ToBuffer).unwrap();

        cpu.store_bit_slice(1, StoreMode::FromBuffer).unwrap();
        assert_eq!(cpu.read(1).unwrap(), bv("1010"));

        cpu.store_bit_slice(2, StoreMode::FromMask).unwrap();
        assert_eq!(cpu.read(2).unwrap(), bv("1111"));

        // mask <- 1100, then merge buffer 1010 into word 3 (1111)
        cpu.write(1, &bv("1100")).unwrap();
        cpu.load_bit_slice(1, LoadMode::MaskedToMask).unwrap();
        cpu.store_bit_slice(3, StoreMode::MaskedFromBuffer).unwrap();
        assert_eq!(cpu.read(3).unwrap(), bv("1011"));
    }

    #[test]
    fn test_move_bit_slice() {
        let mut cpu = with_words(4, &["1001", "0000"]);
        cpu.move_bit_slice(0, 3).unwrap();
        assert_eq!(cpu.read(3).unwrap(), bv("1001"));
        assert_eq!(cpu.read(0).unwrap(), bv("1001"));
        assert_eq!(cpu.buffer(), bv("1001"));
    }

    #[test]
    fn test_logical_operations() {
        let x1 = "1100";
        let x2 = "1010";
        let cases = [
            (LogicFunction::Inhibition, "0100"),
            (LogicFunction::Disjunction, "1110"),
            (LogicFunction::PeirceArrow, "0001"),
            (LogicFunction::Implication, "1011"),
        ];
        for (func, expected) in cases {
            let mut cpu = with_words(4, &[x1, x2]);
            cpu.load_bit_slice(0, LoadMode::ToBuffer).unwrap();
            cpu.exec_logical_operation(1, func).unwrap();
            assert_eq!(cpu.buffer(), bv(expected), "{}", func);
            // memory untouched
            assert_eq!(cpu.read(0).unwrap(), bv(x1));
            assert_eq!(cpu.read(1).unwrap(), bv(x2));
        }
    }

    #[test]
    fn test_interval_example() {
        let mut cpu = with_words(4, &["0001", "0011", "0111", "1111"]);
        let flags = cpu.slices_in_interval(0x0, 0x2).unwrap();
        assert_eq!(flags, bv("0100"));
        assert_eq!(cpu.buffer(), bv("0100"));
    }

    #[test]
    fn test_interval_order_independent() {
        let mut cpu = with_words(4, &["0001", "0011", "0111", "1111"]);
        let forward = cpu.slices_in_interval(0x0, 0x3).unwrap();
        let backward = cpu.slices_in_interval(0x3, 0x0).unwrap();
        assert_eq!(forward, bv("0110"));
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_interval_excludes_bounds_and_equal_words() {
        let mut cpu = with_words(4, &["0010", "0010", "1000", "0100"]);
        assert_eq!(cpu.slices_in_interval(0, 1).unwrap(), bv("0000"));
        assert_eq!(cpu.slices_in_interval(1, 2).unwrap(), bv("0001"));
    }

    #[test]
    fn test_masked_sum_updates_matching_words_only() {
        let mut cpu = with_words(
            16,
            &[
                "111_0001_0010_00000", // tag 111: 1 + 2 = 3
                "000_1111_1111_10101", // tag 000: untouched
                "111_1111_0001_11111", // tag 111: 15 + 1 = 16
            ],
        );
        let before_other = cpu.read(1).unwrap();

        // mask is all ones, so the key tag is 111
        assert_eq!(cpu.masked_sum().unwrap(), 2);
        assert_eq!(cpu.read(0).unwrap(), bv("111_0001_0010_00011"));
        assert_eq!(cpu.read(1).unwrap(), before_other);
        assert_eq!(cpu.read(2).unwrap(), bv("111_1111_0001_10000"));
        assert_eq!(cpu.buffer(), bv("111_1111_0001_10000"));
    }

    #[test]
    fn test_masked_sum_uses_mask_tag() {
        let mut cpu = with_words(16, &["010_0011_0011_00000", "010_0000_0000_00000"]);
        cpu.write(15, &bv("010_0000_0000_00000")).unwrap();
        // mask <- word 15 => tag key 010
        cpu.load_bit_slice(15, LoadMode::MaskedToMask).unwrap();
        let updated = cpu.masked_sum().unwrap();
        // words 0, 1 and 15 carry tag 010
        assert_eq!(updated, 3);
        assert_eq!(cpu.read(0).unwrap(), bv("010_0011_0011_00110"));
    }

    #[test]
    fn test_masked_sum_requires_wide_words() {
        let mut cpu = AssociativeProcessor::new(AssociativeMemory::zeroed(8));
        assert_eq!(
            cpu.masked_sum(),
            Err(ProcessorError::WordTooNarrow { required: 16, size: 8 })
        );
    }

    #[test]
    fn test_memory_as_normal() {
        let cpu = with_words(4, &["0001", "0011", "0111", "1111"]);
        assert_eq!(
            cpu.memory_as_normal(),
            "NormalMemory{\n[0x0] 0001 [1]\n[0x1] 0011 [3]\n[0x2] 0111 [7]\n[0x3] 1111 [15]\n}\n"
        );
    }

    #[test]
    fn test_memory_as_normal_widest_memory() {
        let size = crate::device::MAX_DIMENSION;
        let mut cpu = AssociativeProcessor::new(AssociativeMemory::zeroed(size));
        cpu.write(size - 1, &BitVector::ones(size)).unwrap();
        let dump = cpu.memory_as_normal();
        assert_eq!(dump.lines().count(), size + 2);
        assert!(dump.contains(&format!("[0x3f] {} [{}]", BitVector::ones(size), u64::MAX)));
    }

    #[test]
    fn test_every_transfer_mode_checks_address() {
        let mut cpu = with_words(4, &["1111"]);
        let err = ProcessorError::AddressOutOfRange { address: 7, size: 4 };
        for mode in LoadMode::ALL {
            assert_eq!(cpu.load_bit_slice(7, mode), Err(err.clone()), "{}", mode);
        }
        for mode in StoreMode::ALL {
            assert_eq!(cpu.store_bit_slice(7, mode), Err(err.clone()), "{}", mode);
        }
        assert_eq!(cpu.buffer(), bv("0000"));
        assert_eq!(cpu.mask(), bv("1111"));
    }

    #[test]
    fn test_fresh_mask_makes_every_load_a_copy() {
        for mode in LoadMode::ALL {
            let mut cpu = with_words(4, &["0110"]);
            cpu.load_bit_slice(0, mode).unwrap();
            let target = match mode {
                LoadMode::MaskedToMask => cpu.mask(),
                LoadMode::ToBuffer | LoadMode::MaskedToBuffer => cpu.buffer(),
            };
            assert_eq!(target, bv("0110"), "{}", mode);
        }
    }

    #[test]
    fn test_registers_dump() {
        let cpu = AssociativeProcessor::new(AssociativeMemory::zeroed(4));
        assert_eq!(
            cpu.registers_dump(),
            "Register[buffer][0000]\nRegister[mask][1111]"
        );
    }
}
