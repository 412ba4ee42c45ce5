use thiserror::Error;

/// Errors returned by processor operations.
///
/// Both variants are caller mistakes. They are reported before any memory
/// cell or register is touched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProcessorError {
    /// Word address outside `[0, N)`.
    #[error("address 0x{address:X} out of range for {size}-word memory")]
    AddressOutOfRange {
        /// The rejected address.
        address: usize,
        /// Number of words in memory.
        size: usize,
    },

    /// Words are too narrow for the masked-sum field layout.
    #[error("masked sum needs {required}-bit words, memory has {size}-bit words")]
    WordTooNarrow {
        /// Width the field layout needs.
        required: usize,
        /// Actual word width.
        size: usize,
    },
}
