//! Error types for huffpack encode and decode operations.

use thiserror::Error;

/// Result type alias for huffpack operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Everything that can stop an encode or decode. None of these are retried; the
/// operation is abandoned and no partial output is returned.
#[derive(Debug, Error)]
pub enum Error {
    /// The input has zero symbols, so there is nothing to build a tree from.
    #[error("empty input: no symbols to encode")]
    EmptyInput,

    /// The packer finished with a bit count that is not a multiple of 8.
    #[error("padding inconsistency: {bits} packed bits is not a multiple of 8")]
    PaddingConsistency { bits: usize },

    /// The tree (or the code table derived from it) breaks a structural invariant.
    #[error("malformed tree: {0}")]
    MalformedTree(String),

    /// The padding header of a packed stream is outside 1..=8.
    #[error("invalid padding header {0}: must be in range 1-8")]
    InvalidPadding(u8),

    /// The packed stream or container is inconsistent.
    #[error("corrupted data: {0}")]
    CorruptedData(String),

    /// The packed stream or container ended early.
    #[error("unexpected end of data after {bits_read} bits")]
    UnexpectedEof { bits_read: usize },

    /// I/O error from the reader or writer around the core.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a malformed tree error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedTree(message.into())
    }

    /// Create a corrupted data error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Error::CorruptedData(message.into())
    }
}
