//! Error types shared by every codec in the crate.

use thiserror::Error;

/// Error variants for encode and decode operations.
///
/// Every error is terminal for the invocation that produced it: nothing is
/// retried, and partial output already written to the sink stays written.
#[derive(Debug, Error)]
pub enum Error {
    /// The input ended inside a header, a frequency entry, a run-length
    /// record, or before the end-of-stream symbol was decoded.
    #[error("truncated stream: {0}")]
    Truncated(&'static str),

    /// The first four bytes of the input do not match the expected tag.
    #[error("bad magic: expected {expected:?}, got {actual:?}")]
    BadMagic {
        /// The tag the decoder was looking for.
        expected: [u8; 4],
        /// The tag actually present in the input.
        actual: [u8; 4],
    },

    /// The header parsed but carries values no encoder produces.
    #[error("bad header: {0}")]
    BadHeader(&'static str),

    /// The payload cannot be the product of the matching encoder.
    #[error("corrupt stream: {0}")]
    Corrupt(&'static str),

    /// Writing to the output sink failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for codec operations.
pub type Result<T> = std::result::Result<T, Error>;
