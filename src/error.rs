//! Error types for stream generation and verification.

use std::{fmt, io};

use thiserror::Error;

use crate::{ByteCount, DataType};

/// Error returned by a [`Generator`](crate::Generator) that cannot produce its next chunk.
pub type GenerateError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias using the crate-level [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures while building or producing a stream.
#[derive(Debug, Error)]
pub enum Error {
    /// The type tag has no generator behind it.
    #[error("data type {0} is not supported")]
    UnsupportedType(DataType),

    /// A type tag that does not name any known data type.
    #[error("unknown data type: {0}")]
    UnknownType(String),

    /// The generator failed; the stream it fed is finished.
    #[error("generator failed: {0}")]
    Generate(#[source] GenerateError),

    /// A read after the generator had already failed.
    #[error("stream aborted by an earlier generator failure")]
    StreamAborted,

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A generator returned no bytes although the stream was not finished.
#[derive(Debug, Error)]
#[error("generator returned an empty chunk at offset {pos}")]
pub struct EmptyChunk {
    /// Stream position the chunk was requested for.
    pub pos: u64,
}

/// I/O errors pass through and generator failures are wrapped as they were returned, so
/// `get_ref` yields the generator's own error.
impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(err) => err,
            Error::Generate(err) => io::Error::new(io::ErrorKind::Other, err),
            other => io::Error::new(io::ErrorKind::Other, other),
        }
    }
}

/// Conditions reported by a [`Consumer`](crate::Consumer).
#[derive(Debug, Error)]
pub enum VerifyError {
    /// A written byte differs from the canonical stream.
    #[error("unexpected byte at {offset}: want: {}, got: {}", Hex(.expected), Hex(.actual))]
    Mismatch {
        /// Absolute position of the first divergent byte, the first byte being 0.
        offset: u64,
        /// Canonical bytes starting at `offset`.
        expected: Vec<u8>,
        /// Written bytes starting at `offset`.
        actual: Vec<u8>,
    },

    /// Bytes were written beyond the declared end of the stream.
    #[error("trailing extra bytes: {}", Hex(.extra))]
    Overflow {
        /// Declared size of the stream.
        expected_len: ByteCount,
        /// Total length written, including the excess.
        written_len: ByteCount,
        /// Part of the offending write that fell inside the stream.
        accepted: Vec<u8>,
        /// Part of the offending write past the end of the stream.
        extra: Vec<u8>,
    },

    /// The consumer was closed before the whole stream was written.
    #[error("not enough bytes: {} short", missing(.expected_len, .written_len))]
    Shortfall {
        /// Declared size of the stream.
        expected_len: ByteCount,
        /// Bytes verified when the consumer was closed.
        written_len: ByteCount,
    },

    /// A write after a mismatch or overflow.
    #[error("verification already failed")]
    Terminated,

    /// A write after the consumer was closed.
    #[error("write after close")]
    Closed,

    /// The generator regenerating the expected content failed.
    #[error("generator failed: {0}")]
    Generate(#[source] GenerateError),

    /// The source being drained failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl VerifyError {
    /// Recovers the verification record carried by an error returned through [`io::Write`].
    pub fn from_io(err: &io::Error) -> Option<&VerifyError> {
        err.get_ref()?.downcast_ref::<VerifyError>()
    }

    /// Number of bytes missing from a [`VerifyError::Shortfall`].
    pub fn missing(&self) -> Option<ByteCount> {
        match self {
            VerifyError::Shortfall {
                expected_len,
                written_len,
            } => Some(missing(expected_len, written_len)),
            _ => None,
        }
    }
}

impl From<VerifyError> for io::Error {
    fn from(err: VerifyError) -> Self {
        match err {
            VerifyError::Io(err) => err,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}

fn missing(expected_len: &ByteCount, written_len: &ByteCount) -> ByteCount {
    expected_len.saturating_sub(*written_len)
}

/// Lowercase hex rendering of a byte window.
struct Hex<'a>(&'a [u8]);

impl fmt::Display for Hex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|byte| write!(f, "{byte:02x}"))
    }
}
