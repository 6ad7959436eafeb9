use thiserror::Error;

/// Custom error types for the gfstream library.
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying I/O errors from std::io operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream does not begin with the archive magic bytes.
    #[error("bad magic: expected \"gf\", found {found:?}")]
    BadMagic { found: [u8; 2] },

    /// The stream ended before the requested number of bytes could be read.
    #[error("unexpected end of stream")]
    UnexpectedEof,

    /// The stream stopped accepting bytes before a write could complete.
    #[error("stream cannot accept more bytes")]
    StreamFull,

    /// The operation is not available on this stream type.
    #[error("{operation} is not supported by a {stream}")]
    Unsupported {
        operation: &'static str,
        stream: &'static str,
    },

    /// A tagged-union index was outside the declared alternative range.
    #[error("variant index {index} out of range for {count} alternatives")]
    InvalidVariant { index: u64, count: u64 },

    /// The bytes read do not form a valid value of the expected type.
    #[error("invalid data: {message}")]
    InvalidData { message: String },

    /// The compression engine reported a failure.
    #[error("compression error: {message}")]
    Compression { message: String },
}

impl Error {
    /// Create a new `InvalidData` error with a descriptive message.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create a new `InvalidVariant` error from the decoded index and the
    /// number of alternatives the union declares.
    pub fn invalid_variant(index: u64, count: u64) -> Self {
        Self::InvalidVariant { index, count }
    }

    /// Create a new `Unsupported` error naming the operation and stream type.
    pub fn unsupported(operation: &'static str, stream: &'static str) -> Self {
        Self::Unsupported { operation, stream }
    }

    pub(crate) fn compression(err: impl std::fmt::Display) -> Self {
        Self::Compression {
            message: err.to_string(),
        }
    }
}

/// Result type alias for the library operations.
pub type Result<T> = std::result::Result<T, Error>;
