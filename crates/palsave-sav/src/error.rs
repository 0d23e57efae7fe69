//! Error types for the save container codec.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading or writing `.sav` containers.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] palsave_common::Error),

    /// Input file does not exist.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Buffer too short to hold the container header.
    #[error("not a valid save file: {0} bytes is shorter than the 12-byte header")]
    TooShort(usize),

    /// Header tag is not `PlZ`.
    #[error("not a valid save file: expected 'PlZ' tag, got {actual:?}")]
    InvalidMagic { actual: [u8; 3] },

    /// Unrecognized compression mode discriminant.
    #[error("not a valid save file: unknown save type {0:#04x}")]
    UnknownSaveType(u8),

    /// Header compressed length disagrees with the payload size.
    #[error("compressed size mismatch: header says {expected}, payload is {actual} bytes")]
    CompressedSizeMismatch { expected: usize, actual: usize },

    /// Inflated size disagrees with the header.
    #[error("decompressed size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// A length does not fit in the 32-bit header field.
    #[error("data too large for save header: {0} bytes")]
    TooLarge(usize),

    /// Decompression error.
    #[error("decompression error: {0}")]
    Decompression(String),

    /// Compression error.
    #[error("compression error: {0}")]
    Compression(String),
}

impl Error {
    /// Whether this error means the bytes are not a well-formed container.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Error::TooShort(_)
                | Error::InvalidMagic { .. }
                | Error::UnknownSaveType(_)
                | Error::CompressedSizeMismatch { .. }
                | Error::SizeMismatch { .. }
                | Error::Decompression(_)
        )
    }
}

/// Result type for save container operations.
pub type Result<T> = std::result::Result<T, Error>;
