//! Error types for palsave-common.

use thiserror::Error;

/// Errors from low-level parsing shared by the palsave crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The buffer ended before a read completed.
    #[error("truncated data: wanted {needed} bytes, {available} left")]
    UnexpectedEof { needed: usize, available: usize },

    /// A fixed tag did not match.
    #[error("bad magic: wanted {expected:?}, found {actual:?}")]
    InvalidMagic { expected: Vec<u8>, actual: Vec<u8> },

    /// A player identity could not be parsed.
    #[error("invalid player GUID: {0}")]
    InvalidGuid(String),
}

pub type Result<T> = std::result::Result<T, Error>;
