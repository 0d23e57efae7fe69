//! Error types for the palsave facade.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from save folder operations and file conversions.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] palsave_common::Error),

    /// Save container error.
    #[error("{0}")]
    Sav(#[from] palsave_sav::Error),

    /// Property tree or converter error.
    #[error("{0}")]
    Gvas(#[from] palsave_gvas::Error),

    /// A required file or folder does not exist.
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),

    /// The target identity is the host placeholder itself.
    #[error("target identity {0} is the host placeholder")]
    HostTarget(String),

    /// No conversion exists between the two file types.
    #[error("cannot convert {} to {}", input.display(), output.display())]
    UnsupportedConversion { input: PathBuf, output: PathBuf },
}

/// Result type for palsave operations.
pub type Result<T> = std::result::Result<T, Error>;
