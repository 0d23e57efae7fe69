//! Error types for GVAS tree handling.

use std::path::PathBuf;

use thiserror::Error;

use crate::tree::NodeKind;

/// Errors that can occur when converting or navigating property trees.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload does not start with the `GVAS` tag.
    #[error("not a valid GVAS payload: expected 'GVAS' tag, got {actual:?}")]
    InvalidMagic { actual: Vec<u8> },

    /// No converter build exists for this operating system.
    #[error("system {0} is not supported")]
    UnsupportedPlatform(String),

    /// The converter process could not be started.
    #[error("failed to run converter {}: {source}", program.display())]
    ConverterSpawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The converter process exited unsuccessfully.
    #[error("converter {} exited with {status}: {stderr}", program.display())]
    ConverterFailed {
        program: PathBuf,
        status: String,
        stderr: String,
    },

    /// The converter produced output that could not be used.
    #[error("malformed converter output: {0}")]
    ConverterOutput(String),

    /// Tree JSON could not be parsed or written.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A node along a property path has the wrong kind.
    #[error("unexpected node at {at} (in {path}): expected {expected}, found {found}")]
    Shape {
        path: String,
        at: String,
        expected: NodeKind,
        found: NodeKind,
    },

    /// A property path names a field that is not present.
    #[error("missing field {field:?} (in {path})")]
    MissingField { path: String, field: String },
}

/// Result type for GVAS tree operations.
pub type Result<T> = std::result::Result<T, Error>;
