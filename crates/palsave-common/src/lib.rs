//! Common utilities for palsave.
//!
//! This crate provides foundational types used across all palsave crates:
//!
//! - [`BinaryReader`] - Zero-copy binary reading from byte slices
//! - [`PlayerGuid`] - Player identity as stored in save files and file names
//! - [`Error`] - Shared error type

mod error;
mod guid;
mod reader;

pub use error::{Error, Result};
pub use guid::PlayerGuid;
pub use reader::BinaryReader;
