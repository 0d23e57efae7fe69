//! Palsave - Palworld save file tooling.
//!
//! This crate ties the palsave crates together and adds the operations that
//! work on whole save folders.
//!
//! # Crates
//!
//! - [`palsave_common`] - Common utilities (binary reading, player GUIDs)
//! - [`palsave_sav`] - `.sav` container encoding and decoding (zlib, `PlZ` header)
//! - [`palsave_gvas`] - GVAS property trees and the `uesave` converter
//!
//! # Example
//!
//! ```no_run
//! use palsave::prelude::*;
//!
//! // Move the co-op host's progress onto their dedicated-server identity
//! let converter = UesaveConverter::locate("bin")?;
//! let report = HostFix::new(&converter)
//!     .backup(true)
//!     .run("SaveGames/0/ABCDEF", "0123456789ABCDEF0123456789ABCDEF")?;
//! println!("host is now {}", report.guid);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod convert;
mod error;
mod layout;
mod rebind;

#[cfg(test)]
mod testutil;

// Re-export all sub-crates
pub use palsave_common as common;
pub use palsave_gvas as gvas;
pub use palsave_sav as sav;

pub use convert::{
    convert, gvas_to_json, gvas_to_sav, json_to_gvas, sav_to_gvas, save_type_for, Conversion,
    FileKind,
};
pub use error::{Error, Result};
pub use layout::{SaveLayout, LEVEL_FILE, PLAYERS_DIR};
pub use rebind::{fix_host, rebind_character, HostFix, RebindReport};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{convert, fix_host, FileKind, HostFix, RebindReport, SaveLayout};
    pub use palsave_common::{BinaryReader, PlayerGuid};
    pub use palsave_gvas::{
        read_tree, write_tree, Node, NodeKind, PropertyPath, PropertyTree, TreeConverter,
        UesaveConverter,
    };
    pub use palsave_sav::{SavFile, SaveHeader, SaveType};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
