//! GVAS property trees for palsave.
//!
//! A decoded `.sav` file yields a GVAS payload: Unreal Engine's serialized
//! property format. This crate does not parse GVAS itself. It defines
//!
//! - [`PropertyTree`] / [`Node`] - the in-memory tree a converter produces
//! - [`PropertyPath`] - declarative field paths with node-kind checks
//! - [`TreeConverter`] - the bytes ⇄ tree boundary
//! - [`UesaveConverter`] - a [`TreeConverter`] backed by the `uesave` executable
//!
//! # Example
//!
//! ```no_run
//! use palsave_gvas::{read_tree, NodeKind, PropertyPath, UesaveConverter};
//!
//! const PLAYER_UID: PropertyPath<'static> = PropertyPath::new(
//!     &["root", "properties", "SaveData", "Struct", "value", "Struct",
//!       "PlayerUId", "Struct", "value"],
//!     NodeKind::Guid,
//! );
//!
//! let converter = UesaveConverter::locate("bin")?;
//! let gvas = std::fs::read("player.gvas")?;
//! let tree = read_tree(&converter, &gvas)?;
//! println!("player: {}", tree.guid(&PLAYER_UID)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod converter;
mod error;
mod path;
mod tree;
mod uesave;

pub use converter::{
    read_tree, write_tree, KeyTypeOverride, TreeConverter, GVAS_MAGIC, PALWORLD_KEY_TYPES,
};
pub use error::{Error, Result};
pub use path::PropertyPath;
pub use tree::{MapEntry, Node, NodeKind, PropertyTree};
pub use uesave::{program_name, UesaveConverter};
