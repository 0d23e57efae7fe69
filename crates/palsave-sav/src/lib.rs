//! Palworld `.sav` container codec.
//!
//! Save files wrap a GVAS payload in a small framing header and one or two
//! zlib layers. This crate detects the layering, validates the header lengths,
//! and converts between container bytes and the raw GVAS payload.
//!
//! # File Format
//!
//! - 4 bytes: Uncompressed length (u32 LE)
//! - 4 bytes: Compressed length (u32 LE), always the size of the remaining bytes
//! - 3 bytes: Tag `PlZ`
//! - 1 byte: Save type, `0x31` (one zlib layer) or `0x32` (two zlib layers)
//! - N bytes: zlib stream
//!
//! For double-layered saves the uncompressed length describes the
//! intermediate once-compressed blob; the final payload size is not stored.
//!
//! # Example
//!
//! ```no_run
//! use palsave_sav::{SavFile, SaveType};
//!
//! let save = SavFile::open("Players/00000000000000000000000000000001.sav")?;
//! println!("{} save, {} byte payload", save.save_type(), save.data().len());
//!
//! let world = SavFile::new(save.data().to_vec(), SaveType::Double);
//! world.write("copy.sav")?;
//! # Ok::<(), palsave_sav::Error>(())
//! ```

mod compress;
mod error;
mod file;
mod header;

pub use compress::{deflate, inflate};
pub use error::{Error, Result};
pub use file::{decode, decode_with_type, encode, write_atomic, SavFile};
pub use header::{SaveHeader, SaveType, HEADER_SIZE, SAVE_MAGIC};
