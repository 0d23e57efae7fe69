//! Save container header and save-type detection.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use palsave_common::BinaryReader;
use zerocopy::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{Error, Result};

/// Size of the fixed header in bytes.
pub const HEADER_SIZE: usize = 12;

/// Tag at bytes 8..11 of every save container.
pub const SAVE_MAGIC: &[u8; 3] = b"PlZ";

/// Number of zlib layers wrapping the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaveType {
    /// One zlib layer (player saves).
    Single,
    /// Two nested zlib layers (world saves).
    Double,
}

impl SaveType {
    /// Map the on-disk discriminant to a save type.
    pub fn from_byte(value: u8) -> Result<Self> {
        match value {
            0x31 => Ok(Self::Single),
            0x32 => Ok(Self::Double),
            other => Err(Error::UnknownSaveType(other)),
        }
    }

    /// The on-disk discriminant (`'1'` or `'2'`).
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::Single => 0x31,
            Self::Double => 0x32,
        }
    }

    /// Detect the save type from the header of a container buffer.
    pub fn detect(data: &[u8]) -> Result<Self> {
        SaveHeader::parse(data).map(|(_, save_type)| save_type)
    }

    /// Read a file and detect its save type.
    pub fn detect_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
            _ => Error::Io(e),
        })?;
        Self::detect(&data)
    }
}

impl fmt::Display for SaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => f.write_str("single"),
            Self::Double => f.write_str("double"),
        }
    }
}

/// The 12-byte header preceding the compressed payload.
///
/// For [`SaveType::Double`] `uncompressed_len` holds the size of the
/// intermediate once-compressed blob, not the size of the final payload.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct SaveHeader {
    /// Size after the first inflate.
    pub uncompressed_len: U32,
    /// Size of the payload following the header.
    pub compressed_len: U32,
    /// Always `PlZ`.
    pub magic: [u8; 3],
    /// Save type discriminant.
    pub save_type: u8,
}

impl SaveHeader {
    /// Build a header for the given lengths and save type.
    pub fn new(uncompressed_len: u32, compressed_len: u32, save_type: SaveType) -> Self {
        Self {
            uncompressed_len: U32::new(uncompressed_len),
            compressed_len: U32::new(compressed_len),
            magic: *SAVE_MAGIC,
            save_type: save_type.as_byte(),
        }
    }

    /// Parse and validate the header at the start of `data`.
    pub fn parse(data: &[u8]) -> Result<(Self, SaveType)> {
        if data.len() < HEADER_SIZE {
            return Err(Error::TooShort(data.len()));
        }

        let header: SaveHeader = BinaryReader::new(data).read_struct()?;
        if &header.magic != SAVE_MAGIC {
            return Err(Error::InvalidMagic {
                actual: header.magic,
            });
        }

        let save_type = SaveType::from_byte(header.save_type)?;
        Ok((header, save_type))
    }

    /// Size after the first inflate, as recorded in the header.
    #[inline]
    pub fn uncompressed_len(&self) -> usize {
        self.uncompressed_len.get() as usize
    }

    /// Size of the compressed payload, as recorded in the header.
    #[inline]
    pub fn compressed_len(&self) -> usize {
        self.compressed_len.get() as usize
    }
}
