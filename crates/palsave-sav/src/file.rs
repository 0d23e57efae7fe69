//! Save container encoding and decoding.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use zerocopy::IntoBytes;

use crate::compress::{deflate, inflate};
use crate::header::{SaveHeader, SaveType, HEADER_SIZE};
use crate::{Error, Result};

/// Decode a container into its GVAS payload.
///
/// The header's `compressed_len` must match the payload exactly and the first
/// inflate must produce `uncompressed_len` bytes. In [`SaveType::Double`] the
/// second layer's size is not recorded anywhere and is not checked.
pub fn decode(data: &[u8]) -> Result<Vec<u8>> {
    decode_with_type(data).map(|(payload, _)| payload)
}

/// Decode a container, also returning the detected save type.
pub fn decode_with_type(data: &[u8]) -> Result<(Vec<u8>, SaveType)> {
    let (header, save_type) = SaveHeader::parse(data)?;

    let body = &data[HEADER_SIZE..];
    if body.len() != header.compressed_len() {
        return Err(Error::CompressedSizeMismatch {
            expected: header.compressed_len(),
            actual: body.len(),
        });
    }

    let inflated = inflate(body, header.uncompressed_len())?;
    if inflated.len() != header.uncompressed_len() {
        return Err(Error::SizeMismatch {
            expected: header.uncompressed_len(),
            actual: inflated.len(),
        });
    }

    let payload = match save_type {
        SaveType::Single => inflated,
        SaveType::Double => inflate(&inflated, inflated.len() * 2)?,
    };

    log::debug!(
        "decoded {} save: {} -> {} bytes",
        save_type,
        data.len(),
        payload.len()
    );

    Ok((payload, save_type))
}

/// Encode a GVAS payload into a container.
///
/// For [`SaveType::Double`] the header's `uncompressed_len` records the size of
/// the once-compressed blob, matching what the game writes.
pub fn encode(payload: &[u8], save_type: SaveType) -> Result<Vec<u8>> {
    let once = deflate(payload)?;
    let (uncompressed_len, compressed) = match save_type {
        SaveType::Single => (payload.len(), once),
        SaveType::Double => {
            let twice = deflate(&once)?;
            (once.len(), twice)
        }
    };

    let header = SaveHeader::new(
        header_len(uncompressed_len)?,
        header_len(compressed.len())?,
        save_type,
    );

    let mut output = Vec::with_capacity(HEADER_SIZE + compressed.len());
    output.extend_from_slice(header.as_bytes());
    output.extend_from_slice(&compressed);

    log::debug!(
        "encoded {} save: {} -> {} bytes",
        save_type,
        payload.len(),
        output.len()
    );

    Ok(output)
}

fn header_len(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::TooLarge(len))
}

/// A decoded save file: the GVAS payload and the layering it was stored with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavFile {
    /// The decompressed GVAS payload.
    data: Vec<u8>,
    /// How many zlib layers wrap the payload on disk.
    save_type: SaveType,
}

impl SavFile {
    /// Create a new save from a GVAS payload.
    pub fn new(data: Vec<u8>, save_type: SaveType) -> Self {
        Self { data, save_type }
    }

    /// Get the GVAS payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the save type.
    pub fn save_type(&self) -> SaveType {
        self.save_type
    }

    /// Parse a container from bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let (data, save_type) = decode_with_type(data)?;
        Ok(Self { data, save_type })
    }

    /// Read a container from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
            _ => Error::Io(e),
        })?;
        Self::parse(&bytes)
    }

    /// Encode to container bytes.
    pub fn to_sav_bytes(&self) -> Result<Vec<u8>> {
        encode(&self.data, self.save_type)
    }

    /// Encode and write to disk, replacing any existing file.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_sav_bytes()?;
        write_atomic(path.as_ref(), &bytes)?;
        Ok(())
    }
}

/// Write `bytes` to a sibling temp file, then rename it over `path`.
///
/// A crash mid-write leaves either the old file or the new one, never a
/// truncated container.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = temp_path(path);
    let result = (|| {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
