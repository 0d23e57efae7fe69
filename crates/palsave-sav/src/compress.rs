//! zlib helpers for the container layers.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::{Error, Result};

/// Inflate one zlib layer.
///
/// `size_hint` only pre-sizes the output buffer; the caller checks the
/// resulting length against the header.
pub fn inflate(data: &[u8], size_hint: usize) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(size_hint);
    ZlibDecoder::new(data)
        .read_to_end(&mut output)
        .map_err(|e| Error::Decompression(e.to_string()))?;
    Ok(output)
}

/// Deflate one zlib layer at the default level.
pub fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| Error::Compression(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| Error::Compression(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zlib_roundtrip() {
        let original = b"Hello, World! This is a test of zlib compression.";

        let compressed = deflate(original).unwrap();
        // zlib stream header for the default level
        assert_eq!(&compressed[..2], &[0x78, 0x9C]);

        let decompressed = inflate(&compressed, original.len()).unwrap();
        assert_eq!(decompressed, original);
    }

    #[test]
    fn test_inflate_garbage() {
        let err = inflate(b"definitely not zlib", 0).unwrap_err();
        assert!(matches!(err, Error::Decompression(_)));
    }
}
