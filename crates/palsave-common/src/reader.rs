//! Cursor over a borrowed byte slice.

use zerocopy::FromBytes;

use crate::{Error, Result};

/// Reads fixed-layout headers and tags off the front of a byte slice.
///
/// Slices returned by [`take`](Self::take) borrow from the input; only
/// `FromBytes` structs, which are small by construction, are copied.
///
/// ```
/// use palsave_common::BinaryReader;
///
/// let mut reader = BinaryReader::new(b"GVAS\x03\x00\x00\x00rest");
/// reader.expect_magic(b"GVAS").unwrap();
/// assert_eq!(reader.take(4).unwrap(), b"\x03\x00\x00\x00");
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> BinaryReader<'a> {
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Consume `count` bytes.
    pub fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        let available = self.data.len() - self.offset;
        if count > available {
            return Err(Error::UnexpectedEof {
                needed: count,
                available,
            });
        }
        let start = self.offset;
        self.offset += count;
        Ok(&self.data[start..self.offset])
    }

    /// Consume a fixed-layout struct.
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let bytes = self.take(size)?;
        T::read_from_bytes(bytes).map_err(|_| Error::UnexpectedEof {
            needed: size,
            available: bytes.len(),
        })
    }

    /// Consume `expected.len()` bytes and require them to equal `expected`.
    pub fn expect_magic(&mut self, expected: &[u8]) -> Result<()> {
        let actual = self.take(expected.len())?;
        if actual == expected {
            Ok(())
        } else {
            Err(Error::InvalidMagic {
                expected: expected.to_vec(),
                actual: actual.to_vec(),
            })
        }
    }
}
