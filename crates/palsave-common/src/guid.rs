//! Player GUID type.
//!
//! Player identities appear in two textual forms: the 32-digit "simple" form
//! used for file names in the `Players` folder, and the hyphenated
//! `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx` form stored inside save properties.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// A 16-byte player identity.
///
/// Bytes are kept in the order they are written in text, so the simple and
/// hyphenated renderings are plain hex dumps of the same 16 bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerGuid {
    bytes: [u8; 16],
}

impl PlayerGuid {
    /// Identity of the host placeholder slot (`00000000000000000000000000000001`).
    pub const HOST: Self = Self {
        bytes: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    };

    /// Check if this is the host placeholder identity.
    #[inline]
    pub fn is_host(&self) -> bool {
        *self == Self::HOST
    }

    /// Parse the 32-digit form without hyphens, as used in player file names.
    pub fn parse_simple(s: &str) -> Result<Self, Error> {
        if s.len() != 32 || !s.is_ascii() {
            return Err(Error::InvalidGuid(format!(
                "expected 32 hex digits, got {:?}",
                s
            )));
        }

        let mut bytes = [0u8; 16];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let pair = &s[i * 2..i * 2 + 2];
            *byte = u8::from_str_radix(pair, 16).map_err(|_| {
                Error::InvalidGuid(format!("invalid hex at position {}", i * 2))
            })?;
        }

        Ok(Self { bytes })
    }

    /// Render the 32-digit uppercase form used by the game for file names.
    pub fn to_simple_string(&self) -> String {
        self.bytes.iter().map(|b| format!("{:02X}", b)).collect()
    }
}

impl fmt::Debug for PlayerGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlayerGuid({})", self)
    }
}

impl fmt::Display for PlayerGuid {
    /// Canonical hyphenated lowercase form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.bytes.iter().enumerate() {
            if matches!(i, 4 | 6 | 8 | 10) {
                f.write_str("-")?;
            }
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl FromStr for PlayerGuid {
    type Err = Error;

    /// Accepts either the simple 32-digit form or the hyphenated 36-character form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.len() {
            32 => Self::parse_simple(s),
            36 => {
                let b = s.as_bytes();
                if b[8] != b'-' || b[13] != b'-' || b[18] != b'-' || b[23] != b'-' {
                    return Err(Error::InvalidGuid("invalid hyphen positions".into()));
                }
                let simple: String = s.chars().filter(|&c| c != '-').collect();
                Self::parse_simple(&simple)
            }
            n => Err(Error::InvalidGuid(format!(
                "expected 32 or 36 characters, got {}",
                n
            ))),
        }
    }
}
