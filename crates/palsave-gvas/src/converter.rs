//! The boundary between GVAS payload bytes and property trees.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use palsave_common::BinaryReader;

use crate::tree::PropertyTree;
use crate::{Error, Result};

/// Tag at the start of every GVAS payload.
pub const GVAS_MAGIC: &[u8; 4] = b"GVAS";

/// Converts GVAS payload bytes to property trees and back.
///
/// Implementations must be deterministic: `from_tree(to_tree(p))` reproduces
/// `p` for any payload they accept.
pub trait TreeConverter {
    /// Decode a GVAS payload into a tree.
    fn to_tree(&self, gvas: &[u8]) -> Result<PropertyTree>;

    /// Encode a tree back into GVAS payload bytes.
    fn from_tree(&self, tree: &PropertyTree) -> Result<Vec<u8>>;
}

impl<T: TreeConverter + ?Sized> TreeConverter for &T {
    fn to_tree(&self, gvas: &[u8]) -> Result<PropertyTree> {
        (**self).to_tree(gvas)
    }

    fn from_tree(&self, tree: &PropertyTree) -> Result<Vec<u8>> {
        (**self).from_tree(tree)
    }
}

impl<T: TreeConverter + ?Sized> TreeConverter for Box<T> {
    fn to_tree(&self, gvas: &[u8]) -> Result<PropertyTree> {
        (**self).to_tree(gvas)
    }

    fn from_tree(&self, tree: &PropertyTree) -> Result<Vec<u8>> {
        (**self).from_tree(tree)
    }
}

/// Check the `GVAS` tag, then decode through `converter`.
pub fn read_tree<C: TreeConverter + ?Sized>(converter: &C, gvas: &[u8]) -> Result<PropertyTree> {
    check_magic(gvas)?;
    converter.to_tree(gvas)
}

/// Encode through `converter` and check the result carries the `GVAS` tag.
pub fn write_tree<C: TreeConverter + ?Sized>(converter: &C, tree: &PropertyTree) -> Result<Vec<u8>> {
    let gvas = converter.from_tree(tree)?;
    check_magic(&gvas).map_err(|_| {
        Error::ConverterOutput(format!(
            "converter returned {} bytes without a GVAS tag",
            gvas.len()
        ))
    })?;
    Ok(gvas)
}

fn check_magic(gvas: &[u8]) -> Result<()> {
    BinaryReader::new(gvas)
        .expect_magic(GVAS_MAGIC)
        .map_err(|_| Error::InvalidMagic {
            actual: gvas[..gvas.len().min(GVAS_MAGIC.len())].to_vec(),
        })
}

/// Forces the key type of a map whose key schema the converter cannot infer.
///
/// Rendered in the converter's `--type` syntax: `<path>.Key=<type>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTypeOverride {
    path: Cow<'static, str>,
    key_type: Cow<'static, str>,
}

impl KeyTypeOverride {
    /// Override the map at `path` to use struct keys.
    pub const fn struct_key(path: &'static str) -> Self {
        Self {
            path: Cow::Borrowed(path),
            key_type: Cow::Borrowed("Struct"),
        }
    }

    /// Override the map at `path` to use `key_type` keys.
    pub fn new(path: impl Into<String>, key_type: impl Into<String>) -> Self {
        Self {
            path: Cow::Owned(path.into()),
            key_type: Cow::Owned(key_type.into()),
        }
    }

    /// Dotted property path of the map, starting with `.`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Key type name.
    pub fn key_type(&self) -> &str {
        &self.key_type
    }
}

impl fmt::Display for KeyTypeOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.Key={}", self.path, self.key_type)
    }
}

impl FromStr for KeyTypeOverride {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.rsplit_once(".Key=") {
            Some((path, key_type)) if !path.is_empty() && !key_type.is_empty() => {
                Ok(Self::new(path, key_type))
            }
            _ => Err(format!("expected <path>.Key=<type>, got {:?}", s)),
        }
    }
}

/// Maps in Palworld world saves whose keys are structs.
pub const PALWORLD_KEY_TYPES: [KeyTypeOverride; 6] = [
    KeyTypeOverride::struct_key(".worldSaveData.CharacterSaveParameterMap"),
    KeyTypeOverride::struct_key(".worldSaveData.FoliageGridSaveDataMap"),
    KeyTypeOverride::struct_key(".worldSaveData.FoliageGridSaveDataMap.ModelMap.InstanceDataMap"),
    KeyTypeOverride::struct_key(".worldSaveData.MapObjectSpawnerInStageSaveData"),
    KeyTypeOverride::struct_key(".worldSaveData.ItemContainerSaveData"),
    KeyTypeOverride::struct_key(".worldSaveData.CharacterContainerSaveData"),
];

#[cfg(test)]
mod tests {
    use super::*;

    /// Stores trees as the `GVAS` tag followed by JSON.
    struct EmbeddedJson;

    impl TreeConverter for EmbeddedJson {
        fn to_tree(&self, gvas: &[u8]) -> Result<PropertyTree> {
            PropertyTree::from_json_slice(&gvas[4..])
        }

        fn from_tree(&self, tree: &PropertyTree) -> Result<Vec<u8>> {
            let mut out = GVAS_MAGIC.to_vec();
            out.extend_from_slice(tree.to_json_string()?.as_bytes());
            Ok(out)
        }
    }

    struct Untagged;

    impl TreeConverter for Untagged {
        fn to_tree(&self, _gvas: &[u8]) -> Result<PropertyTree> {
            unreachable!()
        }

        fn from_tree(&self, tree: &PropertyTree) -> Result<Vec<u8>> {
            Ok(tree.to_json_string()?.into_bytes())
        }
    }

    #[test]
    fn test_read_write_tree() {
        let payload = b"GVAS{\"a\":1}";
        let tree = read_tree(&EmbeddedJson, payload).unwrap();
        assert_eq!(write_tree(&EmbeddedJson, &tree).unwrap(), payload);
    }

    #[test]
    fn test_read_tree_rejects_untagged_payload() {
        for payload in [&b"GVA"[..], &b""[..], &b"XVAS{}"[..]] {
            assert!(matches!(
                read_tree(&EmbeddedJson, payload),
                Err(Error::InvalidMagic { .. })
            ));
        }
    }

    #[test]
    fn test_write_tree_rejects_untagged_output() {
        let tree = PropertyTree::from_json_str("{}").unwrap();
        assert!(matches!(
            write_tree(&Untagged, &tree),
            Err(Error::ConverterOutput(_))
        ));
    }

    #[test]
    fn test_dyn_converter() {
        let boxed: Box<dyn TreeConverter> = Box::new(EmbeddedJson);
        assert!(read_tree(&boxed, b"GVAS{}").is_ok());
        assert!(read_tree(boxed.as_ref(), b"GVAS{}").is_ok());
    }

    #[test]
    fn test_key_type_rendering() {
        assert_eq!(
            PALWORLD_KEY_TYPES[0].to_string(),
            ".worldSaveData.CharacterSaveParameterMap.Key=Struct"
        );
        assert!(PALWORLD_KEY_TYPES.iter().all(|k| k.key_type() == "Struct"));
    }

    #[test]
    fn test_key_type_parse() {
        let parsed: KeyTypeOverride = ".worldSaveData.GroupSaveDataMap.Key=Guid".parse().unwrap();
        assert_eq!(parsed.path(), ".worldSaveData.GroupSaveDataMap");
        assert_eq!(parsed.key_type(), "Guid");
        assert_eq!(parsed, KeyTypeOverride::new(".worldSaveData.GroupSaveDataMap", "Guid"));

        assert!("no-key-marker".parse::<KeyTypeOverride>().is_err());
        assert!(".a.Key=".parse::<KeyTypeOverride>().is_err());
    }
}
