//! Conversions between `.sav`, `.gvas` and `.json` files.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use palsave_gvas::{read_tree, write_tree, PropertyTree, TreeConverter};
use palsave_sav::{decode_with_type, encode, write_atomic, SaveType};

use crate::{Error, Result};

/// File formats recognised by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Compressed save container.
    Sav,
    /// Raw GVAS payload.
    Gvas,
    /// Property tree as JSON.
    Json,
}

impl FileKind {
    /// Classify `path` by its extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "sav" => Some(Self::Sav),
            "gvas" => Some(Self::Gvas),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sav => write!(f, "sav"),
            Self::Gvas => write!(f, "gvas"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Outcome of [`convert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub from: FileKind,
    pub to: FileKind,
    /// Layering of the `.sav` side, if there was one.
    pub save_type: Option<SaveType>,
    pub bytes_written: usize,
}

/// Unwrap a save container into its GVAS payload.
pub fn sav_to_gvas(sav: &[u8]) -> Result<Vec<u8>> {
    Ok(palsave_sav::decode(sav)?)
}

/// Wrap a GVAS payload in a save container.
pub fn gvas_to_sav(gvas: &[u8], save_type: SaveType) -> Result<Vec<u8>> {
    Ok(encode(gvas, save_type)?)
}

/// Render a GVAS payload as pretty-printed JSON.
pub fn gvas_to_json<C: TreeConverter + ?Sized>(converter: &C, gvas: &[u8]) -> Result<String> {
    let tree = read_tree(converter, gvas)?;
    Ok(tree.to_json_pretty()?)
}

/// Rebuild a GVAS payload from JSON.
pub fn json_to_gvas<C: TreeConverter + ?Sized>(converter: &C, json: &[u8]) -> Result<Vec<u8>> {
    let tree = PropertyTree::from_json_slice(json)?;
    Ok(write_tree(converter, &tree)?)
}

/// Layering for a `.sav` written to `output`.
///
/// World saves (any file name containing `Level`) are double compressed,
/// everything else is single.
pub fn save_type_for(output: &Path) -> SaveType {
    let is_level = output
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.contains("Level"));
    if is_level {
        SaveType::Double
    } else {
        SaveType::Single
    }
}

/// Convert `input` to `output`, choosing the direction from their extensions.
///
/// `mode` overrides [`save_type_for`] when writing a `.sav`. `converter` is only
/// called for directions that involve JSON, so `.sav` and `.gvas` conversions
/// work without one.
pub fn convert<C, F>(
    input: &Path,
    output: &Path,
    mode: Option<SaveType>,
    converter: F,
) -> Result<Conversion>
where
    C: TreeConverter,
    F: FnOnce() -> palsave_gvas::Result<C>,
{
    let unsupported = || Error::UnsupportedConversion {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
    };
    let from = FileKind::from_path(input).ok_or_else(unsupported)?;
    let to = FileKind::from_path(output).ok_or_else(unsupported)?;
    if from == to {
        return Err(unsupported());
    }

    let data = read_input(input)?;
    log::info!("Converting {} ({}) to {} ({})", input.display(), from, output.display(), to);

    let target = mode.unwrap_or_else(|| save_type_for(output));
    // Each direction calls `converter` at most once.
    let (bytes, save_type) = match (from, to) {
        (FileKind::Sav, FileKind::Gvas) => {
            let (gvas, detected) = decode_with_type(&data)?;
            (gvas, Some(detected))
        }
        (FileKind::Sav, FileKind::Json) => {
            let (gvas, detected) = decode_with_type(&data)?;
            let json = gvas_to_json(&converter()?, &gvas)?;
            (json.into_bytes(), Some(detected))
        }
        (FileKind::Gvas, FileKind::Sav) => (gvas_to_sav(&data, target)?, Some(target)),
        (FileKind::Json, FileKind::Sav) => {
            let gvas = json_to_gvas(&converter()?, &data)?;
            (gvas_to_sav(&gvas, target)?, Some(target))
        }
        (FileKind::Gvas, FileKind::Json) => {
            (gvas_to_json(&converter()?, &data)?.into_bytes(), None)
        }
        (FileKind::Json, FileKind::Gvas) => (json_to_gvas(&converter()?, &data)?, None),
        (FileKind::Sav, FileKind::Sav)
        | (FileKind::Gvas, FileKind::Gvas)
        | (FileKind::Json, FileKind::Json) => return Err(unsupported()),
    };

    write_atomic(output, &bytes)?;
    log::info!("Wrote {} bytes to {}", bytes.len(), output.display());

    Ok(Conversion {
        from,
        to,
        save_type,
        bytes_written: bytes.len(),
    })
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::NotFound(PathBuf::from(path)),
        _ => Error::Io(e),
    })
}
