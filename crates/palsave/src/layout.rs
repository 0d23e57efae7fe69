//! Save folder layout.

use std::path::{Path, PathBuf};

use palsave_common::PlayerGuid;

use crate::{Error, Result};

/// World save file name.
pub const LEVEL_FILE: &str = "Level.sav";

/// Folder holding one save per player.
pub const PLAYERS_DIR: &str = "Players";

/// Paths inside a dedicated-server or co-op world folder.
///
/// ```text
/// <root>/Level.sav
/// <root>/Players/<32 hex digits>.sav
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveLayout {
    root: PathBuf,
}

impl SaveLayout {
    /// Describe the layout under `root` without touching the file system.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Describe the layout under `root`, which must be an existing directory.
    pub fn open<P: Into<PathBuf>>(root: P) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(Error::NotFound(root));
        }
        Ok(Self { root })
    }

    /// The world folder.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The world save.
    pub fn level(&self) -> PathBuf {
        self.root.join(LEVEL_FILE)
    }

    /// The per-player save folder.
    pub fn players_dir(&self) -> PathBuf {
        self.root.join(PLAYERS_DIR)
    }

    /// The host placeholder's player save.
    pub fn host_player(&self) -> PathBuf {
        self.player(&PlayerGuid::HOST.to_simple_string())
    }

    /// The player save named by `id`, used verbatim as the file stem.
    pub fn player(&self, id: &str) -> PathBuf {
        self.players_dir().join(format!("{}.sav", id))
    }
}

/// Return `path` if it exists, otherwise [`Error::NotFound`].
pub(crate) fn require(path: PathBuf) -> Result<PathBuf> {
    if path.exists() {
        Ok(path)
    } else {
        Err(Error::NotFound(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::testutil::temp_dir;

    #[test]
    fn test_paths() {
        let layout = SaveLayout::new("/saves/world");
        assert_eq!(layout.level(), Path::new("/saves/world/Level.sav"));
        assert_eq!(
            layout.host_player(),
            Path::new("/saves/world/Players/00000000000000000000000000000001.sav")
        );
        assert_eq!(
            layout.player("0123456789ABCDEF0123456789ABCDEF"),
            Path::new("/saves/world/Players/0123456789ABCDEF0123456789ABCDEF.sav")
        );
    }

    #[test]
    fn test_open_missing_folder() {
        let missing = temp_dir("layout_missing").join("nope");
        assert!(matches!(SaveLayout::open(&missing), Err(Error::NotFound(p)) if p == missing));
    }

    #[test]
    fn test_require() {
        let root = temp_dir("layout_require");
        let layout = SaveLayout::open(&root).unwrap();
        assert!(matches!(require(layout.level()), Err(Error::NotFound(_))));

        fs::write(layout.level(), b"").unwrap();
        assert_eq!(require(layout.level()).unwrap(), layout.level());
        fs::remove_dir_all(&root).unwrap();
    }
}
