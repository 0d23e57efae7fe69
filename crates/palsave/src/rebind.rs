//! Host identity migration.
//!
//! In a co-op world the hosting player is saved under the placeholder identity
//! `00000000000000000000000000000001`. When the world moves to a dedicated
//! server the host joins with their real identity and gets a fresh character.
//! [`HostFix`] moves the placeholder's progress onto that real identity:
//!
//! 1. The placeholder save is rewritten with the new identity and stored as
//!    the target player's save.
//! 2. The world's character entry linked to the placeholder (by instance id)
//!    gets the new identity too.
//! 3. The placeholder save is removed.
//!
//! Only one placeholder exists per world; this module does not handle worlds
//! with several hosts.
//!
//! Nothing here is transactional. Files written before a failure stay written,
//! so callers should keep backups (see [`HostFix::backup`]).

use std::fs;
use std::path::{Path, PathBuf};

use palsave_common::PlayerGuid;
use palsave_gvas::{read_tree, write_tree, NodeKind, PropertyPath, PropertyTree, TreeConverter};
use palsave_sav::{SavFile, SaveType};

use crate::layout::{require, SaveLayout};
use crate::{Error, Result};

const PLAYER_UID: PropertyPath<'static> = PropertyPath::new(
    &[
        "root", "properties", "SaveData", "Struct", "value", "Struct",
        "PlayerUId", "Struct", "value",
    ],
    NodeKind::Guid,
);

const INDIVIDUAL_PLAYER_UID: PropertyPath<'static> = PropertyPath::new(
    &[
        "root", "properties", "SaveData", "Struct", "value", "Struct",
        "IndividualId", "Struct", "value", "Struct",
        "PlayerUId", "Struct", "value",
    ],
    NodeKind::Guid,
);

const INDIVIDUAL_INSTANCE_ID: PropertyPath<'static> = PropertyPath::new(
    &[
        "root", "properties", "SaveData", "Struct", "value", "Struct",
        "IndividualId", "Struct", "value", "Struct",
        "InstanceId", "Struct", "value",
    ],
    NodeKind::Guid,
);

const CHARACTER_MAP: PropertyPath<'static> = PropertyPath::new(
    &[
        "root", "properties", "worldSaveData", "Struct", "value", "Struct",
        "CharacterSaveParameterMap", "Map", "value",
    ],
    NodeKind::Map,
);

// Relative to a character map entry key.
const KEY_INSTANCE_ID: PropertyPath<'static> = PropertyPath::new(
    &["Struct", "Struct", "InstanceId", "Struct", "value"],
    NodeKind::Guid,
);

const KEY_PLAYER_UID: PropertyPath<'static> = PropertyPath::new(
    &["Struct", "Struct", "PlayerUId", "Struct", "value"],
    NodeKind::Guid,
);

/// What a host migration changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebindReport {
    /// The identity the host now has.
    pub guid: PlayerGuid,
    /// Instance id of the host's character, read from the placeholder save.
    pub instance_id: String,
    /// Whether a world character entry carried that instance id.
    pub world_entry_updated: bool,
}

/// Moves the host placeholder's progress onto a real player identity.
pub struct HostFix<'c, C: TreeConverter + ?Sized> {
    converter: &'c C,
    backup: bool,
}

impl<'c, C: TreeConverter + ?Sized> HostFix<'c, C> {
    /// Create a migration that converts trees with `converter`.
    pub fn new(converter: &'c C) -> Self {
        Self {
            converter,
            backup: false,
        }
    }

    /// Copy each affected file to `<name>.bak` before changing anything.
    pub fn backup(mut self, enabled: bool) -> Self {
        self.backup = enabled;
        self
    }

    /// Migrate the host in `save_dir` to `identity` (32 hex digits).
    ///
    /// The identity is used verbatim to find the target player's save and is
    /// written into the saves in canonical hyphenated lowercase form. All
    /// inputs are checked before any file is modified.
    pub fn run<P: AsRef<Path>>(&self, save_dir: P, identity: &str) -> Result<RebindReport> {
        let layout = SaveLayout::open(save_dir.as_ref())?;
        let guid = PlayerGuid::parse_simple(identity)?;
        if guid.is_host() {
            return Err(Error::HostTarget(identity.to_string()));
        }

        let level = require(layout.level())?;
        let host = require(layout.host_player())?;
        let target = require(layout.player(identity))?;

        if self.backup {
            for path in [&level, &host, &target] {
                backup_file(path)?;
            }
        }

        let canonical = guid.to_string();

        log::info!("Fixing GUID of {}...", host.display());
        let mut host_tree = self.read(&host)?;
        host_tree.set_guid(&PLAYER_UID, &canonical)?;
        host_tree.set_guid(&INDIVIDUAL_PLAYER_UID, &canonical)?;
        let instance_id = host_tree.guid(&INDIVIDUAL_INSTANCE_ID)?.to_string();
        self.write(&host_tree, SaveType::Single, &target)?;
        drop(host_tree);
        log::info!("Wrote host data to {}", target.display());

        log::info!("Fixing {}...", level.display());
        let mut world = self.read(&level)?;
        let world_entry_updated = rebind_character(&mut world, &instance_id, &canonical)?;
        if !world_entry_updated {
            log::warn!(
                "no character in {} has instance id {}; world left unchanged",
                level.display(),
                instance_id
            );
        }
        self.write(&world, SaveType::Double, &level)?;

        fs::remove_file(&host)?;
        log::info!("Removed {}", host.display());

        Ok(RebindReport {
            guid,
            instance_id,
            world_entry_updated,
        })
    }

    fn read(&self, path: &Path) -> Result<PropertyTree> {
        let save = SavFile::open(path)?;
        Ok(read_tree(self.converter, save.data())?)
    }

    fn write(&self, tree: &PropertyTree, save_type: SaveType, path: &Path) -> Result<()> {
        let gvas = write_tree(self.converter, tree)?;
        SavFile::new(gvas, save_type).write(path)?;
        Ok(())
    }
}

/// Migrate the host in `save_dir` to `identity` without backups.
pub fn fix_host<C, P>(converter: &C, save_dir: P, identity: &str) -> Result<RebindReport>
where
    C: TreeConverter + ?Sized,
    P: AsRef<Path>,
{
    HostFix::new(converter).run(save_dir, identity)
}

/// Point the first world character entry with `instance_id` at `player_uid`.
///
/// Returns `false`, leaving the tree untouched, when no entry matches.
pub fn rebind_character(
    world: &mut PropertyTree,
    instance_id: &str,
    player_uid: &str,
) -> Result<bool> {
    for entry in world.map_entries_mut(&CHARACTER_MAP)? {
        if entry.key.guid_at(&KEY_INSTANCE_ID)? == instance_id {
            entry.key.set_guid_at(&KEY_PLAYER_UID, player_uid)?;
            return Ok(true);
        }
    }
    Ok(false)
}

fn backup_file(path: &Path) -> Result<PathBuf> {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".bak");
    let backup = path.with_file_name(name);
    fs::copy(path, &backup)?;
    log::info!("Backed up {} to {}", path.display(), backup.display());
    Ok(backup)
}
