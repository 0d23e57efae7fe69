//! Shared helpers for unit tests.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use palsave_gvas::{Node, PropertyTree, TreeConverter, GVAS_MAGIC};

/// Stores trees as the `GVAS` tag followed by compact JSON.
pub struct EmbeddedJson;

impl TreeConverter for EmbeddedJson {
    fn to_tree(&self, gvas: &[u8]) -> palsave_gvas::Result<PropertyTree> {
        PropertyTree::from_json_slice(&gvas[GVAS_MAGIC.len()..])
    }

    fn from_tree(&self, tree: &PropertyTree) -> palsave_gvas::Result<Vec<u8>> {
        let mut out = GVAS_MAGIC.to_vec();
        out.extend_from_slice(tree.to_json_string()?.as_bytes());
        Ok(out)
    }
}

/// A fresh, empty directory under the system temp dir.
pub fn temp_dir(prefix: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let dir = std::env::temp_dir().join(format!(
        "palsave_{}_{}_{}_{}",
        prefix,
        std::process::id(),
        nanos,
        COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// A struct node from `(name, node)` pairs.
pub fn fields(pairs: Vec<(&str, Node)>) -> Node {
    Node::Struct(
        pairs
            .into_iter()
            .map(|(name, node)| (name.to_string(), node))
            .collect(),
    )
}

/// A `Guid` struct property as uesave writes it.
pub fn guid_property(guid: &str) -> Node {
    fields(vec![(
        "Struct",
        fields(vec![
            ("value", Node::Guid(guid.to_string())),
            ("struct_type", Node::String("Guid".to_string())),
            ("id", Node::Null),
        ]),
    )])
}
