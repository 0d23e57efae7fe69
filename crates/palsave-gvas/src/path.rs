//! Declarative property paths.
//!
//! A [`PropertyPath`] names a chain of struct fields from some starting node
//! and the kind of node expected at the end. Every intermediate node must be a
//! [`Node::Struct`]; lookups fail with [`Error::Shape`] or
//! [`Error::MissingField`] naming the exact step that went wrong.

use std::fmt;

use crate::tree::{MapEntry, Node, NodeKind, PropertyTree};
use crate::{Error, Result};

/// A chain of struct field names ending at a node of a known kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyPath<'a> {
    fields: &'a [&'a str],
    leaf: NodeKind,
}

impl<'a> PropertyPath<'a> {
    /// Create a path from field names and the expected leaf kind.
    pub const fn new(fields: &'a [&'a str], leaf: NodeKind) -> Self {
        Self { fields, leaf }
    }

    /// The field names, outermost first.
    pub fn fields(&self) -> &'a [&'a str] {
        self.fields
    }

    /// The expected kind of the final node.
    pub fn leaf(&self) -> NodeKind {
        self.leaf
    }

    fn prefix(&self, depth: usize) -> String {
        if depth == 0 {
            return "<root>".to_string();
        }
        self.fields[..depth].join(".")
    }

    fn shape_error(&self, depth: usize, expected: NodeKind, found: NodeKind) -> Error {
        Error::Shape {
            path: self.to_string(),
            at: self.prefix(depth),
            expected,
            found,
        }
    }

    fn missing(&self, depth: usize) -> Error {
        Error::MissingField {
            path: self.to_string(),
            field: self.fields[depth].to_string(),
        }
    }
}

impl fmt::Display for PropertyPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fields.join("."))
    }
}

impl Node {
    /// Follow `path` from this node.
    pub fn resolve(&self, path: &PropertyPath<'_>) -> Result<&Node> {
        let mut node = self;
        for (depth, name) in path.fields.iter().enumerate() {
            node = match node {
                Node::Struct(fields) => fields
                    .iter()
                    .find(|(n, _)| n == name)
                    .map(|(_, v)| v)
                    .ok_or_else(|| path.missing(depth))?,
                other => return Err(path.shape_error(depth, NodeKind::Struct, other.kind())),
            };
        }

        if node.kind() != path.leaf {
            return Err(path.shape_error(path.fields.len(), path.leaf, node.kind()));
        }
        Ok(node)
    }

    /// Follow `path` from this node, mutably.
    pub fn resolve_mut(&mut self, path: &PropertyPath<'_>) -> Result<&mut Node> {
        let mut node = self;
        for (depth, name) in path.fields.iter().enumerate() {
            node = match node {
                Node::Struct(fields) => fields
                    .iter_mut()
                    .find(|(n, _)| n == name)
                    .map(|(_, v)| v)
                    .ok_or_else(|| path.missing(depth))?,
                other => return Err(path.shape_error(depth, NodeKind::Struct, other.kind())),
            };
        }

        let found = node.kind();
        if found != path.leaf {
            return Err(path.shape_error(path.fields.len(), path.leaf, found));
        }
        Ok(node)
    }

    /// Read the GUID at `path`, which must end at a GUID node.
    pub fn guid_at(&self, path: &PropertyPath<'_>) -> Result<&str> {
        match self.resolve(path)? {
            Node::Guid(guid) => Ok(guid),
            other => Err(path.shape_error(path.fields.len(), NodeKind::Guid, other.kind())),
        }
    }

    /// Overwrite the GUID at `path`, returning the previous text.
    pub fn set_guid_at(&mut self, path: &PropertyPath<'_>, value: &str) -> Result<String> {
        match self.resolve_mut(path)? {
            Node::Guid(guid) => Ok(std::mem::replace(guid, value.to_string())),
            other => Err(path.shape_error(path.fields.len(), NodeKind::Guid, other.kind())),
        }
    }
}

impl PropertyTree {
    /// Read the GUID at `path` from the document root.
    pub fn guid(&self, path: &PropertyPath<'_>) -> Result<&str> {
        self.root().guid_at(path)
    }

    /// Overwrite the GUID at `path` from the document root, returning the previous text.
    pub fn set_guid(&mut self, path: &PropertyPath<'_>, value: &str) -> Result<String> {
        self.root_mut().set_guid_at(path, value)
    }

    /// Entries of the map at `path` from the document root.
    ///
    /// `path.leaf()` must be [`NodeKind::Map`]. An empty JSON array decodes as
    /// an empty sequence and is reported as a map with no entries.
    pub fn map_entries_mut(&mut self, path: &PropertyPath<'_>) -> Result<&mut [MapEntry]> {
        let lookup = PropertyPath::new(path.fields, NodeKind::Seq);
        if let Ok(Node::Seq(items)) = self.root().resolve(&lookup) {
            if items.is_empty() {
                return Ok(&mut []);
            }
        }

        match self.root_mut().resolve_mut(path)? {
            Node::Map(entries) => Ok(entries.as_mut_slice()),
            other => Err(path.shape_error(path.fields.len(), NodeKind::Map, other.kind())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYER_UID: PropertyPath<'static> = PropertyPath::new(
        &["SaveData", "Struct", "value", "Struct", "PlayerUId", "Struct", "value"],
        NodeKind::Guid,
    );

    const ENTRIES: PropertyPath<'static> =
        PropertyPath::new(&["Params", "Map", "value"], NodeKind::Map);

    fn sample() -> PropertyTree {
        PropertyTree::from_json_str(
            r#"{"SaveData":{"Struct":{"value":{"Struct":{"PlayerUId":{"Struct":{"value":{"Guid":"aaaa"}}},"Level":{"Int":{"value":3}}}}}},"Params":{"Map":{"value":[{"key":1,"value":2}]}},"Empty":{"Map":{"value":[]}}}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_read_and_write_guid() {
        let mut tree = sample();
        assert_eq!(tree.guid(&PLAYER_UID).unwrap(), "aaaa");

        let previous = tree.set_guid(&PLAYER_UID, "bbbb").unwrap();
        assert_eq!(previous, "aaaa");
        assert_eq!(tree.guid(&PLAYER_UID).unwrap(), "bbbb");
    }

    #[test]
    fn test_missing_field() {
        let tree = sample();
        let path = PropertyPath::new(&["SaveData", "Struct", "nope"], NodeKind::Guid);
        match tree.guid(&path) {
            Err(Error::MissingField { field, path }) => {
                assert_eq!(field, "nope");
                assert_eq!(path, "SaveData.Struct.nope");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_wrong_leaf_kind() {
        let tree = sample();
        let path = PropertyPath::new(
            &["SaveData", "Struct", "value", "Struct", "Level", "Int", "value"],
            NodeKind::Guid,
        );
        match tree.guid(&path) {
            Err(Error::Shape { expected, found, at, .. }) => {
                assert_eq!(expected, NodeKind::Guid);
                assert_eq!(found, NodeKind::Number);
                assert_eq!(at, path.to_string());
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_descending_through_scalar() {
        let tree = sample();
        let path = PropertyPath::new(
            &["SaveData", "Struct", "value", "Struct", "Level", "Int", "value", "deeper"],
            NodeKind::Guid,
        );
        match tree.guid(&path) {
            Err(Error::Shape { expected, found, at, .. }) => {
                assert_eq!(expected, NodeKind::Struct);
                assert_eq!(found, NodeKind::Number);
                assert_eq!(at, "SaveData.Struct.value.Struct.Level.Int.value");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_map_entries() {
        let mut tree = sample();
        assert_eq!(tree.map_entries_mut(&ENTRIES).unwrap().len(), 1);

        let empty = PropertyPath::new(&["Empty", "Map", "value"], NodeKind::Map);
        assert!(tree.map_entries_mut(&empty).unwrap().is_empty());

        let not_a_map = PropertyPath::new(&["SaveData", "Struct"], NodeKind::Map);
        assert!(matches!(
            tree.map_entries_mut(&not_a_map),
            Err(Error::Shape { found: NodeKind::Struct, .. })
        ));
    }
}
