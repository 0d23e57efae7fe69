//! Property tree model.
//!
//! The tree mirrors the JSON document produced by `uesave to-json`, with two
//! shapes lifted into their own variants:
//!
//! - `{"Guid": "..."}` becomes [`Node::Guid`]
//! - an array of `{"key": .., "value": ..}` objects becomes [`Node::Map`]
//!
//! Everything else maps one-to-one, so converting back yields the same JSON
//! (field order and number text included).

use std::fmt;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

use crate::Result;

/// A node in a property tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// JSON null.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Numeric scalar, kept in its original textual form.
    Number(Number),
    /// String scalar.
    String(String),
    /// GUID value, kept exactly as written.
    Guid(String),
    /// Ordered named fields.
    Struct(Vec<(String, Node)>),
    /// Ordered list of nodes.
    Seq(Vec<Node>),
    /// Ordered key/value entries. Keys may be structured and may repeat.
    Map(Vec<MapEntry>),
}

/// One entry of a [`Node::Map`].
#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    pub key: Node,
    pub value: Node,
}

/// The kind of a [`Node`], used for shape assertions and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Null,
    Bool,
    Number,
    String,
    Guid,
    Struct,
    Seq,
    Map,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Null => "null",
            NodeKind::Bool => "bool",
            NodeKind::Number => "number",
            NodeKind::String => "string",
            NodeKind::Guid => "guid",
            NodeKind::Struct => "struct",
            NodeKind::Seq => "sequence",
            NodeKind::Map => "map",
        };
        f.write_str(name)
    }
}

impl Node {
    /// The kind of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Null => NodeKind::Null,
            Node::Bool(_) => NodeKind::Bool,
            Node::Number(_) => NodeKind::Number,
            Node::String(_) => NodeKind::String,
            Node::Guid(_) => NodeKind::Guid,
            Node::Struct(_) => NodeKind::Struct,
            Node::Seq(_) => NodeKind::Seq,
            Node::Map(_) => NodeKind::Map,
        }
    }

    /// Get a direct field of a struct node.
    pub fn field(&self, name: &str) -> Option<&Node> {
        match self {
            Node::Struct(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Get a direct field of a struct node mutably.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Node> {
        match self {
            Node::Struct(fields) => fields
                .iter_mut()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// The GUID text if this is a GUID node.
    pub fn as_guid(&self) -> Option<&str> {
        match self {
            Node::Guid(guid) => Some(guid),
            _ => None,
        }
    }

    /// The string if this is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    /// Build a node from a JSON value.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => Node::Number(n),
            Value::String(s) => Node::String(s),
            Value::Array(items) => {
                if !items.is_empty() && items.iter().all(is_map_entry) {
                    Node::Map(items.into_iter().map(MapEntry::from_value).collect())
                } else {
                    Node::Seq(items.into_iter().map(Node::from_value).collect())
                }
            }
            Value::Object(map) => {
                if map.len() == 1 {
                    if let Some(Value::String(guid)) = map.get("Guid") {
                        return Node::Guid(guid.clone());
                    }
                }
                Node::Struct(
                    map.into_iter()
                        .map(|(name, value)| (name, Node::from_value(value)))
                        .collect(),
                )
            }
        }
    }
}

fn is_map_entry(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.len() == 2 && map.contains_key("key") && map.contains_key("value"),
        _ => false,
    }
}

impl MapEntry {
    fn from_value(value: Value) -> Self {
        let (key, value) = match value {
            Value::Object(mut map) => (
                map.remove("key").unwrap_or(Value::Null),
                map.remove("value").unwrap_or(Value::Null),
            ),
            other => (Value::Null, other),
        };
        Self {
            key: Node::from_value(key),
            value: Node::from_value(value),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Node::Null => serializer.serialize_unit(),
            Node::Bool(b) => serializer.serialize_bool(*b),
            Node::Number(n) => n.serialize(serializer),
            Node::String(s) => serializer.serialize_str(s),
            Node::Guid(guid) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Guid", guid)?;
                map.end()
            }
            Node::Struct(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (name, value) in fields {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
            Node::Seq(items) => serializer.collect_seq(items),
            Node::Map(entries) => serializer.collect_seq(entries),
        }
    }
}

impl Serialize for MapEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("key", &self.key)?;
        map.serialize_entry("value", &self.value)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Node::from_value)
    }
}

/// A decoded GVAS document.
///
/// Exists only while a save is being inspected or edited; the converter turns
/// it back into payload bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyTree {
    root: Node,
}

impl PropertyTree {
    /// Wrap a root node.
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    /// The document root.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// The document root, mutably.
    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    /// Unwrap the root node.
    pub fn into_root(self) -> Node {
        self.root
    }

    /// Parse a tree from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Parse a tree from JSON bytes.
    pub fn from_json_slice(json: &[u8]) -> Result<Self> {
        Ok(Self::new(serde_json::from_slice(json)?))
    }

    /// Serialize to compact JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.root)?)
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{"header":{"magic":1396790855,"save_game_version":3},"root":{"save_game_type":"/Script/Pal.PalWorldPlayerSaveGame","properties":{"Version":{"Int":{"id":null,"value":1}},"Rate":{"Float":{"id":null,"value":0.1}},"SaveData":{"Struct":{"value":{"Struct":{"PlayerUId":{"Struct":{"value":{"Guid":"00000000-0000-0000-0000-000000000001"},"struct_type":"Guid","struct_id":"00000000-0000-0000-0000-000000000000","id":null}},"Tags":{"Array":{"array_type":"NameProperty","id":null,"value":{"Base":{"Name":[]}}}}}},"struct_type":{"Struct":"PalPlayerSaveData"},"struct_id":"00000000-0000-0000-0000-000000000000","id":null}},"Lookup":{"Map":{"key_type":"StructProperty","value_type":"IntProperty","id":null,"value":[{"key":{"Struct":{"Struct":{"A":{"Int":{"id":null,"value":1}}}}},"value":{"Int":7}},{"key":{"Struct":{"Struct":{"A":{"Int":{"id":null,"value":1}}}}},"value":{"Int":8}}]}}}},"extra":[0,0,0,0]}"#;

    #[test]
    fn test_json_roundtrip_is_lossless() {
        let tree = PropertyTree::from_json_str(SAMPLE).unwrap();
        assert_eq!(tree.to_json_string().unwrap(), SAMPLE);
    }

    #[test]
    fn test_guid_and_map_detection() {
        let tree = PropertyTree::from_json_str(SAMPLE).unwrap();
        let props = tree.root().field("root").unwrap().field("properties").unwrap();

        let uid = props
            .field("SaveData").unwrap()
            .field("Struct").unwrap()
            .field("value").unwrap()
            .field("Struct").unwrap()
            .field("PlayerUId").unwrap()
            .field("Struct").unwrap()
            .field("value").unwrap();
        assert_eq!(uid.as_guid(), Some("00000000-0000-0000-0000-000000000001"));

        let entries = props
            .field("Lookup").unwrap()
            .field("Map").unwrap()
            .field("value").unwrap();
        match entries {
            // Duplicate keys are kept as separate entries.
            Node::Map(entries) => {
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[0].key, entries[1].key);
            }
            other => panic!("expected map, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_non_map_arrays_stay_sequences() {
        let tree = PropertyTree::from_json_str(r#"{"a":[],"b":[1,2],"c":[{"key":1}]}"#).unwrap();
        assert_eq!(tree.root().field("a").unwrap().kind(), NodeKind::Seq);
        assert_eq!(tree.root().field("b").unwrap().kind(), NodeKind::Seq);
        assert_eq!(tree.root().field("c").unwrap().kind(), NodeKind::Seq);
    }

    #[test]
    fn test_guid_requires_single_string_field() {
        let tree = PropertyTree::from_json_str(r#"{"a":{"Guid":5},"b":{"Guid":"x","y":1}}"#).unwrap();
        assert_eq!(tree.root().field("a").unwrap().kind(), NodeKind::Struct);
        assert_eq!(tree.root().field("b").unwrap().kind(), NodeKind::Struct);
    }

    #[test]
    fn test_large_numbers_preserved() {
        let json = r#"{"big":18446744073709551615,"neg":-9223372036854775808,"f":1.0000001}"#;
        let tree = PropertyTree::from_json_str(json).unwrap();
        assert_eq!(tree.to_json_string().unwrap(), json);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            PropertyTree::from_json_str("{not json"),
            Err(crate::Error::Json(_))
        ));
    }
}
