use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, ser::SerializeMap};

use crate::{
    codec::{
        key::{KeyKind, NodeKey},
        leaf::LeafRecord,
        metadata::MetadataRecord,
    },
    foundation::error::{PropTreeError, PropTreeResult},
};

/// Value stored under one key of a [`PropertyTree`].
#[derive(Clone, Debug, PartialEq)]
pub enum TreeEntry {
    /// `S` key: the owning container's own attributes.
    Meta(MetadataRecord),
    /// `G` key: nested container.
    Group(PropertyTree),
    /// `P` key: nested leaf.
    Leaf(LeafRecord),
}

impl TreeEntry {
    pub fn kind(&self) -> KeyKind {
        match self {
            Self::Meta(_) => KeyKind::SelfMeta,
            Self::Group(_) => KeyKind::Group,
            Self::Leaf(_) => KeyKind::Leaf,
        }
    }
}

/// Plain nested keyed structure produced by encode and consumed by decode.
///
/// Entries iterate in canonical order (numeric index, then key text) at every level, so two
/// encodes of the same graph serialize to identical bytes. It has no link back to the graph it
/// came from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyTree {
    entries: BTreeMap<NodeKey, TreeEntry>,
}

impl PropertyTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeKey, &TreeEntry)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &NodeKey> {
        self.entries.keys()
    }

    /// Look up an entry by its serialized key. Unparseable keys are simply absent.
    pub fn get(&self, key: &str) -> Option<&TreeEntry> {
        key.parse::<NodeKey>()
            .ok()
            .and_then(|k| self.entries.get(&k))
    }

    pub fn meta(&self) -> Option<&MetadataRecord> {
        match self.entries.get(&NodeKey::self_meta()) {
            Some(TreeEntry::Meta(record)) => Some(record),
            _ => None,
        }
    }

    pub fn group(&self, key: &str) -> Option<&PropertyTree> {
        match self.get(key) {
            Some(TreeEntry::Group(tree)) => Some(tree),
            _ => None,
        }
    }

    pub fn leaf(&self, key: &str) -> Option<&LeafRecord> {
        match self.get(key) {
            Some(TreeEntry::Leaf(record)) => Some(record),
            _ => None,
        }
    }

    pub fn group_mut(&mut self, key: &str) -> Option<&mut PropertyTree> {
        let key = key.parse::<NodeKey>().ok()?;
        match self.entries.get_mut(&key) {
            Some(TreeEntry::Group(tree)) => Some(tree),
            _ => None,
        }
    }

    pub fn leaf_mut(&mut self, key: &str) -> Option<&mut LeafRecord> {
        let key = key.parse::<NodeKey>().ok()?;
        match self.entries.get_mut(&key) {
            Some(TreeEntry::Leaf(record)) => Some(record),
            _ => None,
        }
    }

    /// Insert an entry. The key's kind must agree with the entry.
    pub fn insert(&mut self, key: NodeKey, entry: TreeEntry) -> PropTreeResult<()> {
        if key.kind() != entry.kind() {
            return Err(PropTreeError::schema_mismatch(format!(
                "key '{key}' cannot hold a {:?} entry",
                entry.kind()
            )));
        }
        self.entries.insert(key, entry);
        Ok(())
    }

    /// Set the `S0000 selfProperty` entry.
    pub fn set_meta(&mut self, record: MetadataRecord) {
        self.entries
            .insert(NodeKey::self_meta(), TreeEntry::Meta(record));
    }

    pub fn insert_group(
        &mut self,
        index: usize,
        match_name: &str,
        tree: PropertyTree,
    ) -> PropTreeResult<()> {
        let key = NodeKey::new(KeyKind::Group, index, match_name)?;
        self.insert(key, TreeEntry::Group(tree))
    }

    pub fn insert_leaf(
        &mut self,
        index: usize,
        match_name: &str,
        record: LeafRecord,
    ) -> PropTreeResult<()> {
        let key = NodeKey::new(KeyKind::Leaf, index, match_name)?;
        self.insert(key, TreeEntry::Leaf(record))
    }

    pub fn remove(&mut self, key: &str) -> Option<TreeEntry> {
        let key = key.parse::<NodeKey>().ok()?;
        self.entries.remove(&key)
    }

    /// Keep only the entries for which `keep` holds.
    pub fn retain(&mut self, mut keep: impl FnMut(&NodeKey, &TreeEntry) -> bool) {
        self.entries.retain(|k, v| keep(k, v));
    }

    /// Shallow merge; entries of `other` replace entries with the same key.
    pub fn extend(&mut self, other: PropertyTree) {
        self.entries.extend(other.entries);
    }

    /// Shallow merge of several structures, later ones winning.
    pub fn merge_all(trees: impl IntoIterator<Item = PropertyTree>) -> PropTreeResult<Self> {
        let mut trees = trees.into_iter().peekable();
        if trees.peek().is_none() {
            return Err(PropTreeError::empty_input(
                "merge needs at least one structure",
            ));
        }
        let mut out = Self::new();
        for tree in trees {
            out.extend(tree);
        }
        Ok(out)
    }

    pub fn to_json(&self) -> PropTreeResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_string_pretty(&self) -> PropTreeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_str(s: &str) -> PropTreeResult<Self> {
        let value: serde_json::Value = serde_json::from_str(s)?;
        Self::from_json(&value)
    }

    /// Classify and parse a JSON object.
    ///
    /// Keys with an unknown kind prefix fail with `UnsupportedFormat`; keys with a valid prefix
    /// but a broken index fail with `MalformedKey`.
    pub fn from_json(value: &serde_json::Value) -> PropTreeResult<Self> {
        let map = value.as_object().ok_or_else(|| {
            PropTreeError::serde("property structure must be a JSON object")
        })?;
        Self::from_json_map(map)
    }

    fn from_json_map(map: &serde_json::Map<String, serde_json::Value>) -> PropTreeResult<Self> {
        let mut tree = Self::new();
        for (raw, value) in map {
            let known_prefix = raw
                .chars()
                .next()
                .and_then(KeyKind::from_char)
                .is_some();
            if !known_prefix {
                return Err(PropTreeError::unsupported_format(format!(
                    "key '{raw}' uses an unknown kind prefix; the data may predate this schema"
                )));
            }
            let key: NodeKey = raw.parse()?;
            let entry = match key.kind() {
                KeyKind::SelfMeta => TreeEntry::Meta(
                    MetadataRecord::deserialize(value)
                        .map_err(|e| PropTreeError::serde(format!("'{raw}': {e}")))?,
                ),
                KeyKind::Group => {
                    let nested = value.as_object().ok_or_else(|| {
                        PropTreeError::serde(format!("'{raw}': group entry must be an object"))
                    })?;
                    TreeEntry::Group(Self::from_json_map(nested)?)
                }
                KeyKind::Leaf => TreeEntry::Leaf(
                    LeafRecord::deserialize(value)
                        .map_err(|e| PropTreeError::serde(format!("'{raw}': {e}")))?,
                ),
            };
            tree.entries.insert(key, entry);
        }
        Ok(tree)
    }
}

impl Serialize for TreeEntry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Meta(record) => record.serialize(serializer),
            Self::Group(tree) => tree.serialize(serializer),
            Self::Leaf(record) => record.serialize(serializer),
        }
    }
}

impl Serialize for PropertyTree {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, entry) in &self.entries {
            map.serialize_entry(&key.to_string(), entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PropertyTree {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        Self::from_json_map(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tree/structure.rs"]
mod tests;
