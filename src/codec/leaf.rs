use serde::{Deserialize, Serialize};

use crate::{
    codec::text::flatten_text_document,
    foundation::error::PropTreeResult,
    graph::PropertyGraph,
    value::{keyframe::Keyframe, property::PropertyValue},
};

/// Serialized form of one value-bearing node.
///
/// Exactly one of `value` / `keyframes` is emitted by encode. `name` is informational and is
/// never written back.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LeafRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<PropertyValue>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "Keyframe",
        alias = "keyframe"
    )]
    pub keyframes: Option<Vec<Keyframe>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
}

impl LeafRecord {
    /// Record carrying a static value.
    pub fn with_value(value: impl Into<PropertyValue>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Record carrying a key sequence.
    pub fn with_keyframes(keys: Vec<Keyframe>) -> Self {
        Self {
            keyframes: Some(keys),
            ..Self::default()
        }
    }

    pub fn expression(mut self, source: impl Into<String>) -> Self {
        self.expression = Some(source.into());
        self
    }

    /// Rewrite the static value or every key value with `f`.
    pub fn map_values(mut self, f: impl Fn(&PropertyValue) -> PropertyValue) -> Self {
        self.value = self.value.as_ref().map(&f);
        self.keyframes = self
            .keyframes
            .map(|keys| keys.iter().map(|k| k.map_value(&f)).collect());
        self
    }
}

/// Read a leaf into a [`LeafRecord`].
pub fn encode_leaf<G: PropertyGraph>(graph: &G, leaf: G::Node) -> LeafRecord {
    let keys = graph.keyframes(leaf);
    let mut record = LeafRecord {
        name: Some(graph.display_name(leaf)),
        ..LeafRecord::default()
    };
    if keys.is_empty() {
        record.value = Some(graph.value(leaf));
    } else {
        record.keyframes = Some(keys);
    }

    let expression = graph.expression(leaf);
    if expression.is_active() {
        record.expression = Some(expression.source);
    }
    record
}

/// Read a text-document leaf, flattening every document to its writable fields.
pub fn encode_text_leaf<G: PropertyGraph>(graph: &G, leaf: G::Node) -> LeafRecord {
    encode_leaf(graph, leaf).map_values(flatten_text_document)
}

/// Apply a [`LeafRecord`] to a live leaf.
///
/// Keys replace the whole sequence. A static value is merged field by field when the live
/// value is a record, replaced otherwise. Composite key values are merged onto the live value
/// the same way so omitted sub-fields survive.
pub fn decode_leaf<G: PropertyGraph>(
    graph: &mut G,
    leaf: G::Node,
    record: &LeafRecord,
) -> PropTreeResult<()> {
    if let Some(keys) = record.keyframes.as_ref() {
        let current = graph.value(leaf);
        let keys: Vec<Keyframe> = keys
            .iter()
            .map(|k| k.map_value(|v| current.merged_with(v)))
            .collect();
        graph.set_keyframes(leaf, &keys)?;
    } else if let Some(value) = record.value.as_ref() {
        if !graph.keyframes(leaf).is_empty() {
            graph.set_keyframes(leaf, &[])?;
        }
        let next = graph.value(leaf).merged_with(value);
        graph.set_value(leaf, next)?;
    }

    if let Some(source) = record.expression.as_deref() {
        graph.set_expression(leaf, source)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/codec/leaf.rs"]
mod tests;
