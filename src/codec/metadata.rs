use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    foundation::error::PropTreeResult,
    graph::{GroupKind, LayerKind, NodeKind, PropertyGraph, attribute::Attribute},
    value::property::PropertyValue,
};

/// A container's own attributes, keyed by attribute.
///
/// Unknown attribute names are dropped when parsing so that data from newer or older hosts
/// still loads.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetadataRecord {
    attrs: BTreeMap<Attribute, PropertyValue>,
}

impl MetadataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, attr: Attribute, value: impl Into<PropertyValue>) -> Self {
        self.insert(attr, value);
        self
    }

    pub fn insert(&mut self, attr: Attribute, value: impl Into<PropertyValue>) {
        self.attrs.insert(attr, value.into());
    }

    pub fn get(&self, attr: Attribute) -> Option<&PropertyValue> {
        self.attrs.get(&attr)
    }

    pub fn contains(&self, attr: Attribute) -> bool {
        self.attrs.contains_key(&attr)
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, &PropertyValue)> {
        self.attrs.iter().map(|(a, v)| (*a, v))
    }
}

impl<'de> Deserialize<'de> for MetadataRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = BTreeMap::<String, PropertyValue>::deserialize(deserializer)?;
        let attrs = raw
            .into_iter()
            .filter_map(|(name, value)| match Attribute::from_name(&name) {
                Some(attr) => Some((attr, value)),
                None => {
                    tracing::warn!(attribute = %name, "ignoring unknown metadata attribute");
                    None
                }
            })
            .collect();
        Ok(Self { attrs })
    }
}

/// Read a container's own attributes.
///
/// `enabled` is emitted only for nodes with a writable enabled flag. `name` is emitted when
/// `force_name` is set, for layers, and for renamable groups. Layers add their layer-level
/// attributes. An empty record means the caller should not emit a metadata entry at all.
pub fn encode_metadata<G: PropertyGraph>(
    graph: &G,
    node: G::Node,
    force_name: bool,
) -> MetadataRecord {
    let mut record = MetadataRecord::new();
    let kind = graph.kind(node);

    if graph.caps(node).can_set_enabled {
        if let Some(enabled) = graph.attribute(node, Attribute::Enabled) {
            record.insert(Attribute::Enabled, enabled);
        }
    }

    if force_name || kind.layer_kind().is_some() || is_renamable_group(graph, node) {
        record.insert(Attribute::Name, graph.display_name(node));
    }

    if let Some(layer_kind) = kind.layer_kind() {
        for attr in layer_attributes(layer_kind) {
            if let Some(value) = graph.attribute(node, attr) {
                record.insert(attr, value);
            }
        }
    }
    record
}

/// Groups the user can rename: a named group sitting directly in a repeatable group (mask
/// atoms, effect instances, shape groups).
fn is_renamable_group<G: PropertyGraph>(graph: &G, node: G::Node) -> bool {
    graph.kind(node) == NodeKind::Group(GroupKind::Named)
        && graph
            .parent(node)
            .is_some_and(|p| graph.kind(p) == NodeKind::Group(GroupKind::Indexed))
}

fn layer_attributes(kind: LayerKind) -> Vec<Attribute> {
    let mut attrs = Attribute::BASE_LAYER.to_vec();
    if kind.is_raster() {
        attrs.extend(Attribute::AV_LAYER);
        if kind.is_text() {
            attrs.push(Attribute::ThreeDPerChar);
        }
    }
    attrs
}

/// Write a metadata record onto a live container.
///
/// Layers are unlocked for the duration of the write and the requested lock state (from the
/// record, else the current one) is restored last, on success and on failure. Attributes the
/// node does not carry are ignored.
pub fn decode_metadata<G: PropertyGraph>(
    graph: &mut G,
    node: G::Node,
    record: &MetadataRecord,
) -> PropTreeResult<()> {
    match graph.kind(node) {
        NodeKind::Layer(kind) => {
            let relock = requested_lock(graph, node, Some(record));
            with_unlocked(graph, node, relock, |g| {
                write_layer_attributes(g, node, kind, record)
            })
        }
        _ => write_plain_attributes(graph, node, record),
    }
}

/// Lock state a layer should end up in after a decode.
pub(crate) fn requested_lock<G: PropertyGraph>(
    graph: &G,
    layer: G::Node,
    record: Option<&MetadataRecord>,
) -> bool {
    match record.and_then(|r| r.get(Attribute::Locked)) {
        Some(value) => value.as_bool().unwrap_or(false),
        None => graph
            .attribute(layer, Attribute::Locked)
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
    }
}

/// Run `f` with `layer` unlocked, then set the lock to `relock` whatever `f` returned.
pub(crate) fn with_unlocked<G, T>(
    graph: &mut G,
    layer: G::Node,
    relock: bool,
    f: impl FnOnce(&mut G) -> PropTreeResult<T>,
) -> PropTreeResult<T>
where
    G: PropertyGraph,
{
    graph.set_attribute(layer, Attribute::Locked, PropertyValue::Bool(false))?;
    let outcome = f(graph);
    let restored = graph.set_attribute(layer, Attribute::Locked, PropertyValue::Bool(relock));
    let value = outcome?;
    restored?;
    Ok(value)
}

/// Layer attribute writes, without the lock dance. The `locked` entry is skipped; callers
/// restore it.
pub(crate) fn write_layer_attributes<G: PropertyGraph>(
    graph: &mut G,
    layer: G::Node,
    kind: LayerKind,
    record: &MetadataRecord,
) -> PropTreeResult<()> {
    for attr in Attribute::TIMING {
        if let Some(value) = record.get(attr) {
            write_if_present(graph, layer, attr, value)?;
        }
    }

    for attr in [Attribute::Height, Attribute::Width] {
        let Some(value) = record.get(attr) else {
            continue;
        };
        if kind.is_source_backed() {
            graph.set_source_attribute(layer, attr, value.clone())?;
        } else {
            tracing::debug!(attribute = %attr, "dimension is read-only on this layer kind");
        }
    }

    if let Some(value) = record.get(Attribute::TimeRemapEnabled) {
        if kind.is_av() && graph.layer_caps(layer).can_set_time_remap_enabled {
            graph.set_attribute(layer, Attribute::TimeRemapEnabled, value.clone())?;
        } else if value.as_bool() == Some(true) {
            tracing::warn!("dropping timeRemapEnabled: layer cannot time-remap");
        } else {
            tracing::debug!("timeRemapEnabled not settable on this layer");
        }
    }

    let generic = record.iter().filter(|(attr, _)| {
        !matches!(attr, Attribute::Locked | Attribute::TimeRemapEnabled)
            && !Attribute::TIMING.contains(attr)
            && !attr.is_dimension()
    });
    for (attr, value) in generic {
        write_if_present(graph, layer, attr, value)?;
    }
    Ok(())
}

fn write_plain_attributes<G: PropertyGraph>(
    graph: &mut G,
    node: G::Node,
    record: &MetadataRecord,
) -> PropTreeResult<()> {
    for (attr, value) in record.iter() {
        write_if_present(graph, node, attr, value)?;
    }
    Ok(())
}

fn write_if_present<G: PropertyGraph>(
    graph: &mut G,
    node: G::Node,
    attr: Attribute,
    value: &PropertyValue,
) -> PropTreeResult<()> {
    let writable = match attr {
        Attribute::Enabled => graph.caps(node).can_set_enabled,
        _ => graph.has_attribute(node, attr),
    };
    if !writable {
        tracing::debug!(attribute = %attr, node = ?node, "attribute not present; skipped");
        return Ok(());
    }
    graph.set_attribute(node, attr, value.clone())
}

#[cfg(test)]
#[path = "../../tests/unit/codec/metadata.rs"]
mod tests;
