//! In-memory [`PropertyGraph`] used for offline replay and tests.
//!
//! It mirrors the host rules the codec depends on: locked layers reject writes to themselves
//! and their descendants, only indexed groups accept new children, keyed leaves reject static
//! writes, and `isModified` is derived from defaults.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::{
    foundation::error::{PropTreeError, PropTreeResult},
    graph::{
        Expression, GroupKind, LayerCaps, LayerKind, NodeCaps, NodeKind, PropertyGraph,
        attribute::Attribute,
    },
    value::{keyframe::Keyframe, property::PropertyValue},
};

/// Handle into a [`MemoryGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

/// Recipe for a child that [`PropertyGraph::create_child`] can materialize.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeTemplate {
    pub match_name: String,
    pub name: String,
    pub kind: NodeKind,
    pub can_set_enabled: bool,
    /// Default value for leaves; ignored for groups.
    pub default_value: PropertyValue,
    pub children: Vec<NodeTemplate>,
}

impl NodeTemplate {
    pub fn group(match_name: impl Into<String>, name: impl Into<String>, kind: GroupKind) -> Self {
        Self {
            match_name: match_name.into(),
            name: name.into(),
            kind: NodeKind::Group(kind),
            can_set_enabled: false,
            default_value: PropertyValue::Null,
            children: Vec::new(),
        }
    }

    pub fn leaf(
        match_name: impl Into<String>,
        name: impl Into<String>,
        default_value: impl Into<PropertyValue>,
    ) -> Self {
        Self {
            match_name: match_name.into(),
            name: name.into(),
            kind: NodeKind::Leaf,
            can_set_enabled: false,
            default_value: default_value.into(),
            children: Vec::new(),
        }
    }

    pub fn enabled_toggle(mut self) -> Self {
        self.can_set_enabled = true;
        self
    }

    pub fn child(mut self, child: NodeTemplate) -> Self {
        self.children.push(child);
        self
    }
}

/// Observable state of one node, for comparisons and dumps.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSnapshot {
    pub match_name: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "PropertyValue::is_null")]
    pub value: PropertyValue,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keyframes: Vec<Keyframe>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<Attribute, PropertyValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

#[derive(Clone, Debug)]
struct LayerState {
    has_audio: bool,
    can_set_time_remap_enabled: bool,
    attributes: BTreeMap<Attribute, PropertyValue>,
    defaults: BTreeMap<Attribute, PropertyValue>,
    source: Option<BTreeMap<Attribute, PropertyValue>>,
    source_defaults: Option<BTreeMap<Attribute, PropertyValue>>,
}

#[derive(Clone, Debug)]
struct MemNode {
    parent: Option<NodeId>,
    kind: NodeKind,
    match_name: String,
    name: String,
    default_name: String,
    enabled: Option<bool>,
    can_set_value: bool,
    value: PropertyValue,
    default_value: PropertyValue,
    keyframes: Vec<Keyframe>,
    expression: Expression,
    dimensions_separated: bool,
    dynamic: bool,
    read_only: BTreeSet<Attribute>,
    children: Vec<NodeId>,
    layer: Option<LayerState>,
}

impl MemNode {
    fn new(parent: Option<NodeId>, kind: NodeKind, match_name: &str, name: &str) -> Self {
        Self {
            parent,
            kind,
            match_name: match_name.to_string(),
            name: name.to_string(),
            default_name: name.to_string(),
            enabled: None,
            can_set_value: kind.is_leaf(),
            value: PropertyValue::Null,
            default_value: PropertyValue::Null,
            keyframes: Vec::new(),
            expression: Expression::default(),
            dimensions_separated: false,
            dynamic: false,
            read_only: BTreeSet::new(),
            children: Vec::new(),
            layer: None,
        }
    }
}

/// Arena-backed property graph.
#[derive(Clone, Debug, Default)]
pub struct MemoryGraph {
    nodes: Vec<MemNode>,
    layers: Vec<NodeId>,
    templates: BTreeMap<String, NodeTemplate>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer to the composition. Every layer starts with the base attribute set at
    /// host defaults; raster layers also get the AV set.
    pub fn add_layer(&mut self, kind: LayerKind, name: &str) -> NodeId {
        let id = self.push(MemNode::new(None, NodeKind::Layer(kind), layer_match_name(kind), name));
        self.layers.push(id);

        let mut defaults = BTreeMap::new();
        defaults.insert(Attribute::AutoOrient, PropertyValue::from("NO_AUTO_ORIENT"));
        defaults.insert(Attribute::InPoint, PropertyValue::from(0.0));
        defaults.insert(Attribute::OutPoint, PropertyValue::from(10.0));
        defaults.insert(Attribute::StartTime, PropertyValue::from(0.0));
        defaults.insert(Attribute::Stretch, PropertyValue::from(100.0));
        defaults.insert(Attribute::Label, PropertyValue::from(0.0));
        defaults.insert(Attribute::Locked, PropertyValue::from(false));
        defaults.insert(Attribute::Shy, PropertyValue::from(false));
        defaults.insert(Attribute::Solo, PropertyValue::from(false));
        if kind.is_raster() {
            for attr in [
                Attribute::AdjustmentLayer,
                Attribute::AudioEnabled,
                Attribute::GuideLayer,
                Attribute::MotionBlur,
                Attribute::PreserveTransparency,
                Attribute::ThreeDLayer,
                Attribute::TimeRemapEnabled,
            ] {
                defaults.insert(attr, PropertyValue::from(false));
            }
            defaults.insert(Attribute::EffectsActive, PropertyValue::from(true));
            defaults.insert(Attribute::BlendingMode, PropertyValue::from("NORMAL"));
            defaults.insert(Attribute::FrameBlendingType, PropertyValue::from("NO_FRAME_BLEND"));
            defaults.insert(Attribute::Quality, PropertyValue::from("BEST"));
            defaults.insert(Attribute::SamplingQuality, PropertyValue::from("BILINEAR"));
            defaults.insert(Attribute::TrackMatteType, PropertyValue::from("NO_TRACK_MATTE"));
            defaults.insert(Attribute::Height, PropertyValue::from(1080.0));
            defaults.insert(Attribute::Width, PropertyValue::from(1920.0));
            if kind.is_text() {
                defaults.insert(Attribute::ThreeDPerChar, PropertyValue::from(false));
            }
        }

        let source_defaults = kind.is_source_backed().then(|| {
            defaults
                .iter()
                .filter(|(attr, _)| attr.is_dimension())
                .map(|(attr, v)| (*attr, v.clone()))
                .collect::<BTreeMap<_, _>>()
        });

        let node = &mut self.nodes[id.0 as usize];
        node.enabled = Some(true);
        node.read_only.insert(Attribute::Height);
        node.read_only.insert(Attribute::Width);
        node.layer = Some(LayerState {
            has_audio: false,
            can_set_time_remap_enabled: matches!(
                kind,
                LayerKind::Footage | LayerKind::Composition
            ),
            attributes: defaults.clone(),
            defaults,
            source: source_defaults.clone(),
            source_defaults,
        });
        id
    }

    pub fn add_group(
        &mut self,
        parent: NodeId,
        match_name: &str,
        name: &str,
        kind: GroupKind,
    ) -> NodeId {
        self.add_child(parent, MemNode::new(Some(parent), NodeKind::Group(kind), match_name, name))
    }

    pub fn add_leaf(
        &mut self,
        parent: NodeId,
        match_name: &str,
        name: &str,
        default_value: impl Into<PropertyValue>,
    ) -> NodeId {
        let mut node = MemNode::new(Some(parent), NodeKind::Leaf, match_name, name);
        node.default_value = default_value.into();
        node.value = node.default_value.clone();
        self.add_child(parent, node)
    }

    /// Give a node a writable `enabled` flag (initially on).
    pub fn with_enabled_toggle(&mut self, node: NodeId) -> NodeId {
        self.nodes[node.0 as usize].enabled.get_or_insert(true);
        node
    }

    /// Leaves whose value cannot be set (for example parameter group headers).
    pub fn set_value_locked(&mut self, leaf: NodeId) {
        self.nodes[leaf.0 as usize].can_set_value = false;
    }

    pub fn set_dimensions_separated(&mut self, node: NodeId, separated: bool) {
        self.nodes[node.0 as usize].dimensions_separated = separated;
    }

    /// Host-side expression toggle, independent of the source text.
    pub fn set_expression_enabled(&mut self, leaf: NodeId, enabled: bool) {
        self.nodes[leaf.0 as usize].expression.enabled = enabled;
    }

    pub fn set_has_audio(&mut self, layer: NodeId, has_audio: bool) {
        if let Some(state) = self.nodes[layer.0 as usize].layer.as_mut() {
            state.has_audio = has_audio;
        }
    }

    pub fn set_can_time_remap(&mut self, layer: NodeId, can: bool) {
        if let Some(state) = self.nodes[layer.0 as usize].layer.as_mut() {
            state.can_set_time_remap_enabled = can;
        }
    }

    /// Make the host reject writes of `attr` on `node`.
    pub fn mark_read_only(&mut self, node: NodeId, attr: Attribute) {
        self.nodes[node.0 as usize].read_only.insert(attr);
    }

    /// Dimensions of the source item behind a solid or composition layer.
    pub fn source_attribute(&self, layer: NodeId, attr: Attribute) -> Option<PropertyValue> {
        self.layer_state(layer)
            .and_then(|s| s.source.as_ref())
            .and_then(|src| src.get(&attr).cloned())
    }

    pub fn register_template(&mut self, template: NodeTemplate) {
        self.templates.insert(template.match_name.clone(), template);
    }

    /// Add a user-created child (an effect, a mask, a shape group) from a template.
    pub fn instantiate(&mut self, parent: NodeId, template: &NodeTemplate) -> NodeId {
        let id = self.build(parent, template);
        self.nodes[id.0 as usize].dynamic = true;
        id
    }

    pub fn layers(&self) -> &[NodeId] {
        &self.layers
    }

    /// Same schema with every user edit undone: values, keys, expressions, names, enabled
    /// flags and layer attributes back at defaults, user-created children detached.
    pub fn pristine_clone(&self) -> Self {
        let mut out = self.clone();
        for i in 0..out.nodes.len() {
            let keep: Vec<NodeId> = out.nodes[i]
                .children
                .iter()
                .copied()
                .filter(|c| !self.nodes[c.0 as usize].dynamic)
                .collect();
            let node = &mut out.nodes[i];
            node.children = keep;
            node.value = node.default_value.clone();
            node.keyframes.clear();
            node.expression = Expression::default();
            node.name = node.default_name.clone();
            if node.enabled.is_some() {
                node.enabled = Some(true);
            }
            if let Some(state) = node.layer.as_mut() {
                state.attributes = state.defaults.clone();
                state.source = state.source_defaults.clone();
            }
        }
        out
    }

    /// Observable state of `node` and its subtree.
    pub fn snapshot(&self, node: NodeId) -> NodeSnapshot {
        let n = &self.nodes[node.0 as usize];
        let mut attributes = n
            .layer
            .as_ref()
            .map(|s| s.attributes.clone())
            .unwrap_or_default();
        if let Some(src) = n.layer.as_ref().and_then(|s| s.source.as_ref()) {
            attributes.extend(src.iter().map(|(a, v)| (*a, v.clone())));
        }
        NodeSnapshot {
            match_name: n.match_name.clone(),
            name: n.name.clone(),
            enabled: n.enabled,
            value: n.value.clone(),
            keyframes: n.keyframes.clone(),
            expression: n
                .expression
                .is_active()
                .then(|| n.expression.source.clone()),
            attributes,
            children: n.children.iter().map(|c| self.snapshot(*c)).collect(),
        }
    }

    fn push(&mut self, node: MemNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn add_child(&mut self, parent: NodeId, node: MemNode) -> NodeId {
        let id = self.push(node);
        self.nodes[parent.0 as usize].children.push(id);
        id
    }

    fn build(&mut self, parent: NodeId, template: &NodeTemplate) -> NodeId {
        let id = match template.kind {
            NodeKind::Leaf => self.add_leaf(
                parent,
                &template.match_name,
                &template.name,
                template.default_value.clone(),
            ),
            NodeKind::Group(kind) => {
                self.add_group(parent, &template.match_name, &template.name, kind)
            }
            NodeKind::Layer(_) => {
                // Layers are never children; treat as a plain named group.
                self.add_group(parent, &template.match_name, &template.name, GroupKind::Named)
            }
        };
        if template.can_set_enabled {
            self.with_enabled_toggle(id);
        }
        for child in &template.children {
            self.build(id, child);
        }
        id
    }

    fn node(&self, id: NodeId) -> &MemNode {
        &self.nodes[id.0 as usize]
    }

    fn layer_state(&self, id: NodeId) -> Option<&LayerState> {
        self.node(id).layer.as_ref()
    }

    fn owning_layer(&self, id: NodeId) -> NodeId {
        let mut cur = id;
        while let Some(parent) = self.node(cur).parent {
            cur = parent;
        }
        cur
    }

    fn is_locked(&self, layer: NodeId) -> bool {
        self.layer_state(layer)
            .and_then(|s| s.attributes.get(&Attribute::Locked))
            .and_then(PropertyValue::as_bool)
            .unwrap_or(false)
    }

    fn ensure_writable(&self, id: NodeId) -> PropTreeResult<()> {
        let layer = self.owning_layer(id);
        if self.is_locked(layer) {
            return Err(PropTreeError::host(format!(
                "layer '{}' is locked",
                self.node(layer).name
            )));
        }
        Ok(())
    }

    fn ensure_leaf(&self, id: NodeId) -> PropTreeResult<&MemNode> {
        let node = self.node(id);
        if !node.kind.is_leaf() {
            return Err(PropTreeError::host(format!(
                "'{}' is not a property",
                node.match_name
            )));
        }
        if !node.can_set_value {
            return Err(PropTreeError::host(format!(
                "'{}' has no settable value",
                node.match_name
            )));
        }
        Ok(node)
    }

    fn is_modified(&self, id: NodeId) -> bool {
        let n = self.node(id);
        if n.dynamic || n.name != n.default_name || n.enabled == Some(false) {
            return true;
        }
        match n.kind {
            NodeKind::Leaf => {
                n.value != n.default_value
                    || !n.keyframes.is_empty()
                    || !n.expression.source.is_empty()
            }
            _ => n.children.iter().any(|c| self.is_modified(*c)),
        }
    }
}

impl PropertyGraph for MemoryGraph {
    type Node = NodeId;

    fn kind(&self, node: NodeId) -> NodeKind {
        self.node(node).kind
    }

    fn caps(&self, node: NodeId) -> NodeCaps {
        let n = self.node(node);
        NodeCaps {
            can_set_enabled: n.enabled.is_some(),
            can_set_value: n.kind.is_leaf() && n.can_set_value,
            is_modified: self.is_modified(node),
            dimensions_separated: n.dimensions_separated,
        }
    }

    fn layer_caps(&self, layer: NodeId) -> LayerCaps {
        let Some(state) = self.layer_state(layer) else {
            return LayerCaps::default();
        };
        let flag = |attr| {
            state
                .attributes
                .get(&attr)
                .and_then(PropertyValue::as_bool)
                .unwrap_or(false)
        };
        LayerCaps {
            three_d: flag(Attribute::ThreeDLayer),
            has_audio: state.has_audio,
            can_set_time_remap_enabled: state.can_set_time_remap_enabled,
            time_remap_enabled: flag(Attribute::TimeRemapEnabled),
        }
    }

    fn index(&self, node: NodeId) -> usize {
        let siblings = match self.node(node).parent {
            Some(parent) => &self.node(parent).children,
            None => &self.layers,
        };
        siblings.iter().position(|s| *s == node).map_or(0, |i| i + 1)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    fn match_name(&self, node: NodeId) -> &str {
        &self.node(node).match_name
    }

    fn display_name(&self, node: NodeId) -> String {
        self.node(node).name.clone()
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node).children.clone()
    }

    fn value(&self, leaf: NodeId) -> PropertyValue {
        let n = self.node(leaf);
        // Host reports the first key's value while animated.
        n.keyframes
            .first()
            .map_or_else(|| n.value.clone(), |k| k.value.clone())
    }

    fn keyframes(&self, leaf: NodeId) -> Vec<Keyframe> {
        self.node(leaf).keyframes.clone()
    }

    fn expression(&self, leaf: NodeId) -> Expression {
        self.node(leaf).expression.clone()
    }

    fn attribute(&self, node: NodeId, attr: Attribute) -> Option<PropertyValue> {
        let n = self.node(node);
        match attr {
            Attribute::Enabled => n.enabled.map(PropertyValue::Bool),
            Attribute::Name => Some(PropertyValue::Text(n.name.clone())),
            _ => {
                let state = n.layer.as_ref()?;
                if attr.is_dimension() {
                    if let Some(src) = state.source.as_ref() {
                        return src.get(&attr).cloned();
                    }
                }
                state.attributes.get(&attr).cloned()
            }
        }
    }

    fn resolve_child(&self, parent: NodeId, match_name: &str) -> Option<NodeId> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .find(|c| self.node(*c).match_name == match_name)
    }

    fn create_child(&mut self, parent: NodeId, match_name: &str) -> PropTreeResult<NodeId> {
        if self.node(parent).kind != NodeKind::Group(GroupKind::Indexed) {
            return Err(PropTreeError::host(format!(
                "cannot add '{match_name}' to '{}'",
                self.node(parent).match_name
            )));
        }
        self.ensure_writable(parent)?;
        let template = self.templates.get(match_name).cloned().ok_or_else(|| {
            PropTreeError::host(format!("no property named '{match_name}' can be added"))
        })?;
        Ok(self.instantiate(parent, &template))
    }

    fn set_value(&mut self, leaf: NodeId, value: PropertyValue) -> PropTreeResult<()> {
        self.ensure_writable(leaf)?;
        let node = self.ensure_leaf(leaf)?;
        if !node.keyframes.is_empty() {
            return Err(PropTreeError::host(format!(
                "'{}' has keyframes; static value cannot be set",
                node.match_name
            )));
        }
        self.nodes[leaf.0 as usize].value = value;
        Ok(())
    }

    fn set_keyframes(&mut self, leaf: NodeId, keys: &[Keyframe]) -> PropTreeResult<()> {
        self.ensure_writable(leaf)?;
        self.ensure_leaf(leaf)?;
        let node = &mut self.nodes[leaf.0 as usize];
        node.keyframes = keys.to_vec();
        node.keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        Ok(())
    }

    fn set_expression(&mut self, leaf: NodeId, source: &str) -> PropTreeResult<()> {
        self.ensure_writable(leaf)?;
        self.ensure_leaf(leaf)?;
        self.nodes[leaf.0 as usize].expression = Expression {
            source: source.to_string(),
            enabled: !source.is_empty(),
        };
        Ok(())
    }

    fn set_attribute(
        &mut self,
        node: NodeId,
        attr: Attribute,
        value: PropertyValue,
    ) -> PropTreeResult<()> {
        if attr != Attribute::Locked {
            self.ensure_writable(node)?;
        }
        let n = self.node(node);
        if n.read_only.contains(&attr) {
            return Err(PropTreeError::host(format!(
                "attribute '{attr}' of '{}' is read-only",
                n.name
            )));
        }
        if !self.has_attribute(node, attr) {
            return Err(PropTreeError::host(format!(
                "'{}' has no attribute '{attr}'",
                n.name
            )));
        }

        let n = &mut self.nodes[node.0 as usize];
        match attr {
            Attribute::Enabled => {
                n.enabled = Some(value.as_bool().ok_or_else(|| {
                    PropTreeError::host(format!("'{attr}' expects a boolean"))
                })?);
            }
            Attribute::Name => {
                n.name = value
                    .as_str()
                    .ok_or_else(|| PropTreeError::host(format!("'{attr}' expects a string")))?
                    .to_string();
            }
            _ => {
                if let Some(state) = n.layer.as_mut() {
                    state.attributes.insert(attr, value);
                }
            }
        }
        Ok(())
    }

    fn set_source_attribute(
        &mut self,
        layer: NodeId,
        attr: Attribute,
        value: PropertyValue,
    ) -> PropTreeResult<()> {
        self.ensure_writable(layer)?;
        let name = self.node(layer).name.clone();
        let source = self.nodes[layer.0 as usize]
            .layer
            .as_mut()
            .and_then(|s| s.source.as_mut())
            .ok_or_else(|| PropTreeError::host(format!("layer '{name}' has no source item")))?;
        source.insert(attr, value);
        Ok(())
    }
}

fn layer_match_name(kind: LayerKind) -> &'static str {
    match kind {
        LayerKind::Text => "ADBE Text Layer",
        LayerKind::Shape => "ADBE Vector Layer",
        LayerKind::Camera => "ADBE Camera Layer",
        LayerKind::Light => "ADBE Light Layer",
        LayerKind::Footage | LayerKind::Solid | LayerKind::Composition | LayerKind::Null => {
            "ADBE AV Layer"
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/memory.rs"]
mod tests;
