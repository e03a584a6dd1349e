//! The live-graph collaborator seen by the codec.
//!
//! The codec never owns nodes. It reads and writes them through [`PropertyGraph`] handles for
//! the duration of one encode or decode call.

use std::fmt;

use crate::{
    foundation::error::PropTreeResult,
    value::{keyframe::Keyframe, property::PropertyValue},
};

pub(crate) mod attribute;
pub(crate) mod memory;

use attribute::Attribute;

/// Container flavour, as the host reports it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GroupKind {
    /// Fixed-schema group whose children are addressed by name.
    Named,
    /// Repeatable group (effects, masks, shape contents) whose children can be added.
    Indexed,
}

/// Layer subtype. Drives which categories and attributes apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Footage,
    Solid,
    Composition,
    Null,
    Text,
    Shape,
    Camera,
    Light,
}

impl LayerKind {
    /// AV, text and shape layers.
    pub fn is_raster(self) -> bool {
        !matches!(self, Self::Camera | Self::Light)
    }

    /// Text and shape layers are AV layers on the host.
    pub fn is_av(self) -> bool {
        self.is_raster()
    }

    pub fn is_text(self) -> bool {
        self == Self::Text
    }

    pub fn is_shape(self) -> bool {
        self == Self::Shape
    }

    /// Layers whose dimensions belong to a solid or composition source item.
    pub fn is_source_backed(self) -> bool {
        matches!(self, Self::Solid | Self::Composition)
    }
}

/// Node variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Leaf,
    Group(GroupKind),
    Layer(LayerKind),
}

impl NodeKind {
    pub fn is_leaf(self) -> bool {
        self == Self::Leaf
    }

    /// Groups and layers both own children.
    pub fn is_container(self) -> bool {
        !self.is_leaf()
    }

    pub fn layer_kind(self) -> Option<LayerKind> {
        match self {
            Self::Layer(kind) => Some(kind),
            _ => None,
        }
    }
}

/// Per-node capabilities, queried once when traversal reaches the node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeCaps {
    /// The node exposes a writable `enabled` flag.
    pub can_set_enabled: bool,
    /// The leaf's value is writable. Always `false` for containers.
    pub can_set_value: bool,
    /// The node differs from its default state.
    pub is_modified: bool,
    /// Transform groups only: position is split into per-axis leaves.
    pub dimensions_separated: bool,
}

/// Layer-only capabilities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayerCaps {
    pub three_d: bool,
    pub has_audio: bool,
    pub can_set_time_remap_enabled: bool,
    pub time_remap_enabled: bool,
}

/// Driving expression of a leaf.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Expression {
    pub source: String,
    pub enabled: bool,
}

impl Expression {
    /// The expression drives the leaf: non-empty and switched on.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.source.is_empty()
    }
}

/// Host property graph: layers containing groups containing leaves.
///
/// Handles are cheap copies; the graph owns all state.
pub trait PropertyGraph {
    type Node: Copy + Eq + fmt::Debug;

    fn kind(&self, node: Self::Node) -> NodeKind;

    fn caps(&self, node: Self::Node) -> NodeCaps;

    /// Only meaningful for layers.
    fn layer_caps(&self, layer: Self::Node) -> LayerCaps;

    /// 1-based position among siblings.
    fn index(&self, node: Self::Node) -> usize;

    /// Owning group or layer. `None` for layers.
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Stable, locale-independent identifier.
    fn match_name(&self, node: Self::Node) -> &str;

    fn display_name(&self, node: Self::Node) -> String;

    /// Children in authoring order. Empty for leaves.
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    fn value(&self, leaf: Self::Node) -> PropertyValue;

    fn keyframes(&self, leaf: Self::Node) -> Vec<Keyframe>;

    fn expression(&self, leaf: Self::Node) -> Expression;

    /// Current value of a self attribute, or `None` when the node lacks it.
    fn attribute(&self, node: Self::Node, attr: Attribute) -> Option<PropertyValue>;

    /// Find a direct child by match name.
    fn resolve_child(&self, parent: Self::Node, match_name: &str) -> Option<Self::Node>;

    /// Materialize a new child by match name.
    fn create_child(&mut self, parent: Self::Node, match_name: &str)
    -> PropTreeResult<Self::Node>;

    fn set_value(&mut self, leaf: Self::Node, value: PropertyValue) -> PropTreeResult<()>;

    /// Replace the whole key sequence.
    fn set_keyframes(&mut self, leaf: Self::Node, keys: &[Keyframe]) -> PropTreeResult<()>;

    /// Set the expression source. Setting it switches evaluation on.
    fn set_expression(&mut self, leaf: Self::Node, source: &str) -> PropTreeResult<()>;

    fn set_attribute(
        &mut self,
        node: Self::Node,
        attr: Attribute,
        value: PropertyValue,
    ) -> PropTreeResult<()>;

    /// Write an attribute on the solid or composition item behind a layer.
    fn set_source_attribute(
        &mut self,
        layer: Self::Node,
        attr: Attribute,
        value: PropertyValue,
    ) -> PropTreeResult<()>;

    /// Child at a 1-based sibling index.
    fn child_at(&self, parent: Self::Node, index: usize) -> Option<Self::Node> {
        index
            .checked_sub(1)
            .and_then(|i| self.children(parent).get(i).copied())
    }

    fn has_attribute(&self, node: Self::Node, attr: Attribute) -> bool {
        self.attribute(node, attr).is_some()
    }
}
