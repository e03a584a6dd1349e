//! proptree turns a live layer/property graph into a plain keyed tree and back.
//!
//! The tree is a nested map whose keys read `<Kind><Index4> <MatchName>`:
//!
//! - `S0000 selfProperty`: the owning container's own attributes (enabled, name, layer
//!   attributes)
//! - `G0002 ADBE Transform Group`: a nested container
//! - `P0011 ADBE Opacity`: a nested leaf holding `value`, `keyframes` and/or `expression`
//!
//! # Pipeline overview
//!
//! 1. **Encode**: `PropertyGraph + root -> PropertyTree` via [`encode_tree`], filtered by the
//!    categories in [`EncodeOpts`] and by each node's modified flag
//! 2. **Persist** (optional): [`write_tree`] / [`read_tree`], or any serde format
//! 3. **Decode**: `PropertyTree -> mutations` via [`decode_tree`], creating missing children and
//!    handling layer locks
//!
//! The live graph is reached only through the [`PropertyGraph`] trait. [`MemoryGraph`] is an
//! in-memory implementation for offline replay and tests.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: entries are kept in canonical order (index, then key text), so repeated
//!   encodes of an unchanged graph serialize to the same bytes.
#![forbid(unsafe_code)]

mod codec;
mod foundation;
mod graph;
mod io;
mod labels;
mod tree;
mod value;

pub use codec::key::{KeyKind, MAX_INDEX, NodeKey, SELF_KEY, SELF_NAME, decode_key, encode_key};
pub use codec::leaf::{LeafRecord, decode_leaf, encode_leaf, encode_text_leaf};
pub use codec::metadata::{MetadataRecord, decode_metadata, encode_metadata};
pub use codec::text::{TEXT_DOCUMENT, TEXT_PROPERTIES, flatten_text_document};
pub use foundation::error::{PropTreeError, PropTreeResult};
pub use graph::attribute::Attribute;
pub use graph::memory::{MemoryGraph, NodeId, NodeSnapshot, NodeTemplate};
pub use graph::{
    Expression, GroupKind, LayerCaps, LayerKind, NodeCaps, NodeKind, PropertyGraph,
};
pub use io::{read_tree, write_tree};
pub use labels::{BlendingMode, TrackMatteType};
pub use tree::category::{Category, CategorySet, EncodeOpts};
pub use tree::fingerprint::TreeFingerprint;
pub use tree::structure::{PropertyTree, TreeEntry};
pub use tree::walker::encode_tree;
pub use tree::writer::{decode_tree, decode_tree_json};
pub use value::keyframe::{InterpolationType, Keyframe, KeyframeInterpolation, TemporalEase};
pub use value::property::PropertyValue;
