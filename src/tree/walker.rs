use crate::{
    codec::{
        key::{KeyKind, NodeKey},
        leaf::{encode_leaf, encode_text_leaf},
        metadata::{MetadataRecord, encode_metadata},
        text::{TEXT_DOCUMENT, TEXT_PROPERTIES},
    },
    graph::{LayerKind, NodeKind, PropertyGraph, attribute::Attribute},
    tree::{
        category::{Category, CategorySet, EncodeOpts},
        structure::{PropertyTree, TreeEntry},
    },
    value::property::PropertyValue,
};

const POSITION: &str = "ADBE Position";

/// Whether a root must pass the modified check before it is emitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Gate {
    Modified,
    Forced,
}

/// Encode a live node into a [`PropertyTree`].
///
/// A layer root is encoded category by category, subject to `opts.categories`, and always
/// carries its own metadata under `S0000 selfProperty`. Any other root is emitted as a single
/// entry keyed by its own index, ready to be decoded into its parent.
///
/// Encode does not fail: nodes that cannot be keyed or that fail capability checks are
/// left out.
#[tracing::instrument(skip(graph, opts), fields(categories = opts.categories.iter().count()))]
pub fn encode_tree<G: PropertyGraph>(graph: &G, root: G::Node, opts: &EncodeOpts) -> PropertyTree {
    let mut tree = PropertyTree::new();
    match graph.kind(root) {
        NodeKind::Layer(kind) => encode_layer(graph, root, kind, &opts.categories, &mut tree),
        _ => emit(graph, root, &mut tree, Gate::Forced),
    }
    tracing::debug!(entries = tree.len(), "encoded");
    tree
}

fn encode_layer<G: PropertyGraph>(
    graph: &G,
    layer: G::Node,
    kind: LayerKind,
    categories: &CategorySet,
    tree: &mut PropertyTree,
) {
    let caps = graph.layer_caps(layer);

    if active(categories, Category::Marker) {
        // Keys, not the modified flag, decide whether the marker is emitted.
        for marker in category_roots(graph, layer, Category::Marker) {
            if graph.keyframes(marker).is_empty() {
                tracing::debug!("marker has no keys");
            } else {
                emit(graph, marker, tree, Gate::Forced);
            }
        }
    }

    if active(categories, Category::Transform) {
        for transform in category_roots(graph, layer, Category::Transform) {
            emit_transform(graph, transform, tree);
        }
    }

    tree.set_meta(encode_metadata(graph, layer, true));

    if !kind.is_raster() {
        let category = match kind {
            LayerKind::Camera => Category::Camera,
            _ => Category::Light,
        };
        emit_category(graph, layer, categories, category, tree);
        return;
    }

    emit_category(graph, layer, categories, Category::Effect, tree);
    emit_category(graph, layer, categories, Category::Mask, tree);

    if active(categories, Category::LayerStyles) {
        for styles in category_roots(graph, layer, Category::LayerStyles) {
            emit_layer_styles(graph, styles, tree);
        }
    }

    if caps.three_d {
        if active(categories, Category::OptionsGroup) {
            emit_options(graph, layer, tree);
        }
    } else {
        tracing::debug!("2D layer; options skipped");
    }

    if caps.has_audio {
        emit_category(graph, layer, categories, Category::Audio, tree);
    }

    if kind.is_av() && caps.can_set_time_remap_enabled && caps.time_remap_enabled {
        emit_category(graph, layer, categories, Category::TimeRemapping, tree);
    }

    if kind.is_text() && active(categories, Category::TextProperties) {
        for text in category_roots(graph, layer, Category::TextProperties) {
            emit_text(graph, text, tree);
        }
    }

    if kind.is_shape() {
        emit_category(graph, layer, categories, Category::VectorsGroup, tree);
    }
}

fn active(categories: &CategorySet, category: Category) -> bool {
    let on = categories.contains(category);
    if !on {
        tracing::debug!(%category, "category inactive");
    }
    on
}

fn category_roots<G: PropertyGraph>(
    graph: &G,
    layer: G::Node,
    category: Category,
) -> Vec<G::Node> {
    category
        .match_names()
        .iter()
        .filter_map(|name| graph.resolve_child(layer, name))
        .collect()
}

fn emit_category<G: PropertyGraph>(
    graph: &G,
    layer: G::Node,
    categories: &CategorySet,
    category: Category,
    tree: &mut PropertyTree,
) {
    if !active(categories, category) {
        return;
    }
    for root in category_roots(graph, layer, category) {
        emit(graph, root, tree, Gate::Modified);
    }
}

/// Position is emitted either merged or per axis, never both.
fn emit_transform<G: PropertyGraph>(graph: &G, transform: G::Node, tree: &mut PropertyTree) {
    if !graph.caps(transform).is_modified {
        tracing::debug!("transform unmodified");
        return;
    }
    let separated = graph.caps(transform).dimensions_separated;
    let mut nested = encode_group(graph, transform);
    nested.retain(|key, _| !is_excluded_position(key.name(), separated));
    insert(
        tree,
        KeyKind::Group,
        graph.index(transform),
        graph.match_name(transform),
        TreeEntry::Group(nested),
    );
}

fn is_excluded_position(match_name: &str, separated: bool) -> bool {
    if separated {
        return match_name == POSITION;
    }
    match_name
        .strip_prefix(POSITION)
        .and_then(|rest| rest.strip_prefix('_'))
        .is_some_and(|axis| !axis.is_empty() && axis.bytes().all(|b| b.is_ascii_digit()))
}

/// The style group's own switch, its blending options, then every later style that can be
/// toggled.
fn emit_layer_styles<G: PropertyGraph>(graph: &G, styles: G::Node, tree: &mut PropertyTree) {
    if !graph.caps(styles).can_set_enabled {
        tracing::debug!("layer styles cannot be toggled; skipped");
        return;
    }

    let mut nested = PropertyTree::new();
    let enabled = graph
        .attribute(styles, Attribute::Enabled)
        .unwrap_or(PropertyValue::Bool(false));
    nested.set_meta(MetadataRecord::new().with(Attribute::Enabled, enabled));

    let children = graph.children(styles);
    if let Some(blending) = children.first() {
        emit(graph, *blending, &mut nested, Gate::Modified);
    }
    for style in children.iter().skip(1) {
        if graph.caps(*style).can_set_enabled {
            emit(graph, *style, &mut nested, Gate::Forced);
        }
    }

    insert(
        tree,
        KeyKind::Group,
        graph.index(styles),
        graph.match_name(styles),
        TreeEntry::Group(nested),
    );
}

/// Geometry and material options travel together.
fn emit_options<G: PropertyGraph>(graph: &G, layer: G::Node, tree: &mut PropertyTree) {
    let roots = category_roots(graph, layer, Category::OptionsGroup);
    if !roots.iter().any(|r| graph.caps(*r).is_modified) {
        tracing::debug!("options unmodified");
        return;
    }
    for root in roots {
        emit(graph, root, tree, Gate::Forced);
    }
}

fn emit_text<G: PropertyGraph>(graph: &G, text: G::Node, tree: &mut PropertyTree) {
    if !graph.caps(text).is_modified {
        tracing::debug!("text properties unmodified");
        return;
    }
    let mut nested = encode_group(graph, text);
    if graph.match_name(text) == TEXT_PROPERTIES {
        if let Some(document) = graph.resolve_child(text, TEXT_DOCUMENT) {
            let key = NodeKey::new(KeyKind::Leaf, graph.index(document), TEXT_DOCUMENT)
                .map(|k| k.to_string());
            if let Some(record) = key.ok().and_then(|k| nested.leaf_mut(&k)) {
                *record = encode_text_leaf(graph, document);
            }
        }
    }
    insert(
        tree,
        KeyKind::Group,
        graph.index(text),
        graph.match_name(text),
        TreeEntry::Group(nested),
    );
}

/// Emit `node` into `tree` under its own key.
fn emit<G: PropertyGraph>(graph: &G, node: G::Node, tree: &mut PropertyTree, gate: Gate) {
    let caps = graph.caps(node);
    if gate == Gate::Modified && !caps.is_modified {
        tracing::debug!(node = graph.match_name(node), "unmodified; skipped");
        return;
    }
    let (kind, entry) = if graph.kind(node).is_leaf() {
        (KeyKind::Leaf, TreeEntry::Leaf(encode_leaf(graph, node)))
    } else {
        (KeyKind::Group, TreeEntry::Group(encode_group(graph, node)))
    };
    insert(tree, kind, graph.index(node), graph.match_name(node), entry);
}

/// Ordinary sub-tree: own metadata when non-empty, then every modified child group and every
/// modified writable leaf.
fn encode_group<G: PropertyGraph>(graph: &G, group: G::Node) -> PropertyTree {
    let mut tree = PropertyTree::new();
    let meta = encode_metadata(graph, group, false);
    if !meta.is_empty() {
        tree.set_meta(meta);
    }

    for child in graph.children(group) {
        let caps = graph.caps(child);
        let visit = if graph.kind(child).is_leaf() {
            caps.can_set_value && caps.is_modified
        } else {
            caps.is_modified
        };
        if visit {
            emit(graph, child, &mut tree, Gate::Forced);
        }
    }
    tree
}

fn insert(
    tree: &mut PropertyTree,
    kind: KeyKind,
    index: usize,
    match_name: &str,
    entry: TreeEntry,
) {
    let inserted = NodeKey::new(kind, index, match_name).and_then(|key| tree.insert(key, entry));
    if let Err(err) = inserted {
        tracing::warn!(%err, match_name, "node omitted from encode");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tree/walker.rs"]
mod tests;
