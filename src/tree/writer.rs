use crate::{
    codec::{
        key::NodeKey,
        leaf::{LeafRecord, decode_leaf},
        metadata::{decode_metadata, requested_lock, with_unlocked, write_layer_attributes},
    },
    foundation::error::{PropTreeError, PropTreeResult},
    graph::{GroupKind, NodeKind, PropertyGraph},
    tree::structure::{PropertyTree, TreeEntry},
};

/// Apply a [`PropertyTree`] to the children and metadata of `root`.
///
/// Entries are applied in canonical order, so `S0000 selfProperty` lands before any sibling.
/// A layer root is unlocked for the whole pass and its requested lock state is restored last,
/// also when the pass fails. Writes already applied when an error surfaces stay applied.
///
/// Fails with `EmptyInput` for an empty structure and with `SchemaMismatch` when a `P` key
/// does not resolve to a writable leaf. `G` keys that cannot be resolved are dropped.
#[tracing::instrument(skip(graph, tree), fields(entries = tree.len()))]
pub fn decode_tree<G: PropertyGraph>(
    graph: &mut G,
    root: G::Node,
    tree: &PropertyTree,
) -> PropTreeResult<()> {
    if tree.is_empty() {
        return Err(PropTreeError::empty_input("nothing to decode"));
    }
    match graph.kind(root) {
        NodeKind::Layer(_) => {
            let relock = requested_lock(graph, root, tree.meta());
            with_unlocked(graph, root, relock, |g| write_container(g, root, tree))
        }
        _ => write_container(graph, root, tree),
    }
}

/// Parse `value` and decode it onto `root`.
pub fn decode_tree_json<G: PropertyGraph>(
    graph: &mut G,
    root: G::Node,
    value: &serde_json::Value,
) -> PropTreeResult<()> {
    let tree = PropertyTree::from_json(value)?;
    decode_tree(graph, root, &tree)
}

fn write_container<G: PropertyGraph>(
    graph: &mut G,
    node: G::Node,
    tree: &PropertyTree,
) -> PropTreeResult<()> {
    let mut claimed = Vec::new();
    for (key, entry) in tree.iter() {
        match entry {
            TreeEntry::Meta(record) => match graph.kind(node) {
                // The caller already holds the layer unlocked.
                NodeKind::Layer(kind) => write_layer_attributes(graph, node, kind, record)?,
                _ => decode_metadata(graph, node, record)?,
            },
            TreeEntry::Group(nested) => write_group(graph, node, key, &mut claimed, nested)?,
            TreeEntry::Leaf(record) => write_leaf(graph, node, key, &mut claimed, record)?,
        }
    }
    Ok(())
}

fn write_group<G: PropertyGraph>(
    graph: &mut G,
    parent: G::Node,
    key: &NodeKey,
    claimed: &mut Vec<G::Node>,
    nested: &PropertyTree,
) -> PropTreeResult<()> {
    let child = match resolve_or_create(graph, parent, key, claimed) {
        Ok(child) if graph.kind(child).is_container() => child,
        Ok(_) => {
            tracing::warn!(%key, "not a group; entry dropped");
            return Ok(());
        }
        Err(err) => {
            tracing::warn!(%key, %err, "group unresolved; entry dropped");
            return Ok(());
        }
    };
    write_container(graph, child, nested)
}

fn write_leaf<G: PropertyGraph>(
    graph: &mut G,
    parent: G::Node,
    key: &NodeKey,
    claimed: &mut Vec<G::Node>,
    record: &LeafRecord,
) -> PropTreeResult<()> {
    let leaf = resolve_or_create(graph, parent, key, claimed)
        .ok()
        .filter(|n| graph.kind(*n).is_leaf())
        .ok_or_else(|| PropTreeError::schema_mismatch(format!("'{key}' is not a property")))?;
    decode_leaf(graph, leaf, record)
}

/// Inside a repeatable group the key index picks the sibling, so two instances of the same
/// effect stay apart. When that slot holds another node, or one already taken by an earlier
/// key of this pass, the first untaken sibling with the key's match name is used, so
/// re-decoding next to unrelated instances does not add copies. Elsewhere children are found
/// by match name.
fn resolve_or_create<G: PropertyGraph>(
    graph: &mut G,
    parent: G::Node,
    key: &NodeKey,
    claimed: &mut Vec<G::Node>,
) -> PropTreeResult<G::Node> {
    let existing = if graph.kind(parent) == NodeKind::Group(GroupKind::Indexed) {
        let free = |c: &G::Node| graph.match_name(*c) == key.name() && !claimed.contains(c);
        graph
            .child_at(parent, key.index())
            .filter(free)
            .or_else(|| graph.children(parent).into_iter().find(free))
    } else {
        graph.resolve_child(parent, key.name())
    };
    let node = match existing {
        Some(node) => node,
        None => graph.create_child(parent, key.name())?,
    };
    claimed.push(node);
    Ok(node)
}

#[cfg(test)]
#[path = "../../tests/unit/tree/writer.rs"]
mod tests;
