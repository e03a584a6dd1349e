use super::*;
use crate::{
    graph::{
        GroupKind,
        memory::{MemoryGraph, NodeId},
    },
    value::keyframe::Keyframe,
};

struct Layer {
    g: MemoryGraph,
    layer: NodeId,
    marker: NodeId,
    time_remap: NodeId,
    transform: NodeId,
    position: NodeId,
    position_x: NodeId,
    position_y: NodeId,
    opacity: NodeId,
    styles: NodeId,
    geometry_bevel: NodeId,
    audio_levels: NodeId,
}

fn layer(kind: LayerKind) -> Layer {
    let mut g = MemoryGraph::new();
    let layer = g.add_layer(kind, "Layer 1");
    let marker = g.add_leaf(layer, "ADBE Marker", "Marker", PropertyValue::Null);
    let time_remap = g.add_leaf(layer, "ADBE Time Remapping", "Time Remap", 0.0);
    g.add_group(layer, "ADBE Mask Parade", "Masks", GroupKind::Indexed);
    g.add_group(layer, "ADBE Effect Parade", "Effects", GroupKind::Indexed);

    let transform = g.add_group(layer, "ADBE Transform Group", "Transform", GroupKind::Named);
    g.add_leaf(transform, "ADBE Anchor Point", "Anchor Point", [0.0, 0.0, 0.0]);
    let position = g.add_leaf(transform, "ADBE Position", "Position", [960.0, 540.0, 0.0]);
    let position_x = g.add_leaf(transform, "ADBE Position_0", "X Position", 960.0);
    let position_y = g.add_leaf(transform, "ADBE Position_1", "Y Position", 540.0);
    g.add_leaf(transform, "ADBE Scale", "Scale", [100.0, 100.0, 100.0]);
    g.add_leaf(transform, "ADBE Rotate Z", "Rotation", 0.0);
    let opacity = g.add_leaf(transform, "ADBE Opacity", "Opacity", 100.0);

    let styles = g.add_group(layer, "ADBE Layer Styles", "Layer Styles", GroupKind::Named);
    let blending = g.add_group(styles, "ADBE Blend Options Group", "Blending Options", GroupKind::Named);
    g.add_leaf(blending, "ADBE Global Angle2", "Global Light Angle", 120.0);
    let shadow = g.add_group(styles, "dropShadow/enabled", "Drop Shadow", GroupKind::Named);
    g.with_enabled_toggle(shadow);
    g.add_leaf(shadow, "dropShadow/opacity", "Opacity", 75.0);
    let fixed = g.add_group(styles, "ADBE Style Fixed", "Fixed", GroupKind::Named);
    g.add_leaf(fixed, "ADBE Style Fixed Value", "Value", 1.0);

    let geometry = g.add_group(layer, "ADBE Extrsn Options Group", "Geometry Options", GroupKind::Named);
    let geometry_bevel = g.add_leaf(geometry, "ADBE Bevel Depth", "Bevel Depth", 0.0);
    let material = g.add_group(layer, "ADBE Material Options Group", "Material Options", GroupKind::Named);
    g.add_leaf(material, "ADBE Light Transmission", "Light Transmission", 0.0);

    let audio = g.add_group(layer, "ADBE Audio Group", "Audio", GroupKind::Named);
    let audio_levels = g.add_leaf(audio, "ADBE Audio Levels", "Audio Levels", [0.0, 0.0]);

    Layer {
        g,
        layer,
        marker,
        time_remap,
        transform,
        position,
        position_x,
        position_y,
        opacity,
        styles,
        geometry_bevel,
        audio_levels,
    }
}

fn encode_all(l: &Layer) -> PropertyTree {
    encode_tree(&l.g, l.layer, &EncodeOpts::default())
}

fn key_names(tree: &PropertyTree) -> Vec<String> {
    tree.keys().map(ToString::to_string).collect()
}

#[test]
fn untouched_layer_yields_only_self_metadata() {
    let l = layer(LayerKind::Solid);
    let tree = encode_all(&l);
    assert_eq!(key_names(&tree), vec!["S0000 selfProperty"]);
    let meta = tree.meta().unwrap();
    assert_eq!(meta.get(Attribute::Name), Some(&PropertyValue::from("Layer 1")));
    assert!(meta.contains(Attribute::BlendingMode));
}

#[test]
fn modified_leaf_is_keyed_by_sibling_index() {
    let mut l = layer(LayerKind::Solid);
    l.g.set_value(l.opacity, PropertyValue::from(50.0)).unwrap();

    let tree = encode_all(&l);
    assert_eq!(
        key_names(&tree),
        vec!["S0000 selfProperty", "G0005 ADBE Transform Group"]
    );
    let transform = tree.group("G0005 ADBE Transform Group").unwrap();
    assert_eq!(key_names(transform), vec!["P0007 ADBE Opacity"]);
    let opacity = transform.leaf("P0007 ADBE Opacity").unwrap();
    assert_eq!(opacity.value, Some(PropertyValue::from(50.0)));
    assert_eq!(opacity.name.as_deref(), Some("Opacity"));
}

#[test]
fn empty_category_set_still_carries_self_metadata() {
    let mut l = layer(LayerKind::Solid);
    l.g.set_value(l.opacity, PropertyValue::from(50.0)).unwrap();
    l.g.set_keyframes(l.marker, &[Keyframe::new(1.0, "beat")]).unwrap();

    let tree = encode_tree(&l.g, l.layer, &EncodeOpts::with_categories(CategorySet::none()));
    assert_eq!(key_names(&tree), vec!["S0000 selfProperty"]);
}

#[test]
fn merged_position_excludes_axis_leaves() {
    let mut l = layer(LayerKind::Solid);
    for (leaf, value) in [
        (l.position, PropertyValue::numbers([10.0, 20.0, 0.0])),
        (l.position_x, PropertyValue::from(10.0)),
        (l.position_y, PropertyValue::from(20.0)),
    ] {
        l.g.set_value(leaf, value).unwrap();
    }

    let tree = encode_all(&l);
    let transform = tree.group("G0005 ADBE Transform Group").unwrap();
    assert_eq!(key_names(transform), vec!["P0002 ADBE Position"]);

    l.g.set_dimensions_separated(l.transform, true);
    let tree = encode_all(&l);
    let transform = tree.group("G0005 ADBE Transform Group").unwrap();
    assert_eq!(
        key_names(transform),
        vec!["P0003 ADBE Position_0", "P0004 ADBE Position_1"]
    );
}

#[test]
fn marker_is_emitted_only_with_keys() {
    let mut l = layer(LayerKind::Solid);
    l.g.set_value(l.marker, PropertyValue::from("stray")).unwrap();
    assert!(encode_all(&l).leaf("P0001 ADBE Marker").is_none());

    l.g.set_keyframes(l.marker, &[Keyframe::new(1.0, "beat")]).unwrap();
    let tree = encode_all(&l);
    let marker = tree.leaf("P0001 ADBE Marker").unwrap();
    assert_eq!(marker.keyframes.as_ref().map(Vec::len), Some(1));
    assert!(marker.value.is_none());
}

#[test]
fn layer_styles_emit_switch_and_toggleable_styles() {
    let mut l = layer(LayerKind::Solid);
    assert!(encode_all(&l).group("G0006 ADBE Layer Styles").is_none());

    l.g.with_enabled_toggle(l.styles);
    let tree = encode_all(&l);
    let styles = tree.group("G0006 ADBE Layer Styles").unwrap();
    assert_eq!(
        key_names(styles),
        vec!["S0000 selfProperty", "G0002 dropShadow/enabled"]
    );
    assert_eq!(
        styles.meta().and_then(|m| m.get(Attribute::Enabled)),
        Some(&PropertyValue::from(true))
    );
    let shadow = styles.group("G0002 dropShadow/enabled").unwrap();
    assert!(shadow.meta().is_some_and(|m| m.contains(Attribute::Enabled)));
}

#[test]
fn options_need_a_3d_layer_and_travel_together() {
    let mut l = layer(LayerKind::Solid);
    l.g.set_value(l.geometry_bevel, PropertyValue::from(4.0)).unwrap();
    assert!(encode_all(&l).group("G0007 ADBE Extrsn Options Group").is_none());

    l.g.set_attribute(l.layer, Attribute::ThreeDLayer, PropertyValue::from(true))
        .unwrap();
    let tree = encode_all(&l);
    assert!(tree.group("G0007 ADBE Extrsn Options Group").is_some());
    assert!(tree.group("G0008 ADBE Material Options Group").is_some());

    let without = encode_tree(
        &l.g,
        l.layer,
        &EncodeOpts::with_categories(CategorySet::all().without(Category::OptionsGroup)),
    );
    assert!(without.group("G0007 ADBE Extrsn Options Group").is_none());
}

#[test]
fn audio_needs_an_audio_track() {
    let mut l = layer(LayerKind::Footage);
    l.g.set_value(l.audio_levels, PropertyValue::numbers([-3.0, -3.0]))
        .unwrap();
    assert!(encode_all(&l).group("G0009 ADBE Audio Group").is_none());

    l.g.set_has_audio(l.layer, true);
    assert!(encode_all(&l).group("G0009 ADBE Audio Group").is_some());
}

#[test]
fn time_remap_needs_capability_and_switch() {
    let mut l = layer(LayerKind::Composition);
    l.g.set_keyframes(
        l.time_remap,
        &[Keyframe::new(0.0, 0.0), Keyframe::new(2.0, 4.0)],
    )
    .unwrap();
    assert!(encode_all(&l).leaf("P0002 ADBE Time Remapping").is_none());

    l.g.set_attribute(l.layer, Attribute::TimeRemapEnabled, PropertyValue::from(true))
        .unwrap();
    assert!(encode_all(&l).leaf("P0002 ADBE Time Remapping").is_some());

    l.g.set_can_time_remap(l.layer, false);
    assert!(encode_all(&l).leaf("P0002 ADBE Time Remapping").is_none());
}

#[test]
fn text_document_is_flattened() {
    let mut g = MemoryGraph::new();
    let layer = g.add_layer(LayerKind::Text, "Title");
    g.add_leaf(layer, "ADBE Marker", "Marker", PropertyValue::Null);
    let text = g.add_group(layer, TEXT_PROPERTIES, "Text", GroupKind::Named);
    let document = g.add_leaf(
        text,
        TEXT_DOCUMENT,
        "Source Text",
        PropertyValue::record([("text", PropertyValue::from(""))]),
    );
    g.set_value(
        document,
        PropertyValue::record([
            ("text", PropertyValue::from("Hello")),
            ("applyFill", PropertyValue::from(false)),
            ("fillColor", PropertyValue::numbers([1.0, 0.0, 0.0])),
            ("applyStroke", PropertyValue::from(false)),
            ("fauxBold", PropertyValue::from(true)),
        ]),
    )
    .unwrap();

    let tree = encode_tree(&g, layer, &EncodeOpts::default());
    let record = tree
        .group("G0002 ADBE Text Properties")
        .and_then(|t| t.leaf("P0001 ADBE Text Document"))
        .unwrap();
    let value = record.value.as_ref().and_then(PropertyValue::as_record).unwrap();
    assert_eq!(value.get("text"), Some(&PropertyValue::from("Hello")));
    assert!(!value.contains_key("fillColor"));
    assert!(!value.contains_key("fauxBold"));
    assert_eq!(record.name.as_deref(), Some("Source Text"));
}

#[test]
fn shape_layers_encode_their_root_vectors() {
    let mut g = MemoryGraph::new();
    let layer = g.add_layer(LayerKind::Shape, "Shape Layer 1");
    let root = g.add_group(layer, "ADBE Root Vectors Group", "Contents", GroupKind::Indexed);
    let group = g.add_group(root, "ADBE Vector Group", "Rectangle 1", GroupKind::Named);
    let contents = g.add_group(group, "ADBE Vectors Group", "Contents", GroupKind::Indexed);
    let fill = g.add_group(contents, "ADBE Vector Graphic - Fill", "Fill 1", GroupKind::Named);
    let color = g.add_leaf(fill, "ADBE Vector Fill Color", "Color", [1.0, 1.0, 1.0, 1.0]);
    g.set_value(color, PropertyValue::numbers([0.2, 0.4, 0.6, 1.0]))
        .unwrap();

    let tree = encode_tree(&g, layer, &EncodeOpts::default());
    let rectangle = tree
        .group("G0001 ADBE Root Vectors Group")
        .and_then(|t| t.group("G0001 ADBE Vector Group"))
        .unwrap();
    assert_eq!(
        rectangle.meta().and_then(|m| m.get(Attribute::Name)),
        Some(&PropertyValue::from("Rectangle 1"))
    );
    assert!(
        rectangle
            .group("G0001 ADBE Vectors Group")
            .and_then(|t| t.group("G0001 ADBE Vector Graphic - Fill"))
            .and_then(|t| t.leaf("P0001 ADBE Vector Fill Color"))
            .is_some()
    );
}

#[test]
fn camera_layers_skip_raster_categories() {
    let mut g = MemoryGraph::new();
    let camera = g.add_layer(LayerKind::Camera, "Camera 1");
    let options = g.add_group(camera, "ADBE Camera Options Group", "Camera Options", GroupKind::Named);
    let zoom = g.add_leaf(options, "ADBE Camera Zoom", "Zoom", 1000.0);
    let effects = g.add_group(camera, "ADBE Effect Parade", "Effects", GroupKind::Indexed);
    let stray = g.add_group(effects, "ADBE Stray", "Stray", GroupKind::Named);
    g.with_enabled_toggle(stray);
    g.set_attribute(stray, Attribute::Enabled, PropertyValue::from(false))
        .unwrap();
    g.set_value(zoom, PropertyValue::from(800.0)).unwrap();

    let tree = encode_tree(&g, camera, &EncodeOpts::default());
    assert_eq!(
        key_names(&tree),
        vec!["S0000 selfProperty", "G0001 ADBE Camera Options Group"]
    );
    assert!(!tree.meta().unwrap().contains(Attribute::BlendingMode));
}

#[test]
fn unmodified_leaves_and_value_less_leaves_are_skipped() {
    let mut l = layer(LayerKind::Solid);
    l.g.set_value(l.opacity, PropertyValue::from(10.0)).unwrap();
    l.g.set_value(l.position, PropertyValue::numbers([1.0, 2.0, 0.0]))
        .unwrap();
    l.g.set_value_locked(l.position);

    let tree = encode_all(&l);
    let transform = tree.group("G0005 ADBE Transform Group").unwrap();
    assert_eq!(key_names(transform), vec!["P0007 ADBE Opacity"]);
}

#[test]
fn non_layer_root_is_keyed_by_its_own_index() {
    let mut l = layer(LayerKind::Solid);
    l.g.set_value(l.opacity, PropertyValue::from(50.0)).unwrap();
    let tree = encode_tree(&l.g, l.transform, &EncodeOpts::default());
    assert_eq!(key_names(&tree), vec!["G0005 ADBE Transform Group"]);
}

#[test]
fn repeated_encodes_are_byte_identical() {
    let mut l = layer(LayerKind::Solid);
    l.g.set_value(l.opacity, PropertyValue::from(50.0)).unwrap();
    l.g.set_keyframes(l.marker, &[Keyframe::new(1.0, "beat")]).unwrap();
    l.g.set_expression(l.position, "wiggle(1, 5)").unwrap();

    let first = encode_all(&l).to_json_string_pretty().unwrap();
    let second = encode_all(&l).to_json_string_pretty().unwrap();
    assert_eq!(first, second);
    assert_eq!(encode_all(&l).fingerprint(), encode_all(&l).fingerprint());
}
