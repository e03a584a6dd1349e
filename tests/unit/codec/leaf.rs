use super::*;
use crate::codec::text::TEXT_DOCUMENT;
use crate::graph::{GroupKind, LayerKind, memory::MemoryGraph};

fn opacity_graph() -> (MemoryGraph, crate::graph::memory::NodeId) {
    let mut g = MemoryGraph::new();
    let layer = g.add_layer(LayerKind::Solid, "Solid 1");
    let transform = g.add_group(layer, "ADBE Transform Group", "Transform", GroupKind::Named);
    let opacity = g.add_leaf(transform, "ADBE Opacity", "Opacity", 100.0);
    (g, opacity)
}

#[test]
fn static_leaf_emits_value_and_name() {
    let (mut g, opacity) = opacity_graph();
    g.set_value(opacity, PropertyValue::from(50.0)).unwrap();

    let record = encode_leaf(&g, opacity);
    assert_eq!(record.value, Some(PropertyValue::from(50.0)));
    assert_eq!(record.keyframes, None);
    assert_eq!(record.name.as_deref(), Some("Opacity"));
    assert_eq!(record.expression, None);
}

#[test]
fn animated_leaf_emits_keyframes_only() {
    let (mut g, opacity) = opacity_graph();
    let keys = vec![Keyframe::new(0.0, 0.0), Keyframe::new(1.0, 100.0)];
    g.set_keyframes(opacity, &keys).unwrap();

    let record = encode_leaf(&g, opacity);
    assert_eq!(record.value, None);
    assert_eq!(record.keyframes, Some(keys));
}

#[test]
fn expression_needs_source_and_enable_flag() {
    let (mut g, opacity) = opacity_graph();
    g.set_expression(opacity, "wiggle(2, 10)").unwrap();
    g.set_expression_enabled(opacity, false);
    assert_eq!(encode_leaf(&g, opacity).expression, None);

    g.set_expression_enabled(opacity, true);
    assert_eq!(
        encode_leaf(&g, opacity).expression.as_deref(),
        Some("wiggle(2, 10)")
    );
}

#[test]
fn decode_replaces_whole_key_sequence() {
    let (mut g, opacity) = opacity_graph();
    g.set_keyframes(
        opacity,
        &[Keyframe::new(0.0, 1.0), Keyframe::new(2.0, 2.0), Keyframe::new(3.0, 3.0)],
    )
    .unwrap();

    let record = LeafRecord::with_keyframes(vec![Keyframe::new(5.0, 42.0)]);
    decode_leaf(&mut g, opacity, &record).unwrap();
    assert_eq!(g.keyframes(opacity), vec![Keyframe::new(5.0, 42.0)]);
}

#[test]
fn decode_static_value_clears_existing_keys() {
    let (mut g, opacity) = opacity_graph();
    g.set_keyframes(opacity, &[Keyframe::new(0.0, 1.0)]).unwrap();

    decode_leaf(&mut g, opacity, &LeafRecord::with_value(25.0)).unwrap();
    assert!(g.keyframes(opacity).is_empty());
    assert_eq!(g.value(opacity), PropertyValue::from(25.0));
}

#[test]
fn decode_ignores_debug_name_and_applies_expression() {
    let (mut g, opacity) = opacity_graph();
    let record = LeafRecord {
        name: Some("Renamed".to_string()),
        ..LeafRecord::default()
    }
    .expression("time * 10");

    decode_leaf(&mut g, opacity, &record).unwrap();
    assert_eq!(g.display_name(opacity), "Opacity");
    assert_eq!(g.value(opacity), PropertyValue::from(100.0));
    let expr = g.expression(opacity);
    assert!(expr.is_active());
    assert_eq!(expr.source, "time * 10");
}

#[test]
fn legacy_keyframe_field_name_is_accepted() {
    let record: LeafRecord =
        serde_json::from_str(r#"{"Keyframe":[{"time":0,"value":1}]}"#).unwrap();
    assert_eq!(record.keyframes, Some(vec![Keyframe::new(0.0, 1.0)]));
}

fn text_graph() -> (MemoryGraph, crate::graph::memory::NodeId) {
    let mut g = MemoryGraph::new();
    let layer = g.add_layer(LayerKind::Text, "Title");
    let text = g.add_group(layer, "ADBE Text Properties", "Text", GroupKind::Named);
    let doc = g.add_leaf(
        text,
        TEXT_DOCUMENT,
        "Source Text",
        PropertyValue::record([
            ("text", PropertyValue::from("Hello")),
            ("applyFill", PropertyValue::from(false)),
            ("applyStroke", PropertyValue::from(false)),
            ("fillColor", PropertyValue::from([0.2, 0.4, 0.6])),
            ("fontSize", PropertyValue::from(48.0)),
        ]),
    );
    (g, doc)
}

#[test]
fn text_leaf_omits_fill_color_when_fill_is_off() {
    let (g, doc) = text_graph();
    let record = encode_text_leaf(&g, doc);
    let value = record.value.unwrap();
    assert!(value.field("fillColor").is_none());
    assert_eq!(value.field("text"), Some(&PropertyValue::from("Hello")));
}

#[test]
fn text_decode_without_fill_color_keeps_live_color() {
    let (mut g, doc) = text_graph();
    let record = LeafRecord::with_value(PropertyValue::record([
        ("text", PropertyValue::from("World")),
        ("fontSize", PropertyValue::Null),
    ]));

    decode_leaf(&mut g, doc, &record).unwrap();
    let live = g.value(doc);
    assert_eq!(live.field("text"), Some(&PropertyValue::from("World")));
    assert_eq!(live.field("fontSize"), Some(&PropertyValue::from(48.0)));
    assert_eq!(
        live.field("fillColor"),
        Some(&PropertyValue::from([0.2, 0.4, 0.6]))
    );
}

#[test]
fn text_keyframes_are_flattened_and_merged_back() {
    let (mut g, doc) = text_graph();
    let full = g.value(doc);
    let second = full.merged_with(&PropertyValue::record([(
        "text",
        PropertyValue::from("Bye"),
    )]));
    g.set_keyframes(doc, &[Keyframe::new(0.0, full.clone()), Keyframe::new(1.0, second)])
        .unwrap();

    let record = encode_text_leaf(&g, doc);
    let keys = record.keyframes.clone().unwrap();
    assert!(keys.iter().all(|k| k.value.field("fillColor").is_none()));

    decode_leaf(&mut g, doc, &record).unwrap();
    let live = g.keyframes(doc);
    assert_eq!(live.len(), 2);
    assert_eq!(live[1].value.field("text"), Some(&PropertyValue::from("Bye")));
    assert_eq!(
        live[1].value.field("fillColor"),
        Some(&PropertyValue::from([0.2, 0.4, 0.6]))
    );
}
