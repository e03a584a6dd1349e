use super::*;

fn host_document(apply_fill: bool, apply_stroke: bool, box_text: bool) -> PropertyValue {
    PropertyValue::record([
        ("text", PropertyValue::from("Hello")),
        ("applyFill", PropertyValue::from(apply_fill)),
        ("applyStroke", PropertyValue::from(apply_stroke)),
        ("boxText", PropertyValue::from(box_text)),
        ("font", PropertyValue::from("ArialMT")),
        ("fontSize", PropertyValue::from(72.0)),
        ("justification", PropertyValue::from("CENTER_JUSTIFY")),
        ("leading", PropertyValue::from(86.4)),
        ("tracking", PropertyValue::from(0.0)),
        ("fillColor", PropertyValue::from([1.0, 0.0, 0.0])),
        ("strokeColor", PropertyValue::from([0.0, 0.0, 1.0])),
        ("strokeOverFill", PropertyValue::from(true)),
        ("strokeWidth", PropertyValue::from(2.0)),
        ("boxTextSize", PropertyValue::from([400.0, 200.0])),
        ("baselineLocs", PropertyValue::from([0.0, 0.0, 10.0, 0.0])),
    ])
}

#[test]
fn disabled_fill_drops_fill_color() {
    let flat = flatten_text_document(&host_document(false, false, false));
    assert!(flat.field("fillColor").is_none());
    assert!(flat.field("strokeColor").is_none());
    assert!(flat.field("strokeWidth").is_none());
    assert!(flat.field("strokeOverFill").is_none());
    assert!(flat.field("boxTextSize").is_none());
    assert_eq!(flat.field("text"), Some(&PropertyValue::from("Hello")));
    assert_eq!(flat.field("applyFill"), Some(&PropertyValue::from(false)));
}

#[test]
fn enabled_toggles_keep_guarded_fields() {
    let flat = flatten_text_document(&host_document(true, true, true));
    assert_eq!(
        flat.field("fillColor"),
        Some(&PropertyValue::from([1.0, 0.0, 0.0]))
    );
    assert_eq!(flat.field("strokeWidth"), Some(&PropertyValue::from(2.0)));
    assert_eq!(flat.field("strokeOverFill"), Some(&PropertyValue::from(true)));
    assert_eq!(
        flat.field("boxTextSize"),
        Some(&PropertyValue::from([400.0, 200.0]))
    );
}

#[test]
fn read_only_host_fields_are_not_carried() {
    let flat = flatten_text_document(&host_document(true, true, true));
    assert!(flat.field("baselineLocs").is_none());
    assert!(flat.field("boxText").is_none());
}

#[test]
fn non_record_values_pass_through() {
    assert_eq!(
        flatten_text_document(&PropertyValue::from(3.0)),
        PropertyValue::from(3.0)
    );
}
