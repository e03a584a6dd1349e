use super::*;

#[test]
fn default_interpolation_is_omitted() {
    let key = Keyframe::new(0.5, 10.0);
    let json = serde_json::to_value(&key).unwrap();
    assert_eq!(json, serde_json::json!({ "time": 0.5, "value": 10.0 }));
}

#[test]
fn interpolation_uses_host_names() {
    let key = Keyframe::new(1.0, [0.0, 0.0]).with_interpolation(KeyframeInterpolation {
        in_type: InterpolationType::Bezier,
        out_type: InterpolationType::Hold,
        in_ease: vec![TemporalEase {
            speed: 0.0,
            influence: 33.3,
        }],
        roving: true,
        ..KeyframeInterpolation::default()
    });

    let json = serde_json::to_value(&key).unwrap();
    let interp = &json["interpolation"];
    assert_eq!(interp["inType"], "BEZIER");
    assert_eq!(interp["outType"], "HOLD");
    assert_eq!(interp["roving"], true);
    assert!(interp.get("temporalContinuous").is_none());
    assert!(interp.get("outEase").is_none());

    let back: Keyframe = serde_json::from_value(json).unwrap();
    assert_eq!(back, key);
}

#[test]
fn map_value_keeps_time_and_interpolation() {
    let key = Keyframe::new(2.0, 1.0).with_interpolation(KeyframeInterpolation::default());
    let mapped = key.map_value(|_| PropertyValue::from(4.0));
    assert_eq!(mapped.time, 2.0);
    assert_eq!(mapped.value, PropertyValue::from(4.0));
    assert!(mapped.interpolation.is_some());
}
