use super::*;

#[test]
fn default_layer_matches_editor_defaults() {
    let l = TextLayer::with_id(LayerId(7));
    assert_eq!(l.id, LayerId(7));
    assert_eq!(l.text, "New Text");
    assert_eq!(l.position, LayerPosition { x: 50.0, y: 50.0 });
    assert_eq!(l.font_size, 24.0);
    assert_eq!(l.color, Color::WHITE);
    assert_eq!(l.shadow_offset, ShadowOffset { x: 2.0, y: 2.0 });
    assert_eq!(l.gradient_colors.middle, Color::rgb(0, 255, 0));
    assert!(!l.shadow && !l.gradient);
    l.validate().unwrap();
}

#[test]
fn layer_json_uses_camel_case_and_defaults_missing_fields() {
    let json = r##"{
        "text": "HELLO",
        "position": {"x": 25, "y": 75},
        "fontSize": 48,
        "color": "#ff0000",
        "gradientColors": {"start": "#000", "middle": "#fff", "end": "#000"},
        "transform": {"skewX": 10, "skewY": 0}
    }"##;
    let l: TextLayer = serde_json::from_str(json).unwrap();
    assert_eq!(l.text, "HELLO");
    assert_eq!(l.position.x, 25.0);
    assert_eq!(l.font_size, 48.0);
    assert_eq!(l.color, Color::rgb(255, 0, 0));
    assert_eq!(l.transform.skew_x, 10.0);
    assert_eq!(l.font_family, "Arial");
    assert_eq!(l.opacity, 1.0);

    let out = serde_json::to_value(&l).unwrap();
    assert!(out.get("fontFamily").is_some());
    assert!(out.get("shadowOffset").is_some());
}

#[test]
fn validate_rejects_out_of_range_values() {
    let base = TextLayer::default();

    let mut l = base.clone();
    l.font_size = 0.0;
    assert!(l.validate().is_err());

    let mut l = base.clone();
    l.opacity = 1.5;
    assert!(l.validate().is_err());

    let mut l = base.clone();
    l.position.x = 101.0;
    assert!(l.validate().is_err());

    let mut l = base.clone();
    l.rotation = f64::NAN;
    assert!(l.validate().is_err());

    let mut l = base.clone();
    l.scale = 0.0;
    l.validate().unwrap();
}

#[test]
fn patch_merges_only_present_fields() {
    let layer = TextLayer::with_id(LayerId(1));
    let patch = TextLayerPatch {
        text: Some("Hi".to_string()),
        gradient: Some(true),
        ..TextLayerPatch::default()
    };
    let out = patch.apply_to(&layer).unwrap();
    assert_eq!(out.id, LayerId(1));
    assert_eq!(out.text, "Hi");
    assert!(out.gradient);
    assert_eq!(out.font_size, layer.font_size);
    assert_eq!(out.color, layer.color);
}

#[test]
fn failing_patch_leaves_layer_untouched() {
    let layer = TextLayer::default();
    let patch = TextLayerPatch {
        text: Some("changed".to_string()),
        opacity: Some(-1.0),
        ..TextLayerPatch::default()
    };
    assert!(patch.apply_to(&layer).is_err());
    assert_eq!(layer.text, "New Text");
    assert!(TextLayerPatch::default().is_empty());
    assert!(!patch.is_empty());
}
