use super::*;

#[test]
fn empty_json_yields_defaults() {
    let cfg: EngineConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg, EngineConfig::default());
    assert_eq!(cfg.render_policy, RenderPolicy::Lazy);
    assert_eq!(cfg.segmentation_fallback, SegmentationFallback::Propagate);
    assert_eq!(cfg.default_jpeg_quality, 90);
}

#[test]
fn snake_case_enums_parse() {
    let cfg: EngineConfig = serde_json::from_str(
        r#"{"render_policy":"eager","font_size_policy":"absolute",
            "segmentation_fallback":"no_occlusion","fonts":{"load_system_fonts":false}}"#,
    )
    .unwrap();
    assert_eq!(cfg.render_policy, RenderPolicy::Eager);
    assert_eq!(cfg.font_size_policy, FontSizePolicy::Absolute);
    assert_eq!(cfg.segmentation_fallback, SegmentationFallback::NoOcclusion);
    assert!(!cfg.fonts.load_system_fonts);
    assert_eq!(cfg.fonts.fallback_family, "DejaVu Sans");
}

#[test]
fn font_scale_follows_policy() {
    assert_eq!(FontSizePolicy::Absolute.font_scale(1440, 720), 1.0);
    assert_eq!(FontSizePolicy::ScaleWithSurface.font_scale(1440, 720), 2.0);
    assert_eq!(FontSizePolicy::ScaleWithSurface.font_scale(300, 600), 0.5);
    assert_eq!(FontSizePolicy::ScaleWithSurface.font_scale(300, 0), 1.0);
}

#[test]
fn surface_limit_never_exceeds_rasterizer() {
    let cfg = EngineConfig {
        max_surface_dim: 100_000,
        ..EngineConfig::default()
    };
    assert_eq!(cfg.surface_dim_limit(), RASTER_DIM_LIMIT);
}

#[test]
fn missing_config_file_is_config_error() {
    let err = EngineConfig::from_json_file(Path::new("target/does-not-exist.json"))
        .unwrap_err();
    assert!(err.to_string().contains("config error:"));
}
