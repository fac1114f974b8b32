use super::*;
use crate::foundation::core::Color;
use crate::foundation::error::TextBehindError;

fn compositor(policy: FontSizePolicy) -> Compositor {
    let bytes = std::fs::read("tests/data/fonts/DejaVuSans.ttf").unwrap();
    let fonts = Arc::new(FontLibrary::from_font_bytes([bytes], "DejaVu Sans"));
    let cfg = EngineConfig {
        font_size_policy: policy,
        max_surface_dim: 4096,
        ..EngineConfig::default()
    };
    Compositor::new(fonts, &cfg)
}

fn blocks(color: Color, x: f64) -> TextLayer {
    TextLayer {
        text: "\u{2588}\u{2588}".to_string(),
        font_size: 30.0,
        font_family: "DejaVu Sans".to_string(),
        color,
        position: crate::scene::layer::LayerPosition { x, y: 50.0 },
        ..TextLayer::default()
    }
}

#[test]
fn render_is_deterministic() {
    let c = compositor(FontSizePolicy::ScaleWithSurface);
    let bg = RasterImage::solid(64, 48, Color::rgb(10, 20, 30));
    let fg = RasterImage::transparent(64, 48);
    let layers = vec![blocks(Color::WHITE, 50.0)];
    let inputs = CompositeInputs::new(&bg, &layers, &fg);

    let a = c.compose(&inputs, Canvas::new(64, 48), OutputEncoding::png()).unwrap();
    let b = c.compose(&inputs, Canvas::new(64, 48), OutputEncoding::png()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn later_layers_draw_on_top() {
    let c = compositor(FontSizePolicy::Absolute);
    let bg = RasterImage::solid(100, 60, Color::BLACK);
    let fg = RasterImage::transparent(100, 60);
    let layers = vec![blocks(Color::rgb(255, 0, 0), 50.0), blocks(Color::rgb(0, 0, 255), 55.0)];
    let frame = c
        .render(&CompositeInputs::new(&bg, &layers, &fg), Canvas::new(100, 60))
        .unwrap();
    assert_eq!(frame.pixel(52, 30), [0, 0, 255, 255]);
}

#[test]
fn opaque_foreground_hides_text() {
    let c = compositor(FontSizePolicy::Absolute);
    let bg = RasterImage::solid(80, 40, Color::BLACK);
    // Left half opaque green subject, right half transparent.
    let mut fg_px = Vec::new();
    for _y in 0..40 {
        for x in 0..80 {
            fg_px.extend_from_slice(if x < 40 { &[0, 200, 0, 255] } else { &[0, 0, 0, 0] });
        }
    }
    let fg = RasterImage::from_premul(80, 40, fg_px).unwrap();
    let layers = vec![TextLayer {
        text: "\u{2588}\u{2588}\u{2588}\u{2588}".to_string(),
        ..blocks(Color::WHITE, 50.0)
    }];
    let frame = c
        .render(&CompositeInputs::new(&bg, &layers, &fg), Canvas::new(80, 40))
        .unwrap();
    assert_eq!(frame.pixel(36, 20), [0, 200, 0, 255]);
    assert_eq!(frame.pixel(44, 20), [255, 255, 255, 255]);
}

#[test]
fn mismatched_foreground_is_stretched() {
    let c = compositor(FontSizePolicy::Absolute);
    let bg = RasterImage::solid(40, 40, Color::BLACK);
    let fg = RasterImage::solid(10, 10, Color::rgb(0, 0, 200));
    let frame = c
        .render(&CompositeInputs::new(&bg, &[], &fg), Canvas::new(40, 40))
        .unwrap();
    assert_eq!(frame.pixel(39, 39), [0, 0, 200, 255]);
}

#[test]
fn font_size_scales_with_surface_height() {
    let c = compositor(FontSizePolicy::ScaleWithSurface);
    let bg = RasterImage::solid(100, 50, Color::BLACK);
    let fg = RasterImage::transparent(100, 50);
    let layers = vec![blocks(Color::WHITE, 50.0)];
    let inputs = CompositeInputs::new(&bg, &layers, &fg);

    let painted = |img: &RasterImage| {
        img.rgba8_premul
            .chunks_exact(4)
            .filter(|p| p[0] > 128)
            .count()
    };
    let small = c.render(&inputs, Canvas::new(100, 50)).unwrap();
    let large = c.render(&inputs, Canvas::new(200, 100)).unwrap();
    let ratio = painted(&large) as f64 / painted(&small) as f64;
    assert!((3.4..4.6).contains(&ratio), "ratio {ratio}");
}

#[test]
fn undecodable_planes_are_named() {
    let c = compositor(FontSizePolicy::Absolute);
    let good = {
        let mut buf = Vec::new();
        image::DynamicImage::new_rgba8(4, 4)
            .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    };
    let err = c
        .compose_encoded(b"nope", &[], &good, None, OutputEncoding::png())
        .unwrap_err();
    assert!(matches!(err, TextBehindError::ImageDecode { role: ImageRole::Background, .. }));
    let err = c
        .compose_encoded(&good, &[], b"nope", None, OutputEncoding::png())
        .unwrap_err();
    assert!(matches!(err, TextBehindError::ImageDecode { role: ImageRole::Foreground, .. }));

    let ok = c
        .compose_encoded(&good, &[], &good, None, OutputEncoding::png())
        .unwrap();
    assert_eq!((ok.width, ok.height), (4, 4));
}

#[test]
fn oversized_or_empty_target_is_surface_unavailable() {
    let c = compositor(FontSizePolicy::Absolute);
    let bg = RasterImage::solid(4, 4, Color::BLACK);
    let fg = RasterImage::transparent(4, 4);
    let inputs = CompositeInputs::new(&bg, &[], &fg);
    for canvas in [Canvas::new(0, 4), Canvas::new(5000, 4)] {
        let err = c.render(&inputs, canvas).unwrap_err();
        assert!(matches!(err, TextBehindError::SurfaceUnavailable(_)));
    }
}

#[test]
fn invalid_layer_is_rejected_before_drawing() {
    let c = compositor(FontSizePolicy::Absolute);
    let bg = RasterImage::solid(4, 4, Color::BLACK);
    let fg = RasterImage::transparent(4, 4);
    let layers = vec![TextLayer {
        opacity: 3.0,
        ..TextLayer::default()
    }];
    let err = c
        .render(&CompositeInputs::new(&bg, &layers, &fg), Canvas::new(4, 4))
        .unwrap_err();
    assert!(matches!(err, TextBehindError::Validation(_)));
}

#[test]
fn composite_result_keeps_planes_for_rerender() {
    let c = compositor(FontSizePolicy::ScaleWithSurface);
    let bg = RasterImage::solid(40, 20, Color::rgb(1, 2, 3));
    let fg = RasterImage::transparent(40, 20);
    let layers = vec![blocks(Color::WHITE, 50.0)];
    let result = c
        .compose_result(bg.clone(), layers.clone(), fg.clone(), OutputEncoding::png())
        .unwrap();
    assert_eq!((result.width(), result.height()), (40, 20));
    assert_eq!(result.layers, layers);
    assert_eq!(result.reference_height, 20);

    let again = c
        .compose(&result.inputs(), Canvas::new(40, 20), OutputEncoding::png())
        .unwrap();
    assert_eq!(again, result.encoded);
}
