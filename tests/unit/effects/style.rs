use super::*;
use crate::scene::layer::{GradientColors, ShadowOffset};

fn gradient_layer() -> TextLayer {
    TextLayer {
        gradient: true,
        gradient_colors: GradientColors {
            start: Color::rgb(255, 0, 0),
            middle: Color::rgb(0, 255, 0),
            end: Color::rgb(0, 0, 255),
        },
        ..TextLayer::default()
    }
}

#[test]
fn solid_fill_uses_layer_color() {
    let layer = TextLayer {
        color: Color::rgb(1, 2, 3),
        ..TextLayer::default()
    };
    let style = resolve_style(&layer, 100.0, 1.0);
    assert_eq!(style.fill, FillPaint::Solid(Color::rgb(1, 2, 3)));
    assert!(style.fill.is_uniform());
    assert_eq!(style.fill.sample(Point::new(-1000.0, 5.0)), Color::rgb(1, 2, 3));
}

#[test]
fn gradient_spans_centered_run_with_three_stops() {
    let style = resolve_style(&gradient_layer(), 200.0, 1.0);
    let FillPaint::LinearGradient(g) = style.fill else {
        panic!("expected gradient");
    };
    assert_eq!((g.x0, g.x1), (-100.0, 100.0));
    assert_eq!(
        g.stops.map(|s| s.offset),
        [0.0, 0.5, 1.0]
    );

    assert_eq!(style.fill.sample(Point::new(-100.0, 0.0)), Color::rgb(255, 0, 0));
    assert_eq!(style.fill.sample(Point::new(0.0, 0.0)), Color::rgb(0, 255, 0));
    assert_eq!(style.fill.sample(Point::new(100.0, 0.0)), Color::rgb(0, 0, 255));
    assert_eq!(style.fill.sample(Point::new(-50.0, 0.0)), Color::rgb(128, 128, 0));
}

#[test]
fn gradient_clamps_outside_run() {
    let style = resolve_style(&gradient_layer(), 10.0, 1.0);
    assert_eq!(style.fill.sample(Point::new(-60.0, 0.0)), Color::rgb(255, 0, 0));
    assert_eq!(style.fill.sample(Point::new(60.0, 0.0)), Color::rgb(0, 0, 255));
}

#[test]
fn zero_width_gradient_takes_start_color() {
    let style = resolve_style(&gradient_layer(), 0.0, 1.0);
    assert_eq!(style.fill.sample(Point::new(0.0, 0.0)), Color::rgb(255, 0, 0));
}

#[test]
fn shadow_only_when_enabled_and_visible() {
    let mut layer = TextLayer::default();
    assert!(resolve_style(&layer, 10.0, 1.0).shadow.is_none());

    layer.shadow = true;
    let shadow = resolve_style(&layer, 10.0, 1.0).shadow.unwrap();
    assert_eq!(shadow.color, Color::BLACK);
    assert_eq!(shadow.sigma, 2.5);
    assert_eq!(shadow.offset, Vec2::new(2.0, 2.0));

    layer.shadow_blur = 0.0;
    layer.shadow_offset = ShadowOffset { x: 0.0, y: 0.0 };
    assert!(resolve_style(&layer, 10.0, 1.0).shadow.is_none());

    layer.shadow_blur = 4.0;
    layer.shadow_color = Color::TRANSPARENT;
    assert!(resolve_style(&layer, 10.0, 1.0).shadow.is_none());
}

#[test]
fn pixel_effects_follow_surface_scale() {
    let layer = TextLayer {
        shadow: true,
        blur: 3.0,
        ..TextLayer::default()
    };
    let style = resolve_style(&layer, 10.0, 2.0);
    assert_eq!(style.blur_sigma, 6.0);
    let shadow = style.shadow.unwrap();
    assert_eq!(shadow.offset, Vec2::new(4.0, 4.0));
    assert_eq!(shadow.sigma, 5.0);
}

#[test]
fn alpha_is_opacity_and_layer_is_untouched() {
    let layer = TextLayer {
        opacity: 0.25,
        ..gradient_layer()
    };
    let before = layer.clone();
    let style = resolve_style(&layer, 10.0, 1.0);
    assert_eq!(style.alpha, 0.25);
    assert_eq!(layer, before);
}
