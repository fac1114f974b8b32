use super::*;
use crate::scene::layer::{LayerPosition, SkewTransform};

fn assert_coeffs(a: Affine, expected: [f64; 6]) {
    for (got, want) in a.as_coeffs().iter().zip(expected) {
        assert!((got - want).abs() < 1e-9, "{:?} != {:?}", a.as_coeffs(), expected);
    }
}

#[test]
fn anchor_is_percentage_of_surface() {
    let layer = TextLayer {
        position: LayerPosition { x: 25.0, y: 75.0 },
        ..TextLayer::default()
    };
    assert_eq!(anchor_point(&layer, Canvas::new(800, 600)), Point::new(200.0, 450.0));
}

#[test]
fn centered_layer_anchors_at_surface_center() {
    let layer = TextLayer::default();
    for (w, h) in [(100, 100), (1024, 768), (2560, 1440)] {
        let t = layer_transform(&layer, Canvas::new(w, h));
        let origin = t * Point::ORIGIN;
        assert_eq!(origin, Point::new(f64::from(w) / 2.0, f64::from(h) / 2.0));
    }
}

#[test]
fn rotation_90_scale_2_matches_reference_matrix() {
    let layer = TextLayer {
        rotation: 90.0,
        scale: 2.0,
        ..TextLayer::default()
    };
    let t = layer_transform(&layer, Canvas::new(100, 100));
    assert_coeffs(t, [0.0, 2.0, -2.0, 0.0, 50.0, 50.0]);

    // Local +x points down the surface (clockwise).
    let p = t * Point::new(10.0, 0.0);
    assert!((p.x - 50.0).abs() < 1e-9 && (p.y - 70.0).abs() < 1e-9);
}

#[test]
fn skew_is_applied_after_rotation_and_scale() {
    let layer = TextLayer {
        rotation: 90.0,
        scale: 2.0,
        transform: SkewTransform {
            skew_x: 45.0,
            skew_y: 0.0,
        },
        ..TextLayer::default()
    };
    let t = layer_transform(&layer, Canvas::new(100, 100));
    // translate * rotate(90) * scale(2) * [1 0 1 1] (column-major a b c d)
    assert_coeffs(t, [0.0, 2.0, -2.0, 2.0, 50.0, 50.0]);

    let skew_first = Affine::translate((50.0, 50.0))
        * skew_transform(45.0, 0.0)
        * Affine::rotate(std::f64::consts::FRAC_PI_2)
        * Affine::scale(2.0);
    assert_ne!(
        (t * Point::new(1.0, 1.0)).round(),
        (skew_first * Point::new(1.0, 1.0)).round()
    );
}

#[test]
fn zero_scale_is_degenerate_but_finite() {
    let layer = TextLayer {
        scale: 0.0,
        ..TextLayer::default()
    };
    let t = layer_transform(&layer, Canvas::new(10, 10));
    assert!(is_degenerate(t));
    assert_eq!(t * Point::new(123.0, -4.0), Point::new(5.0, 5.0));
    assert!(!is_degenerate(layer_transform(&TextLayer::default(), Canvas::new(10, 10))));
}

#[test]
fn centering_offset_is_half_box() {
    assert_eq!(centering_offset(40.0, 10.0), Vec2::new(-20.0, -5.0));
}
