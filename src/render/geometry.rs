use crate::foundation::core::{Affine, Canvas, Point, Vec2};
use crate::scene::layer::TextLayer;

/// Absolute anchor of a layer on `canvas`: `(x/100 * W, y/100 * H)`.
pub fn anchor_point(layer: &TextLayer, canvas: Canvas) -> Point {
    Point::new(
        layer.position.x / 100.0 * f64::from(canvas.width),
        layer.position.y / 100.0 * f64::from(canvas.height),
    )
}

/// Local-to-surface transform of a layer.
///
/// Composed as translate(anchor), then rotate (degrees, clockwise on a y-down surface), then
/// uniform scale, then skew (degrees). Order matters: the skew acts in the already rotated and
/// scaled frame.
pub fn layer_transform(layer: &TextLayer, canvas: Canvas) -> Affine {
    let anchor = anchor_point(layer, canvas);
    Affine::translate(anchor.to_vec2())
        * Affine::rotate(layer.rotation.to_radians())
        * Affine::scale(layer.scale)
        * skew_transform(layer.transform.skew_x, layer.transform.skew_y)
}

/// Shear with angles in degrees, matching a 2D canvas `transform(1, tan(y), tan(x), 1, 0, 0)`.
pub fn skew_transform(skew_x_deg: f64, skew_y_deg: f64) -> Affine {
    Affine::skew(skew_x_deg.to_radians().tan(), skew_y_deg.to_radians().tan())
}

/// Offset that centers a `width x height` text box on the local origin.
pub fn centering_offset(width: f64, height: f64) -> Vec2 {
    Vec2::new(-width / 2.0, -height / 2.0)
}

/// A transform that maps everything onto a point or a line draws nothing.
pub fn is_degenerate(transform: Affine) -> bool {
    let det = transform.determinant();
    !det.is_finite() || det.abs() < 1e-12
}

#[cfg(test)]
#[path = "../../tests/unit/render/geometry.rs"]
mod tests;
