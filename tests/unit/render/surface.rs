use super::*;
use crate::foundation::core::Color;

#[test]
fn zero_or_oversized_surfaces_are_unavailable() {
    for canvas in [Canvas::new(0, 10), Canvas::new(10, 0), Canvas::new(5000, 10)] {
        let err = check_surface(canvas, 4096).unwrap_err();
        assert!(matches!(err, TextBehindError::SurfaceUnavailable(_)), "{err}");
    }
    assert!(check_surface(Canvas::new(4096, 4096), 4096).is_ok());
    // The caller's limit cannot lift the rasterizer ceiling.
    assert!(check_surface(Canvas::new(RASTER_DIM_LIMIT + 1, 1), u32::MAX).is_err());
}

#[test]
fn new_surface_is_transparent() {
    let s = Surface::new(Canvas::new(3, 2), 100).unwrap();
    assert_eq!(s.data.len(), 24);
    assert!(s.data.iter().all(|&b| b == 0));
}

#[test]
fn draw_stretched_fills_surface() {
    let mut s = Surface::new(Canvas::new(8, 4), 100).unwrap();
    s.draw_stretched(&RasterImage::solid(2, 2, Color::rgb(9, 8, 7))).unwrap();
    let img = s.into_raster().unwrap();
    assert_eq!(img.pixel(0, 0), [9, 8, 7, 255]);
    assert_eq!(img.pixel(7, 3), [9, 8, 7, 255]);
}

#[test]
fn coverage_of_filled_rect() {
    let cov = rasterize_coverage(Canvas::new(10, 10), Affine::translate((2.0, 3.0)), |ctx| {
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, 4.0, 4.0));
    })
    .unwrap();
    assert_eq!(cov.len(), 100);
    assert_eq!(cov[4 * 10 + 3], 255);
    assert_eq!(cov[0], 0);
    assert_eq!(cov[9 * 10 + 9], 0);
}
