use super::*;

#[test]
fn blur_radius_0_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    let out = blur_rgba8_premul(&src, 1, 2, 0, 1.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_constant_image_is_identity() {
    let (w, h) = (4u32, 3u32);
    let px = [10u8, 20u8, 30u8, 40u8];
    let src = px.repeat((w * h) as usize);
    let out = blur_rgba8_premul(&src, w, h, 3, 2.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let (w, h) = (5u32, 5u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    let center = ((2 * w + 2) * 4) as usize;
    src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

    let out = blur_rgba8_premul(&src, w, h, 2, 1.2).unwrap();

    let nonzero = out.chunks_exact(4).filter(|px| px[3] != 0).count();
    assert!(nonzero > 1);

    let sum_a: u32 = out.chunks_exact(4).map(|px| u32::from(px[3])).sum();
    assert!((sum_a as i32 - 255).abs() <= 4);
}

#[test]
fn kernel_radius_covers_three_sigma() {
    assert_eq!(kernel_radius(0.0), 0);
    assert_eq!(kernel_radius(-1.0), 0);
    assert_eq!(kernel_radius(f32::NAN), 0);
    assert_eq!(kernel_radius(1.0), 3);
    assert_eq!(kernel_radius(2.5), 8);
}

#[test]
fn alpha_bounds_are_tight_and_expand_clamps() {
    let (w, h) = (6u32, 4u32);
    let mut buf = vec![0u8; (w * h * 4) as usize];
    for (x, y) in [(2u32, 1u32), (3, 2)] {
        let i = ((y * w + x) * 4) as usize;
        buf[i + 3] = 255;
    }
    let b = PixelBounds::of_alpha(&buf, w, h).unwrap();
    assert_eq!(b, PixelBounds { x0: 2, y0: 1, x1: 4, y1: 3 });
    assert_eq!(b.expand(5, w, h), PixelBounds { x0: 0, y0: 0, x1: 6, y1: 4 });
    assert!(PixelBounds::of_alpha(&vec![0u8; 16], 2, 2).is_none());
}

#[test]
fn painted_blur_matches_full_blur_in_window() {
    let (w, h) = (40u32, 30u32);
    let mut buf = vec![0u8; (w * h * 4) as usize];
    for y in 12..16u32 {
        for x in 18..22u32 {
            let i = ((y * w + x) * 4) as usize;
            buf[i..i + 4].copy_from_slice(&[255, 0, 0, 255]);
        }
    }
    let full = blur_rgba8_premul(&buf, w, h, kernel_radius(2.0), 2.0).unwrap();
    let mut windowed = buf.clone();
    blur_painted_in_place(&mut windowed, w, h, 2.0).unwrap();
    assert_eq!(windowed, full);
}

#[test]
fn painted_blur_on_empty_buffer_is_noop() {
    let mut buf = vec![0u8; 64];
    blur_painted_in_place(&mut buf, 4, 4, 3.0).unwrap();
    assert!(buf.iter().all(|&b| b == 0));
}
