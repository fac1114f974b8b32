use super::*;

#[test]
fn over_opaque_src_replaces_dst() {
    assert_eq!(over([1, 2, 3, 255], [200, 100, 50, 255], 1.0), [200, 100, 50, 255]);
}

#[test]
fn over_transparent_src_or_zero_opacity_keeps_dst() {
    let dst = [10, 20, 30, 255];
    assert_eq!(over(dst, [0, 0, 0, 0], 1.0), dst);
    assert_eq!(over(dst, [255, 255, 255, 255], 0.0), dst);
}

#[test]
fn over_half_opacity_mixes() {
    let out = over([0, 0, 0, 255], [255, 255, 255, 255], 0.5);
    assert_eq!(out[3], 255);
    assert!((i32::from(out[0]) - 128).abs() <= 1);
}

#[test]
fn over_in_place_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4], 1.0).is_err());
}

#[test]
fn over_in_place_composites_each_pixel() {
    let mut dst = vec![0, 0, 255, 255, 0, 0, 255, 255];
    let src = vec![255, 0, 0, 255, 0, 0, 0, 0];
    over_in_place(&mut dst, &src, 1.0).unwrap();
    assert_eq!(dst, vec![255, 0, 0, 255, 0, 0, 255, 255]);
}

#[test]
fn coverage_scales_all_channels() {
    assert_eq!(scale_by_coverage([200, 100, 50, 255], 255), [200, 100, 50, 255]);
    assert_eq!(scale_by_coverage([200, 100, 50, 255], 0), [0, 0, 0, 0]);
    assert_eq!(scale_by_coverage([255, 255, 255, 255], 128), [128, 128, 128, 128]);
}
