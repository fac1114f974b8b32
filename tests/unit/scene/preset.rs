use super::*;

#[test]
fn table_matches_published_sizes() {
    let dims: Vec<(&str, u32, u32)> = PLATFORM_PRESETS
        .iter()
        .map(|p| (p.id, p.width, p.height))
        .collect();
    assert_eq!(
        dims,
        vec![
            ("instagram-square", 1080, 1080),
            ("instagram-portrait", 1080, 1350),
            ("instagram-landscape", 1080, 608),
            ("youtube-thumbnail", 1280, 720),
            ("youtube-banner", 2560, 1440),
        ]
    );
}

#[test]
fn find_and_file_stem() {
    let p = PlatformPreset::find("youtube-thumbnail").unwrap();
    assert_eq!(p.file_stem(), "youtube-thumbnail");
    assert_eq!(
        PlatformPreset::find("instagram-square").unwrap().file_stem(),
        "instagram-square"
    );
    assert!(PlatformPreset::find("tiktok").is_none());
}
