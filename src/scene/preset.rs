/// Named output size matching a platform's recommended image dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PlatformPreset {
    /// Stable lookup key, e.g. `youtube-thumbnail`.
    pub id: &'static str,
    /// Display name, e.g. `YouTube Thumbnail`.
    pub name: &'static str,
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
    /// Short hint shown next to the preset.
    pub description: &'static str,
}

/// Built-in presets, in display order.
pub const PLATFORM_PRESETS: &[PlatformPreset] = &[
    PlatformPreset {
        id: "instagram-square",
        name: "Instagram Square",
        width: 1080,
        height: 1080,
        description: "Perfect for Instagram feed posts",
    },
    PlatformPreset {
        id: "instagram-portrait",
        name: "Instagram Portrait",
        width: 1080,
        height: 1350,
        description: "Optimal for Instagram portrait posts",
    },
    PlatformPreset {
        id: "instagram-landscape",
        name: "Instagram Landscape",
        width: 1080,
        height: 608,
        description: "Best for Instagram landscape posts",
    },
    PlatformPreset {
        id: "youtube-thumbnail",
        name: "YouTube Thumbnail",
        width: 1280,
        height: 720,
        description: "Standard YouTube thumbnail size",
    },
    PlatformPreset {
        id: "youtube-banner",
        name: "YouTube Banner",
        width: 2560,
        height: 1440,
        description: "YouTube channel banner size",
    },
];

impl PlatformPreset {
    /// Look a preset up by id.
    pub fn find(id: &str) -> Option<&'static Self> {
        PLATFORM_PRESETS.iter().find(|p| p.id == id)
    }

    /// Export file stem: the display name lower-cased with whitespace runs replaced by `-`.
    pub fn file_stem(&self) -> String {
        self.name
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join("-")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/preset.rs"]
mod tests;
