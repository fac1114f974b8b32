//! Engine configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config file. A handful of
//! `TEXTBEHIND_*` environment variables override the file values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::foundation::error::{TextBehindError, TextBehindResult};

/// Largest surface edge the CPU rasterizer can address.
pub const RASTER_DIM_LIMIT: u32 = u16::MAX as u32;

/// When the session re-runs the composite engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderPolicy {
    /// Re-compose only on an explicit process/re-render request.
    #[default]
    Lazy,
    /// Re-compose from the cached cutout after every layer mutation.
    Eager,
}

/// How a layer's `fontSize` maps to pixels on a given surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontSizePolicy {
    /// `fontSize` is pixels at the source image's natural height and scales with the surface.
    #[default]
    ScaleWithSurface,
    /// `fontSize` is raw pixels on every surface.
    Absolute,
}

impl FontSizePolicy {
    /// Multiplier applied to `fontSize` when drawing on a surface of `surface_height` pixels for
    /// an image whose natural height is `reference_height`.
    pub fn font_scale(self, surface_height: u32, reference_height: u32) -> f64 {
        match self {
            Self::Absolute => 1.0,
            Self::ScaleWithSurface if reference_height == 0 => 1.0,
            Self::ScaleWithSurface => f64::from(surface_height) / f64::from(reference_height),
        }
    }
}

/// What to do when segmentation fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentationFallback {
    /// Surface the failure to the caller; the previous composite stays intact.
    #[default]
    Propagate,
    /// Compose with a fully transparent foreground, so text is drawn but nothing occludes it.
    NoOcclusion,
}

/// Font discovery settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FontsConfig {
    /// Scan the platform font directories.
    pub load_system_fonts: bool,
    /// Additional directories scanned recursively for font files.
    pub font_dirs: Vec<PathBuf>,
    /// Family used when a layer's family is unavailable.
    pub fallback_family: String,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            load_system_fonts: true,
            font_dirs: Vec::new(),
            fallback_family: "DejaVu Sans".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "textbehind=debug,warn").
    pub level: String,
    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Top-level engine configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub render_policy: RenderPolicy,
    pub font_size_policy: FontSizePolicy,
    pub segmentation_fallback: SegmentationFallback,
    /// Upper bound on a single segmentation call.
    pub segmentation_timeout_secs: u64,
    /// Largest accepted surface edge; clamped to [`RASTER_DIM_LIMIT`].
    pub max_surface_dim: u32,
    /// JPEG quality used when the caller gives none.
    pub default_jpeg_quality: u8,
    pub fonts: FontsConfig,
    pub logging: LoggingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            render_policy: RenderPolicy::default(),
            font_size_policy: FontSizePolicy::default(),
            segmentation_fallback: SegmentationFallback::default(),
            segmentation_timeout_secs: 180,
            max_surface_dim: 16384,
            default_jpeg_quality: 90,
            fonts: FontsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Read a JSON config file and apply environment overrides.
    pub fn from_json_file(path: &Path) -> TextBehindResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            TextBehindError::config(format!("read config '{}': {e}", path.display()))
        })?;
        let cfg: Self = serde_json::from_str(&raw).map_err(|e| {
            TextBehindError::config(format!("parse config '{}': {e}", path.display()))
        })?;
        Ok(cfg.with_env_overrides())
    }

    /// Apply `TEXTBEHIND_*` environment overrides on top of `self`.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(policy) = std::env::var("TEXTBEHIND_RENDER_POLICY")
            .ok()
            .and_then(|v| match v.trim().to_ascii_lowercase().as_str() {
                "lazy" => Some(RenderPolicy::Lazy),
                "eager" => Some(RenderPolicy::Eager),
                _ => None,
            })
        {
            self.render_policy = policy;
        }
        if let Some(secs) = std::env::var("TEXTBEHIND_SEGMENTATION_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|&n| n > 0)
        {
            self.segmentation_timeout_secs = secs;
        }
        if let Some(dim) = std::env::var("TEXTBEHIND_MAX_SURFACE_DIM")
            .ok()
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|&n| n > 0)
        {
            self.max_surface_dim = dim;
        }
        if let Some(dirs) = std::env::var_os("TEXTBEHIND_FONT_DIRS") {
            self.fonts.font_dirs.extend(std::env::split_paths(&dirs));
        }
        self
    }

    /// Segmentation timeout as a [`Duration`].
    pub fn segmentation_timeout(&self) -> Duration {
        Duration::from_secs(self.segmentation_timeout_secs.max(1))
    }

    /// Effective surface edge limit.
    pub fn surface_dim_limit(&self) -> u32 {
        self.max_surface_dim.clamp(1, RASTER_DIM_LIMIT)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
