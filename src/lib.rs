//! Textbehind composites styled text layers between a photograph and its segmented foreground
//! subject, so the subject appears in front of the text.
//!
//! The pipeline is explicit and dependency-injected:
//!
//! - Build a [`FontLibrary`] and a [`Compositor`] from an [`EngineConfig`]
//! - Drive edits through an [`EditorSession`], which calls a [`Segmenter`] once per process
//!   request and re-composes from the cached cutout afterwards
//! - Produce files with an [`Exporter`], at natural size or at a [`PlatformPreset`] size
#![forbid(unsafe_code)]

mod foundation;

/// Image decoding and font resolution.
pub mod assets;
/// Engine configuration.
pub mod config;
/// Pixel effects used while drawing layers.
pub mod effects;
/// Output encoding.
pub mod encode;
/// Export controller.
pub mod export;
/// Logging setup for binaries.
pub mod logging;
/// CPU compositing.
pub mod render;
/// Typed layer model and platform presets.
pub mod scene;
/// Segmentation collaborator boundary.
pub mod segment;
/// Editing session.
pub mod session;

pub use crate::foundation::core::{Affine, Canvas, Color, Point, Rect, Rgba8Premul, Vec2};
pub use crate::foundation::error::{
    ImageRole, SegmentationError, SegmentationErrorKind, TextBehindError, TextBehindResult,
};

pub use crate::assets::decode::{RasterImage, decode_image};
pub use crate::assets::fonts::{FontFace, FontLibrary};
pub use crate::config::{
    EngineConfig, FontSizePolicy, FontsConfig, LoggingConfig, RenderPolicy, SegmentationFallback,
};
pub use crate::encode::{EncodedImage, OutputEncoding, OutputFormat};
pub use crate::export::{ExportArtifact, ExportSource, Exporter};
pub use crate::render::compose::{CompositeInputs, CompositeResult, Compositor};
pub use crate::scene::layer::{
    GradientColors, LayerId, LayerPosition, ShadowOffset, SkewTransform, TextLayer, TextLayerPatch,
};
pub use crate::scene::preset::{PLATFORM_PRESETS, PlatformPreset};
pub use crate::segment::{CommandSegmenter, PrecomputedSegmenter, SegmentationRequest, Segmenter};
pub use crate::session::{EditorSession, ProcessStatus, SessionState};
