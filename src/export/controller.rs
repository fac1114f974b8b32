use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;

use crate::assets::decode::{RasterImage, decode_image};
use crate::encode::{OutputEncoding, OutputFormat, encode_raster};
use crate::foundation::core::Canvas;
use crate::foundation::error::{ImageRole, TextBehindError, TextBehindResult};
use crate::render::compose::{CompositeResult, Compositor};
use crate::render::surface::check_surface;
use crate::scene::preset::PlatformPreset;

/// File stem used when exporting without a preset.
pub const DIRECT_EXPORT_STEM: &str = "processed-image";

/// What to export.
#[derive(Clone, Copy, Debug)]
pub enum ExportSource<'a> {
    /// Re-render from the cached planes and layers.
    Composite(&'a CompositeResult),
    /// Stretch an already rendered image.
    Image(&'a RasterImage),
    /// Decode, then treat as [`ExportSource::Image`].
    Encoded(&'a [u8]),
}

/// A finished export, ready to be written or downloaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Write to `dir/<file_name>`, creating `dir` if needed.
    pub fn write_to_dir(&self, dir: &Path) -> TextBehindResult<PathBuf> {
        std::fs::create_dir_all(dir).map_err(|e| {
            TextBehindError::export_target_unavailable(format!(
                "create output dir '{}': {e}",
                dir.display()
            ))
        })?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes).map_err(|e| {
            TextBehindError::export_target_unavailable(format!(
                "write '{}': {e}",
                path.display()
            ))
        })?;
        Ok(path)
    }
}

/// Drives the composite engine at export sizes.
///
/// Every call renders into its own surface and never touches the [`CompositeResult`], so
/// exports may run concurrently.
#[derive(Clone, Debug)]
pub struct Exporter {
    compositor: Arc<Compositor>,
}

impl Exporter {
    pub fn new(compositor: Arc<Compositor>) -> Self {
        Self { compositor }
    }

    /// Export `source` at the preset's size, or at its natural size without one.
    #[tracing::instrument(
        skip(self, source),
        fields(preset = preset.map(|p| p.id), format = %encoding.format)
    )]
    pub fn export(
        &self,
        source: ExportSource<'_>,
        preset: Option<&PlatformPreset>,
        encoding: OutputEncoding,
    ) -> TextBehindResult<ExportArtifact> {
        let decoded;
        let source = match source {
            ExportSource::Encoded(bytes) => {
                decoded = decode_image(bytes, ImageRole::ExportSource)?;
                ExportSource::Image(&decoded)
            }
            other => other,
        };

        let canvas = match preset {
            Some(p) => Canvas::new(p.width, p.height),
            None => natural_canvas(source),
        };
        check_surface(canvas, self.compositor.max_surface_dim()).map_err(export_target_error)?;

        let encoded = match source {
            ExportSource::Composite(result) => self
                .compositor
                .compose(&result.inputs(), canvas, encoding)
                .map_err(export_target_error)?,
            ExportSource::Image(image) => {
                let fitted = image.resized(canvas.width, canvas.height)?;
                encode_raster(&fitted, encoding)?
            }
            ExportSource::Encoded(_) => {
                return Err(TextBehindError::validation("export source was not decoded"));
            }
        };

        let stem = preset.map_or_else(|| DIRECT_EXPORT_STEM.to_string(), PlatformPreset::file_stem);
        let artifact = ExportArtifact {
            file_name: format!("{stem}.{}", encoding.format.extension()),
            format: encoded.format,
            width: encoded.width,
            height: encoded.height,
            bytes: encoded.bytes,
        };
        tracing::info!(
            file = %artifact.file_name,
            width = artifact.width,
            height = artifact.height,
            bytes = artifact.bytes.len(),
            "export ready"
        );
        Ok(artifact)
    }

    /// Export once per preset, in parallel. Results keep the order of `presets`; one failure
    /// does not affect the others.
    pub fn export_presets(
        &self,
        source: ExportSource<'_>,
        presets: &[PlatformPreset],
        encoding: OutputEncoding,
    ) -> Vec<(&'static str, TextBehindResult<ExportArtifact>)> {
        let decoded = match source {
            ExportSource::Encoded(bytes) => match decode_image(bytes, ImageRole::ExportSource) {
                Ok(img) => Some(img),
                Err(e) => {
                    let reason = e.to_string();
                    return presets
                        .iter()
                        .map(|p| {
                            (
                                p.id,
                                Err(TextBehindError::image_decode(
                                    ImageRole::ExportSource,
                                    reason.clone(),
                                )),
                            )
                        })
                        .collect();
                }
            },
            _ => None,
        };
        let source = match &decoded {
            Some(img) => ExportSource::Image(img),
            None => source,
        };

        presets
            .par_iter()
            .map(|p| (p.id, self.export(source, Some(p), encoding)))
            .collect()
    }
}

fn natural_canvas(source: ExportSource<'_>) -> Canvas {
    match source {
        ExportSource::Composite(result) => Canvas::new(result.width(), result.height()),
        ExportSource::Image(image) => image.canvas(),
        ExportSource::Encoded(_) => Canvas::new(0, 0),
    }
}

/// A target surface that cannot be created fails the export, not the renderer.
fn export_target_error(err: TextBehindError) -> TextBehindError {
    match err {
        TextBehindError::SurfaceUnavailable(reason) => {
            TextBehindError::export_target_unavailable(reason)
        }
        other => other,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/controller.rs"]
mod tests;
