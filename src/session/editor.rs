use std::sync::Arc;
use std::time::Duration;

use crate::assets::decode::{RasterImage, decode_image};
use crate::config::{EngineConfig, RenderPolicy, SegmentationFallback};
use crate::encode::OutputEncoding;
use crate::export::{ExportArtifact, ExportSource, Exporter};
use crate::foundation::core::{Canvas, Vec2};
use crate::foundation::error::{ImageRole, TextBehindError, TextBehindResult};
use crate::render::compose::{CompositeResult, Compositor};
use crate::scene::layer::{LayerId, LayerPosition, TextLayer, TextLayerPatch};
use crate::scene::preset::PlatformPreset;
use crate::segment::{SegmentationRequest, Segmenter};
use crate::session::process::{ProcessOutcome, ProcessStatus, ProcessTicket};

/// Where an editing session is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No source image.
    Empty,
    /// Source loaded, layers editable, nothing composed (or the composite was reset).
    ImageLoaded,
    /// A composite exists and can be exported.
    Composed,
}

#[derive(Clone, Debug)]
struct SourceImage {
    bytes: Arc<Vec<u8>>,
    image: RasterImage,
}

/// Single owner of the live layer list, the source image and the current composite.
///
/// Mutations are plain state changes. Rendering happens on [`EditorSession::process`], on
/// [`EditorSession::rerender`], or after each mutation when the render policy is eager.
#[derive(Debug)]
pub struct EditorSession {
    compositor: Arc<Compositor>,
    render_policy: RenderPolicy,
    fallback: SegmentationFallback,
    segmentation_timeout: Duration,
    encoding: OutputEncoding,

    source: Option<SourceImage>,
    layers: Vec<TextLayer>,
    selected: Option<LayerId>,
    composite: Option<CompositeResult>,
    next_id: u64,
    generation: u64,
}

impl EditorSession {
    pub fn new(compositor: Arc<Compositor>, config: &EngineConfig) -> Self {
        Self {
            compositor,
            render_policy: config.render_policy,
            fallback: config.segmentation_fallback,
            segmentation_timeout: config.segmentation_timeout(),
            encoding: OutputEncoding::png(),
            source: None,
            layers: Vec::new(),
            selected: None,
            composite: None,
            next_id: 1,
            generation: 0,
        }
    }

    /// Encoding of the composite kept by the session (PNG unless changed).
    pub fn with_encoding(mut self, encoding: OutputEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn state(&self) -> SessionState {
        match (&self.source, &self.composite) {
            (None, _) => SessionState::Empty,
            (Some(_), None) => SessionState::ImageLoaded,
            (Some(_), Some(_)) => SessionState::Composed,
        }
    }

    pub fn render_policy(&self) -> RenderPolicy {
        self.render_policy
    }

    /// Bumped whenever in-flight processing becomes stale.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn source_image(&self) -> Option<&RasterImage> {
        self.source.as_ref().map(|s| &s.image)
    }

    /// Layers in z-order (first is drawn first).
    pub fn layers(&self) -> &[TextLayer] {
        &self.layers
    }

    pub fn layer(&self, id: LayerId) -> Option<&TextLayer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn selected(&self) -> Option<LayerId> {
        self.selected
    }

    pub fn composite(&self) -> Option<&CompositeResult> {
        self.composite.as_ref()
    }

    /// Load a new source image. Layers, selection and any composite are dropped.
    #[tracing::instrument(skip(self, bytes), fields(bytes = bytes.len()))]
    pub fn load_image(&mut self, bytes: Vec<u8>) -> TextBehindResult<()> {
        let image = decode_image(&bytes, ImageRole::Source)?;
        tracing::info!(width = image.width, height = image.height, "source image loaded");
        self.source = Some(SourceImage {
            bytes: Arc::new(bytes),
            image,
        });
        self.clear_editing_state();
        Ok(())
    }

    /// Remove the source image and everything derived from it.
    pub fn clear_image(&mut self) {
        self.source = None;
        self.clear_editing_state();
    }

    fn clear_editing_state(&mut self) {
        self.layers.clear();
        self.selected = None;
        self.composite = None;
        self.generation += 1;
    }

    /// Drop the composite and return to editing. Layers are kept.
    pub fn reset(&mut self) {
        if self.composite.take().is_some() {
            tracing::debug!("composite discarded");
        }
        self.generation += 1;
    }

    /// Add a default-styled layer on top and select it.
    pub fn add_layer(&mut self) -> TextBehindResult<LayerId> {
        self.require_image()?;
        let id = LayerId(self.next_id);
        self.next_id += 1;
        self.layers.push(TextLayer::with_id(id));
        self.selected = Some(id);
        tracing::debug!(layer = id.0, "layer added");
        self.after_mutation()?;
        Ok(id)
    }

    /// Append fully specified layers on top, in order, each under a fresh id.
    ///
    /// All layers are validated first; on error nothing is added.
    pub fn import_layers(
        &mut self,
        layers: impl IntoIterator<Item = TextLayer>,
    ) -> TextBehindResult<Vec<LayerId>> {
        self.require_image()?;
        let layers: Vec<TextLayer> = layers.into_iter().collect();
        for layer in &layers {
            layer.validate()?;
        }
        let mut ids = Vec::with_capacity(layers.len());
        for mut layer in layers {
            layer.id = LayerId(self.next_id);
            self.next_id += 1;
            ids.push(layer.id);
            self.layers.push(layer);
        }
        self.after_mutation()?;
        Ok(ids)
    }

    /// Merge `patch` into a layer. A patch that fails validation changes nothing.
    pub fn update_layer(&mut self, id: LayerId, patch: &TextLayerPatch) -> TextBehindResult<()> {
        let idx = self.index_of(id)?;
        let updated = patch.apply_to(&self.layers[idx])?;
        self.layers[idx] = updated;
        self.after_mutation()
    }

    pub fn set_text(&mut self, id: LayerId, text: impl Into<String>) -> TextBehindResult<()> {
        let idx = self.index_of(id)?;
        self.layers[idx].text = text.into();
        self.after_mutation()
    }

    /// Move a layer by a pixel delta measured on a preview of size `preview`.
    ///
    /// The delta is converted to percentages of the preview, so the layer keeps its relative
    /// place on every other surface size. Positions are clamped to the surface.
    pub fn drag_layer(&mut self, id: LayerId, delta: Vec2, preview: Canvas) -> TextBehindResult<()> {
        if preview.width == 0 || preview.height == 0 {
            return Err(TextBehindError::validation("preview surface has no pixels"));
        }
        let idx = self.index_of(id)?;
        let pos = self.layers[idx].position;
        self.layers[idx].position = LayerPosition {
            x: (pos.x + delta.x / f64::from(preview.width) * 100.0).clamp(0.0, 100.0),
            y: (pos.y + delta.y / f64::from(preview.height) * 100.0).clamp(0.0, 100.0),
        };
        self.selected = Some(id);
        self.after_mutation()
    }

    /// Delete a layer, clearing the selection if it pointed at it.
    pub fn delete_layer(&mut self, id: LayerId) -> TextBehindResult<()> {
        let idx = self.index_of(id)?;
        self.layers.remove(idx);
        if self.selected == Some(id) {
            self.selected = None;
        }
        tracing::debug!(layer = id.0, "layer deleted");
        self.after_mutation()
    }

    /// Move a layer to z-index `to` (clamped to the top).
    pub fn move_layer(&mut self, id: LayerId, to: usize) -> TextBehindResult<()> {
        let idx = self.index_of(id)?;
        let layer = self.layers.remove(idx);
        let to = to.min(self.layers.len());
        self.layers.insert(to, layer);
        self.after_mutation()
    }

    pub fn select(&mut self, id: Option<LayerId>) -> TextBehindResult<()> {
        if let Some(id) = id {
            self.index_of(id)?;
        }
        self.selected = id;
        Ok(())
    }

    /// Snapshot what a process request needs. The session remains editable meanwhile.
    pub fn begin_process(&self) -> TextBehindResult<ProcessTicket> {
        let source = self.require_image()?;
        Ok(ProcessTicket {
            generation: self.generation,
            request: SegmentationRequest {
                image: source.bytes.clone(),
                width: source.image.width,
                height: source.image.height,
            },
            background: source.image.clone(),
            layers: self.layers.clone(),
            compositor: self.compositor.clone(),
            fallback: self.fallback,
            timeout: self.segmentation_timeout,
            encoding: self.encoding,
        })
    }

    /// Apply a finished ticket.
    ///
    /// Outcomes from an older generation are dropped. On failure the previous composite stays.
    pub fn complete_process(&mut self, outcome: ProcessOutcome) -> TextBehindResult<ProcessStatus> {
        if outcome.generation != self.generation {
            tracing::warn!(
                outcome_generation = outcome.generation,
                session_generation = self.generation,
                "discarding stale process result"
            );
            return Ok(ProcessStatus::Discarded);
        }
        let composite = outcome.result?;
        let layers_changed = composite.layers != self.layers;
        self.composite = Some(composite);
        if layers_changed && self.render_policy == RenderPolicy::Eager {
            self.rerender()?;
        }
        Ok(if outcome.degraded {
            ProcessStatus::ComposedWithoutOcclusion
        } else {
            ProcessStatus::Composed
        })
    }

    /// Segment the source and compose: [`Self::begin_process`], run, [`Self::complete_process`].
    pub async fn process(&mut self, segmenter: &dyn Segmenter) -> TextBehindResult<ProcessStatus> {
        let ticket = self.begin_process()?;
        let outcome = ticket.run(segmenter).await;
        self.complete_process(outcome)
    }

    /// Re-compose from the cached planes with the current layers. Never re-segments.
    pub fn rerender(&mut self) -> TextBehindResult<&CompositeResult> {
        let Some(current) = &self.composite else {
            return Err(TextBehindError::validation(
                "nothing to re-render; process the image first",
            ));
        };
        let next = self.compositor.compose_result(
            current.background.clone(),
            self.layers.clone(),
            current.foreground.clone(),
            self.encoding,
        )?;
        Ok(self.composite.insert(next))
    }

    /// Export the current composite.
    pub fn export(
        &self,
        exporter: &Exporter,
        preset: Option<&PlatformPreset>,
        encoding: OutputEncoding,
    ) -> TextBehindResult<ExportArtifact> {
        let composite = self
            .composite
            .as_ref()
            .ok_or_else(|| TextBehindError::validation("nothing to export; process the image first"))?;
        exporter.export(ExportSource::Composite(composite), preset, encoding)
    }

    fn after_mutation(&mut self) -> TextBehindResult<()> {
        if self.render_policy == RenderPolicy::Eager && self.composite.is_some() {
            self.rerender()?;
        }
        Ok(())
    }

    fn require_image(&self) -> TextBehindResult<&SourceImage> {
        self.source
            .as_ref()
            .ok_or_else(|| TextBehindError::validation("no source image loaded"))
    }

    fn index_of(&self, id: LayerId) -> TextBehindResult<usize> {
        self.layers
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| TextBehindError::validation(format!("no layer with id {}", id.0)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;
