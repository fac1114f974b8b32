use std::sync::Arc;

use crate::assets::decode::{RasterImage, decode_image};
use crate::assets::fonts::FontLibrary;
use crate::config::{EngineConfig, FontSizePolicy};
use crate::effects::composite::over_in_place;
use crate::encode::{EncodedImage, OutputEncoding, encode_raster};
use crate::foundation::core::Canvas;
use crate::foundation::error::{ImageRole, TextBehindResult};
use crate::render::surface::Surface;
use crate::render::text::TextLayerRenderer;
use crate::scene::layer::TextLayer;

/// The three planes of a composite, borrowed for one render.
#[derive(Clone, Copy, Debug)]
pub struct CompositeInputs<'a> {
    pub background: &'a RasterImage,
    /// Drawn in order; later layers land on top.
    pub layers: &'a [TextLayer],
    pub foreground: &'a RasterImage,
    /// Height at which `fontSize` is measured (the source image's natural height).
    pub reference_height: u32,
}

impl<'a> CompositeInputs<'a> {
    pub fn new(
        background: &'a RasterImage,
        layers: &'a [TextLayer],
        foreground: &'a RasterImage,
    ) -> Self {
        Self {
            background,
            layers,
            foreground,
            reference_height: background.height,
        }
    }

    pub fn with_reference_height(mut self, reference_height: u32) -> Self {
        self.reference_height = reference_height;
        self
    }

    /// Background dimensions.
    pub fn natural_canvas(&self) -> Canvas {
        self.background.canvas()
    }
}

/// Outcome of one successful full render, kept so later exports can re-render at other sizes
/// without segmenting again.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeResult {
    pub background: RasterImage,
    pub foreground: RasterImage,
    /// Snapshot of the layers drawn, in z-order.
    pub layers: Vec<TextLayer>,
    /// The render at the background's natural size.
    pub encoded: EncodedImage,
    pub reference_height: u32,
}

impl CompositeResult {
    /// Borrow the planes for a re-render.
    pub fn inputs(&self) -> CompositeInputs<'_> {
        CompositeInputs::new(&self.background, &self.layers, &self.foreground)
            .with_reference_height(self.reference_height)
    }

    pub fn width(&self) -> u32 {
        self.encoded.width
    }

    pub fn height(&self) -> u32 {
        self.encoded.height
    }
}

/// Composite engine: background, text layers, then the foreground cutout.
///
/// Stateless between calls; each render allocates its own surface, so one `Compositor` can
/// serve concurrent renders.
#[derive(Debug)]
pub struct Compositor {
    fonts: Arc<FontLibrary>,
    font_size_policy: FontSizePolicy,
    max_surface_dim: u32,
}

impl Compositor {
    pub fn new(fonts: Arc<FontLibrary>, config: &EngineConfig) -> Self {
        Self {
            fonts,
            font_size_policy: config.font_size_policy,
            max_surface_dim: config.surface_dim_limit(),
        }
    }

    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    pub fn max_surface_dim(&self) -> u32 {
        self.max_surface_dim
    }

    /// Render the composite at `canvas` and return the raw frame.
    #[tracing::instrument(
        skip(self, inputs),
        fields(width = canvas.width, height = canvas.height, layers = inputs.layers.len())
    )]
    pub fn render(&self, inputs: &CompositeInputs<'_>, canvas: Canvas) -> TextBehindResult<RasterImage> {
        for layer in inputs.layers {
            layer.validate()?;
        }
        if inputs.foreground.canvas() != inputs.background.canvas() {
            tracing::warn!(
                background = ?inputs.background.canvas(),
                foreground = ?inputs.foreground.canvas(),
                "foreground dimensions differ from background; stretching both to the target"
            );
        }

        let mut surface = Surface::new(canvas, self.max_surface_dim)?;
        surface.draw_stretched(inputs.background)?;

        let font_scale = self
            .font_size_policy
            .font_scale(canvas.height, inputs.reference_height);
        let mut text = TextLayerRenderer::new(&self.fonts, font_scale);
        for layer in inputs.layers {
            text.draw(layer, &mut surface)?;
        }

        let foreground = inputs.foreground.resized(canvas.width, canvas.height)?;
        over_in_place(&mut surface.data, &foreground.rgba8_premul, 1.0)?;

        surface.into_raster()
    }

    /// Render and encode.
    pub fn compose(
        &self,
        inputs: &CompositeInputs<'_>,
        canvas: Canvas,
        encoding: OutputEncoding,
    ) -> TextBehindResult<EncodedImage> {
        let frame = self.render(inputs, canvas)?;
        encode_raster(&frame, encoding)
    }

    /// Render at the background's natural size and keep everything needed to re-render.
    pub fn compose_result(
        &self,
        background: RasterImage,
        layers: Vec<TextLayer>,
        foreground: RasterImage,
        encoding: OutputEncoding,
    ) -> TextBehindResult<CompositeResult> {
        let inputs = CompositeInputs::new(&background, &layers, &foreground);
        let encoded = self.compose(&inputs, inputs.natural_canvas(), encoding)?;
        let reference_height = inputs.reference_height;
        Ok(CompositeResult {
            background,
            foreground,
            layers,
            encoded,
            reference_height,
        })
    }

    /// Decode both planes, then render at the background's natural size unless `canvas` is given.
    ///
    /// A decode failure names the plane that failed and nothing is rendered.
    pub fn compose_encoded(
        &self,
        background: &[u8],
        layers: &[TextLayer],
        foreground: &[u8],
        canvas: Option<Canvas>,
        encoding: OutputEncoding,
    ) -> TextBehindResult<EncodedImage> {
        let background = decode_image(background, ImageRole::Background)?;
        let foreground = decode_image(foreground, ImageRole::Foreground)?;
        let inputs = CompositeInputs::new(&background, layers, &foreground);
        self.compose(&inputs, canvas.unwrap_or(inputs.natural_canvas()), encoding)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compose.rs"]
mod tests;
