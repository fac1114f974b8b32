use crate::assets::fonts::{FontLibrary, ShapedText, TextLayoutEngine};
use crate::effects::blur::blur_painted_in_place;
use crate::effects::composite::{over_in_place, scale_by_coverage};
use crate::effects::style::{FillPaint, ResolvedStyle, resolve_style};
use crate::foundation::core::{Affine, Canvas, Point};
use crate::foundation::error::TextBehindResult;
use crate::render::geometry::{centering_offset, is_degenerate, layer_transform};
use crate::render::surface::{Surface, rasterize_coverage};
use crate::scene::layer::TextLayer;

/// Draws single text layers onto a surface.
///
/// Each layer is painted into its own scratch buffer and then composited with the layer's
/// alpha, so shadow, gradient, blur and opacity never reach neighbouring layers.
pub(crate) struct TextLayerRenderer<'a> {
    fonts: &'a FontLibrary,
    engine: TextLayoutEngine,
    font_scale: f64,
}

impl<'a> TextLayerRenderer<'a> {
    /// `font_scale` converts a layer's `fontSize` and pixel effect sizes to this surface.
    pub(crate) fn new(fonts: &'a FontLibrary, font_scale: f64) -> Self {
        Self {
            fonts,
            engine: TextLayoutEngine::new(),
            font_scale,
        }
    }

    pub(crate) fn draw(&mut self, layer: &TextLayer, target: &mut Surface) -> TextBehindResult<()> {
        if layer.text.is_empty() || layer.opacity <= 0.0 {
            tracing::trace!(layer = layer.id.0, "layer draws nothing");
            return Ok(());
        }

        let Some(face) = self.fonts.resolve(&layer.font_family) else {
            return Ok(());
        };
        let size_px = (layer.font_size * self.font_scale) as f32;
        if !size_px.is_finite() || size_px <= 0.0 {
            tracing::debug!(layer = layer.id.0, size_px, "font size collapses to nothing");
            return Ok(());
        }
        let shaped = self.engine.layout(&layer.text, &face, size_px)?;

        let style = resolve_style(layer, f64::from(shaped.width()), self.font_scale);
        let transform = layer_transform(layer, target.canvas);
        if is_degenerate(transform) {
            tracing::debug!(layer = layer.id.0, "layer transform is degenerate");
            return Ok(());
        }
        let glyph_transform = transform
            * Affine::translate(centering_offset(
                f64::from(shaped.width()),
                f64::from(shaped.height()),
            ));

        tracing::debug!(
            layer = layer.id.0,
            family = %face.family,
            size_px,
            width = shaped.width(),
            "draw text layer"
        );

        let scratch = paint_layer(&shaped, &style, transform, glyph_transform, target.canvas)?;
        over_in_place(&mut target.data, &scratch, style.alpha)
    }
}

fn paint_layer(
    shaped: &ShapedText,
    style: &ResolvedStyle,
    transform: Affine,
    glyph_transform: Affine,
    canvas: Canvas,
) -> TextBehindResult<Vec<u8>> {
    let mut scratch = vec![0u8; canvas.rgba_len()];

    if let Some(shadow) = style.shadow {
        let offset = Affine::translate(shadow.offset) * glyph_transform;
        let coverage = rasterize_coverage(canvas, offset, |ctx| fill_glyphs(ctx, shaped))?;
        let color = shadow.color.to_premul().to_array();
        for (px, &c) in scratch.chunks_exact_mut(4).zip(&coverage) {
            if c != 0 {
                px.copy_from_slice(&scale_by_coverage(color, c));
            }
        }
        blur_painted_in_place(&mut scratch, canvas.width, canvas.height, shadow.sigma)?;
    }

    let coverage = rasterize_coverage(canvas, glyph_transform, |ctx| fill_glyphs(ctx, shaped))?;
    let mut fill = vec![0u8; canvas.rgba_len()];
    match style.fill {
        FillPaint::Solid(color) => {
            let color = color.to_premul().to_array();
            for (px, &c) in fill.chunks_exact_mut(4).zip(&coverage) {
                if c != 0 {
                    px.copy_from_slice(&scale_by_coverage(color, c));
                }
            }
        }
        paint @ FillPaint::LinearGradient(_) => {
            let inverse = transform.inverse();
            let width = canvas.width as usize;
            for (i, (px, &c)) in fill.chunks_exact_mut(4).zip(&coverage).enumerate() {
                if c == 0 {
                    continue;
                }
                let center = Point::new((i % width) as f64 + 0.5, (i / width) as f64 + 0.5);
                let color = paint.sample(inverse * center).to_premul().to_array();
                px.copy_from_slice(&scale_by_coverage(color, c));
            }
        }
    }
    over_in_place(&mut scratch, &fill, 1.0)?;

    blur_painted_in_place(&mut scratch, canvas.width, canvas.height, style.blur_sigma)?;
    Ok(scratch)
}

fn fill_glyphs(ctx: &mut vello_cpu::RenderContext, shaped: &ShapedText) {
    for line in shaped.layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let mut x = run.offset();
            let y = run.baseline();
            let glyphs: Vec<vello_cpu::Glyph> = run
                .glyphs()
                .map(|g| {
                    let glyph = vello_cpu::Glyph {
                        id: g.id,
                        x: x + g.x,
                        y: y - g.y,
                    };
                    x += g.advance;
                    glyph
                })
                .collect();
            ctx.glyph_run(shaped.font_for(&run.run()))
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs.into_iter());
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
