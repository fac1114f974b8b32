use crate::assets::decode::RasterImage;
use crate::config::RASTER_DIM_LIMIT;
use crate::foundation::core::{Affine, Canvas};
use crate::foundation::error::{TextBehindError, TextBehindResult};

/// Check that a `canvas` can be allocated as a drawing target.
///
/// `limit` is the caller's edge ceiling; it is itself capped at what the rasterizer addresses.
pub fn check_surface(canvas: Canvas, limit: u32) -> TextBehindResult<()> {
    let limit = limit.min(RASTER_DIM_LIMIT);
    if canvas.width == 0 || canvas.height == 0 {
        return Err(TextBehindError::surface_unavailable(format!(
            "surface {}x{} has no pixels",
            canvas.width, canvas.height
        )));
    }
    if canvas.width > limit || canvas.height > limit {
        return Err(TextBehindError::surface_unavailable(format!(
            "surface {}x{} exceeds the {limit}px edge limit",
            canvas.width, canvas.height
        )));
    }
    Ok(())
}

/// Private premultiplied RGBA8 drawing target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Surface {
    pub(crate) canvas: Canvas,
    pub(crate) data: Vec<u8>,
}

impl Surface {
    /// Allocate a transparent surface.
    pub(crate) fn new(canvas: Canvas, limit: u32) -> TextBehindResult<Self> {
        check_surface(canvas, limit)?;
        let len = (canvas.width as usize)
            .checked_mul(canvas.height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| TextBehindError::surface_unavailable("surface size overflow"))?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|e| {
            TextBehindError::surface_unavailable(format!(
                "cannot allocate {}x{} surface: {e}",
                canvas.width, canvas.height
            ))
        })?;
        data.resize(len, 0);
        Ok(Self { canvas, data })
    }

    /// Draw `image` stretched to the whole surface, source-over.
    pub(crate) fn draw_stretched(&mut self, image: &RasterImage) -> TextBehindResult<()> {
        let fitted = image.resized(self.canvas.width, self.canvas.height)?;
        crate::effects::composite::over_in_place(&mut self.data, &fitted.rgba8_premul, 1.0)
    }

    pub(crate) fn into_raster(self) -> TextBehindResult<RasterImage> {
        RasterImage::from_premul(self.canvas.width, self.canvas.height, self.data)
    }
}

/// Rasterize a closure's vector drawing into a per-pixel 8-bit coverage mask.
///
/// The closure paints in opaque white, so the resulting alpha channel is exactly the coverage.
pub(crate) fn rasterize_coverage(
    canvas: Canvas,
    transform: Affine,
    draw: impl FnOnce(&mut vello_cpu::RenderContext),
) -> TextBehindResult<Vec<u8>> {
    let (w, h) = pixmap_dims(canvas)?;
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
    draw(&mut ctx);
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap
        .data_as_u8_slice()
        .chunks_exact(4)
        .map(|px| px[3])
        .collect())
}

fn pixmap_dims(canvas: Canvas) -> TextBehindResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| TextBehindError::surface_unavailable("surface width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| TextBehindError::surface_unavailable("surface height exceeds u16"))?;
    Ok((w, h))
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
