use std::sync::Arc;

use crate::foundation::core::{Canvas, Color};
use crate::foundation::error::{ImageRole, TextBehindError, TextBehindResult};
use crate::foundation::math::{premultiply_rgba8_in_place, unpremultiply_rgba8};

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl RasterImage {
    /// Wrap premultiplied RGBA8 bytes, checking the buffer length.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> TextBehindResult<Self> {
        if rgba8_premul.len() != Canvas::new(width, height).rgba_len() {
            return Err(TextBehindError::validation(
                "raster byte length must equal width*height*4",
            ));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Wrap straight-alpha RGBA8 bytes, premultiplying them.
    pub fn from_straight(width: u32, height: u32, mut rgba8: Vec<u8>) -> TextBehindResult<Self> {
        premultiply_rgba8_in_place(&mut rgba8);
        Self::from_premul(width, height, rgba8)
    }

    /// Image filled with one color.
    pub fn solid(width: u32, height: u32, color: Color) -> Self {
        let px = color.to_premul().to_array();
        Self {
            width,
            height,
            rgba8_premul: Arc::new(px.repeat(Canvas::new(width, height).pixel_count())),
        }
    }

    /// Fully transparent image; used as a "nothing occludes" foreground.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self::solid(width, height, Color::TRANSPARENT)
    }

    /// Dimensions as a [`Canvas`].
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }

    /// Premultiplied pixel at `(x, y)`; out-of-bounds reads are transparent.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0, 0];
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let d = &self.rgba8_premul;
        [d[idx], d[idx + 1], d[idx + 2], d[idx + 3]]
    }

    /// Stretch to exactly `width x height`, ignoring aspect ratio.
    ///
    /// Resampling runs on premultiplied data so transparent edges do not bleed color.
    pub fn resized(&self, width: u32, height: u32) -> TextBehindResult<Self> {
        if width == self.width && height == self.height {
            return Ok(self.clone());
        }
        if width == 0 || height == 0 || self.width == 0 || self.height == 0 {
            return Err(TextBehindError::validation(
                "cannot resample to or from an empty image",
            ));
        }
        let src = image::RgbaImage::from_raw(
            self.width,
            self.height,
            self.rgba8_premul.as_ref().clone(),
        )
        .ok_or_else(|| TextBehindError::validation("raster byte length mismatch"))?;
        let out = image::imageops::resize(&src, width, height, image::imageops::FilterType::Triangle);
        Self::from_premul(width, height, out.into_raw())
    }

    /// Straight-alpha copy suitable for encoders.
    pub fn to_straight_rgba(&self) -> Vec<u8> {
        unpremultiply_rgba8(&self.rgba8_premul)
    }
}

/// Decode any format the `image` crate understands into a premultiplied raster.
pub fn decode_image(bytes: &[u8], role: ImageRole) -> TextBehindResult<RasterImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| TextBehindError::image_decode(role, e.to_string()))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(TextBehindError::image_decode(role, "image has no pixels"));
    }
    RasterImage::from_straight(width, height, rgba.into_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
