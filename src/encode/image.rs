use std::fmt;
use std::str::FromStr;

use image::ImageEncoder;

use crate::assets::decode::RasterImage;
use crate::foundation::error::{TextBehindError, TextBehindResult};

/// Output file format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless; quality is ignored.
    #[default]
    Png,
    /// Lossy, opaque. Transparent pixels come out black.
    #[serde(alias = "jpg")]
    Jpeg,
}

impl OutputFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = TextBehindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            other => Err(TextBehindError::validation(format!(
                "unsupported output format '{other}' (expected png or jpeg)"
            ))),
        }
    }
}

/// Format plus quality for one encode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OutputEncoding {
    pub format: OutputFormat,
    /// JPEG quality `0..=100`; `0` is encoded as `1`. Ignored for PNG.
    pub quality: u8,
}

impl Default for OutputEncoding {
    fn default() -> Self {
        Self::png()
    }
}

impl OutputEncoding {
    pub const DEFAULT_JPEG_QUALITY: u8 = 90;

    pub fn png() -> Self {
        Self {
            format: OutputFormat::Png,
            quality: 100,
        }
    }

    pub fn jpeg(quality: u8) -> Self {
        Self {
            format: OutputFormat::Jpeg,
            quality: quality.min(100),
        }
    }

    /// `format` with `quality`, falling back to `default_quality` for JPEG when none is given.
    pub fn new(format: OutputFormat, quality: Option<u8>, default_quality: u8) -> Self {
        match format {
            OutputFormat::Png => Self::png(),
            OutputFormat::Jpeg => Self::jpeg(quality.unwrap_or(default_quality)),
        }
    }
}

/// Encoded image bytes plus the dimensions they were rendered at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

/// Encode a premultiplied raster.
pub fn encode_raster(image: &RasterImage, encoding: OutputEncoding) -> TextBehindResult<EncodedImage> {
    let mut bytes = Vec::new();
    match encoding.format {
        OutputFormat::Png => {
            let straight = image.to_straight_rgba();
            image::codecs::png::PngEncoder::new(&mut bytes)
                .write_image(
                    &straight,
                    image.width,
                    image.height,
                    image::ExtendedColorType::Rgba8,
                )
                .map_err(|e| TextBehindError::encode(format!("png: {e}")))?;
        }
        OutputFormat::Jpeg => {
            // Premultiplied color with alpha dropped is exactly the image over black.
            let rgb: Vec<u8> = image
                .rgba8_premul
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect();
            let quality = encoding.quality.clamp(1, 100);
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, quality)
                .write_image(
                    &rgb,
                    image.width,
                    image.height,
                    image::ExtendedColorType::Rgb8,
                )
                .map_err(|e| TextBehindError::encode(format!("jpeg: {e}")))?;
        }
    }
    tracing::trace!(
        format = %encoding.format,
        width = image.width,
        height = image.height,
        bytes = bytes.len(),
        "encoded image"
    );
    Ok(EncodedImage {
        format: encoding.format,
        width: image.width,
        height: image.height,
        bytes,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/encode/image.rs"]
mod tests;
