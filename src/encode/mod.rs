//! Still-image encoding of composed frames.

/// PNG/JPEG encoders for premultiplied rasters.
pub mod image;

pub use self::image::{EncodedImage, OutputEncoding, OutputFormat, encode_raster};
