/// Image decoding and the in-memory raster type.
pub mod decode;
/// Font discovery and text shaping.
pub mod fonts;
