/// Gaussian blur on premultiplied buffers.
pub(crate) mod blur;
/// Premultiplied source-over compositing.
pub mod composite;
/// Per-layer paint resolution.
pub mod style;
