/// Typed text layer model.
pub mod layer;
/// Platform export presets.
pub mod preset;
