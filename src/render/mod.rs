//! CPU rendering of composites.

/// Composite engine.
pub mod compose;
/// Layer transforms.
pub mod geometry;
/// Drawing targets and coverage rasterization.
pub mod surface;
pub(crate) mod text;
