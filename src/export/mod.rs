//! Export controller: re-render a composite (or stretch a plain image) to an output size and
//! format, and name the resulting file.

/// Single and batch exports.
pub mod controller;

pub use controller::{DIRECT_EXPORT_STEM, ExportArtifact, ExportSource, Exporter};
