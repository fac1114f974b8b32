//! Boundary to the external background-segmentation collaborator.
//!
//! A [`Segmenter`] takes the encoded source image and returns an encoded cutout: the subject
//! with background pixels made transparent, at the source's pixel dimensions.

use std::sync::Arc;
use std::time::Duration;

use crate::assets::decode::{RasterImage, decode_image};
use crate::foundation::error::{ImageRole, SegmentationError};

/// Segmenter that runs an external program.
pub mod command;
/// Segmenter returning a cutout computed ahead of time.
pub mod precomputed;

pub use command::CommandSegmenter;
pub use precomputed::PrecomputedSegmenter;

/// One segmentation call.
#[derive(Clone, Debug)]
pub struct SegmentationRequest {
    /// Encoded source image, as uploaded.
    pub image: Arc<Vec<u8>>,
    /// Decoded source width.
    pub width: u32,
    /// Decoded source height.
    pub height: u32,
}

/// Asynchronous background segmentation.
#[async_trait::async_trait]
pub trait Segmenter: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Return the encoded cutout image for `request`.
    async fn segment(&self, request: &SegmentationRequest) -> Result<Vec<u8>, SegmentationError>;
}

/// Run `segmenter` under `timeout` and decode its cutout.
///
/// An undecodable cutout is an invalid response. A cutout with different dimensions is kept;
/// the composite engine stretches it onto the target.
#[tracing::instrument(skip(segmenter, request), fields(segmenter = segmenter.name()))]
pub async fn fetch_cutout(
    segmenter: &dyn Segmenter,
    request: &SegmentationRequest,
    timeout: Duration,
) -> Result<RasterImage, SegmentationError> {
    let bytes = tokio::time::timeout(timeout, segmenter.segment(request))
        .await
        .map_err(|_| {
            SegmentationError::timeout(format!(
                "no cutout after {:.1}s",
                timeout.as_secs_f64()
            ))
        })??;

    let cutout = decode_image(&bytes, ImageRole::Foreground)
        .map_err(|e| SegmentationError::invalid_response(e.to_string()))?;
    if (cutout.width, cutout.height) != (request.width, request.height) {
        tracing::warn!(
            source_width = request.width,
            source_height = request.height,
            cutout_width = cutout.width,
            cutout_height = cutout.height,
            "cutout dimensions differ from source"
        );
    }
    tracing::debug!(bytes = bytes.len(), "cutout received");
    Ok(cutout)
}

#[cfg(test)]
#[path = "../../tests/unit/segment/mod.rs"]
mod tests;
