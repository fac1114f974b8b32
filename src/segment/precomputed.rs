use std::path::PathBuf;
use std::sync::Arc;

use crate::foundation::error::SegmentationError;
use crate::segment::{SegmentationRequest, Segmenter};

#[derive(Clone, Debug)]
enum CutoutSource {
    Bytes(Arc<Vec<u8>>),
    File(PathBuf),
}

/// Returns a cutout that already exists, from memory or from disk.
#[derive(Clone, Debug)]
pub struct PrecomputedSegmenter {
    source: CutoutSource,
}

impl PrecomputedSegmenter {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            source: CutoutSource::Bytes(Arc::new(bytes.into())),
        }
    }

    /// Read the cutout from `path` on every call.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: CutoutSource::File(path.into()),
        }
    }
}

#[async_trait::async_trait]
impl Segmenter for PrecomputedSegmenter {
    fn name(&self) -> &str {
        "precomputed"
    }

    async fn segment(&self, _request: &SegmentationRequest) -> Result<Vec<u8>, SegmentationError> {
        match &self.source {
            CutoutSource::Bytes(bytes) => Ok(bytes.as_ref().clone()),
            CutoutSource::File(path) => tokio::fs::read(path).await.map_err(|e| {
                SegmentationError::service(format!("read cutout '{}': {e}", path.display()))
            }),
        }
    }
}
