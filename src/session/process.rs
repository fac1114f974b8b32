use std::sync::Arc;
use std::time::Duration;

use crate::assets::decode::RasterImage;
use crate::config::SegmentationFallback;
use crate::encode::OutputEncoding;
use crate::foundation::error::{TextBehindError, TextBehindResult};
use crate::render::compose::{CompositeResult, Compositor};
use crate::scene::layer::TextLayer;
use crate::segment::{SegmentationRequest, Segmenter, fetch_cutout};

/// How a finished process request affected the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessStatus {
    /// New composite with the segmented foreground.
    Composed,
    /// Segmentation failed; composed with nothing occluding the text.
    ComposedWithoutOcclusion,
    /// The session was reset or reloaded meanwhile; the result was dropped.
    Discarded,
}

/// Everything one process request needs, detached from the session.
///
/// Holds copies, so the session stays editable while the ticket runs.
#[derive(Debug)]
pub struct ProcessTicket {
    pub(crate) generation: u64,
    pub(crate) request: SegmentationRequest,
    pub(crate) background: RasterImage,
    pub(crate) layers: Vec<TextLayer>,
    pub(crate) compositor: Arc<Compositor>,
    pub(crate) fallback: SegmentationFallback,
    pub(crate) timeout: Duration,
    pub(crate) encoding: OutputEncoding,
}

/// Result of [`ProcessTicket::run`], to be handed back to the session.
#[derive(Debug)]
pub struct ProcessOutcome {
    pub(crate) generation: u64,
    pub(crate) degraded: bool,
    pub(crate) result: TextBehindResult<CompositeResult>,
}

impl ProcessOutcome {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

impl ProcessTicket {
    /// Session generation this ticket was issued for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Layers captured when the ticket was issued.
    pub fn layers(&self) -> &[TextLayer] {
        &self.layers
    }

    /// Segment, then compose on the blocking pool.
    #[tracing::instrument(skip(self, segmenter), fields(generation = self.generation, layers = self.layers.len()))]
    pub async fn run(self, segmenter: &dyn Segmenter) -> ProcessOutcome {
        let generation = self.generation;
        let (foreground, degraded) =
            match fetch_cutout(segmenter, &self.request, self.timeout).await {
                Ok(cutout) => (cutout, false),
                Err(e) => match self.fallback {
                    SegmentationFallback::Propagate => {
                        return ProcessOutcome {
                            generation,
                            degraded: false,
                            result: Err(e.into()),
                        };
                    }
                    SegmentationFallback::NoOcclusion => {
                        tracing::warn!(error = %e, "segmentation failed; composing without occlusion");
                        let fg = RasterImage::transparent(self.background.width, self.background.height);
                        (fg, true)
                    }
                },
            };

        let Self {
            background,
            layers,
            compositor,
            encoding,
            ..
        } = self;
        let result = tokio::task::spawn_blocking(move || {
            compositor.compose_result(background, layers, foreground, encoding)
        })
        .await
        .map_err(|e| TextBehindError::Other(anyhow::anyhow!("compose task failed: {e}")))
        .and_then(|r| r);

        ProcessOutcome {
            generation,
            degraded,
            result,
        }
    }
}
