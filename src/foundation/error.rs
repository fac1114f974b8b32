use std::fmt;

/// Result alias used throughout the crate.
pub type TextBehindResult<T> = Result<T, TextBehindError>;

/// Which input image a decode failure refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageRole {
    /// The original photograph drawn underneath all text layers.
    Background,
    /// The segmentation cutout drawn on top of all text layers.
    Foreground,
    /// The image handed to a session before any segmentation ran.
    Source,
    /// A flat raster passed straight to the export controller.
    ExportSource,
}

impl fmt::Display for ImageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Background => "background",
            Self::Foreground => "foreground",
            Self::Source => "source",
            Self::ExportSource => "export source",
        };
        f.write_str(s)
    }
}

/// Classification of an external segmentation failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentationErrorKind {
    /// The service reported an error or could not be reached.
    Service,
    /// The call did not resolve within the configured timeout.
    Timeout,
    /// The service refused the request because of a rate limit.
    RateLimited,
    /// The service answered with something that is not a usable cutout.
    InvalidResponse,
}

/// Failure reported by a [`crate::segment::Segmenter`].
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
#[error("{kind:?}: {message}")]
pub struct SegmentationError {
    /// Failure class.
    pub kind: SegmentationErrorKind,
    /// Human readable detail.
    pub message: String,
}

impl SegmentationError {
    /// Build an error of the given kind.
    pub fn new(kind: SegmentationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Service-side failure.
    pub fn service(message: impl Into<String>) -> Self {
        Self::new(SegmentationErrorKind::Service, message)
    }

    /// Timeout while waiting on the service.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(SegmentationErrorKind::Timeout, message)
    }

    /// Rate-limited by the service.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(SegmentationErrorKind::RateLimited, message)
    }

    /// Unusable response payload.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(SegmentationErrorKind::InvalidResponse, message)
    }

    /// Whether a caller may reasonably retry the same request later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            SegmentationErrorKind::Timeout
                | SegmentationErrorKind::RateLimited
                | SegmentationErrorKind::Service
        )
    }
}

#[derive(thiserror::Error, Debug)]
/// Crate error type.
pub enum TextBehindError {
    /// A drawing target could not be allocated.
    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// An input image could not be decoded.
    #[error("image decode error ({role}): {reason}")]
    ImageDecode {
        /// Which input failed.
        role: ImageRole,
        /// Decoder message.
        reason: String,
    },

    /// The segmentation collaborator failed.
    #[error("segmentation failure: {0}")]
    Segmentation(#[from] SegmentationError),

    /// Requested export dimensions cannot be rendered.
    #[error("export target unavailable: {0}")]
    ExportTargetUnavailable(String),

    /// Invalid caller input (layer fields, colors, session state).
    #[error("validation error: {0}")]
    Validation(String),

    /// Output encoding failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(String),

    /// Anything else, with context.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TextBehindError {
    /// Build a [`TextBehindError::SurfaceUnavailable`].
    pub fn surface_unavailable(msg: impl Into<String>) -> Self {
        Self::SurfaceUnavailable(msg.into())
    }

    /// Build a [`TextBehindError::ImageDecode`].
    pub fn image_decode(role: ImageRole, reason: impl Into<String>) -> Self {
        Self::ImageDecode {
            role,
            reason: reason.into(),
        }
    }

    /// Build a [`TextBehindError::ExportTargetUnavailable`].
    pub fn export_target_unavailable(msg: impl Into<String>) -> Self {
        Self::ExportTargetUnavailable(msg.into())
    }

    /// Build a [`TextBehindError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TextBehindError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`TextBehindError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
