use std::sync::Arc;

use super::*;
use crate::foundation::error::SegmentationErrorKind;

fn request(bytes: &[u8]) -> SegmentationRequest {
    SegmentationRequest {
        image: Arc::new(bytes.to_vec()),
        width: 1,
        height: 1,
    }
}

#[cfg(unix)]
#[tokio::test]
async fn stdout_is_returned() {
    let seg = CommandSegmenter::new("cat");
    assert_eq!(seg.name(), "command:cat");
    let out = seg.segment(&request(b"cutout-bytes")).await.unwrap();
    assert_eq!(out, b"cutout-bytes");
}

#[cfg(unix)]
#[tokio::test]
async fn exit_status_maps_to_error_kind() {
    let limited = CommandSegmenter::new("sh").args(["-c", "exit 75"]);
    let err = limited.segment(&request(b"x")).await.unwrap_err();
    assert_eq!(err.kind, SegmentationErrorKind::RateLimited);

    let failing = CommandSegmenter::new("sh").args(["-c", "echo boom >&2; exit 2"]);
    let err = failing.segment(&request(b"x")).await.unwrap_err();
    assert_eq!(err.kind, SegmentationErrorKind::Service);
    assert!(err.message.contains("boom"), "{}", err.message);
}

#[cfg(unix)]
#[tokio::test]
async fn empty_output_is_invalid() {
    let seg = CommandSegmenter::new("true");
    let err = seg.segment(&request(b"x")).await.unwrap_err();
    assert_eq!(err.kind, SegmentationErrorKind::InvalidResponse);
}

#[tokio::test]
async fn missing_program_is_service_error() {
    let seg = CommandSegmenter::new("textbehind-no-such-segmenter-binary");
    let err = seg.segment(&request(b"x")).await.unwrap_err();
    assert_eq!(err.kind, SegmentationErrorKind::Service);
}
