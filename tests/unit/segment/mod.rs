use super::*;
use crate::foundation::error::SegmentationErrorKind;

fn png(w: u32, h: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::new_rgba8(w, h)
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn request(w: u32, h: u32) -> SegmentationRequest {
    SegmentationRequest {
        image: Arc::new(png(w, h)),
        width: w,
        height: h,
    }
}

struct Slow;

#[async_trait::async_trait]
impl Segmenter for Slow {
    fn name(&self) -> &str {
        "slow"
    }

    async fn segment(&self, _request: &SegmentationRequest) -> Result<Vec<u8>, SegmentationError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn precomputed_cutout_is_decoded() {
    let seg = PrecomputedSegmenter::from_bytes(png(6, 4));
    let cutout = fetch_cutout(&seg, &request(6, 4), Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!((cutout.width, cutout.height), (6, 4));
}

#[tokio::test]
async fn mismatched_cutout_is_kept() {
    let seg = PrecomputedSegmenter::from_bytes(png(3, 3));
    let cutout = fetch_cutout(&seg, &request(6, 4), Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!((cutout.width, cutout.height), (3, 3));
}

#[tokio::test]
async fn garbage_cutout_is_invalid_response() {
    let seg = PrecomputedSegmenter::from_bytes(b"not a png".to_vec());
    let err = fetch_cutout(&seg, &request(2, 2), Duration::from_secs(5))
        .await
        .unwrap_err();
    assert_eq!(err.kind, SegmentationErrorKind::InvalidResponse);
}

#[tokio::test]
async fn missing_file_is_service_error() {
    let seg = PrecomputedSegmenter::from_path("target/segment-unit/does-not-exist.png");
    let err = fetch_cutout(&seg, &request(2, 2), Duration::from_secs(5))
        .await
        .unwrap_err();
    assert_eq!(err.kind, SegmentationErrorKind::Service);
}

#[tokio::test]
async fn slow_segmenter_times_out() {
    let err = fetch_cutout(&Slow, &request(2, 2), Duration::from_millis(50))
        .await
        .unwrap_err();
    assert_eq!(err.kind, SegmentationErrorKind::Timeout);
    assert!(err.is_retryable());
}
