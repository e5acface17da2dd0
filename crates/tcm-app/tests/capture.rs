use std::path::Path;

use tcm_app::capture::{FileCapture, mime_for_path};
use tcm_core::models::media::MediaKind;
use tcm_wizard::steps::capture::{CaptureError, MediaCapture};

#[test]
fn mime_follows_extension() {
    assert_eq!(mime_for_path(Path::new("tongue.JPG")), Some("image/jpeg"));
    assert_eq!(mime_for_path(Path::new("a/b/report.pdf")), Some("application/pdf"));
    assert_eq!(mime_for_path(Path::new("voice.m4a")), Some("audio/mp4"));
    assert_eq!(mime_for_path(Path::new("notes.txt")), None);
    assert_eq!(mime_for_path(Path::new("no_extension")), None);
}

#[tokio::test]
async fn file_is_read_inline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tongue.png");
    std::fs::write(&path, b"hello").unwrap();

    let media = FileCapture::new(&format!("\"{}\"", path.display()))
        .capture(MediaKind::Tongue)
        .await
        .unwrap();

    assert_eq!(media.mime, "image/png");
    assert_eq!(media.base64.as_deref(), Some("aGVsbG8="));
    assert!(media.uri.starts_with("file://"));
    assert!(media.uri.ends_with("tongue.png"));
}

#[tokio::test]
async fn empty_path_is_a_cancel() {
    let result = FileCapture::new("   ").capture(MediaKind::Face).await;
    assert!(matches!(result, Err(CaptureError::Cancelled)));
}

#[tokio::test]
async fn file_type_must_fit_the_step() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cough.mp3");
    std::fs::write(&path, b"audio").unwrap();
    let raw = path.display().to_string();

    let result = FileCapture::new(&raw).capture(MediaKind::Tongue).await;
    assert!(matches!(result, Err(CaptureError::Failed(_))));

    let media = FileCapture::new(&raw).capture(MediaKind::Voice).await.unwrap();
    assert_eq!(media.mime, "audio/mpeg");
}

#[tokio::test]
async fn missing_and_empty_files_fail() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.jpg");
    let result = FileCapture::new(&missing.display().to_string())
        .capture(MediaKind::Face)
        .await;
    assert!(matches!(result, Err(CaptureError::Failed(_))));

    let empty = dir.path().join("empty.jpg");
    std::fs::write(&empty, b"").unwrap();
    let result = FileCapture::new(&empty.display().to_string())
        .capture(MediaKind::Face)
        .await;
    assert!(matches!(result, Err(CaptureError::Failed(_))));
}
