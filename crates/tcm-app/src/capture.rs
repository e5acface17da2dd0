//! File-backed media capture for the console host.
//!
//! Where the phone app opens a camera or a microphone, the console asks for
//! a path. [`FileCapture`] then reads that file, checks that its type fits
//! the capture kind and hands the wizard an inline base64 payload.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use futures::future::BoxFuture;
use tcm_core::models::media::{MediaKind, MediaRef};
use tcm_wizard::steps::capture::{CaptureError, MediaCapture};
use tracing::info;

/// MIME type for a file, from its extension.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "m4a" | "mp4" => "audio/mp4",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "aac" => "audio/aac",
        "ogg" => "audio/ogg",
        "webm" => "audio/webm",
        _ => return None,
    };
    Some(mime)
}

fn accepts(kind: MediaKind, mime: &str) -> bool {
    match kind {
        MediaKind::Tongue | MediaKind::Face | MediaKind::Medicine => mime.starts_with("image/"),
        MediaKind::Voice => mime.starts_with("audio/"),
        MediaKind::Report => mime.starts_with("image/") || mime == "application/pdf",
    }
}

/// One-shot capture of a file the user named. An empty path means the user
/// backed out.
#[derive(Debug, Clone)]
pub struct FileCapture {
    path: Option<PathBuf>,
}

impl FileCapture {
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim().trim_matches(['"', '\'']);
        Self {
            path: (!trimmed.is_empty()).then(|| PathBuf::from(trimmed)),
        }
    }

    async fn read(&self, kind: MediaKind) -> Result<MediaRef, CaptureError> {
        let Some(path) = &self.path else {
            return Err(CaptureError::Cancelled);
        };
        let mime = mime_for_path(path).ok_or_else(|| {
            CaptureError::Failed(format!("unsupported file type: {}", path.display()))
        })?;
        if !accepts(kind, mime) {
            return Err(CaptureError::Failed(format!(
                "{mime} cannot be used for {}",
                kind.as_str()
            )));
        }

        let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            ErrorKind::PermissionDenied => CaptureError::PermissionDenied(path.display().to_string()),
            _ => CaptureError::Failed(format!("{}: {e}", path.display())),
        })?;
        if bytes.is_empty() {
            return Err(CaptureError::Failed(format!("{} is empty", path.display())));
        }

        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.clone());
        info!(kind = kind.as_str(), mime, size = bytes.len(), "file captured");
        Ok(MediaRef::new(format!("file://{}", absolute.display()), mime)
            .with_base64(BASE64.encode(&bytes)))
    }
}

impl MediaCapture for FileCapture {
    fn capture(&self, kind: MediaKind) -> BoxFuture<'_, Result<MediaRef, CaptureError>> {
        Box::pin(self.read(kind))
    }
}
