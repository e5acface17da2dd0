//! Host-side media producers (camera, gallery, microphone, file picker).

use futures::future::BoxFuture;
use tcm_core::models::media::{MediaKind, MediaRef};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The user backed out of the picker. Not an error to show.
    #[error("capture cancelled")]
    Cancelled,

    #[error("{0}")]
    Failed(String),
}

/// Opaque producer of `{uri, mime, base64?}` for one kind of capture.
pub trait MediaCapture: Send + Sync {
    fn capture(&self, kind: MediaKind) -> BoxFuture<'_, Result<MediaRef, CaptureError>>;
}
