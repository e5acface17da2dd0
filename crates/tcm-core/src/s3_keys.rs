//! S3 key/path conventions.
//!
//! Pure string functions with no AWS SDK dependency. These define the canonical
//! layout of objects in the report bucket.

use uuid::Uuid;

use crate::models::media::MediaKind;

pub fn report(user_id: &str, id: Uuid) -> String {
    format!("users/{user_id}/reports/{id}.json")
}

pub fn reports_prefix(user_id: &str) -> String {
    format!("users/{user_id}/reports/")
}

/// Key for an uploaded capture. The extension follows the MIME type so the
/// object can be served back with a sensible name.
pub fn media(user_id: &str, kind: MediaKind, id: Uuid, mime: &str) -> String {
    format!(
        "users/{user_id}/media/{}/{id}.{}",
        kind.as_str(),
        extension_for_mime(mime)
    )
}

fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "audio/mp4" | "audio/m4a" | "audio/x-m4a" => "m4a",
        "audio/mpeg" => "mp3",
        "audio/wav" | "audio/x-wav" => "wav",
        "audio/webm" => "webm",
        "application/pdf" => "pdf",
        _ => "bin",
    }
}
