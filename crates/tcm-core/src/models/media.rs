use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;

/// Which capture a piece of media belongs to. Drives prompt choice and the
/// storage key layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum MediaKind {
    Tongue,
    Face,
    Voice,
    Medicine,
    Report,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tongue => "tongue",
            Self::Face => "face",
            Self::Voice => "voice",
            Self::Medicine => "medicine",
            Self::Report => "report",
        }
    }
}

/// A captured or picked piece of media: a local URI plus an optional inline
/// payload. Producers are opaque to the wizard core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MediaRef {
    pub uri: String,
    pub mime: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base64: Option<String>,
}

impl MediaRef {
    pub fn new(uri: impl Into<String>, mime: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime: mime.into(),
            base64: None,
        }
    }

    pub fn with_base64(mut self, base64: impl Into<String>) -> Self {
        self.base64 = Some(base64.into());
        self
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    pub fn is_audio(&self) -> bool {
        self.mime.starts_with("audio/")
    }

    /// Raw bytes of the capture. Inline base64 wins over the URI and a
    /// `data:` prefix is tolerated; without a payload the local file behind
    /// the URI is read.
    pub async fn read_bytes(&self) -> Result<Vec<u8>, CoreError> {
        if let Some(encoded) = &self.base64 {
            let encoded = match encoded.split_once(";base64,") {
                Some((prefix, rest)) if prefix.starts_with("data:") => rest,
                _ => encoded.as_str(),
            };
            if encoded.trim().is_empty() {
                return Err(CoreError::EmptyMedia);
            }
            return STANDARD
                .decode(encoded.trim())
                .map_err(|e| CoreError::Media(format!("invalid base64 payload: {e}")));
        }

        let path = self.uri.strip_prefix("file://").unwrap_or(&self.uri);
        if path.is_empty() {
            return Err(CoreError::EmptyMedia);
        }
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| CoreError::Media(format!("failed to read {path}: {e}")))?;
        if bytes.is_empty() {
            return Err(CoreError::EmptyMedia);
        }
        Ok(bytes)
    }

    /// Last URI segment, if there is one.
    pub fn file_name(&self) -> Option<&str> {
        self.uri.rsplit('/').next().filter(|s| !s.is_empty())
    }
}

/// An uploaded medical document and the text the model read out of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UploadedFile {
    pub id: Uuid,
    pub uri: String,
    pub name: String,
    pub extracted_text: String,
}
