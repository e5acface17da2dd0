//! The completion-provider seam.
//!
//! Steps never talk to a vendor SDK directly. They build a
//! [`CompletionRequest`] and hand it to whatever [`CompletionProvider`] the
//! host injected: Bedrock in production, a scripted fake in tests.

use futures::future::BoxFuture;
use tcm_core::models::inquiry::ChatRole;
use tcm_core::models::media::MediaRef;

use crate::error::AiError;

/// A text (and vision) completion service treated as a black box.
pub trait CompletionProvider: Send + Sync {
    /// Send the request and return the model's reply text.
    fn complete<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> BoxFuture<'a, Result<String, AiError>>;
}

#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    /// Model override. `None` uses the provider's default.
    pub model: Option<String>,
    pub system_prompt: Option<String>,
    pub messages: Vec<Turn>,
}

impl CompletionRequest {
    /// Single user turn with optional inline media.
    pub fn single(prompt: impl Into<String>, attachments: Vec<Attachment>) -> Self {
        Self {
            model: None,
            system_prompt: None,
            messages: vec![Turn {
                role: ChatRole::User,
                content: prompt.into(),
                attachments,
            }],
        }
    }

    pub fn with_model(mut self, model: Option<&str>) -> Self {
        self.model = model.map(str::to_string);
        self
    }

    pub fn with_system(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct Turn {
    pub role: ChatRole,
    pub content: String,
    pub attachments: Vec<Attachment>,
}

impl Turn {
    pub fn text(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            attachments: Vec::new(),
        }
    }
}

/// Inline media bytes sent alongside a turn.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub name: String,
    pub mime: String,
    pub data: Vec<u8>,
}

impl Attachment {
    /// Materialize a media reference into inline bytes.
    pub async fn load(media: &MediaRef) -> Result<Self, AiError> {
        let data = media
            .read_bytes()
            .await
            .map_err(|e| AiError::Media(e.to_string()))?;
        Ok(Self {
            name: media.file_name().unwrap_or("capture").to_string(),
            mime: media.mime.clone(),
            data,
        })
    }
}
