//! [`CompletionProvider`] over the Bedrock Converse API.
//!
//! Text turns map to `ContentBlock::Text`. Images are sent as `ImageBlock`
//! and PDFs as `DocumentBlock`; Converse parses both natively. Converse has
//! no audio input, so audio attachments fail with
//! [`AiError::UnsupportedMedia`] and the voice step reports a retryable
//! error instead of sending garbage.

use aws_sdk_bedrockruntime::Client;
use futures::future::BoxFuture;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, DocumentBlock, DocumentFormat, DocumentSource, ImageBlock,
    ImageFormat, ImageSource, Message, SystemContentBlock,
};
use tcm_core::models::inquiry::ChatRole;
use tracing::info;
use uuid::Uuid;

use crate::error::AiError;
use crate::provider::{Attachment, CompletionProvider, CompletionRequest};

pub struct BedrockProvider {
    client: Client,
    default_model: String,
}

impl BedrockProvider {
    pub fn new(config: &aws_config::SdkConfig, default_model: impl Into<String>) -> Self {
        Self {
            client: Client::new(config),
            default_model: default_model.into(),
        }
    }

    async fn converse(&self, request: &CompletionRequest) -> Result<String, AiError> {
        let model_id = request.model.as_deref().unwrap_or(&self.default_model);
        let invocation_id = Uuid::new_v4();

        let mut messages = Vec::with_capacity(request.messages.len());
        for turn in &request.messages {
            let role = match turn.role {
                ChatRole::User => ConversationRole::User,
                ChatRole::Assistant => ConversationRole::Assistant,
            };
            let mut builder = Message::builder().role(role);
            for attachment in &turn.attachments {
                builder = builder.content(attachment_block(attachment)?);
            }
            let message = builder
                .content(ContentBlock::Text(turn.content.clone()))
                .build()
                .map_err(|e| AiError::Invocation(e.to_string()))?;
            messages.push(message);
        }

        info!(
            invocation_id = %invocation_id,
            model = model_id,
            turns = messages.len(),
            "invoking model"
        );

        let mut call = self
            .client
            .converse()
            .model_id(model_id)
            .set_messages(Some(messages));
        if let Some(system) = &request.system_prompt {
            call = call.system(SystemContentBlock::Text(system.clone()));
        }

        let response = call
            .send()
            .await
            .map_err(|e| AiError::Invocation(e.into_service_error().to_string()))?;

        let output_message = response
            .output()
            .and_then(|o| o.as_message().ok())
            .ok_or_else(|| AiError::ResponseParse("no message in response".to_string()))?;

        let text = output_message
            .content()
            .iter()
            .filter_map(|block| {
                if let ContentBlock::Text(t) = block {
                    Some(t.as_str())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        info!(
            invocation_id = %invocation_id,
            text_len = text.len(),
            "model invocation complete"
        );

        Ok(text)
    }
}

impl CompletionProvider for BedrockProvider {
    fn complete<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> BoxFuture<'a, Result<String, AiError>> {
        Box::pin(self.converse(request))
    }
}

fn attachment_block(attachment: &Attachment) -> Result<ContentBlock, AiError> {
    let blob = aws_smithy_types::Blob::new(attachment.data.clone());

    if let Some(format) = image_format_for_mime(&attachment.mime) {
        let image = ImageBlock::builder()
            .format(format)
            .source(ImageSource::Bytes(blob))
            .build()
            .map_err(|e| AiError::Invocation(e.to_string()))?;
        return Ok(ContentBlock::Image(image));
    }

    if attachment.mime == "application/pdf" {
        let doc = DocumentBlock::builder()
            .format(DocumentFormat::Pdf)
            .name(sanitize_document_name(&attachment.name))
            .source(DocumentSource::Bytes(blob))
            .build()
            .map_err(|e| AiError::Invocation(e.to_string()))?;
        return Ok(ContentBlock::Document(doc));
    }

    Err(AiError::UnsupportedMedia(attachment.mime.clone()))
}

pub fn image_format_for_mime(mime: &str) -> Option<ImageFormat> {
    match mime.to_lowercase().as_str() {
        "image/png" => Some(ImageFormat::Png),
        "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
        "image/gif" => Some(ImageFormat::Gif),
        "image/webp" => Some(ImageFormat::Webp),
        _ => None,
    }
}

/// Sanitize a filename for use as a Bedrock `DocumentBlock` name.
///
/// The name field only allows alphanumeric characters, single whitespace,
/// hyphens, parentheses, and square brackets.
fn sanitize_document_name(filename: &str) -> String {
    let mut result = String::with_capacity(filename.len());
    let mut prev_space = false;
    for c in filename.chars() {
        let c = if c.is_alphanumeric() || matches!(c, '-' | '(' | ')' | '[' | ']') {
            c
        } else {
            ' '
        };
        if c == ' ' {
            if !prev_space {
                result.push(c);
            }
            prev_space = true;
        } else {
            result.push(c);
            prev_space = false;
        }
    }

    let trimmed = result.trim();
    if trimmed.is_empty() {
        "report".to_string()
    } else {
        trimmed.to_string()
    }
}
