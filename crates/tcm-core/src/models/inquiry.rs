use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ChatRole {
    User,
    Assistant,
}

/// One visible message of the consultation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InquiryState {
    pub chat: Vec<ChatMessage>,
    /// The chat flattened to "Patient: … / Doctor: …" lines.
    pub transcript: String,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export)]
pub struct InquiryPatch {
    #[serde(default)]
    pub chat: Option<Vec<ChatMessage>>,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

impl InquiryState {
    /// A new log or transcript drops the summary unless the same patch
    /// carries one, so the summary always describes the current chat.
    pub(crate) fn merge(&mut self, patch: InquiryPatch) {
        let chat_changed = patch.chat.as_ref().is_some_and(|chat| *chat != self.chat)
            || patch
                .transcript
                .as_ref()
                .is_some_and(|transcript| *transcript != self.transcript);
        if let Some(chat) = patch.chat {
            self.chat = chat;
        }
        if let Some(transcript) = patch.transcript {
            self.transcript = transcript;
        }
        match patch.summary {
            Some(summary) => self.summary = summary,
            None if chat_changed => self.summary.clear(),
            None => {}
        }
    }
}

pub fn flatten_transcript(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| match m.role {
            ChatRole::User => format!("Patient: {}", m.content),
            ChatRole::Assistant => format!("Doctor: {}", m.content),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
