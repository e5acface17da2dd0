//! The consultation chat.
//!
//! The session keeps the visible message log and replays the whole history
//! on every turn, seeded with a system prompt built from the form. The log
//! only grows after a successful reply, so a failed turn can simply be
//! retried.

use tcm_core::i18n::Language;
use tcm_core::models::form::FormData;
use tcm_core::models::inquiry::{ChatMessage, ChatRole, InquiryPatch, flatten_transcript};
use tracing::{info, warn};

use crate::context::build_patient_context;
use crate::error::AiError;
use crate::prompts;
use crate::provider::{CompletionProvider, CompletionRequest, Turn};
use crate::suggestions::{extract_options, rule_name, suggest_replies};

/// One assistant reply plus the answers offered to the patient.
#[derive(Debug, Clone, PartialEq)]
pub struct InquiryTurn {
    pub reply: ChatMessage,
    pub suggestions: Vec<String>,
}

pub struct InquirySession {
    system_prompt: String,
    model: Option<String>,
    language: Language,
    messages: Vec<ChatMessage>,
}

impl InquirySession {
    /// Start (or resume) a consultation for the current form. Any chat
    /// already stored on the form is picked up as the existing log.
    pub fn new(form: &FormData, language: Language) -> Self {
        let system_prompt = format!(
            "{}\n\n{}\n\n{}",
            prompts::INQUIRY_SYSTEM_PROMPT,
            build_patient_context(form),
            prompts::language_instruction(language),
        );
        Self {
            system_prompt,
            model: form.model().map(str::to_string),
            language,
            messages: form.inquiry.chat.clone(),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Ask for the opening question. A no-op returning `None` when the
    /// conversation has already started.
    pub async fn open(
        &mut self,
        provider: &dyn CompletionProvider,
    ) -> Result<Option<InquiryTurn>, AiError> {
        if !self.messages.is_empty() {
            return Ok(None);
        }
        let request = self.request(None);
        let raw = provider.complete(&request).await?;
        Ok(Some(self.accept_reply(None, &raw)))
    }

    /// Send a patient message and wait for the doctor's reply.
    pub async fn send(
        &mut self,
        provider: &dyn CompletionProvider,
        text: &str,
    ) -> Result<InquiryTurn, AiError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AiError::Invocation("empty message".to_string()));
        }

        let request = self.request(Some(text));
        let raw = match provider.complete(&request).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "inquiry turn failed");
                return Err(e);
            }
        };
        Ok(self.accept_reply(Some(text), &raw))
    }

    /// Form update carrying the full log and the flattened transcript.
    pub fn patch(&self) -> InquiryPatch {
        InquiryPatch {
            chat: Some(self.messages.clone()),
            transcript: Some(flatten_transcript(&self.messages)),
            summary: None,
        }
    }

    /// History replayed to the model. The hidden kickoff keeps the first
    /// turn a user turn when the log opens with the doctor's question. The
    /// newest patient turn carries the steering instruction.
    fn request(&self, pending: Option<&str>) -> CompletionRequest {
        let mut turns = Vec::with_capacity(self.messages.len() + 2);

        match self.messages.first() {
            None if pending.is_none() => {
                turns.push(Turn::text(ChatRole::User, steer(prompts::KICKOFF)));
            }
            Some(first) if first.role == ChatRole::Assistant => {
                turns.push(Turn::text(ChatRole::User, prompts::KICKOFF));
            }
            _ => {}
        }

        for message in &self.messages {
            turns.push(Turn::text(message.role, message.content.clone()));
        }
        if let Some(text) = pending {
            turns.push(Turn::text(ChatRole::User, steer(text)));
        }

        CompletionRequest {
            model: self.model.clone(),
            system_prompt: Some(self.system_prompt.clone()),
            messages: turns,
        }
    }

    fn accept_reply(&mut self, sent: Option<&str>, raw: &str) -> InquiryTurn {
        let parsed = extract_options(raw);
        let suggestions = if parsed.options.is_empty() {
            let fallback = suggest_replies(&parsed.text, self.language);
            info!(rule = rule_name(&parsed.text), "no options block, using rule suggestions");
            fallback
        } else {
            parsed.options
        };

        if let Some(text) = sent {
            self.messages.push(ChatMessage::user(text));
        }
        let reply = ChatMessage::assistant(parsed.text);
        self.messages.push(reply.clone());

        info!(messages = self.messages.len(), "inquiry turn complete");

        InquiryTurn { reply, suggestions }
    }
}

fn steer(text: &str) -> String {
    format!("{text}\n\n{}", prompts::STEERING_INSTRUCTION)
}
