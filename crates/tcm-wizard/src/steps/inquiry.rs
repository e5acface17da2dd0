//! `inquiry` and `inquiry_summary`.

use tcm_ai::inquiry::{InquirySession, InquiryTurn};
use tcm_ai::provider::CompletionProvider;
use tcm_ai::report::summarize_inquiry;
use tcm_core::i18n::Language;
use tcm_core::models::form::{FormData, FormPatch};
use tcm_core::models::inquiry::InquiryPatch;

use crate::error::StepError;

/// The consultation chat. Every successful turn yields a patch carrying
/// the whole log and the flattened transcript.
pub struct InquiryStep {
    session: InquirySession,
}

impl InquiryStep {
    pub fn new(form: &FormData, lang: Language) -> Self {
        Self {
            session: InquirySession::new(form, lang),
        }
    }

    pub fn session(&self) -> &InquirySession {
        &self.session
    }

    /// Opening question, unless the chat is already under way.
    pub async fn open(
        &mut self,
        provider: &dyn CompletionProvider,
    ) -> Result<Option<(InquiryTurn, FormPatch)>, StepError> {
        let turn = self.session.open(provider).await?;
        Ok(turn.map(|turn| (turn, FormPatch::Inquiry(self.session.patch()))))
    }

    pub async fn send(
        &mut self,
        provider: &dyn CompletionProvider,
        text: &str,
    ) -> Result<(InquiryTurn, FormPatch), StepError> {
        let turn = self.session.send(provider, text).await?;
        Ok((turn, FormPatch::Inquiry(self.session.patch())))
    }
}

/// Draft summary for `inquiry_summary`. An existing summary is kept so the
/// user's edits survive coming back to the step; more chat turns clear it
/// and a fresh one is drafted.
pub async fn draft_summary(
    provider: &dyn CompletionProvider,
    form: &FormData,
    lang: Language,
) -> Result<String, StepError> {
    if !form.inquiry.summary.trim().is_empty() {
        return Ok(form.inquiry.summary.clone());
    }
    Ok(summarize_inquiry(provider, form, lang).await?)
}

/// The (possibly edited) summary the user confirmed.
pub fn confirm_summary(text: &str) -> FormPatch {
    FormPatch::Inquiry(InquiryPatch {
        summary: Some(text.trim().to_string()),
        ..Default::default()
    })
}
