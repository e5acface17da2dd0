//! Capture analysis: send one piece of media with a prompt, parse the JSON
//! verdict, and check the validity flag.

use serde::de::DeserializeOwned;
use tcm_core::i18n::Language;
use tcm_core::models::media::{MediaKind, MediaRef};
use tcm_core::models::modality::SubjectCheck;
use tracing::{info, warn};

use crate::error::AiError;
use crate::json::parse_json;
use crate::prompts;
use crate::provider::{Attachment, CompletionProvider, CompletionRequest};

/// Parsed analysis. `InvalidSubject` is a user error (wrong photo), not a
/// system error; the caller keeps the capture so the user can retake.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict<A> {
    Valid(A),
    InvalidSubject(A),
}

pub async fn analyze_media<A>(
    provider: &dyn CompletionProvider,
    kind: MediaKind,
    media: &MediaRef,
    model: Option<&str>,
    lang: Language,
) -> Result<Verdict<A>, AiError>
where
    A: DeserializeOwned + SubjectCheck,
{
    let attachment = Attachment::load(media).await?;
    let prompt = prompts::localized(prompts::analysis_prompt(kind), lang);
    let request = CompletionRequest::single(prompt, vec![attachment]).with_model(model);

    info!(kind = kind.as_str(), uri = %media.uri, "starting media analysis");

    let response = provider.complete(&request).await?;
    let analysis: A = parse_json(&response).inspect_err(|e| {
        warn!(kind = kind.as_str(), error = %e, "could not parse analysis response");
    })?;

    if analysis.is_valid_subject() {
        info!(kind = kind.as_str(), "media analysis complete");
        Ok(Verdict::Valid(analysis))
    } else {
        info!(kind = kind.as_str(), "model rejected the capture subject");
        Ok(Verdict::InvalidSubject(analysis))
    }
}
