//! Consultation summary and the final assessment report.

use tcm_core::i18n::Language;
use tcm_core::models::diagnosis::DiagnosisReport;
use tcm_core::models::form::FormData;
use tracing::info;

use crate::context::build_assessment_context;
use crate::error::AiError;
use crate::json::parse_json;
use crate::prompts;
use crate::provider::{CompletionProvider, CompletionRequest};

/// Summarize the consultation transcript into one paragraph.
pub async fn summarize_inquiry(
    provider: &dyn CompletionProvider,
    form: &FormData,
    lang: Language,
) -> Result<String, AiError> {
    let transcript = form.inquiry.transcript.trim();
    if transcript.is_empty() {
        return Ok(String::new());
    }

    let prompt = format!(
        "{}\n\n{}\n\n<consultation>\n{transcript}\n</consultation>",
        prompts::SUMMARY_PROMPT,
        prompts::language_instruction(lang),
    );
    let request = CompletionRequest::single(prompt, Vec::new()).with_model(form.model());

    info!(transcript_len = transcript.len(), "summarizing consultation");
    let summary = provider.complete(&request).await?;
    Ok(summary.trim().to_string())
}

/// Ask for the constitution / pattern assessment over everything collected.
pub async fn generate_diagnosis(
    provider: &dyn CompletionProvider,
    form: &FormData,
    lang: Language,
) -> Result<DiagnosisReport, AiError> {
    let request = CompletionRequest::single(build_assessment_context(form), Vec::new())
        .with_model(form.model())
        .with_system(prompts::localized(prompts::DIAGNOSIS_SYSTEM_PROMPT, lang));

    info!(model = ?form.model(), "starting report generation");

    let response = provider.complete(&request).await?;
    let report: DiagnosisReport = parse_json(&response)?;
    if report.summary.trim().is_empty() && report.syndrome.trim().is_empty() {
        return Err(AiError::SchemaViolation(
            "report has neither a summary nor a syndrome".to_string(),
        ));
    }

    info!(
        recommendations = report.recommendations.len(),
        "report generation complete"
    );
    Ok(report)
}
