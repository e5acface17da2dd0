//! The terminal `analysis` step: generate the assessment, persist it, and
//! move on to the results.

use tcm_ai::provider::CompletionProvider;
use tcm_ai::report::generate_diagnosis;
use tcm_core::i18n::Language;
use tcm_core::models::form::{FormData, FormPatch};
use tracing::info;

use crate::controller::Wizard;
use crate::error::{StepError, WizardError};
use crate::registry::StepId;
use crate::submission::{SkipReason, SubmissionOutcome, Submitter};

pub async fn generate(
    provider: &dyn CompletionProvider,
    form: &FormData,
    lang: Language,
) -> Result<FormPatch, StepError> {
    Ok(FormPatch::Diagnosis(generate_diagnosis(provider, form, lang).await?))
}

/// Run the terminal step. A failed report generation stays on the step so
/// the user can retry; a failed or skipped persistence still advances to
/// the results.
pub async fn finish_assessment(
    wizard: &mut Wizard,
    provider: &dyn CompletionProvider,
    submitter: Option<&Submitter>,
) -> Result<SubmissionOutcome, WizardError> {
    let current = wizard.current_step();
    if current != Some(StepId::Analysis) {
        return Err(WizardError::WrongStep {
            expected: StepId::Analysis,
            current,
        });
    }
    let token = wizard.step_token();

    if wizard.form().diagnosis.is_none() {
        let patch = generate(provider, wizard.form(), wizard.language()).await?;
        wizard.apply(token, patch)?;
    }

    let outcome = match submitter {
        Some(submitter) => submitter.submit(wizard.form(), wizard.report_id()).await,
        None => SubmissionOutcome::Skipped(SkipReason::NotConfigured),
    };
    info!(outcome = ?outcome, "assessment finished");

    wizard.record_submission(outcome.clone());
    wizard.complete_step(token)?;
    Ok(outcome)
}

/// "Retry" from the results view after a failed save.
pub async fn retry_submission(
    wizard: &mut Wizard,
    submitter: &Submitter,
) -> Option<SubmissionOutcome> {
    let retryable = wizard.submission().is_some_and(SubmissionOutcome::can_retry);
    if !wizard.is_finished() || !retryable {
        return None;
    }
    let outcome = submitter.submit(wizard.form(), wizard.report_id()).await;
    wizard.record_submission(outcome.clone());
    Some(outcome)
}
