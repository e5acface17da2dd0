//! What the results screen shows.

use tcm_core::i18n::{self, Language, TextKey};
use tcm_core::models::diagnosis::Recommendation;
use tcm_core::models::form::FormData;
use uuid::Uuid;

use crate::submission::{SkipReason, SubmissionOutcome};

#[derive(Debug, Clone, PartialEq)]
pub enum SaveStatus {
    Saved(Uuid),
    /// Nobody is signed in, or the session could not be read.
    Guest,
    /// Signed in, but no report store is configured.
    NotConfigured,
    /// Saving failed. The view still renders; `message` explains and the
    /// host offers retry or "view results anyway".
    Failed { message: String, can_retry: bool },
    Pending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub name: String,
    pub complaint: String,
    pub symptoms: Vec<String>,
    pub constitution: String,
    pub syndrome: String,
    pub summary: String,
    pub recommendations: Vec<Recommendation>,
    pub tongue: Option<String>,
    pub face: Option<String>,
    pub voice: Option<String>,
    pub pulse: Option<String>,
    pub save_status: SaveStatus,
}

impl ResultsView {
    pub fn build(form: &FormData, submission: Option<&SubmissionOutcome>, lang: Language) -> Self {
        let diagnosis = form.diagnosis.clone().unwrap_or_default();

        let tongue = form.tongue.as_ref().and_then(|r| {
            r.analysis
                .observation
                .clone()
                .or_else(|| join_some([&r.analysis.tongue_color, &r.analysis.coating]))
        });
        let face = form.face.as_ref().and_then(|r| {
            r.analysis
                .observation
                .clone()
                .or_else(|| join_some([&r.analysis.complexion, &r.analysis.luster]))
        });
        let voice = form.voice.as_ref().and_then(|r| {
            r.analysis
                .observation
                .clone()
                .or_else(|| join_some([&r.analysis.tone, &r.analysis.volume]))
        });

        Self {
            name: form.profile.name.clone(),
            complaint: form.intake.main_concern.clone(),
            symptoms: form.intake.symptoms.clone(),
            constitution: diagnosis.constitution,
            syndrome: diagnosis.syndrome,
            summary: diagnosis.summary,
            recommendations: diagnosis.recommendations,
            tongue,
            face,
            voice,
            pulse: pulse_line(form, lang),
            save_status: save_status(submission, lang),
        }
    }
}

fn join_some<const N: usize>(parts: [&Option<String>; N]) -> Option<String> {
    let joined = parts
        .into_iter()
        .flatten()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    (!joined.is_empty()).then_some(joined)
}

fn pulse_line(form: &FormData, lang: Language) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(bpm) = form.pulse.bpm {
        parts.push(format!("{bpm} bpm"));
    }
    parts.extend(form.pulse.qualities.iter().map(|q| match lang {
        Language::En => q.name_en().to_string(),
        Language::Zh => q.name_zh().to_string(),
    }));
    (!parts.is_empty()).then(|| parts.join(", "))
}

fn save_status(submission: Option<&SubmissionOutcome>, lang: Language) -> SaveStatus {
    match submission {
        None => SaveStatus::Pending,
        Some(SubmissionOutcome::Saved { report_id, .. }) => SaveStatus::Saved(*report_id),
        Some(SubmissionOutcome::Skipped(SkipReason::NotConfigured)) => SaveStatus::NotConfigured,
        Some(SubmissionOutcome::Skipped(
            SkipReason::Guest | SkipReason::SessionUnavailable(_),
        )) => SaveStatus::Guest,
        Some(outcome @ (SubmissionOutcome::Aborted { .. } | SubmissionOutcome::PersistFailed { .. })) => {
            SaveStatus::Failed {
                message: i18n::text(lang, TextKey::PersistFailed).to_string(),
                can_retry: outcome.can_retry(),
            }
        }
    }
}
