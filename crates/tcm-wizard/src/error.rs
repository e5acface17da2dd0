use tcm_ai::error::AiError;
use tcm_core::error::CoreError;
use tcm_core::i18n::{self, Language, TextKey};
use tcm_core::models::media::MediaKind;
use thiserror::Error;

use crate::registry::StepId;

/// Failures a step handles itself. None of these reach the controller
/// except through the error boundary.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("capture failed: {0}")]
    Capture(String),

    #[error("analysis failed: {0}")]
    Analysis(#[from] AiError),

    #[error("the {} capture was rejected as the wrong subject", .0.as_str())]
    InvalidSubject(MediaKind),

    #[error("an analysis is already in progress")]
    Busy,

    #[error("invalid input: {0}")]
    Invalid(#[from] CoreError),
}

impl StepError {
    /// Whether offering "try again" makes sense. Permission problems need
    /// the user to act outside the app first.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::PermissionDenied(_))
    }

    pub fn message(&self, lang: Language) -> String {
        let key = match self {
            Self::PermissionDenied(_) => TextKey::PermissionDenied,
            Self::Capture(_) => TextKey::CaptureFailed,
            Self::Analysis(_) => TextKey::AnalysisFailed,
            Self::InvalidSubject(kind) => invalid_subject_key(*kind),
            Self::Busy => TextKey::CaptureBusy,
            Self::Invalid(e) => return e.to_string(),
        };
        i18n::text(lang, key).to_string()
    }
}

fn invalid_subject_key(kind: MediaKind) -> TextKey {
    match kind {
        MediaKind::Tongue => TextKey::InvalidTongue,
        MediaKind::Face => TextKey::InvalidFace,
        MediaKind::Voice => TextKey::InvalidAudio,
        MediaKind::Report | MediaKind::Medicine => TextKey::InvalidDocument,
    }
}

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("stale step token (step {step}, generation {generation})")]
    StaleToken { step: usize, generation: u64 },

    #[error("patch rejected: {0}")]
    Rejected(#[from] CoreError),

    #[error("no confirmation is pending")]
    NoPendingConfirmation,

    #[error("expected to be on {expected}, currently on {current:?}")]
    WrongStep {
        expected: StepId,
        current: Option<StepId>,
    },

    #[error(transparent)]
    Step(#[from] StepError),
}
