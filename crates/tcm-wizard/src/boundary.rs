//! The per-step error boundary.
//!
//! A step that panics or fails in a way it cannot present itself is turned
//! into a [`StepFault`]. The controller then shows the fault instead of the
//! step and offers "retry" (remount) or "go back".

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tcm_core::i18n::{self, Language, TextKey};
use tracing::error;

use crate::error::StepError;
use crate::registry::StepId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFault {
    pub step: StepId,
    pub message: String,
    pub retryable: bool,
}

impl StepFault {
    pub fn from_error(step: StepId, err: &StepError, lang: Language) -> Self {
        Self {
            step,
            message: err.message(lang),
            retryable: err.is_retryable(),
        }
    }

    fn from_panic(step: StepId, payload: Box<dyn Any + Send>, lang: Language) -> Self {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_default();
        error!(step = %step, detail = %detail, "step panicked");
        Self {
            step,
            message: i18n::text(lang, TextKey::StepCrashed).to_string(),
            retryable: true,
        }
    }
}

/// Run step work, converting a panic into a fault.
pub async fn guard<F, T>(step: StepId, lang: Language, work: F) -> Result<T, StepFault>
where
    F: Future<Output = T>,
{
    AssertUnwindSafe(work)
        .catch_unwind()
        .await
        .map_err(|payload| StepFault::from_panic(step, payload, lang))
}
