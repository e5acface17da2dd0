//! Whether the generic "Next" control is enabled.
//!
//! Only `basic_info` and `symptoms` are gated here. The other steps either
//! have nothing required or gate themselves through their own completion.

use tcm_core::models::form::FormData;

use crate::registry::StepId;

pub fn can_proceed(step: StepId, form: &FormData) -> bool {
    match step {
        StepId::BasicInfo => {
            let profile = &form.profile;
            !profile.name.trim().is_empty()
                && !profile.age.trim().is_empty()
                && profile.gender.is_some()
        }
        StepId::Symptoms => !form.intake.main_concern.trim().is_empty(),
        _ => true,
    }
}

/// String-keyed variant for ids arriving from outside. Unknown ids pass.
pub fn can_proceed_id(step: &str, form: &FormData) -> bool {
    match StepId::parse(step) {
        Ok(step) => can_proceed(step, form),
        Err(_) => true,
    }
}
