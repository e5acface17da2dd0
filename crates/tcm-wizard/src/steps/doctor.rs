use tcm_core::i18n::Language;
use tcm_core::models::doctor::{DoctorLevel, doctor_level, doctor_levels};
use tcm_core::models::form::{FormData, FormPatch};

use crate::error::StepError;

/// Tiers offered on the `select_doctor` step, with the current choice.
pub fn options(form: &FormData, lang: Language) -> (Vec<DoctorLevel>, Option<&str>) {
    (
        doctor_levels(lang),
        form.doctor.as_ref().map(|d| d.id.as_str()),
    )
}

pub fn select(id: &str, lang: Language) -> Result<FormPatch, StepError> {
    Ok(FormPatch::Doctor(doctor_level(id, lang)?))
}
