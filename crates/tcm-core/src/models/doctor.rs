//! Doctor tiers. The chosen tier decides which model answers the
//! consultation, the summary and the final report.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::i18n::{self, Language, TextKey};

pub const RESIDENT_MODEL: &str = "us.anthropic.claude-haiku-4-5-20251001-v1:0";
pub const ATTENDING_MODEL: &str = "us.anthropic.claude-sonnet-4-5-20250929-v1:0";
pub const CHIEF_MODEL: &str = "us.anthropic.claude-opus-4-1-20250805-v1:0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DoctorLevel {
    pub id: String,
    pub name: String,
    pub model: String,
}

const TIERS: &[(&str, TextKey, &str)] = &[
    ("resident", TextKey::DoctorResident, RESIDENT_MODEL),
    ("attending", TextKey::DoctorAttending, ATTENDING_MODEL),
    ("chief", TextKey::DoctorChief, CHIEF_MODEL),
];

pub fn doctor_levels(lang: Language) -> Vec<DoctorLevel> {
    TIERS
        .iter()
        .map(|(id, key, model)| DoctorLevel {
            id: (*id).to_string(),
            name: i18n::text(lang, *key).to_string(),
            model: (*model).to_string(),
        })
        .collect()
}

pub fn doctor_level(id: &str, lang: Language) -> Result<DoctorLevel, CoreError> {
    doctor_levels(lang)
        .into_iter()
        .find(|level| level.id == id)
        .ok_or_else(|| CoreError::UnknownDoctorLevel(id.to_string()))
}
