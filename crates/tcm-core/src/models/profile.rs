use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Identity fields collected on the first step.
///
/// Numeric fields stay strings so a half-typed value round-trips to the
/// input control unchanged; they are validated when a patch is applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Profile {
    pub name: String,
    /// Age in years.
    pub age: String,
    pub gender: Option<Gender>,
    /// Height in centimeters.
    pub height: String,
    /// Weight in kilograms.
    pub weight: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export)]
pub struct ProfilePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
}

impl Profile {
    /// Validate every field of the patch first, then overwrite.
    pub(crate) fn merge(&mut self, patch: ProfilePatch) -> Result<(), CoreError> {
        let age = patch.age.as_deref().map(normalize_age).transpose()?;
        let height = patch
            .height
            .as_deref()
            .map(|v| normalize_measure("height", v, 300.0))
            .transpose()?;
        let weight = patch
            .weight
            .as_deref()
            .map(|v| normalize_measure("weight", v, 500.0))
            .transpose()?;

        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(age) = age {
            self.age = age;
        }
        if let Some(gender) = patch.gender {
            self.gender = Some(gender);
        }
        if let Some(height) = height {
            self.height = height;
        }
        if let Some(weight) = weight {
            self.weight = weight;
        }
        Ok(())
    }
}

/// Trim an age string. Empty stays empty (not provided yet).
pub fn normalize_age(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    let years: u16 = trimmed
        .parse()
        .map_err(|_| CoreError::invalid("age", format!("'{trimmed}' is not a whole number")))?;
    if !(1..=150).contains(&years) {
        return Err(CoreError::invalid("age", format!("{years} is out of range")));
    }
    Ok(years.to_string())
}

fn normalize_measure(field: &'static str, raw: &str, max: f64) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| CoreError::invalid(field, format!("'{trimmed}' is not a number")))?;
    if !value.is_finite() || value <= 0.0 || value > max {
        return Err(CoreError::invalid(field, format!("{trimmed} is out of range")));
    }
    Ok(trimmed.to_string())
}
