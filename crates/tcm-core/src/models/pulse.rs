//! The twelve pulse qualities and which of them contradict each other.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PulseQuality {
    Fu,
    Chen,
    Chi,
    Shuo,
    Xu,
    Shi,
    Hua,
    Se,
    Xian,
    Xi,
    Hong,
    Jin,
}

/// Symmetric conflict relation. Each pair is listed once.
const CONFLICTS: &[(PulseQuality, PulseQuality)] = &[
    (PulseQuality::Fu, PulseQuality::Chen),
    (PulseQuality::Chi, PulseQuality::Shuo),
    (PulseQuality::Xu, PulseQuality::Shi),
    (PulseQuality::Hua, PulseQuality::Se),
    (PulseQuality::Xi, PulseQuality::Hong),
];

impl PulseQuality {
    pub const ALL: [PulseQuality; 12] = [
        Self::Fu,
        Self::Chen,
        Self::Chi,
        Self::Shuo,
        Self::Xu,
        Self::Shi,
        Self::Hua,
        Self::Se,
        Self::Xian,
        Self::Xi,
        Self::Hong,
        Self::Jin,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Fu => "fu",
            Self::Chen => "chen",
            Self::Chi => "chi",
            Self::Shuo => "shuo",
            Self::Xu => "xu",
            Self::Shi => "shi",
            Self::Hua => "hua",
            Self::Se => "se",
            Self::Xian => "xian",
            Self::Xi => "xi",
            Self::Hong => "hong",
            Self::Jin => "jin",
        }
    }

    pub fn name_zh(&self) -> &'static str {
        match self {
            Self::Fu => "浮脉",
            Self::Chen => "沉脉",
            Self::Chi => "迟脉",
            Self::Shuo => "数脉",
            Self::Xu => "虚脉",
            Self::Shi => "实脉",
            Self::Hua => "滑脉",
            Self::Se => "涩脉",
            Self::Xian => "弦脉",
            Self::Xi => "细脉",
            Self::Hong => "洪脉",
            Self::Jin => "紧脉",
        }
    }

    pub fn name_en(&self) -> &'static str {
        match self {
            Self::Fu => "Floating",
            Self::Chen => "Deep",
            Self::Chi => "Slow",
            Self::Shuo => "Rapid",
            Self::Xu => "Deficient",
            Self::Shi => "Excess",
            Self::Hua => "Slippery",
            Self::Se => "Choppy",
            Self::Xian => "Wiry",
            Self::Xi => "Thin",
            Self::Hong => "Surging",
            Self::Jin => "Tight",
        }
    }

    pub fn from_id(id: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|q| q.id() == id)
            .ok_or_else(|| CoreError::UnknownPulseQuality(id.to_string()))
    }

    pub fn conflicts_with(&self, other: PulseQuality) -> bool {
        CONFLICTS
            .iter()
            .any(|&(a, b)| (a == *self && b == other) || (b == *self && a == other))
    }

    pub fn info(&self) -> PulseQualityInfo {
        PulseQualityInfo {
            id: self.id().to_string(),
            name_zh: self.name_zh().to_string(),
            name_en: self.name_en().to_string(),
        }
    }
}

/// Catalog entry as shown to the user and written to the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PulseQualityInfo {
    pub id: String,
    pub name_zh: String,
    pub name_en: String,
}

/// First quality in `selected` that conflicts with `candidate`.
pub fn first_conflict(selected: &[PulseQuality], candidate: PulseQuality) -> Option<PulseQuality> {
    selected
        .iter()
        .copied()
        .find(|existing| existing.conflicts_with(candidate))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PulseReading {
    pub bpm: Option<u16>,
    pub qualities: Vec<PulseQuality>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export)]
pub struct PulsePatch {
    /// Beats per minute as typed. An empty string clears the reading.
    #[serde(default)]
    pub bpm: Option<String>,
    #[serde(default)]
    pub qualities: Option<Vec<PulseQuality>>,
}

impl PulseReading {
    pub(crate) fn merge(&mut self, patch: PulsePatch) -> Result<(), CoreError> {
        let bpm = patch.bpm.as_deref().map(parse_bpm).transpose()?;
        if let Some(qualities) = &patch.qualities {
            validate_selection(qualities)?;
        }

        if let Some(bpm) = bpm {
            self.bpm = bpm;
        }
        if let Some(qualities) = patch.qualities {
            self.qualities = qualities;
        }
        Ok(())
    }
}

/// Parse a typed BPM value. `Ok(None)` for an empty field.
pub fn parse_bpm(raw: &str) -> Result<Option<u16>, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let bpm: u16 = trimmed.parse().map_err(|_| CoreError::InvalidField {
        field: "bpm",
        reason: format!("'{trimmed}' is not a whole number"),
    })?;
    if !(20..=250).contains(&bpm) {
        return Err(CoreError::InvalidField {
            field: "bpm",
            reason: format!("{bpm} is out of range"),
        });
    }
    Ok(Some(bpm))
}

fn validate_selection(qualities: &[PulseQuality]) -> Result<(), CoreError> {
    for (i, quality) in qualities.iter().enumerate() {
        if let Some(existing) = first_conflict(&qualities[..i], *quality) {
            return Err(CoreError::ConflictingPulse(
                existing.id().to_string(),
                quality.id().to_string(),
            ));
        }
    }
    Ok(())
}
