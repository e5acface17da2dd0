use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The structured output of the final analysis call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiagnosisReport {
    #[serde(default)]
    pub constitution: String,
    #[serde(default)]
    pub syndrome: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Recommendation {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}
