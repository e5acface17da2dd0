use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SymptomDuration {
    Days,
    Weeks,
    Months,
    Years,
}

/// Clinical intake. `symptoms` is the canonical ordered token list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Intake {
    pub main_concern: String,
    pub symptoms: Vec<String>,
    pub symptom_duration: Option<SymptomDuration>,
    pub medicines: Vec<Medicine>,
}

/// Symptoms as received at the merge boundary. Older clients send a
/// comma-joined string; both shapes normalize to the same token list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum SymptomsInput {
    Tokens(Vec<String>),
    Joined(String),
}

impl SymptomsInput {
    pub fn into_tokens(self) -> Vec<String> {
        let raw: Vec<String> = match self {
            Self::Tokens(tokens) => tokens,
            Self::Joined(joined) => joined
                .split([',', '，'])
                .map(str::to_string)
                .collect(),
        };
        let mut tokens: Vec<String> = Vec::with_capacity(raw.len());
        for token in raw {
            let token = token.trim();
            if !token.is_empty() && !tokens.iter().any(|t| t == token) {
                tokens.push(token.to_string());
            }
        }
        tokens
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export)]
pub struct IntakePatch {
    #[serde(default)]
    pub main_concern: Option<String>,
    #[serde(default)]
    pub symptoms: Option<SymptomsInput>,
    #[serde(default)]
    pub symptom_duration: Option<SymptomDuration>,
}

impl Intake {
    pub(crate) fn merge(&mut self, patch: IntakePatch) {
        if let Some(concern) = patch.main_concern {
            self.main_concern = concern;
        }
        if let Some(symptoms) = patch.symptoms {
            self.symptoms = symptoms.into_tokens();
        }
        if let Some(duration) = patch.symptom_duration {
            self.symptom_duration = Some(duration);
        }
    }

    /// Comma-joined view used in prompts and the persisted report.
    pub fn symptoms_joined(&self) -> String {
        self.symptoms.join(", ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum MedicineKind {
    Text,
    Image,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Medicine {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: MedicineKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base64: Option<String>,
}

impl Medicine {
    pub fn text(name: impl Into<String>, content: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: MedicineKind::Text,
            name: name.into(),
            content,
            uri: None,
            base64: None,
        }
    }

    pub fn image(name: impl Into<String>, uri: impl Into<String>, base64: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: MedicineKind::Image,
            name: name.into(),
            content: None,
            uri: Some(uri.into()),
            base64,
        }
    }

    /// One-line description for prompts.
    pub fn describe(&self) -> String {
        match (&self.kind, &self.content) {
            (MedicineKind::Text, Some(content)) if !content.trim().is_empty() => {
                format!("{} ({})", self.name, content.trim())
            }
            (MedicineKind::Image, _) => format!("{} (photo provided)", self.name),
            _ => self.name.clone(),
        }
    }
}
