use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::diagnosis::{DiagnosisReport, Recommendation};
use super::form::FormData;
use super::inquiry::ChatMessage;
use super::pulse::PulseQualityInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ReportStatus {
    Completed,
    Incomplete,
}

/// Storage paths of the uploaded captures. `None` when there was nothing
/// to upload or the upload failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MediaPaths {
    pub tongue: Option<String>,
    pub face: Option<String>,
    pub voice: Option<String>,
}

impl MediaPaths {
    pub fn is_complete(&self) -> bool {
        self.tongue.is_some() && self.face.is_some() && self.voice.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ModalityRecord {
    pub path: Option<String>,
    pub analysis: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PulseRecord {
    pub bpm: Option<u16>,
    pub qualities: Vec<PulseQualityInfo>,
    pub smart_connect: Option<serde_json::Value>,
}

/// The row written to the report store at the end of the wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReportRecord {
    pub id: Uuid,
    pub user_id: String,
    pub status: ReportStatus,
    pub complaint: String,
    pub symptoms: Vec<String>,
    pub chat_log: Vec<ChatMessage>,
    pub tongue_data: ModalityRecord,
    pub face_data: ModalityRecord,
    pub voice_data: ModalityRecord,
    pub pulse_data: PulseRecord,
    pub diagnosis: Option<DiagnosisReport>,
    pub recommendations: Vec<Recommendation>,
    pub created_at: jiff::Timestamp,
}

impl ReportRecord {
    /// Snapshot of `form`. Writing a record with an existing `id` replaces
    /// the earlier one, so a re-submitted assessment keeps its id.
    pub fn from_form(id: Uuid, user_id: &str, form: &FormData, paths: MediaPaths) -> Self {
        let status = if paths.is_complete() && form.diagnosis.is_some() {
            ReportStatus::Completed
        } else {
            ReportStatus::Incomplete
        };

        Self {
            id,
            user_id: user_id.to_string(),
            status,
            complaint: form.intake.main_concern.clone(),
            symptoms: form.intake.symptoms.clone(),
            chat_log: form.inquiry.chat.clone(),
            tongue_data: ModalityRecord {
                path: paths.tongue,
                analysis: form
                    .tongue
                    .as_ref()
                    .and_then(|r| serde_json::to_value(&r.analysis).ok()),
            },
            face_data: ModalityRecord {
                path: paths.face,
                analysis: form
                    .face
                    .as_ref()
                    .and_then(|r| serde_json::to_value(&r.analysis).ok()),
            },
            voice_data: ModalityRecord {
                path: paths.voice,
                analysis: form
                    .voice
                    .as_ref()
                    .and_then(|r| serde_json::to_value(&r.analysis).ok()),
            },
            pulse_data: PulseRecord {
                bpm: form.pulse.bpm,
                qualities: form.pulse.qualities.iter().map(|q| q.info()).collect(),
                smart_connect: form
                    .smart_connect
                    .as_ref()
                    .and_then(|d| serde_json::to_value(d).ok()),
            },
            recommendations: form
                .diagnosis
                .as_ref()
                .map(|d| d.recommendations.clone())
                .unwrap_or_default(),
            diagnosis: form.diagnosis.clone(),
            created_at: jiff::Timestamp::now(),
        }
    }
}
