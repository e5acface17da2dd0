//! Parsed model output for the capture-based steps.
//!
//! The model is asked for JSON; every field except the validity flag is
//! optional so a terse answer still parses.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::media::MediaRef;

/// Implemented by every analysis payload that carries a "was this really
/// a tongue / face / voice / document" flag.
pub trait SubjectCheck {
    fn is_valid_subject(&self) -> bool;
}

/// Media reference plus the analysis the model returned for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct ModalityResult<A> {
    pub media: MediaRef,
    pub analysis: A,
    pub analyzed_at: jiff::Timestamp,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TongueAnalysis {
    #[serde(default)]
    pub is_valid_image: bool,
    pub confidence: Option<f64>,
    pub observation: Option<String>,
    pub tongue_color: Option<String>,
    pub coating: Option<String>,
    pub shape: Option<String>,
    pub moisture: Option<String>,
    #[serde(default)]
    pub indications: Vec<String>,
}

impl SubjectCheck for TongueAnalysis {
    fn is_valid_subject(&self) -> bool {
        self.is_valid_image
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FaceAnalysis {
    #[serde(default)]
    pub is_valid_image: bool,
    pub confidence: Option<f64>,
    pub observation: Option<String>,
    pub complexion: Option<String>,
    pub luster: Option<String>,
    pub eyes: Option<String>,
    pub lips: Option<String>,
    #[serde(default)]
    pub indications: Vec<String>,
}

impl SubjectCheck for FaceAnalysis {
    fn is_valid_subject(&self) -> bool {
        self.is_valid_image
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VoiceAnalysis {
    #[serde(default, alias = "is_valid_image")]
    pub is_valid_audio: bool,
    pub confidence: Option<f64>,
    pub observation: Option<String>,
    pub tone: Option<String>,
    pub volume: Option<String>,
    pub breathing: Option<String>,
    #[serde(default)]
    pub indications: Vec<String>,
}

impl SubjectCheck for VoiceAnalysis {
    fn is_valid_subject(&self) -> bool {
        self.is_valid_audio
    }
}

/// Text read out of an uploaded lab report or prescription.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReportExtraction {
    #[serde(default, alias = "is_valid_image")]
    pub is_valid_document: bool,
    pub document_type: Option<String>,
    #[serde(default)]
    pub extracted_text: String,
    pub summary: Option<String>,
}

impl SubjectCheck for ReportExtraction {
    fn is_valid_subject(&self) -> bool {
        self.is_valid_document
    }
}

/// Device readings pulled from a connected health service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SmartConnectData {
    pub service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    pub synced_data: serde_json::Value,
}
