//! The ordered list of wizard steps.
//!
//! The list depends on two inputs only: whether the user is logged in
//! (which adds `profile_summary`) and the display language (which changes
//! labels). [`StepRegistry`] hands out the same `Arc` for as long as those
//! inputs are unchanged, so step identity is stable between renders.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tcm_core::error::CoreError;
use tcm_core::i18n::{self, Language, TextKey};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    BasicInfo,
    ProfileSummary,
    Symptoms,
    UploadReports,
    UploadMedicine,
    SelectDoctor,
    Inquiry,
    InquirySummary,
    Tongue,
    Face,
    Audio,
    Pulse,
    SmartConnect,
    Analysis,
}

impl StepId {
    /// Every step after `basic_info` / `profile_summary`, in order.
    const TAIL: [StepId; 12] = [
        Self::Symptoms,
        Self::UploadReports,
        Self::UploadMedicine,
        Self::SelectDoctor,
        Self::Inquiry,
        Self::InquirySummary,
        Self::Tongue,
        Self::Face,
        Self::Audio,
        Self::Pulse,
        Self::SmartConnect,
        Self::Analysis,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BasicInfo => "basic_info",
            Self::ProfileSummary => "profile_summary",
            Self::Symptoms => "symptoms",
            Self::UploadReports => "upload_reports",
            Self::UploadMedicine => "upload_medicine",
            Self::SelectDoctor => "select_doctor",
            Self::Inquiry => "inquiry",
            Self::InquirySummary => "inquiry_summary",
            Self::Tongue => "tongue",
            Self::Face => "face",
            Self::Audio => "audio",
            Self::Pulse => "pulse",
            Self::SmartConnect => "smart_connect",
            Self::Analysis => "analysis",
        }
    }

    pub fn parse(id: &str) -> Result<Self, CoreError> {
        std::iter::once(Self::BasicInfo)
            .chain(std::iter::once(Self::ProfileSummary))
            .chain(Self::TAIL)
            .find(|step| step.as_str() == id)
            .ok_or_else(|| CoreError::UnknownStep(id.to_string()))
    }

    /// Steps that move on through their own completion callback and are
    /// handed `on_next` / `on_back`.
    pub fn is_self_advancing(&self) -> bool {
        matches!(
            self,
            Self::ProfileSummary | Self::SelectDoctor | Self::InquirySummary
        )
    }

    fn label_key(&self) -> TextKey {
        match self {
            Self::BasicInfo => TextKey::StepBasicInfo,
            Self::ProfileSummary => TextKey::StepProfileSummary,
            Self::Symptoms => TextKey::StepSymptoms,
            Self::UploadReports => TextKey::StepUploadReports,
            Self::UploadMedicine => TextKey::StepUploadMedicine,
            Self::SelectDoctor => TextKey::StepSelectDoctor,
            Self::Inquiry => TextKey::StepInquiry,
            Self::InquirySummary => TextKey::StepInquirySummary,
            Self::Tongue => TextKey::StepTongue,
            Self::Face => TextKey::StepFace,
            Self::Audio => TextKey::StepAudio,
            Self::Pulse => TextKey::StepPulse,
            Self::SmartConnect => TextKey::StepSmartConnect,
            Self::Analysis => TextKey::StepAnalysis,
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            Self::BasicInfo => "user",
            Self::ProfileSummary => "id-card",
            Self::Symptoms => "thermometer",
            Self::UploadReports => "file-text",
            Self::UploadMedicine => "pill",
            Self::SelectDoctor => "stethoscope",
            Self::Inquiry => "message-circle",
            Self::InquirySummary => "clipboard",
            Self::Tongue => "smile",
            Self::Face => "scan-face",
            Self::Audio => "mic",
            Self::Pulse => "activity",
            Self::SmartConnect => "watch",
            Self::Analysis => "sparkles",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDescriptor {
    pub id: StepId,
    pub label: &'static str,
    pub icon: &'static str,
}

pub fn build_steps(is_logged_in: bool, lang: Language) -> Arc<[StepDescriptor]> {
    let describe = |id: StepId| StepDescriptor {
        id,
        label: i18n::text(lang, id.label_key()),
        icon: id.icon(),
    };

    let mut steps = Vec::with_capacity(StepId::TAIL.len() + 2);
    steps.push(describe(StepId::BasicInfo));
    if is_logged_in {
        steps.push(describe(StepId::ProfileSummary));
    }
    steps.extend(StepId::TAIL.into_iter().map(describe));
    steps.into()
}

/// Memoizes [`build_steps`] on `(is_logged_in, language)`.
#[derive(Debug, Default)]
pub struct StepRegistry {
    cached: Option<((bool, Language), Arc<[StepDescriptor]>)>,
}

impl StepRegistry {
    pub fn steps(&mut self, is_logged_in: bool, lang: Language) -> Arc<[StepDescriptor]> {
        let key = (is_logged_in, lang);
        match &self.cached {
            Some((cached_key, steps)) if *cached_key == key => Arc::clone(steps),
            _ => {
                let steps = build_steps(is_logged_in, lang);
                debug!(is_logged_in, language = ?lang, len = steps.len(), "step registry rebuilt");
                self.cached = Some((key, Arc::clone(&steps)));
                steps
            }
        }
    }
}
