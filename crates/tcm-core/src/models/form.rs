//! The form record threaded through every wizard step.
//!
//! Steps never write fields directly: they produce a [`FormPatch`] for one
//! field group and the controller applies it. A patch overwrites exactly the
//! keys it carries and leaves every other key alone, so applying the same
//! patch twice gives the same record as applying it once.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::diagnosis::DiagnosisReport;
use super::doctor::DoctorLevel;
use super::inquiry::{InquiryPatch, InquiryState};
use super::intake::{Intake, IntakePatch, Medicine};
use super::media::UploadedFile;
use super::modality::{
    FaceAnalysis, ModalityResult, SmartConnectData, TongueAnalysis, VoiceAnalysis,
};
use super::profile::{Profile, ProfilePatch};
use super::pulse::{PulsePatch, PulseReading};
use crate::error::CoreError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FormData {
    pub profile: Profile,
    pub intake: Intake,
    pub files: Vec<UploadedFile>,
    pub tongue: Option<ModalityResult<TongueAnalysis>>,
    pub face: Option<ModalityResult<FaceAnalysis>>,
    pub voice: Option<ModalityResult<VoiceAnalysis>>,
    pub pulse: PulseReading,
    pub smart_connect: Option<SmartConnectData>,
    pub inquiry: InquiryState,
    pub doctor: Option<DoctorLevel>,
    pub diagnosis: Option<DiagnosisReport>,
}

/// A typed update for one field group.
///
/// On the wire this is `{"group": "profile", "patch": {...}}`; unknown
/// groups and unknown keys inside a group are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "group", content = "patch", rename_all = "snake_case", deny_unknown_fields)]
#[ts(export)]
pub enum FormPatch {
    Profile(ProfilePatch),
    Intake(IntakePatch),
    Medicines(Vec<Medicine>),
    Files(Vec<UploadedFile>),
    Tongue(Option<ModalityResult<TongueAnalysis>>),
    Face(Option<ModalityResult<FaceAnalysis>>),
    Voice(Option<ModalityResult<VoiceAnalysis>>),
    Pulse(PulsePatch),
    SmartConnect(Option<SmartConnectData>),
    Inquiry(InquiryPatch),
    Doctor(DoctorLevel),
    Diagnosis(DiagnosisReport),
}

impl FormPatch {
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Field group name, used in logs.
    pub fn group(&self) -> &'static str {
        match self {
            Self::Profile(_) => "profile",
            Self::Intake(_) => "intake",
            Self::Medicines(_) => "medicines",
            Self::Files(_) => "files",
            Self::Tongue(_) => "tongue",
            Self::Face(_) => "face",
            Self::Voice(_) => "voice",
            Self::Pulse(_) => "pulse",
            Self::SmartConnect(_) => "smart_connect",
            Self::Inquiry(_) => "inquiry",
            Self::Doctor(_) => "doctor",
            Self::Diagnosis(_) => "diagnosis",
        }
    }
}

impl FormData {
    /// Validate and merge a patch. On error the record is unchanged.
    ///
    /// Any patch that changes an answer drops the stored diagnosis, since it
    /// was drawn from the previous answers.
    pub fn apply(&mut self, patch: FormPatch) -> Result<(), CoreError> {
        let changed = match patch {
            FormPatch::Profile(p) => {
                let before = self.profile.clone();
                self.profile.merge(p)?;
                self.profile != before
            }
            FormPatch::Intake(p) => {
                let before = self.intake.clone();
                self.intake.merge(p);
                self.intake != before
            }
            FormPatch::Medicines(medicines) => {
                if medicines.iter().any(|m| m.name.trim().is_empty()) {
                    return Err(CoreError::InvalidField {
                        field: "medicines",
                        reason: "every medicine needs a name".to_string(),
                    });
                }
                replace(&mut self.intake.medicines, medicines)
            }
            FormPatch::Files(files) => replace(&mut self.files, files),
            FormPatch::Tongue(result) => replace(&mut self.tongue, result),
            FormPatch::Face(result) => replace(&mut self.face, result),
            FormPatch::Voice(result) => replace(&mut self.voice, result),
            FormPatch::Pulse(p) => {
                let before = self.pulse.clone();
                self.pulse.merge(p)?;
                self.pulse != before
            }
            FormPatch::SmartConnect(data) => replace(&mut self.smart_connect, data),
            FormPatch::Inquiry(p) => {
                let before = self.inquiry.clone();
                self.inquiry.merge(p);
                self.inquiry != before
            }
            FormPatch::Doctor(level) => replace(&mut self.doctor, Some(level)),
            FormPatch::Diagnosis(report) => {
                self.diagnosis = Some(report);
                return Ok(());
            }
        };
        if changed {
            self.diagnosis = None;
        }
        Ok(())
    }

    /// Model override for downstream calls, if a doctor tier was chosen.
    pub fn model(&self) -> Option<&str> {
        self.doctor.as_ref().map(|d| d.model.as_str())
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
