//! Tongue, face, voice and document analysis.
//!
//! All four share one state machine:
//!
//! ```text
//! Idle ──capture──▶ Capturing ──media──▶ Analyzing ──▶ Done | Failed | Invalid
//!   ▲                   │ cancel / error                      │
//!   └───────────────────┘ (back to the previous state)        └─▶ capture again
//! ```
//!
//! A capture is refused while one is already capturing or analyzing, so a
//! second tap cannot start a competing request.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use tcm_ai::analysis::{Verdict, analyze_media};
use tcm_ai::error::AiError;
use tcm_ai::provider::CompletionProvider;
use tcm_core::i18n::Language;
use tcm_core::models::form::{FormData, FormPatch};
use tcm_core::models::media::{MediaKind, MediaRef, UploadedFile};
use tcm_core::models::modality::{
    FaceAnalysis, ModalityResult, ReportExtraction, SubjectCheck, TongueAnalysis, VoiceAnalysis,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::capture::{CaptureError, MediaCapture};
use crate::error::StepError;

/// How one analysis step reads its result into the form.
pub trait Modality {
    type Analysis: DeserializeOwned + SubjectCheck + Clone + Send;

    const KIND: MediaKind;

    fn patch(form: &FormData, media: MediaRef, analysis: Self::Analysis) -> FormPatch;

    /// Patch that removes this step's result.
    fn clear(form: &FormData) -> FormPatch;
}

pub struct Tongue;
pub struct Face;
pub struct Voice;
pub struct ReportDocument;

impl Modality for Tongue {
    type Analysis = TongueAnalysis;
    const KIND: MediaKind = MediaKind::Tongue;

    fn patch(_: &FormData, media: MediaRef, analysis: TongueAnalysis) -> FormPatch {
        FormPatch::Tongue(Some(result(media, analysis)))
    }

    fn clear(_: &FormData) -> FormPatch {
        FormPatch::Tongue(None)
    }
}

impl Modality for Face {
    type Analysis = FaceAnalysis;
    const KIND: MediaKind = MediaKind::Face;

    fn patch(_: &FormData, media: MediaRef, analysis: FaceAnalysis) -> FormPatch {
        FormPatch::Face(Some(result(media, analysis)))
    }

    fn clear(_: &FormData) -> FormPatch {
        FormPatch::Face(None)
    }
}

impl Modality for Voice {
    type Analysis = VoiceAnalysis;
    const KIND: MediaKind = MediaKind::Voice;

    fn patch(_: &FormData, media: MediaRef, analysis: VoiceAnalysis) -> FormPatch {
        FormPatch::Voice(Some(result(media, analysis)))
    }

    fn clear(_: &FormData) -> FormPatch {
        FormPatch::Voice(None)
    }
}

/// Uploaded documents accumulate; each successful read appends a file.
impl Modality for ReportDocument {
    type Analysis = ReportExtraction;
    const KIND: MediaKind = MediaKind::Report;

    fn patch(form: &FormData, media: MediaRef, analysis: ReportExtraction) -> FormPatch {
        let name = media.file_name().unwrap_or("document").to_string();
        let mut text = analysis.extracted_text;
        if text.trim().is_empty() {
            text = analysis.summary.unwrap_or_default();
        }

        let mut files = form.files.clone();
        files.push(UploadedFile {
            id: Uuid::new_v4(),
            uri: media.uri,
            name,
            extracted_text: text,
        });
        FormPatch::Files(files)
    }

    fn clear(_: &FormData) -> FormPatch {
        FormPatch::Files(Vec::new())
    }
}

fn result<A>(media: MediaRef, analysis: A) -> ModalityResult<A> {
    ModalityResult {
        media,
        analysis,
        analyzed_at: jiff::Timestamp::now(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisState<A> {
    Idle,
    Capturing,
    Analyzing { media: MediaRef },
    Done { media: MediaRef, analysis: A },
    Failed { media: Option<MediaRef> },
    /// The model said the capture is the wrong subject. The capture is kept
    /// so it can be shown next to the retake hint.
    Invalid { media: MediaRef, analysis: A },
}

impl<A> AnalysisState<A> {
    fn accepts_capture(&self) -> bool {
        !matches!(self, Self::Capturing | Self::Analyzing { .. })
    }
}

pub struct AnalysisStep<M: Modality> {
    state: AnalysisState<M::Analysis>,
    /// State to return to when a capture is cancelled or fails.
    before_capture: Option<AnalysisState<M::Analysis>>,
    _modality: PhantomData<M>,
}

impl<M: Modality> Default for AnalysisStep<M> {
    fn default() -> Self {
        Self {
            state: AnalysisState::Idle,
            before_capture: None,
            _modality: PhantomData,
        }
    }
}

impl<M: Modality> AnalysisStep<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AnalysisState<M::Analysis> {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        !self.state.accepts_capture()
    }

    /// Enter `Capturing`. Fails with [`StepError::Busy`] while in flight.
    pub fn begin_capture(&mut self) -> Result<(), StepError> {
        if !self.state.accepts_capture() {
            return Err(StepError::Busy);
        }
        let previous = std::mem::replace(&mut self.state, AnalysisState::Capturing);
        self.before_capture = Some(previous);
        Ok(())
    }

    /// Feed the capture result. Returns the media to analyze, or `None`
    /// when the user cancelled.
    pub fn capture_finished(
        &mut self,
        captured: Result<MediaRef, CaptureError>,
    ) -> Result<Option<MediaRef>, StepError> {
        if !matches!(self.state, AnalysisState::Capturing) {
            return Err(StepError::Busy);
        }
        match captured {
            Ok(media) => {
                self.before_capture = None;
                self.state = AnalysisState::Analyzing {
                    media: media.clone(),
                };
                Ok(Some(media))
            }
            Err(err) => {
                self.state = self.before_capture.take().unwrap_or(AnalysisState::Idle);
                match err {
                    CaptureError::Cancelled => Ok(None),
                    CaptureError::PermissionDenied(detail) => {
                        Err(StepError::PermissionDenied(detail))
                    }
                    CaptureError::Failed(detail) => Err(StepError::Capture(detail)),
                }
            }
        }
    }

    /// Skip the capture phase for media that already exists (gallery pick).
    pub fn submit_media(&mut self, media: MediaRef) -> Result<(), StepError> {
        if !self.state.accepts_capture() {
            return Err(StepError::Busy);
        }
        self.state = AnalysisState::Analyzing { media };
        Ok(())
    }

    /// Record the analysis outcome. On success the returned patch carries
    /// the media and the parsed analysis; on any failure the form is left
    /// alone.
    pub fn analysis_finished(
        &mut self,
        form: &FormData,
        outcome: Result<Verdict<M::Analysis>, AiError>,
    ) -> Result<FormPatch, StepError> {
        let AnalysisState::Analyzing { media } =
            std::mem::replace(&mut self.state, AnalysisState::Idle)
        else {
            return Err(StepError::Busy);
        };

        match outcome {
            Ok(Verdict::Valid(analysis)) => {
                self.state = AnalysisState::Done {
                    media: media.clone(),
                    analysis: analysis.clone(),
                };
                Ok(M::patch(form, media, analysis))
            }
            Ok(Verdict::InvalidSubject(analysis)) => {
                self.state = AnalysisState::Invalid { media, analysis };
                Err(StepError::InvalidSubject(M::KIND))
            }
            Err(err) => {
                warn!(kind = M::KIND.as_str(), error = %err, "analysis failed");
                self.state = AnalysisState::Failed { media: Some(media) };
                Err(StepError::Analysis(err))
            }
        }
    }

    /// Analyze the media currently in `Analyzing`.
    pub async fn analyze(
        &mut self,
        provider: &dyn CompletionProvider,
        form: &FormData,
        lang: Language,
    ) -> Result<FormPatch, StepError> {
        let AnalysisState::Analyzing { media } = &self.state else {
            return Err(StepError::Busy);
        };
        let media = media.clone();
        info!(kind = M::KIND.as_str(), "analyzing capture");
        let outcome = analyze_media(provider, M::KIND, &media, form.model(), lang).await;
        self.analysis_finished(form, outcome)
    }

    /// Capture then analyze. `Ok(None)` when the user cancelled the capture.
    pub async fn capture_and_analyze(
        &mut self,
        capture: &dyn MediaCapture,
        provider: &dyn CompletionProvider,
        form: &FormData,
        lang: Language,
    ) -> Result<Option<FormPatch>, StepError> {
        self.begin_capture()?;
        let captured = capture.capture(M::KIND).await;
        if self.capture_finished(captured)?.is_none() {
            return Ok(None);
        }
        self.analyze(provider, form, lang).await.map(Some)
    }

    /// Retake from scratch: back to `Idle` plus the patch that removes the
    /// stored result.
    pub fn reset(&mut self, form: &FormData) -> Result<FormPatch, StepError> {
        if !self.state.accepts_capture() {
            return Err(StepError::Busy);
        }
        self.state = AnalysisState::Idle;
        self.before_capture = None;
        Ok(M::clear(form))
    }
}

/// Drop one uploaded document, keeping the rest in order.
pub fn remove_document(form: &FormData, id: Uuid) -> FormPatch {
    FormPatch::Files(form.files.iter().filter(|f| f.id != id).cloned().collect())
}
