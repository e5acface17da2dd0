//! Terminal submission: upload the captures, then write the report.
//!
//! Tongue, face and voice media are uploaded concurrently and each upload
//! yields an explicit [`UploadOutcome`]. An [`UploadPolicy`] then decides
//! whether a report with missing media is still written. Nothing here ever
//! blocks the results view: every path ends in a [`SubmissionOutcome`].

use std::sync::Arc;

use tcm_core::models::form::FormData;
use tcm_core::models::media::{MediaKind, MediaRef};
use tcm_core::models::report::{MediaPaths, ReportRecord};
use tcm_storage::session::{SessionProvider, UserId};
use tcm_storage::store::{MediaStore, ReportStore};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded(String),
    NoMedia,
    Failed(String),
}

impl UploadOutcome {
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Uploaded(path) => Some(path),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSet {
    pub tongue: UploadOutcome,
    pub face: UploadOutcome,
    pub voice: UploadOutcome,
}

impl UploadSet {
    pub fn paths(&self) -> MediaPaths {
        MediaPaths {
            tongue: self.tongue.path().map(str::to_string),
            face: self.face.path().map(str::to_string),
            voice: self.voice.path().map(str::to_string),
        }
    }

    pub fn failures(&self) -> Vec<(MediaKind, &str)> {
        [
            (MediaKind::Tongue, &self.tongue),
            (MediaKind::Face, &self.face),
            (MediaKind::Voice, &self.voice),
        ]
        .into_iter()
        .filter_map(|(kind, outcome)| match outcome {
            UploadOutcome::Failed(reason) => Some((kind, reason.as_str())),
            _ => None,
        })
        .collect()
    }
}

/// What to do when some uploads failed. Missing media (`NoMedia`) never
/// counts as a failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadPolicy {
    /// Write the report anyway with `null` paths for the failed uploads.
    #[default]
    SaveWithGaps,
    /// Do not write a report unless every upload that was attempted worked.
    Abort,
}

impl UploadPolicy {
    pub fn should_save(&self, uploads: &UploadSet) -> bool {
        match self {
            Self::SaveWithGaps => true,
            Self::Abort => uploads.failures().is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Guest,
    /// The session lookup failed. Treated like a guest.
    SessionUnavailable(String),
    /// No store is configured.
    NotConfigured,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Saved { report_id: Uuid, uploads: UploadSet },
    Skipped(SkipReason),
    Aborted { uploads: UploadSet },
    PersistFailed { reason: String, uploads: UploadSet },
}

impl SubmissionOutcome {
    /// Whether offering "retry" makes sense.
    pub fn can_retry(&self) -> bool {
        matches!(self, Self::Aborted { .. } | Self::PersistFailed { .. })
    }
}

pub struct Submitter {
    session: Arc<dyn SessionProvider>,
    media: Arc<dyn MediaStore>,
    reports: Arc<dyn ReportStore>,
    policy: UploadPolicy,
}

impl Submitter {
    pub fn new(
        session: Arc<dyn SessionProvider>,
        media: Arc<dyn MediaStore>,
        reports: Arc<dyn ReportStore>,
    ) -> Self {
        Self {
            session,
            media,
            reports,
            policy: UploadPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: UploadPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Upload and save `form` as report `report_id`. Submitting the same
    /// assessment again reuses its id, so the stored report is replaced
    /// rather than duplicated.
    pub async fn submit(&self, form: &FormData, report_id: Uuid) -> SubmissionOutcome {
        let user = match self.session.current_user().await {
            Ok(Some(user)) => user,
            Ok(None) => {
                info!("guest session, skipping report persistence");
                return SubmissionOutcome::Skipped(SkipReason::Guest);
            }
            Err(e) => {
                warn!(error = %e, "session lookup failed, continuing as guest");
                return SubmissionOutcome::Skipped(SkipReason::SessionUnavailable(e.to_string()));
            }
        };

        let tongue = form.tongue.as_ref().map(|r| &r.media);
        let face = form.face.as_ref().map(|r| &r.media);
        let voice = form.voice.as_ref().map(|r| &r.media);
        let (tongue, face, voice) = futures::join!(
            self.upload(&user, MediaKind::Tongue, tongue),
            self.upload(&user, MediaKind::Face, face),
            self.upload(&user, MediaKind::Voice, voice),
        );
        let uploads = UploadSet {
            tongue,
            face,
            voice,
        };

        if !self.policy.should_save(&uploads) {
            warn!(
                failed = uploads.failures().len(),
                "uploads failed, report not saved under abort policy"
            );
            return SubmissionOutcome::Aborted { uploads };
        }

        let record = ReportRecord::from_form(report_id, user.as_str(), form, uploads.paths());
        match self.reports.insert(&record).await {
            Ok(()) => {
                info!(report_id = %record.id, status = ?record.status, "report persisted");
                SubmissionOutcome::Saved {
                    report_id: record.id,
                    uploads,
                }
            }
            Err(e) => {
                warn!(error = %e, "report persistence failed");
                SubmissionOutcome::PersistFailed {
                    reason: e.to_string(),
                    uploads,
                }
            }
        }
    }

    async fn upload(&self, user: &UserId, kind: MediaKind, media: Option<&MediaRef>) -> UploadOutcome {
        let Some(media) = media else {
            return UploadOutcome::NoMedia;
        };
        match self.media.upload(user, kind, media).await {
            Ok(path) => UploadOutcome::Uploaded(path),
            Err(e) => {
                warn!(kind = kind.as_str(), error = %e, "media upload failed");
                UploadOutcome::Failed(e.to_string())
            }
        }
    }
}
