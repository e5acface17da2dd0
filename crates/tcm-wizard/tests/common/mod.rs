#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use tcm_ai::error::AiError;
use tcm_ai::provider::{CompletionProvider, CompletionRequest};
use tcm_core::models::media::{MediaKind, MediaRef};
use tcm_core::models::report::ReportRecord;
use tcm_storage::error::StorageError;
use tcm_storage::session::{SessionProvider, UserId};
use tcm_storage::store::{MediaStore, ReportStore};
use tcm_wizard::controller::{ExitHandler, Wizard};
use tcm_wizard::steps::capture::{CaptureError, MediaCapture};
use tcm_core::i18n::Language;
use uuid::Uuid;

pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, String>>>,
    pub calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Result<&str, &str>>) -> Self {
        Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            calls: AtomicUsize::new(0),
        }
    }
}

impl CompletionProvider for ScriptedProvider {
    fn complete<'a>(
        &'a self,
        _request: &'a CompletionRequest,
    ) -> BoxFuture<'a, Result<String, AiError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("script exhausted".to_string()));
        Box::pin(async move { next.map_err(AiError::Invocation) })
    }
}

#[derive(Default)]
pub struct RecordingExit {
    pub dashboard: AtomicUsize,
    pub login: AtomicUsize,
}

impl ExitHandler for RecordingExit {
    fn exit_to_dashboard(&self) {
        self.dashboard.fetch_add(1, Ordering::SeqCst);
    }

    fn exit_to_login(&self) {
        self.login.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn wizard(logged_in: bool) -> (Wizard, Arc<RecordingExit>) {
    let exit = Arc::new(RecordingExit::default());
    (Wizard::new(logged_in, Language::En, exit.clone()), exit)
}

pub struct FixedSession(pub Result<Option<&'static str>, &'static str>);

impl SessionProvider for FixedSession {
    fn current_user(&self) -> BoxFuture<'_, Result<Option<UserId>, StorageError>> {
        let result = match self.0 {
            Ok(user) => Ok(user.and_then(UserId::new)),
            Err(e) => Err(StorageError::Session(e.to_string())),
        };
        Box::pin(async move { result })
    }
}

/// Uploads succeed or fail for every kind alike.
pub struct FakeMedia {
    pub fail: bool,
    pub uploads: Mutex<Vec<MediaKind>>,
}

impl FakeMedia {
    pub fn new(fail: bool) -> Self {
        Self {
            fail,
            uploads: Mutex::new(Vec::new()),
        }
    }
}

impl MediaStore for FakeMedia {
    fn upload<'a>(
        &'a self,
        user: &'a UserId,
        kind: MediaKind,
        _media: &'a MediaRef,
    ) -> BoxFuture<'a, Result<String, StorageError>> {
        self.uploads.lock().unwrap().push(kind);
        let result = if self.fail {
            Err(StorageError::PutObject("connection reset".to_string()))
        } else {
            Ok(format!("users/{user}/media/{}/x.jpg", kind.as_str()))
        };
        Box::pin(async move { result })
    }
}

#[derive(Default)]
pub struct MemoryReports {
    pub fail: bool,
    pub records: Mutex<Vec<ReportRecord>>,
}

impl ReportStore for MemoryReports {
    fn insert<'a>(&'a self, record: &'a ReportRecord) -> BoxFuture<'a, Result<(), StorageError>> {
        let result = if self.fail {
            Err(StorageError::PutObject("access denied".to_string()))
        } else {
            let mut records = self.records.lock().unwrap();
            records.retain(|r| r.id != record.id);
            records.push(record.clone());
            Ok(())
        };
        Box::pin(async move { result })
    }

    fn load<'a>(
        &'a self,
        _user: &'a UserId,
        id: Uuid,
    ) -> BoxFuture<'a, Result<ReportRecord, StorageError>> {
        let found = self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(StorageError::NotFound { key: id.to_string() });
        Box::pin(async move { found })
    }

    fn list<'a>(&'a self, user: &'a UserId) -> BoxFuture<'a, Result<Vec<Uuid>, StorageError>> {
        let ids = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user.as_str())
            .map(|r| r.id)
            .collect();
        Box::pin(async move { Ok(ids) })
    }
}

/// Hands out a canned capture result once.
pub struct FakeCapture(pub Mutex<Option<Result<MediaRef, CaptureError>>>);

impl FakeCapture {
    pub fn returning(result: Result<MediaRef, CaptureError>) -> Self {
        Self(Mutex::new(Some(result)))
    }
}

impl MediaCapture for FakeCapture {
    fn capture(&self, _kind: MediaKind) -> BoxFuture<'_, Result<MediaRef, CaptureError>> {
        let result = self
            .0
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Err(CaptureError::Cancelled));
        Box::pin(async move { result })
    }
}

pub fn photo(name: &str) -> MediaRef {
    MediaRef::new(format!("file:///captures/{name}"), "image/jpeg").with_base64("/9j/4AAQ")
}
