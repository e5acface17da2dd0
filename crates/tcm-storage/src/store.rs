use futures::future::BoxFuture;
use tcm_core::models::media::{MediaKind, MediaRef};
use tcm_core::models::report::ReportRecord;
use uuid::Uuid;

use crate::error::StorageError;
use crate::session::UserId;

/// Blob storage for captured media.
pub trait MediaStore: Send + Sync {
    /// Upload one capture and return its storage path.
    fn upload<'a>(
        &'a self,
        user: &'a UserId,
        kind: MediaKind,
        media: &'a MediaRef,
    ) -> BoxFuture<'a, Result<String, StorageError>>;
}

/// The table of finished assessments.
pub trait ReportStore: Send + Sync {
    /// Write a record. A record with an existing id replaces the stored one.
    fn insert<'a>(&'a self, record: &'a ReportRecord) -> BoxFuture<'a, Result<(), StorageError>>;

    fn load<'a>(
        &'a self,
        user: &'a UserId,
        id: Uuid,
    ) -> BoxFuture<'a, Result<ReportRecord, StorageError>>;

    /// Report ids for a user, oldest key first.
    fn list<'a>(&'a self, user: &'a UserId) -> BoxFuture<'a, Result<Vec<Uuid>, StorageError>>;
}
