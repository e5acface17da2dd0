//! S3-backed [`MediaStore`] and [`ReportStore`].
//!
//! Layout (see `tcm_core::s3_keys`):
//!
//! ```text
//! users/{user}/media/{kind}/{uuid}.{ext}
//! users/{user}/reports/{uuid}.json
//! ```

use aws_sdk_s3::Client;
use aws_smithy_types::byte_stream::ByteStream;
use futures::future::BoxFuture;
use tcm_core::models::media::{MediaKind, MediaRef};
use tcm_core::models::report::ReportRecord;
use tcm_core::s3_keys;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::StorageError;
use crate::session::UserId;
use crate::store::{MediaStore, ReportStore};

pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub fn new(config: &aws_config::SdkConfig, bucket: impl Into<String>) -> Self {
        Self {
            client: Client::new(config),
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| StorageError::PutObject(e.into_service_error().to_string()))?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| match e.into_service_error() {
                err if err.is_no_such_key() => StorageError::NotFound {
                    key: key.to_string(),
                },
                err => StorageError::GetObject(err.to_string()),
            })?;

        let bytes = resp
            .body
            .collect()
            .await
            .map_err(|e| StorageError::GetObject(e.to_string()))?;
        Ok(bytes.into_bytes().to_vec())
    }

    /// Every key under `prefix`, across all result pages.
    async fn keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .into_paginator()
            .send();

        let mut keys = Vec::new();
        while let Some(page) = pages.next().await {
            let page =
                page.map_err(|e| StorageError::ListObjects(e.into_service_error().to_string()))?;
            keys.extend(page.contents().iter().filter_map(|o| o.key().map(str::to_string)));
        }
        debug!(bucket = %self.bucket, prefix, count = keys.len(), "listed objects");
        Ok(keys)
    }

    async fn upload_media(
        &self,
        user: &UserId,
        kind: MediaKind,
        media: &MediaRef,
    ) -> Result<String, StorageError> {
        let body = media.read_bytes().await?;
        let key = s3_keys::media(user.as_str(), kind, Uuid::new_v4(), &media.mime);
        let size = body.len();
        self.put(&key, body, &media.mime).await?;
        info!(bucket = %self.bucket, key = %key, size, kind = kind.as_str(), "media uploaded");
        Ok(key)
    }

    async fn insert_report(&self, record: &ReportRecord) -> Result<(), StorageError> {
        let key = s3_keys::report(&record.user_id, record.id);
        let body = serde_json::to_vec_pretty(record)?;
        self.put(&key, body, "application/json").await?;
        info!(bucket = %self.bucket, key = %key, status = ?record.status, "report saved");
        Ok(())
    }

    async fn load_report(&self, user: &UserId, id: Uuid) -> Result<ReportRecord, StorageError> {
        let body = self.get(&s3_keys::report(user.as_str(), id)).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn list_reports(&self, user: &UserId) -> Result<Vec<Uuid>, StorageError> {
        let prefix = s3_keys::reports_prefix(user.as_str());
        let keys = self.keys(&prefix).await?;
        Ok(keys
            .iter()
            .filter_map(|key| key.strip_prefix(&prefix)?.strip_suffix(".json"))
            .filter_map(|id| Uuid::parse_str(id).ok())
            .collect())
    }
}

impl MediaStore for S3Store {
    fn upload<'a>(
        &'a self,
        user: &'a UserId,
        kind: MediaKind,
        media: &'a MediaRef,
    ) -> BoxFuture<'a, Result<String, StorageError>> {
        Box::pin(self.upload_media(user, kind, media))
    }
}

impl ReportStore for S3Store {
    fn insert<'a>(&'a self, record: &'a ReportRecord) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(self.insert_report(record))
    }

    fn load<'a>(
        &'a self,
        user: &'a UserId,
        id: Uuid,
    ) -> BoxFuture<'a, Result<ReportRecord, StorageError>> {
        Box::pin(self.load_report(user, id))
    }

    fn list<'a>(&'a self, user: &'a UserId) -> BoxFuture<'a, Result<Vec<Uuid>, StorageError>> {
        Box::pin(self.list_reports(user))
    }
}
