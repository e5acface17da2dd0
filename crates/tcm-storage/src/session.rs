//! Who is using the app.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use futures::future::BoxFuture;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// `None` for a blank id.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Auth lookup. `Ok(None)` is a guest; callers treat `Err` the same way.
pub trait SessionProvider: Send + Sync {
    fn current_user(&self) -> BoxFuture<'_, Result<Option<UserId>, StorageError>>;
}

/// A session fixed at startup, e.g. from the config file.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    user: Option<UserId>,
}

impl StaticSession {
    pub fn new(user: Option<UserId>) -> Self {
        Self { user }
    }

    pub fn guest() -> Self {
        Self { user: None }
    }
}

impl SessionProvider for StaticSession {
    fn current_user(&self) -> BoxFuture<'_, Result<Option<UserId>, StorageError>> {
        Box::pin(async move { Ok(self.user.clone()) })
    }
}
