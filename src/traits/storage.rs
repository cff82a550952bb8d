//! Persistence seam for the session token and theme.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::StoredSession;

/// Session persistence errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("could not determine home directory")]
    NoHomeDir,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid session file: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Other(String),
}

/// Where the session survives restarts.
///
/// `load` returns `Ok(None)` when nothing has been stored yet. `clear` is
/// idempotent.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn load(&self) -> Result<Option<StoredSession>, StorageError>;

    async fn save(&self, session: &StoredSession) -> Result<(), StorageError>;

    async fn clear(&self) -> Result<(), StorageError>;
}
