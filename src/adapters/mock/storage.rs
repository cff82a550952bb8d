//! In-memory session storage for tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::models::StoredSession;
use crate::traits::{SessionStorage, StorageError};

/// Session storage that never touches the file system.
///
/// Clones share state, so a test can keep one handle and hand another to the
/// session store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    stored: Arc<Mutex<Option<StoredSession>>>,
    save_should_fail: Arc<Mutex<bool>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: StoredSession) -> Self {
        Self {
            stored: Arc::new(Mutex::new(Some(session))),
            save_should_fail: Arc::new(Mutex::new(false)),
        }
    }

    pub fn set_save_should_fail(&self, should_fail: bool) {
        *self.save_should_fail.lock().unwrap() = should_fail;
    }

    /// Current contents, synchronously.
    pub fn stored(&self) -> Option<StoredSession> {
        self.stored.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionStorage for InMemoryStorage {
    async fn load(&self) -> Result<Option<StoredSession>, StorageError> {
        Ok(self.stored.lock().unwrap().clone())
    }

    async fn save(&self, session: &StoredSession) -> Result<(), StorageError> {
        if *self.save_should_fail.lock().unwrap() {
            return Err(StorageError::Other("Mock save failure".to_string()));
        }
        *self.stored.lock().unwrap() = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        *self.stored.lock().unwrap() = None;
        Ok(())
    }
}
