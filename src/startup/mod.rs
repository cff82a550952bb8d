//! Startup wiring with injectable seams.
//!
//! [`Services::build`] turns a [`ClientConfig`] plus a transport and a session
//! store into the handles the shell works with. The binary passes the
//! production adapters; tests pass mocks.
//!
//! ```ignore
//! let config = ClientConfig::from_env();
//! let services = Services::production(&config);
//! services.restore().await?;
//! ```

pub mod config;
pub mod logging;

pub use config::{ClientConfig, DEFAULT_LOG_FILTER};
pub use logging::init_logging;

use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

use crate::adapters::{FileSessionStorage, ReqwestHttpClient};
use crate::api::ChatApi;
use crate::chat::ChatView;
use crate::error::ClientResult;
use crate::notifications::{self, Notification};
use crate::registry::ChatRegistry;
use crate::session::SessionStore;
use crate::traits::{HttpClient, SessionStorage};

/// Everything the shell needs, wired together.
pub struct Services {
    pub session: Arc<SessionStore>,
    pub registry: ChatRegistry,
    pub chat: ChatView,
    pub notifications: UnboundedReceiver<Notification>,
}

impl Services {
    pub fn build(
        config: &ClientConfig,
        http: Arc<dyn HttpClient>,
        storage: Arc<dyn SessionStorage>,
    ) -> Self {
        let api = ChatApi::new(http, config.server_url.clone());
        let session = Arc::new(SessionStore::new(api.clone(), storage));
        let registry = ChatRegistry::new(api.clone(), session.clone());
        let (notifier, notifications) = notifications::channel();
        let chat = ChatView::new(api, session.clone(), registry.clone(), notifier);

        Self {
            session,
            registry,
            chat,
            notifications,
        }
    }

    /// reqwest transport and the JSON session file under the data dir.
    pub fn production(config: &ClientConfig) -> Self {
        let storage = FileSessionStorage::in_dir(config.data_dir());
        info!("Session file: {}", storage.path().display());
        Self::build(
            config,
            Arc::new(ReqwestHttpClient::new()),
            Arc::new(storage),
        )
    }

    /// Restore the persisted session and, when it is still valid, load the
    /// thread list. Returns whether the user is signed in.
    pub async fn restore(&self) -> ClientResult<bool> {
        if !self.session.restore().await? {
            return Ok(false);
        }
        self.load_threads().await;
        Ok(true)
    }

    /// Load threads after sign-in. A failure is logged and the list stays
    /// empty; the user can reload from the shell.
    pub async fn load_threads(&self) {
        if let Err(e) = self.registry.load_threads().await {
            warn!("Initial thread load failed: {}", e);
            self.chat.notifier().report(&e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemoryStorage, MockHttpClient, MockResponse};
    use crate::models::{StoredSession, Theme};
    use serde_json::json;

    fn config() -> ClientConfig {
        ClientConfig::new().with_server_url("http://test")
    }

    #[tokio::test]
    async fn test_restore_without_stored_session() {
        let mock = MockHttpClient::new();
        let services = Services::build(
            &config(),
            Arc::new(mock.clone()),
            Arc::new(InMemoryStorage::new()),
        );

        assert!(!services.restore().await.unwrap());
        assert!(mock.get_requests().is_empty());
    }

    #[tokio::test]
    async fn test_restore_loads_threads() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://test/api/user/userdetails",
            MockResponse::json(200, json!({"_id": "u1", "name": "Ada", "credits": 4})),
        );
        mock.set_response(
            "http://test/api/chat/getAllChats",
            MockResponse::json(200, json!({"chats": [{"_id": "c9", "name": "Old"}]})),
        );
        let storage = InMemoryStorage::with_session(StoredSession {
            token: Some("tok".to_string()),
            theme: Theme::Dark,
        });
        let services = Services::build(&config(), Arc::new(mock), Arc::new(storage));

        assert!(services.restore().await.unwrap());
        assert_eq!(services.session.theme(), Theme::Dark);
        assert_eq!(services.registry.selected_id().as_deref(), Some("c9"));
    }

    #[tokio::test]
    async fn test_thread_load_failure_is_notified() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://test/api/user/userdetails",
            MockResponse::json(200, json!({"_id": "u1", "name": "Ada"})),
        );
        mock.set_response(
            "http://test/api/chat/getAllChats",
            MockResponse::json(500, json!({"message": "db down"})),
        );
        let storage = InMemoryStorage::with_session(StoredSession {
            token: Some("tok".to_string()),
            theme: Theme::Light,
        });
        let mut services = Services::build(&config(), Arc::new(mock), Arc::new(storage));

        assert!(services.restore().await.unwrap());
        assert!(services.registry.threads().is_empty());
        assert_eq!(services.notifications.try_recv().unwrap().message, "db down");
    }
}
