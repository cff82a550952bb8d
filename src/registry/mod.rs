//! Chat registry: the ordered thread list and the selected thread.
//!
//! Threads are kept newest first. At most one thread is selected, and the
//! selection always refers to a thread in the list.

mod state;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

use crate::api::ChatApi;
use crate::error::{ClientError, ClientResult, ValidationError};
use crate::models::{ChatThread, Message};
use crate::session::SessionStore;

use state::RegistryState;

/// Shared handle to the thread list. Clones see the same state.
///
/// The lock is never held across an `.await`: every async operation reads
/// what it needs, drops the guard, talks to the backend, then re-locks to
/// apply the result.
#[derive(Clone)]
pub struct ChatRegistry {
    api: ChatApi,
    session: Arc<SessionStore>,
    state: Arc<Mutex<RegistryState>>,
}

impl std::fmt::Debug for ChatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("ChatRegistry")
            .field("threads", &state.threads.len())
            .field("selected", &state.selected)
            .finish_non_exhaustive()
    }
}

impl ChatRegistry {
    pub fn new(api: ChatApi, session: Arc<SessionStore>) -> Self {
        Self {
            api,
            session,
            state: Arc::new(Mutex::new(RegistryState::default())),
        }
    }

    fn state(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Token and user id of an authenticated session.
    fn credentials(&self) -> ClientResult<(String, String)> {
        let session = self.session.snapshot();
        match (session.token, session.user) {
            (Some(token), Some(user)) => Ok((token, user.id)),
            _ => Err(ValidationError::NotAuthenticated.into()),
        }
    }

    /// Replace the list with the backend's, bootstrapping a first thread for
    /// a user who has none.
    ///
    /// The bootstrap runs at most once per signed-in user, even if the list
    /// comes back empty again later. The first thread is selected afterwards.
    pub async fn load_threads(&self) -> ClientResult<Vec<ChatThread>> {
        let (token, user_id) = self.credentials()?;
        let threads = self.api.get_all_chats(&token).await?;
        debug!("Loaded {} threads", threads.len());

        let bootstrap = {
            let mut state = self.state();
            state.replace(threads);
            state.threads.is_empty() && state.claim_bootstrap(&user_id)
        };

        if bootstrap {
            info!("No threads yet, creating a default one");
            if let Err(e) = self.create_thread().await {
                warn!("Default thread creation failed: {}", e);
                return Err(e);
            }
        }

        Ok(self.threads())
    }

    /// Create a thread on the backend, prepend it and select it.
    pub async fn create_thread(&self) -> ClientResult<ChatThread> {
        let (token, _) = self.credentials()?;
        let thread = self.api.create_chat(&token).await?;

        let mut state = self.state();
        state.prepend(thread.clone());
        info!("Created thread {}", thread.id);
        Ok(thread)
    }

    /// Delete a thread once the backend acknowledges it.
    ///
    /// Deleting the selected thread selects the newest remaining one.
    pub async fn delete_thread(&self, thread_id: &str) -> ClientResult<()> {
        if !self.state().contains(thread_id) {
            return Err(ClientError::not_found(thread_id));
        }
        let (token, _) = self.credentials()?;

        self.api.delete_chat(&token, thread_id).await?;

        let mut state = self.state();
        state.remove(thread_id);
        info!("Deleted thread {}", thread_id);
        Ok(())
    }

    pub fn select_thread(&self, thread_id: &str) -> ClientResult<()> {
        let mut state = self.state();
        if !state.contains(thread_id) {
            return Err(ClientError::not_found(thread_id));
        }
        state.selected = Some(thread_id.to_string());
        debug!("Selected thread {}", thread_id);
        Ok(())
    }

    /// Threads whose label contains `query`, ignoring case. Non-mutating.
    pub fn filter_threads(&self, query: &str) -> Vec<ChatThread> {
        let query = query.trim();
        self.state()
            .threads
            .iter()
            .filter(|t| t.matches(query))
            .cloned()
            .collect()
    }

    pub fn threads(&self) -> Vec<ChatThread> {
        self.state().threads.clone()
    }

    pub fn thread(&self, thread_id: &str) -> Option<ChatThread> {
        self.state().get(thread_id).cloned()
    }

    pub fn selected(&self) -> Option<ChatThread> {
        let state = self.state();
        state.selected.as_deref().and_then(|id| state.get(id)).cloned()
    }

    pub fn selected_id(&self) -> Option<String> {
        self.state().selected.clone()
    }

    /// Sidebar title for a thread.
    pub fn thread_title(&self, thread_id: &str) -> Option<String> {
        self.state().get(thread_id).map(ChatThread::title)
    }

    /// Forget everything, including the bootstrap marker. Called on logout.
    pub fn clear(&self) {
        *self.state() = RegistryState::default();
        debug!("Registry cleared");
    }

    /// Append a message to a thread. Returns the new message count.
    pub fn append_message(&self, thread_id: &str, message: Message) -> ClientResult<usize> {
        let mut state = self.state();
        let thread = state
            .get_mut(thread_id)
            .ok_or_else(|| ClientError::not_found(thread_id))?;
        thread.messages.push(message);
        thread.touch();
        Ok(thread.messages.len())
    }

    /// Append a message to whichever thread is selected, under one lock.
    ///
    /// Returns the thread id and its new message count.
    pub fn append_to_selected(&self, message: Message) -> ClientResult<(String, usize)> {
        let mut state = self.state();
        let thread_id = state
            .selected
            .clone()
            .ok_or(ValidationError::NoSelectedThread)?;
        let thread = state
            .get_mut(&thread_id)
            .ok_or_else(|| ClientError::not_found(&thread_id))?;
        thread.messages.push(message);
        thread.touch();
        let len = thread.messages.len();
        Ok((thread_id, len))
    }

    /// Replace the last message of a thread, but only if the thread still has
    /// exactly `expected_len` messages (so the last one is still the caller's).
    ///
    /// Returns `false` when the thread is gone or its tail moved.
    pub fn replace_last_message(&self, thread_id: &str, expected_len: usize, message: Message) -> bool {
        let mut state = self.state();
        match state.get_mut(thread_id) {
            Some(thread) if thread.messages.len() == expected_len && expected_len > 0 => {
                thread.messages[expected_len - 1] = message;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemoryStorage, MockHttpClient, MockResponse};
    use crate::models::{StoredSession, Theme};
    use serde_json::json;

    async fn signed_in(mock: &MockHttpClient) -> ChatRegistry {
        mock.set_response(
            "http://test/api/user/userdetails",
            MockResponse::json(200, json!({"_id": "u1", "name": "Ada", "credits": 10})),
        );
        let api = ChatApi::new(Arc::new(mock.clone()), "http://test");
        let storage = InMemoryStorage::with_session(StoredSession {
            token: Some("tok".to_string()),
            theme: Theme::Light,
        });
        let session = Arc::new(SessionStore::new(api.clone(), Arc::new(storage)));
        session.restore().await.unwrap();
        ChatRegistry::new(api, session)
    }

    fn chat(id: &str, first: Option<&str>) -> serde_json::Value {
        let messages: Vec<_> = first
            .map(|c| json!({"role": "user", "content": c, "isImage": false, "timestamp": 1}))
            .into_iter()
            .collect();
        json!({"_id": id, "name": "New Chat", "messages": messages, "updatedAt": "2025-01-01T00:00:00Z"})
    }

    #[tokio::test]
    async fn test_load_threads_selects_first() {
        let mock = MockHttpClient::new();
        let registry = signed_in(&mock).await;
        mock.set_response(
            "http://test/api/chat/getAllChats",
            MockResponse::json(200, json!({"chats": [chat("c2", None), chat("c1", None)]})),
        );

        let threads = registry.load_threads().await.unwrap();
        assert_eq!(threads.len(), 2);
        assert_eq!(registry.selected_id().as_deref(), Some("c2"));
        assert!(mock.requests_to("/api/chat/create").is_empty());
    }

    #[tokio::test]
    async fn test_load_threads_failure_keeps_state() {
        let mock = MockHttpClient::new();
        let registry = signed_in(&mock).await;
        mock.set_response(
            "http://test/api/chat/getAllChats",
            MockResponse::json(200, json!({"chats": [chat("c1", None)]})),
        );
        registry.load_threads().await.unwrap();

        mock.set_response(
            "http://test/api/chat/getAllChats",
            MockResponse::json(500, json!({"message": "db down"})),
        );
        assert!(registry.load_threads().await.is_err());
        assert_eq!(registry.threads().len(), 1);
        assert_eq!(registry.selected_id().as_deref(), Some("c1"));
    }

    #[tokio::test]
    async fn test_append_to_selected_follows_selection() {
        let mock = MockHttpClient::new();
        let registry = signed_in(&mock).await;
        mock.set_response(
            "http://test/api/chat/getAllChats",
            MockResponse::json(200, json!({"chats": [chat("c2", None), chat("c1", None)]})),
        );
        registry.load_threads().await.unwrap();

        registry.select_thread("c1").unwrap();
        let (id, len) = registry.append_to_selected(Message::user("hi")).unwrap();
        assert_eq!((id.as_str(), len), ("c1", 1));
        assert!(registry.thread("c2").unwrap().messages.is_empty());

        registry.clear();
        assert!(matches!(
            registry.append_to_selected(Message::user("hi")),
            Err(ClientError::Validation(ValidationError::NoSelectedThread))
        ));
    }

    #[tokio::test]
    async fn test_clear_resets_bootstrap() {
        let mock = MockHttpClient::new();
        let registry = signed_in(&mock).await;
        mock.set_response(
            "http://test/api/chat/getAllChats",
            MockResponse::json(200, json!({"chats": []})),
        );
        mock.set_response(
            "http://test/api/chat/create",
            MockResponse::json(201, json!({"newChat": chat("c1", None)})),
        );

        registry.load_threads().await.unwrap();
        registry.load_threads().await.unwrap();
        assert_eq!(mock.requests_to("/api/chat/create").len(), 1);

        registry.clear();
        assert!(registry.threads().is_empty());
        registry.load_threads().await.unwrap();
        assert_eq!(mock.requests_to("/api/chat/create").len(), 2);
    }

    #[tokio::test]
    async fn test_create_thread_prepends_and_selects() {
        let mock = MockHttpClient::new();
        let registry = signed_in(&mock).await;
        mock.set_response(
            "http://test/api/chat/getAllChats",
            MockResponse::json(200, json!({"chats": [chat("old", None)]})),
        );
        mock.set_response(
            "http://test/api/chat/create",
            MockResponse::json(201, json!({"newChat": chat("new", None)})),
        );
        registry.load_threads().await.unwrap();

        registry.create_thread().await.unwrap();
        let ids: Vec<_> = registry.threads().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["new", "old"]);
        assert_eq!(registry.selected_id().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_delete_unknown_thread_is_not_found() {
        let mock = MockHttpClient::new();
        let registry = signed_in(&mock).await;

        let err = registry.delete_thread("missing").await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound { .. }));
        assert!(mock.requests_to("/api/chat/delete/missing").is_empty());
    }

    #[tokio::test]
    async fn test_delete_waits_for_ack_and_reselects() {
        let mock = MockHttpClient::new();
        let registry = signed_in(&mock).await;
        mock.set_response(
            "http://test/api/chat/getAllChats",
            MockResponse::json(200, json!({"chats": [chat("a", None), chat("b", None), chat("c", None)]})),
        );
        registry.load_threads().await.unwrap();
        registry.select_thread("b").unwrap();

        mock.set_response(
            "http://test/api/chat/delete/b",
            MockResponse::json(500, json!({"message": "nope"})),
        );
        assert!(registry.delete_thread("b").await.is_err());
        assert_eq!(registry.threads().len(), 3);
        assert_eq!(registry.selected_id().as_deref(), Some("b"));

        mock.set_response(
            "http://test/api/chat/delete/b",
            MockResponse::json(200, json!({"success": true})),
        );
        registry.delete_thread("b").await.unwrap();
        let ids: Vec<_> = registry.threads().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(registry.selected_id().as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn test_delete_unselected_keeps_selection() {
        let mock = MockHttpClient::new();
        let registry = signed_in(&mock).await;
        mock.set_response(
            "http://test/api/chat/getAllChats",
            MockResponse::json(200, json!({"chats": [chat("a", None), chat("b", None)]})),
        );
        mock.set_response(
            "http://test/api/chat/delete/",
            MockResponse::json(200, json!({})),
        );
        registry.load_threads().await.unwrap();

        registry.delete_thread("b").await.unwrap();
        assert_eq!(registry.selected_id().as_deref(), Some("a"));

        registry.delete_thread("a").await.unwrap();
        assert!(registry.selected().is_none());
    }

    #[tokio::test]
    async fn test_select_and_filter() {
        let mock = MockHttpClient::new();
        let registry = signed_in(&mock).await;
        mock.set_response(
            "http://test/api/chat/getAllChats",
            MockResponse::json(
                200,
                json!({"chats": [chat("a", Some("Draw a Red Fox")), chat("b", None)]}),
            ),
        );
        registry.load_threads().await.unwrap();

        assert!(matches!(
            registry.select_thread("zzz"),
            Err(ClientError::NotFound { .. })
        ));
        assert_eq!(registry.selected_id().as_deref(), Some("a"));

        registry.select_thread("b").unwrap();
        assert_eq!(registry.selected().unwrap().id, "b");

        assert_eq!(registry.filter_threads("").len(), 2);
        let foxes = registry.filter_threads("red fox");
        assert_eq!(foxes.len(), 1);
        assert_eq!(foxes[0].id, "a");
        assert_eq!(registry.filter_threads("new chat")[0].id, "b");
        assert_eq!(registry.threads().len(), 2);
        assert_eq!(registry.thread_title("a").as_deref(), Some("Draw a Red Fox"));
    }

    #[tokio::test]
    async fn test_replace_last_message_checks_tail() {
        let mock = MockHttpClient::new();
        let registry = signed_in(&mock).await;
        mock.set_response(
            "http://test/api/chat/getAllChats",
            MockResponse::json(200, json!({"chats": [chat("a", None)]})),
        );
        registry.load_threads().await.unwrap();

        let len = registry
            .append_message("a", Message::assistant_placeholder())
            .unwrap();
        assert_eq!(len, 1);

        let mut updated = Message::assistant_placeholder();
        updated.content = "Hello".to_string();
        assert!(registry.replace_last_message("a", 1, updated.clone()));
        assert!(!registry.replace_last_message("a", 2, updated.clone()));
        assert!(!registry.replace_last_message("gone", 1, updated));
        assert_eq!(registry.thread("a").unwrap().messages[0].content, "Hello");
    }
}
