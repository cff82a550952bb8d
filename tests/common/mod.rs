//! Shared fixtures for integration tests.
//!
//! ```ignore
//! mod common;
//! use common::*;
//!
//! let mock = MockHttpClient::new();
//! let services = signed_in(&mock, 5, json!([])).await;
//! ```

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{json, Value};
pub use thinktoart::adapters::mock::{InMemoryStorage, MockHttpClient, MockResponse};
use thinktoart::models::{StoredSession, Theme};
use thinktoart::startup::{ClientConfig, Services};

pub const BASE: &str = "http://test";

pub fn url(path: &str) -> String {
    format!("{}{}", BASE, path)
}

pub fn config() -> ClientConfig {
    ClientConfig::new().with_server_url(BASE)
}

pub fn stored_token(token: &str) -> InMemoryStorage {
    InMemoryStorage::with_session(StoredSession {
        token: Some(token.to_string()),
        theme: Theme::Light,
    })
}

pub fn user_json(credits: u64) -> Value {
    json!({"_id": "u1", "name": "Ada", "email": "ada@example.com", "credits": credits})
}

/// Configure user details and the thread list on `mock`.
pub fn serve_account(mock: &MockHttpClient, credits: u64, chats: Value) {
    mock.set_response(
        &url("/api/user/userdetails"),
        MockResponse::json(200, user_json(credits)),
    );
    mock.set_response(
        &url("/api/chat/getAllChats"),
        MockResponse::json(200, json!({ "chats": chats })),
    );
}

pub fn serve_create(mock: &MockHttpClient, id: &str) {
    mock.set_response(
        &url("/api/chat/create"),
        MockResponse::json(201, json!({"newChat": {"_id": id, "name": "New Chat", "messages": []}})),
    );
}

/// Services restored from a stored token, with threads loaded. Requests
/// made during restore are cleared from the mock's log.
pub async fn signed_in(mock: &MockHttpClient, credits: u64, chats: Value) -> Services {
    serve_account(mock, credits, chats);
    let services = Services::build(
        &config(),
        Arc::new(mock.clone()),
        Arc::new(stored_token("tok")),
    );
    assert!(services.restore().await.expect("restore"));
    mock.clear_requests();
    services
}

/// One empty thread `c1`, selected.
pub async fn signed_in_with_empty_thread(mock: &MockHttpClient, credits: u64) -> Services {
    signed_in(mock, credits, json!([{"_id": "c1", "name": "New Chat", "messages": []}])).await
}
