//! Typed client for the ThinkToArt backend.
//!
//! Endpoints:
//!
//! | Call | Method | Path |
//! |------|--------|------|
//! | [`ChatApi::login`] | POST | `/api/user/login` |
//! | [`ChatApi::register`] | POST | `/api/user/register` |
//! | [`ChatApi::user_details`] | GET | `/api/user/userdetails` |
//! | [`ChatApi::get_all_chats`] | GET | `/api/chat/getAllChats` |
//! | [`ChatApi::create_chat`] | POST | `/api/chat/create` |
//! | [`ChatApi::delete_chat`] | DELETE | `/api/chat/delete/{id}` |
//! | [`ChatApi::send_text`] | POST | `/api/message/text` (streamed) |
//! | [`ChatApi::send_image`] | POST | `/api/message/image` |

use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{extract_error_message, AuthError, ClientError, ClientResult, FetchError};
use crate::models::{
    AuthResponse, ChatListResponse, ChatThread, CreateChatResponse, Credentials, ImageResponse,
    MessageRequest, PromptMode, User, UserDetailsResponse,
};
use crate::traits::{bearer_headers, ByteStream, Headers, HttpClient, Response};

/// Default backend when nothing else is configured.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

/// Backend client. Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct ChatApi {
    http: Arc<dyn HttpClient>,
    base_url: String,
}

impl std::fmt::Debug for ChatApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatApi")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ChatApi {
    pub fn new(http: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decode a 2xx body, treating `{"success": false}` envelopes as failures.
    fn decode<T: DeserializeOwned>(response: &Response) -> Result<T, FetchError> {
        if !response.is_success() {
            return Err(FetchError::from_status(
                response.status,
                &response.text_lossy(),
            ));
        }

        let value: serde_json::Value = response.json().map_err(|e| FetchError::InvalidResponse {
            message: e.to_string(),
        })?;

        if let Some(err) = Self::rejection(response.status, &value) {
            return Err(err);
        }

        serde_json::from_value(value).map_err(|e| FetchError::InvalidResponse {
            message: e.to_string(),
        })
    }

    /// A 2xx envelope that still says `"success": false`.
    fn rejection(status: u16, value: &serde_json::Value) -> Option<FetchError> {
        (value.get("success").and_then(|s| s.as_bool()) == Some(false)).then(|| {
            FetchError::HttpStatus {
                status,
                message: extract_error_message(&value.to_string()).unwrap_or_default(),
            }
        })
    }

    async fn get(&self, path: &str, headers: &Headers) -> Result<Response, FetchError> {
        let url = self.url(path);
        debug!("GET {}", url);
        self.http
            .get(&url, headers)
            .await
            .map_err(|e| FetchError::from_http(e, &url))
    }

    async fn post(&self, path: &str, body: &str, headers: &Headers) -> Result<Response, FetchError> {
        let url = self.url(path);
        debug!("POST {}", url);
        self.http
            .post(&url, body, headers)
            .await
            .map_err(|e| FetchError::from_http(e, &url))
    }

    fn to_json<T: serde::Serialize>(value: &T) -> Result<String, FetchError> {
        serde_json::to_string(value).map_err(|e| FetchError::Other {
            message: e.to_string(),
        })
    }

    /// Exchange credentials for a bearer token.
    ///
    /// A rejection by the backend is an [`AuthError::InvalidCredentials`]
    /// carrying the server's message; transport failures are
    /// [`AuthError::Unreachable`].
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<String> {
        let body = Self::to_json(credentials)?;
        let response = self
            .post("/api/user/login", &body, &Headers::new())
            .await
            .map_err(|e| AuthError::Unreachable {
                message: e.to_string(),
            })?;

        let parsed: AuthResponse = Self::decode(&response).map_err(|e| match e {
            FetchError::HttpStatus { message, .. } => AuthError::InvalidCredentials { message },
            other => AuthError::Unreachable {
                message: other.to_string(),
            },
        })?;

        match parsed.token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => {
                warn!("Login succeeded without a token");
                Err(AuthError::MissingToken.into())
            }
        }
    }

    /// Create an account. Does not log in; returns the server's message.
    pub async fn register(&self, credentials: &Credentials) -> ClientResult<Option<String>> {
        let body = Self::to_json(credentials)?;
        let response = self
            .post("/api/user/register", &body, &Headers::new())
            .await?;
        let parsed: AuthResponse = Self::decode(&response)?;
        Ok(parsed.message)
    }

    pub async fn user_details(&self, token: &str) -> ClientResult<User> {
        let response = self
            .get("/api/user/userdetails", &bearer_headers(token))
            .await?;
        let parsed: UserDetailsResponse = Self::decode(&response)?;
        Ok(parsed.into_user())
    }

    pub async fn get_all_chats(&self, token: &str) -> ClientResult<Vec<ChatThread>> {
        let response = self
            .get("/api/chat/getAllChats", &bearer_headers(token))
            .await?;
        let parsed: ChatListResponse = Self::decode(&response)?;
        Ok(parsed.chats)
    }

    pub async fn create_chat(&self, token: &str) -> ClientResult<ChatThread> {
        let response = self
            .post("/api/chat/create", "{}", &bearer_headers(token))
            .await?;
        let parsed: CreateChatResponse = Self::decode(&response)?;
        Ok(parsed.new_chat)
    }

    /// Succeeds only on a 2xx acknowledgement that is not a `"success": false` envelope.
    pub async fn delete_chat(&self, token: &str, chat_id: &str) -> ClientResult<()> {
        let url = self.url(&format!("/api/chat/delete/{}", chat_id));
        debug!("DELETE {}", url);
        let response = self
            .http
            .delete(&url, &bearer_headers(token))
            .await
            .map_err(|e| FetchError::from_http(e, &url))?;

        if !response.is_success() {
            return Err(FetchError::from_status(response.status, &response.text_lossy()).into());
        }
        // Bodies are optional here; only a parsed rejection counts
        if let Ok(value) = response.json::<serde_json::Value>() {
            if let Some(err) = Self::rejection(response.status, &value) {
                return Err(err.into());
            }
        }
        Ok(())
    }

    /// Start a text generation and hand back the raw body stream.
    ///
    /// Resolves once the backend has accepted the request; a non-2xx status
    /// is a [`FetchError::HttpStatus`] with the parsed server message.
    pub async fn send_text(&self, token: &str, request: &MessageRequest) -> ClientResult<ByteStream> {
        let url = self.url(&format!("/api/message/{}", PromptMode::Text.as_str()));
        let body = Self::to_json(request)?;
        debug!("POST {} (stream)", url);

        self.http
            .post_stream(&url, &body, &bearer_headers(token))
            .await
            .map_err(|e| ClientError::from(FetchError::from_http(e, &url)))
    }

    /// Request an image generation and read the whole reply.
    pub async fn send_image(
        &self,
        token: &str,
        request: &MessageRequest,
    ) -> ClientResult<ImageResponse> {
        let path = format!("/api/message/{}", PromptMode::Image.as_str());
        let body = Self::to_json(request)?;
        let response = self.post(&path, &body, &bearer_headers(token)).await?;
        Ok(Self::decode(&response)?)
    }
}
