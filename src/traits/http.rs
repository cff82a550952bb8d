//! Transport seam for all backend calls.
//!
//! Everything above this layer talks to an [`HttpClient`]; production wires in
//! the reqwest adapter, tests wire in the recording mock.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::HashMap;
use std::pin::Pin;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// Chunked response body. Each item is one network read.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

/// Build the header map every authenticated request carries.
pub fn bearer_headers(token: &str) -> Headers {
    let mut headers = Headers::new();
    headers.insert("Authorization".to_string(), format!("Bearer {}", token));
    headers
}

/// Buffered HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: Headers,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, body: Bytes) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body,
        }
    }

    pub fn with_headers(status: u16, headers: Headers, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded lossily. Error bodies are only ever shown to the user.
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Transport-level failures.
///
/// `ServerError` is only produced by [`HttpClient::post_stream`], which has no
/// buffered [`Response`] to hand back on a non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpError {
    ConnectionFailed(String),
    Timeout(String),
    ServerError { status: u16, message: String },
    Io(String),
    InvalidUrl(String),
    Other(String),
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            HttpError::Timeout(msg) => write!(f, "Request timeout: {}", msg),
            HttpError::ServerError { status, message } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            HttpError::Io(msg) => write!(f, "IO error: {}", msg),
            HttpError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            HttpError::Other(msg) => write!(f, "HTTP error: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}

/// HTTP operations the client needs.
///
/// `get`, `post` and `delete` return the buffered response whatever its
/// status; callers decide what a non-2xx means. `post_stream` resolves once
/// headers arrive and fails with [`HttpError::ServerError`] on a non-2xx
/// status, otherwise yields the body chunk by chunk.
///
/// ```ignore
/// use thinktoart::traits::{bearer_headers, HttpClient};
///
/// async fn chats(client: &dyn HttpClient, token: &str) -> usize {
///     let resp = client
///         .get("http://localhost:3000/api/chat/getAllChats", &bearer_headers(token))
///         .await
///         .unwrap();
///     resp.body.len()
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError>;

    /// `body` is sent as `application/json`.
    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError>;

    async fn delete(&self, url: &str, headers: &Headers) -> Result<Response, HttpError>;

    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError>;
}
