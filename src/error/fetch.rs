//! Request-level failures against the chat backend.

use std::fmt;

use crate::traits::HttpError;

/// A request could not be completed or the backend rejected it.
///
/// Fetch errors leave local state untouched; the caller shows a transient
/// notification and waits for the user to try again.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Connection to the server failed.
    ConnectionFailed { url: String, message: String },

    /// Request timed out at the transport level.
    Timeout { url: String },

    /// Non-2xx response. `message` is the backend's own message when the
    /// body carried one.
    HttpStatus { status: u16, message: String },

    /// Response body did not match the expected shape.
    InvalidResponse { message: String },

    /// Generic transport error.
    Other { message: String },
}

impl FetchError {
    /// Build a status error from a raw response body.
    ///
    /// The backend answers failures with `{"message": "..."}` (sometimes
    /// `{"error": "..."}`); anything else is kept verbatim when short.
    pub fn from_status(status: u16, body: &str) -> Self {
        FetchError::HttpStatus {
            status,
            message: extract_error_message(body).unwrap_or_default(),
        }
    }

    /// Map a transport error observed while calling `url`.
    pub fn from_http(err: HttpError, url: &str) -> Self {
        match err {
            HttpError::ConnectionFailed(message) => FetchError::ConnectionFailed {
                url: url.to_string(),
                message,
            },
            HttpError::Timeout(_) => FetchError::Timeout {
                url: url.to_string(),
            },
            HttpError::ServerError { status, message } => FetchError::from_status(status, &message),
            HttpError::InvalidUrl(message) | HttpError::Io(message) | HttpError::Other(message) => {
                FetchError::Other { message }
            }
        }
    }

    /// HTTP status when the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the failure came from the server rather than the network.
    pub fn is_server_side(&self) -> bool {
        matches!(self, FetchError::HttpStatus { .. } | FetchError::InvalidResponse { .. })
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::ConnectionFailed { .. } => {
                "Unable to connect to the server. Please check your internet connection."
                    .to_string()
            }
            FetchError::Timeout { .. } => {
                "The server took too long to respond. Please try again.".to_string()
            }
            FetchError::HttpStatus { message, .. } if !message.is_empty() => message.clone(),
            FetchError::HttpStatus { status, .. } => match *status {
                401 => "Authentication required. Please log in again.".to_string(),
                403 => "Access denied. You don't have permission for this action.".to_string(),
                404 => "The requested resource was not found.".to_string(),
                429 => "Too many requests. Please wait a moment and try again.".to_string(),
                500..=599 => {
                    "The server is experiencing issues. Please try again later.".to_string()
                }
                _ => format!("The server returned an error (HTTP {}). Please try again.", status),
            },
            FetchError::InvalidResponse { .. } => {
                "Received an invalid response from the server. Please try again.".to_string()
            }
            FetchError::Other { message } => format!("Network error: {}", message),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            FetchError::ConnectionFailed { .. } => "E_NET_CONN",
            FetchError::Timeout { .. } => "E_NET_TIMEOUT",
            FetchError::HttpStatus { .. } => "E_NET_HTTP",
            FetchError::InvalidResponse { .. } => "E_NET_INVALID",
            FetchError::Other { .. } => "E_NET_OTHER",
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::ConnectionFailed { url, message } => {
                write!(f, "Connection failed to '{}': {}", url, message)
            }
            FetchError::Timeout { url } => write!(f, "Request to '{}' timed out", url),
            FetchError::HttpStatus { status, message } => {
                write!(f, "HTTP {} error: {}", status, message)
            }
            FetchError::InvalidResponse { message } => write!(f, "Invalid response: {}", message),
            FetchError::Other { message } => write!(f, "Network error: {}", message),
        }
    }
}

impl std::error::Error for FetchError {}

/// Pull a human-readable message out of an error body.
pub fn extract_error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        return ["message", "error"]
            .iter()
            .find_map(|key| value.get(key).and_then(|v| v.as_str()))
            .map(str::to_string);
    }

    // Plain-text bodies are only worth showing when they are short.
    if trimmed.len() <= 200 && !trimmed.starts_with('<') {
        Some(trimmed.to_string())
    } else {
        None
    }
}
