//! Unified error type for the client core.

use std::fmt;

use super::auth::AuthError;
use super::category::ErrorCategory;
use super::fetch::FetchError;
use super::stream::StreamError;
use super::validation::ValidationError;
use crate::traits::StorageError;

/// Unified error type returned by the session store, the chat registry and
/// the prompt pipeline.
#[derive(Debug)]
pub enum ClientError {
    /// Authentication failed or the session expired.
    Auth(AuthError),

    /// A request failed or was rejected.
    Fetch(FetchError),

    /// A local precondition was not met.
    Validation(ValidationError),

    /// The response body could not be consumed to the end.
    Stream(StreamError),

    /// The referenced thread is not in the registry.
    NotFound { thread_id: String },

    /// Persisted session state could not be read or written.
    Storage(StorageError),
}

impl ClientError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::Auth(_) => ErrorCategory::Auth,
            ClientError::Fetch(FetchError::HttpStatus { status: 401, .. }) => ErrorCategory::Auth,
            ClientError::Fetch(err) if err.is_server_side() => ErrorCategory::Server,
            ClientError::Fetch(_) => ErrorCategory::Network,
            ClientError::Validation(_) => ErrorCategory::Validation,
            ClientError::Stream(StreamError::ConnectionLost { .. }) => ErrorCategory::Network,
            ClientError::Stream(_) => ErrorCategory::Server,
            ClientError::NotFound { .. } => ErrorCategory::NotFound,
            ClientError::Storage(_) => ErrorCategory::System,
        }
    }

    /// Validation failures are silent no-ops.
    pub fn is_silent(&self) -> bool {
        self.category().is_silent()
    }

    /// Whether the session must be cleared and the user sent back to login.
    pub fn requires_reauth(&self) -> bool {
        self.category() == ErrorCategory::Auth
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Auth(err) => err.user_message(),
            ClientError::Fetch(err) => err.user_message(),
            ClientError::Validation(err) => err.to_string(),
            ClientError::Stream(err) => err.user_message(),
            ClientError::NotFound { .. } => "That chat no longer exists.".to_string(),
            ClientError::Storage(err) => format!("Could not save local settings: {}", err),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Auth(err) => err.error_code(),
            ClientError::Fetch(err) => err.error_code(),
            ClientError::Validation(err) => err.error_code(),
            ClientError::Stream(err) => err.error_code(),
            ClientError::NotFound { .. } => "E_NOT_FOUND",
            ClientError::Storage(_) => "E_STORAGE",
        }
    }

    /// Shorthand used by the registry.
    pub fn not_found(thread_id: &str) -> Self {
        ClientError::NotFound {
            thread_id: thread_id.to_string(),
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Auth(err) => write!(f, "{}", err),
            ClientError::Fetch(err) => write!(f, "{}", err),
            ClientError::Validation(err) => write!(f, "{}", err),
            ClientError::Stream(err) => write!(f, "{}", err),
            ClientError::NotFound { thread_id } => write!(f, "Chat not found: {}", thread_id),
            ClientError::Storage(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Auth(err) => Some(err),
            ClientError::Fetch(err) => Some(err),
            ClientError::Validation(err) => Some(err),
            ClientError::Stream(err) => Some(err),
            ClientError::NotFound { .. } => None,
            ClientError::Storage(err) => Some(err),
        }
    }
}

impl From<AuthError> for ClientError {
    fn from(err: AuthError) -> Self {
        ClientError::Auth(err)
    }
}

impl From<FetchError> for ClientError {
    fn from(err: FetchError) -> Self {
        ClientError::Fetch(err)
    }
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Validation(err)
    }
}

impl From<StreamError> for ClientError {
    fn from(err: StreamError) -> Self {
        ClientError::Stream(err)
    }
}

impl From<StorageError> for ClientError {
    fn from(err: StorageError) -> Self {
        ClientError::Storage(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_unauthorized_fetch_is_auth_category() {
        let err: ClientError = FetchError::HttpStatus {
            status: 401,
            message: "Not authorized".to_string(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Auth);
        assert!(err.requires_reauth());
    }

    #[test]
    fn test_server_and_network_fetch_categories() {
        let server: ClientError = FetchError::HttpStatus {
            status: 500,
            message: String::new(),
        }
        .into();
        assert_eq!(server.category(), ErrorCategory::Server);

        let network: ClientError = FetchError::ConnectionFailed {
            url: "http://x".to_string(),
            message: "refused".to_string(),
        }
        .into();
        assert_eq!(network.category(), ErrorCategory::Network);
        assert!(!network.requires_reauth());
    }

    #[test]
    fn test_validation_is_silent() {
        let err: ClientError = ValidationError::EmptyPrompt.into();
        assert!(err.is_silent());
        assert_eq!(err.error_code(), "E_VAL_EMPTY");
    }

    #[test]
    fn test_stream_categories() {
        let lost: ClientError = StreamError::ConnectionLost {
            message: "eof".to_string(),
        }
        .into();
        assert_eq!(lost.category(), ErrorCategory::Network);

        let decode: ClientError = StreamError::InvalidEncoding { offset: 0 }.into();
        assert_eq!(decode.category(), ErrorCategory::Server);
        assert!(!decode.is_silent());
    }

    #[test]
    fn test_not_found() {
        let err = ClientError::not_found("abc");
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert_eq!(err.to_string(), "Chat not found: abc");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_source_chain() {
        let err: ClientError = AuthError::TokenExpired.into();
        assert!(err.source().is_some());
    }
}
