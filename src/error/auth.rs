//! Authentication-related error types.

use std::fmt;

/// Authentication-specific error variants.
///
/// Every variant means the session can no longer be trusted; the session
/// store clears itself and the shell returns to the login gate.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    /// Login was rejected (wrong email or password).
    InvalidCredentials { message: String },

    /// The stored token was rejected by the backend.
    TokenExpired,

    /// An operation needed a session but none is present.
    NotAuthenticated,

    /// Login could not reach the backend.
    Unreachable { message: String },

    /// Backend answered the login without a token.
    MissingToken,
}

impl AuthError {
    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::InvalidCredentials { message } if !message.is_empty() => message.clone(),
            AuthError::InvalidCredentials { .. } => "Invalid email or password.".to_string(),
            AuthError::TokenExpired => {
                "Your session has expired. Please log in again.".to_string()
            }
            AuthError::NotAuthenticated => "Please log in to continue.".to_string(),
            AuthError::Unreachable { .. } => {
                "Could not reach the server. Please try again.".to_string()
            }
            AuthError::MissingToken => {
                "The server did not return a session. Please try again.".to_string()
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials { .. } => "E_AUTH_INVALID",
            AuthError::TokenExpired => "E_AUTH_TOKEN_EXP",
            AuthError::NotAuthenticated => "E_AUTH_NOT_AUTH",
            AuthError::Unreachable { .. } => "E_AUTH_UNREACHABLE",
            AuthError::MissingToken => "E_AUTH_NO_TOKEN",
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidCredentials { message } => {
                write!(f, "Invalid credentials: {}", message)
            }
            AuthError::TokenExpired => write!(f, "Access token rejected"),
            AuthError::NotAuthenticated => write!(f, "Not authenticated"),
            AuthError::Unreachable { message } => {
                write!(f, "Authentication request failed: {}", message)
            }
            AuthError::MissingToken => write!(f, "Login response did not contain a token"),
        }
    }
}

impl std::error::Error for AuthError {}
