//! Error category classification.
//!
//! Categories drive how the shell reacts to a failure: silent no-op,
//! transient notification, or a forced return to the login gate.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection, DNS, timeout or an interrupted body.
    Network,

    /// Invalid credentials or an expired token.
    /// Handled by clearing the session and returning to the login gate.
    Auth,

    /// Backend rejected the request (non-2xx other than 401).
    Server,

    /// Precondition not met (empty prompt, nothing selected, busy).
    /// Never surfaced to the user.
    Validation,

    /// A referenced thread does not exist locally.
    NotFound,

    /// Local storage / filesystem failures.
    System,
}

impl ErrorCategory {
    /// Whether a fresh, user-initiated attempt may succeed.
    ///
    /// Nothing is retried automatically; this only shapes the wording.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Whether failures in this category produce a notification.
    pub fn is_silent(&self) -> bool {
        matches!(self, ErrorCategory::Validation)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::Validation => "validation",
            ErrorCategory::NotFound => "not_found",
            ErrorCategory::System => "system",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check your internet connection and try again",
            ErrorCategory::Auth => "Please log in again",
            ErrorCategory::Server => {
                "The server may be experiencing issues. Please try again later"
            }
            ErrorCategory::Validation => "Please check your input and try again",
            ErrorCategory::NotFound => "Refresh the chat list and try again",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_retryable() {
        assert!(ErrorCategory::Network.is_retryable());
        assert!(ErrorCategory::Server.is_retryable());
        assert!(!ErrorCategory::Auth.is_retryable());
        assert!(!ErrorCategory::Validation.is_retryable());
        assert!(!ErrorCategory::NotFound.is_retryable());
        assert!(!ErrorCategory::System.is_retryable());
    }

    #[test]
    fn test_only_validation_is_silent() {
        assert!(ErrorCategory::Validation.is_silent());
        assert!(!ErrorCategory::Network.is_silent());
        assert!(!ErrorCategory::Auth.is_silent());
        assert!(!ErrorCategory::NotFound.is_silent());
    }

    #[test]
    fn test_category_display() {
        assert_eq!(format!("{}", ErrorCategory::Network), "network");
        assert_eq!(format!("{}", ErrorCategory::NotFound), "not_found");
    }

    #[test]
    fn test_category_recovery_hint() {
        assert!(ErrorCategory::Network.recovery_hint().contains("internet"));
        assert!(ErrorCategory::Auth.recovery_hint().contains("log in"));
    }
}
