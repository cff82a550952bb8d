//! Precondition failures. These are silent: no notification is shown.

use std::fmt;

/// A local precondition was not met, so nothing was sent or mutated.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Prompt was empty or whitespace only.
    EmptyPrompt,

    /// No user is logged in.
    NotAuthenticated,

    /// No thread is selected.
    NoSelectedThread,

    /// A submission is already in flight for this chat view.
    Busy,

    /// Credit adjustment larger than any per-mode cost.
    CreditDeltaOutOfRange { delta: i64, max: i64 },
}

impl ValidationError {
    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::EmptyPrompt => "E_VAL_EMPTY",
            ValidationError::NotAuthenticated => "E_VAL_NO_SESSION",
            ValidationError::NoSelectedThread => "E_VAL_NO_THREAD",
            ValidationError::Busy => "E_VAL_BUSY",
            ValidationError::CreditDeltaOutOfRange { .. } => "E_VAL_CREDITS",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyPrompt => write!(f, "Prompt is empty"),
            ValidationError::NotAuthenticated => write!(f, "No authenticated user"),
            ValidationError::NoSelectedThread => write!(f, "No chat selected"),
            ValidationError::Busy => write!(f, "A prompt is already being processed"),
            ValidationError::CreditDeltaOutOfRange { delta, max } => {
                write!(f, "Credit adjustment {} exceeds the maximum of {}", delta, max)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
