//! Errors raised while consuming a streamed response body.

use std::fmt;

/// Stream-specific error variants.
///
/// Whatever was already flushed into the assistant placeholder stays there;
/// a truncated answer is visible to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamError {
    /// The connection dropped while the body was being read.
    ConnectionLost { message: String },

    /// The body contained bytes that are not valid UTF-8.
    InvalidEncoding { offset: usize },

    /// The body ended in the middle of a multi-byte character.
    TruncatedCharacter { pending_bytes: usize },

    /// The placeholder disappeared while streaming (thread deleted).
    PlaceholderLost { thread_id: String },
}

impl StreamError {
    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::ConnectionLost { .. } => {
                "The connection was interrupted. The answer may be incomplete.".to_string()
            }
            StreamError::InvalidEncoding { .. } | StreamError::TruncatedCharacter { .. } => {
                "Received malformed text from the server. The answer may be incomplete."
                    .to_string()
            }
            StreamError::PlaceholderLost { .. } => {
                "The chat was removed while the answer was streaming.".to_string()
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::ConnectionLost { .. } => "E_STREAM_CONN",
            StreamError::InvalidEncoding { .. } => "E_STREAM_UTF8",
            StreamError::TruncatedCharacter { .. } => "E_STREAM_TRUNC",
            StreamError::PlaceholderLost { .. } => "E_STREAM_THREAD",
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::ConnectionLost { message } => {
                write!(f, "Stream connection lost: {}", message)
            }
            StreamError::InvalidEncoding { offset } => {
                write!(f, "Invalid UTF-8 in stream at byte {}", offset)
            }
            StreamError::TruncatedCharacter { pending_bytes } => {
                write!(
                    f,
                    "Stream ended inside a multi-byte character ({} pending bytes)",
                    pending_bytes
                )
            }
            StreamError::PlaceholderLost { thread_id } => {
                write!(f, "Streaming placeholder missing from thread {}", thread_id)
            }
        }
    }
}

impl std::error::Error for StreamError {}
