use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::deserialize_nullable_string;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// A single entry in a chat thread.
///
/// `content` is raw text, or an image locator when `is_image` is set.
/// Wire format matches the backend: `{role, content, isImage, timestamp}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: MessageRole,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub content: String,
    #[serde(default, rename = "isImage")]
    pub is_image: bool,
    /// Epoch milliseconds
    #[serde(default)]
    pub timestamp: i64,
}

impl Message {
    /// A user message echoing the literal prompt, stamped now.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            is_image: false,
            timestamp: now_millis(),
        }
    }

    /// Empty assistant message inserted before a text stream starts.
    pub fn assistant_placeholder() -> Self {
        Self {
            role: MessageRole::Assistant,
            content: String::new(),
            is_image: false,
            timestamp: now_millis(),
        }
    }

    /// Assistant message carrying a generated image reference.
    pub fn image(reference: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: reference.into(),
            is_image: true,
            timestamp: now_millis(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }

    pub fn is_assistant(&self) -> bool {
        self.role == MessageRole::Assistant
    }
}

/// Current time as epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
