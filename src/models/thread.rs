use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{deserialize_id, deserialize_nullable_string, Message};

/// Number of characters of the first message shown as a thread title.
pub const TITLE_PREVIEW_CHARS: usize = 32;

/// A persisted conversation from the backend.
///
/// The backend uses Mongo-style `_id` and camelCase `updatedAt`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatThread {
    #[serde(rename = "_id", alias = "id", deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub name: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(rename = "updatedAt", default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl ChatThread {
    /// Create an empty thread (used by tests and local fixtures).
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            messages: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn first_message(&self) -> Option<&Message> {
        self.messages.first()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Text the thread is searched and listed by: the first message's
    /// content if any, otherwise the thread name.
    pub fn label(&self) -> &str {
        match self.first_message() {
            Some(first) => &first.content,
            None => &self.name,
        }
    }

    /// Sidebar title: the label truncated on a character boundary.
    pub fn title(&self) -> String {
        self.label().chars().take(TITLE_PREVIEW_CHARS).collect()
    }

    /// Case-insensitive substring match against [`label`](Self::label).
    /// An empty query matches every thread.
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        self.label()
            .to_lowercase()
            .contains(&query.to_lowercase())
    }

    /// Record local activity.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
