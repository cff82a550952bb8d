use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{ChatThread, User};

/// Generation mode of a prompt submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptMode {
    #[default]
    Text,
    Image,
}

impl PromptMode {
    /// Path segment under `/api/message/`.
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptMode::Text => "text",
            PromptMode::Image => "image",
        }
    }

    /// Credits deducted after a successful submission.
    pub fn cost(&self) -> u64 {
        match self {
            PromptMode::Text => 1,
            PromptMode::Image => 2,
        }
    }

    /// Largest cost of any mode. Local credit adjustments beyond this are rejected.
    pub const MAX_COST: u64 = 2;
}

impl std::str::FromStr for PromptMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(PromptMode::Text),
            "image" => Ok(PromptMode::Image),
            other => Err(format!("unknown mode '{}', expected text or image", other)),
        }
    }
}

/// Body of `POST /api/message/{mode}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageRequest {
    #[serde(rename = "chatId")]
    pub chat_id: String,
    pub prompt: String,
    #[serde(rename = "isPublished")]
    pub is_published: bool,
}

impl MessageRequest {
    pub fn new(chat_id: impl Into<String>, prompt: impl Into<String>, is_published: bool) -> Self {
        Self {
            chat_id: chat_id.into(),
            prompt: prompt.into(),
            is_published,
        }
    }
}

/// Body of `POST /api/user/login` and `POST /api/user/register`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Credentials {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn login(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: None,
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn register(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Response of login/register. `token` is absent on rejection.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of `GET /api/user/userdetails`. Some deployments wrap the
/// user object, others return it bare.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UserDetailsResponse {
    Wrapped { user: User },
    Bare(User),
}

impl UserDetailsResponse {
    pub fn into_user(self) -> User {
        match self {
            UserDetailsResponse::Wrapped { user } => user,
            UserDetailsResponse::Bare(user) => user,
        }
    }
}

/// Response of `GET /api/chat/getAllChats`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatListResponse {
    #[serde(default)]
    pub chats: Vec<ChatThread>,
}

/// Response of `POST /api/chat/create`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateChatResponse {
    #[serde(rename = "newChat", alias = "chat")]
    pub new_chat: ChatThread,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageReply {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, rename = "isImage")]
    pub is_image: Option<bool>,
}

/// Response of `POST /api/message/image`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageResponse {
    #[serde(default)]
    pub reply: Option<ImageReply>,
    #[serde(default, rename = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

static IMAGE_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https?://\S+|data:image/[A-Za-z0-9.+-]+;base64,[A-Za-z0-9+/=\s]+)$")
        .expect("Invalid image reference regex")
});

/// True for an http(s) URL or a base64 `data:image/` URI.
pub fn is_image_reference(candidate: &str) -> bool {
    IMAGE_REFERENCE.is_match(candidate.trim())
}

impl ImageResponse {
    /// The first valid image reference in the reply, if any.
    ///
    /// A `reply` explicitly marked `isImage: false` does not count.
    pub fn image_reference(&self) -> Option<String> {
        let from_reply = self
            .reply
            .as_ref()
            .filter(|r| r.is_image != Some(false))
            .and_then(|r| r.content.as_deref());

        [from_reply, self.image_url.as_deref(), self.url.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|candidate| is_image_reference(candidate))
            .map(str::to_string)
    }
}
