use serde::{Deserialize, Serialize};

use super::{deserialize_id, deserialize_nullable_string};

/// The authenticated account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    #[serde(rename = "_id", alias = "id", deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Remaining generation credits. Unsigned: the balance is never shown
    /// negative even when local deductions run ahead of the server.
    #[serde(rename = "credits", alias = "creditBalance", default)]
    pub credit_balance: u64,
}

impl User {
    /// Avatar initial: first letter of the name, uppercased, `U` when unknown.
    pub fn initial(&self) -> char {
        self.name
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('U')
    }
}

/// Colour scheme preference, persisted with the token.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Client-visible session state.
///
/// `user` is only ever set after the token has been validated by a
/// successful user-detail fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
    pub theme: Theme,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    pub fn credits(&self) -> Option<u64> {
        self.user.as_ref().map(|u| u.credit_balance)
    }
}

/// The part of the session that survives restarts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredSession {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub theme: Theme,
}
