//! Transient user-facing notifications.
//!
//! Core components push [`Notification`]s through a [`Notifier`]; the shell
//! drains the receiving end between commands and prints them. Sending never
//! blocks and never fails: a dropped receiver just discards the message.

use tokio::sync::mpsc;

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Cloneable sending half.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: Option<mpsc::UnboundedSender<Notification>>,
}

/// Create a connected notifier and receiver.
pub fn channel() -> (Notifier, mpsc::UnboundedReceiver<Notification>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Notifier { tx: Some(tx) }, rx)
}

impl Notifier {
    /// A notifier that drops everything.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn notify(&self, level: NotificationLevel, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("Notification ({:?}): {}", level, message);
        if let Some(tx) = &self.tx {
            let _ = tx.send(Notification { level, message });
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.notify(NotificationLevel::Info, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(NotificationLevel::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(NotificationLevel::Error, message);
    }

    /// Report a failure unless it is a silent one. Returns whether anything
    /// was sent.
    pub fn report(&self, err: &ClientError) -> bool {
        if err.is_silent() {
            tracing::debug!("Suppressed silent error: {}", err);
            return false;
        }
        self.error(err.user_message());
        true
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::disabled()
    }
}
