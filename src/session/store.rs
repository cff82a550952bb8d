use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::ChatApi;
use crate::error::{AuthError, ClientError, ClientResult, ValidationError};
use crate::models::{Credentials, PromptMode, Session, StoredSession, Theme, User};
use crate::traits::SessionStorage;

/// Owner of the token, the current user and the theme.
///
/// State lives in a `watch` channel so views can observe every change;
/// [`snapshot`](Self::snapshot) reads the latest value without waiting.
pub struct SessionStore {
    api: ChatApi,
    storage: Arc<dyn SessionStorage>,
    tx: watch::Sender<Session>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let session = self.tx.borrow();
        f.debug_struct("SessionStore")
            .field("authenticated", &session.is_authenticated())
            .field("theme", &session.theme)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(api: ChatApi, storage: Arc<dyn SessionStorage>) -> Self {
        let (tx, _rx) = watch::channel(Session::default());
        Self { api, storage, tx }
    }

    pub fn snapshot(&self) -> Session {
        self.tx.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.tx.borrow().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.tx.borrow().user.clone()
    }

    pub fn theme(&self) -> Theme {
        self.tx.borrow().theme
    }

    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().is_authenticated()
    }

    /// Observe every session change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }

    async fn persist(&self) -> Result<(), ClientError> {
        let stored = {
            let session = self.tx.borrow();
            StoredSession {
                token: session.token.clone(),
                theme: session.theme,
            }
        };
        self.storage.save(&stored).await?;
        Ok(())
    }

    /// Load the persisted token and theme, then validate the token.
    ///
    /// Returns whether the session ended up authenticated. Unreadable
    /// storage is logged and treated as an empty session.
    pub async fn restore(&self) -> ClientResult<bool> {
        let stored = match self.storage.load().await {
            Ok(stored) => stored.unwrap_or_default(),
            Err(e) => {
                warn!("Ignoring unreadable session storage: {}", e);
                StoredSession::default()
            }
        };

        let has_token = stored.token.is_some();
        self.tx.send_modify(|session| {
            session.theme = stored.theme;
            session.token = stored.token;
            session.user = None;
        });

        if !has_token {
            debug!("No stored token");
            return Ok(false);
        }

        info!("Restoring stored session");
        self.load_user().await?;
        Ok(true)
    }

    /// Log in, fetch the user, then persist the token.
    ///
    /// Every failure is an [`AuthError`].
    pub async fn authenticate(&self, credentials: &Credentials) -> ClientResult<Session> {
        let token = self.api.login(credentials).await.map_err(|e| {
            warn!("Login failed: {}", e);
            e
        })?;

        self.tx.send_modify(|session| {
            session.token = Some(token);
            session.user = None;
        });

        // The token is only stored once the backend has accepted it
        self.load_user().await.map_err(|e| match e {
            ClientError::Auth(_) => e,
            other => ClientError::from(AuthError::Unreachable {
                message: other.to_string(),
            }),
        })?;
        if let Err(e) = self.persist().await {
            warn!("Could not persist token: {}", e);
        }

        info!("Authenticated");
        Ok(self.snapshot())
    }

    /// Create an account. The session is left untouched.
    pub async fn register(&self, credentials: &Credentials) -> ClientResult<Option<String>> {
        let message = self.api.register(credentials).await?;
        info!("Registered new account");
        Ok(message)
    }

    /// Fetch the user for the current token.
    ///
    /// Any failure clears the in-memory session. The persisted token is only
    /// dropped when the backend rejected it, so an unreachable server does
    /// not log the user out for good.
    pub async fn load_user(&self) -> ClientResult<User> {
        let token = self.token().ok_or(AuthError::NotAuthenticated)?;

        match self.api.user_details(&token).await {
            Ok(user) => {
                let applied = self.tx.send_if_modified(|session| {
                    if session.token.as_deref() != Some(token.as_str()) {
                        return false;
                    }
                    session.user = Some(user.clone());
                    true
                });

                if !applied {
                    debug!("Session changed while loading user, discarding result");
                    return Err(AuthError::NotAuthenticated.into());
                }
                debug!("Loaded user {} ({} credits)", user.id, user.credit_balance);
                Ok(user)
            }
            Err(e) => {
                warn!("Failed to load user: {}", e);
                if e.requires_reauth() {
                    self.logout().await;
                } else {
                    self.tx.send_modify(|session| {
                        session.token = None;
                        session.user = None;
                    });
                }
                Err(e)
            }
        }
    }

    /// Optimistic local credit change; no network call.
    ///
    /// Returns the new balance, which never goes below zero.
    pub fn adjust_credits(&self, delta: i64) -> ClientResult<u64> {
        let max = PromptMode::MAX_COST as i64;
        if delta.abs() > max {
            return Err(ValidationError::CreditDeltaOutOfRange { delta, max }.into());
        }

        let mut balance = None;
        self.tx.send_if_modified(|session| match session.user.as_mut() {
            Some(user) => {
                user.credit_balance = if delta < 0 {
                    user.credit_balance.saturating_sub(delta.unsigned_abs())
                } else {
                    user.credit_balance.saturating_add(delta as u64)
                };
                balance = Some(user.credit_balance);
                true
            }
            None => false,
        });

        balance.ok_or_else(|| ValidationError::NotAuthenticated.into())
    }

    /// Clear token and user, then forget the persisted token. Idempotent.
    pub async fn logout(&self) {
        let was_authenticated = self.tx.send_if_modified(|session| {
            let changed = session.token.is_some() || session.user.is_some();
            session.token = None;
            session.user = None;
            changed
        });

        if was_authenticated {
            info!("Logged out");
        }

        if let Err(e) = self.persist().await {
            warn!("Could not clear stored token: {}", e);
        }
    }

    pub async fn set_theme(&self, theme: Theme) -> ClientResult<Theme> {
        self.tx.send_if_modified(|session| {
            let changed = session.theme != theme;
            session.theme = theme;
            changed
        });
        self.persist().await?;
        Ok(theme)
    }

    pub async fn toggle_theme(&self) -> ClientResult<Theme> {
        self.set_theme(self.theme().toggled()).await
    }
}
