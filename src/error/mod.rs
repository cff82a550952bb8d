//! Error handling for the client core.
//!
//! Domain-specific error enums are unified into [`ClientError`]:
//!
//! | Type | Raised by | Handling |
//! |------|-----------|----------|
//! | [`AuthError`] | login, expired token | clear session, back to login |
//! | [`FetchError`] | any request | transient notification, state unchanged |
//! | [`ValidationError`] | local preconditions | silent no-op |
//! | [`StreamError`] | body consumption | notification, partial answer kept |
//! | `ClientError::NotFound` | registry lookups | notification |
//!
//! Nothing is retried automatically; every retry is a fresh user action.

mod auth;
mod category;
mod client_error;
mod fetch;
mod result;
mod stream;
mod validation;

pub use auth::AuthError;
pub use category::ErrorCategory;
pub use client_error::ClientError;
pub use fetch::{extract_error_message, FetchError};
pub use result::ClientResult;
pub use stream::StreamError;
pub use validation::ValidationError;
