//! Session store: token, user, credits and theme.
//!
//! The store is the single writer of [`Session`](crate::models::Session).
//! Invariant: a user is only present while a token is present and that token
//! has been validated by a successful user-detail fetch.

mod store;

pub use store::SessionStore;
