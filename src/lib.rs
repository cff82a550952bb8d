//! ThinkToArt client core.
//!
//! Session, chat registry and the streaming prompt pipeline, plus the
//! terminal shell built on top of them. Modules are public for the
//! integration tests.

pub mod adapters;
pub mod api;
pub mod chat;
pub mod cli;
pub mod error;
pub mod models;
pub mod notifications;
pub mod registry;
pub mod render;
pub mod session;
pub mod shell;
pub mod startup;
pub mod stream;
pub mod traits;
