//! Concrete implementations of the seams in [`crate::traits`].
//!
//! - [`ReqwestHttpClient`] - production transport
//! - [`FileSessionStorage`] - `~/.thinktoart/session.json`
//!
//! The [`mock`] submodule holds the test doubles.

pub mod file_storage;
pub mod mock;
pub mod reqwest_http;

pub use file_storage::{default_data_dir, FileSessionStorage};
pub use mock::{InMemoryStorage, MockHttpClient, MockResponse};
pub use reqwest_http::ReqwestHttpClient;
