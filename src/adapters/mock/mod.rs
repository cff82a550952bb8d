//! Test doubles for the transport and storage seams.
//!
//! - [`MockHttpClient`] - recorded requests, canned responses and streams
//! - [`InMemoryStorage`] - session persistence without a file system

pub mod http;
pub mod storage;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use storage::InMemoryStorage;
