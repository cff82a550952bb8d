//! Seams between the client core and the outside world.
//!
//! - [`HttpClient`] - backend transport (buffered and streaming)
//! - [`SessionStorage`] - persisted token and theme

pub mod http;
pub mod storage;

pub use http::{bearer_headers, ByteStream, Headers, HttpClient, HttpError, Response};
pub use storage::{SessionStorage, StorageError};
