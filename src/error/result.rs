//! Result type alias for client operations.

use super::client_error::ClientError;

/// Type alias for Results using [`ClientError`].
///
/// # Example
///
/// ```ignore
/// use thinktoart::error::ClientResult;
///
/// async fn refresh(registry: &ChatRegistry) -> ClientResult<usize> {
///     Ok(registry.load_threads().await?.len())
/// }
/// ```
pub type ClientResult<T> = Result<T, ClientError>;
