//! Command-line flags handled before the shell starts.
//!
//! ```ignore
//! use thinktoart::cli::{parse_args, CliCommand};
//!
//! match parse_args(std::env::args()) {
//!     CliCommand::Version => println!("{}", version_line()),
//!     CliCommand::Run { server } => { /* start the shell */ }
//!     _ => {}
//! }
//! ```

pub mod args;
pub mod version;

pub use args::{parse_args, CliCommand};
pub use version::{version_line, VERSION};

use std::sync::Arc;

use crate::adapters::FileSessionStorage;
use crate::error::ClientResult;
use crate::traits::SessionStorage;
use crate::models::StoredSession;
use crate::startup::ClientConfig;

/// `--logout`: drop the stored token, keep the theme.
///
/// Returns whether a token was present.
pub async fn forget_session(storage: Arc<dyn SessionStorage>) -> ClientResult<bool> {
    let stored = storage.load().await?.unwrap_or_default();
    let had_token = stored.token.is_some();
    storage
        .save(&StoredSession {
            token: None,
            theme: stored.theme,
        })
        .await?;
    Ok(had_token)
}

/// [`forget_session`] against the configured session file.
pub async fn handle_logout(config: &ClientConfig) -> ClientResult<bool> {
    forget_session(Arc::new(FileSessionStorage::in_dir(config.data_dir()))).await
}
