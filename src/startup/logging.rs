//! File-based tracing.
//!
//! The shell owns the terminal, so logs go to `<data_dir>/thinktoart.log`.

use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use super::config::{ClientConfig, ENV_LOG};

/// Install the global subscriber. Call once, early in `main`.
pub fn init_logging(config: &ClientConfig) -> Result<()> {
    fs::create_dir_all(config.data_dir())
        .wrap_err_with(|| format!("creating {}", config.data_dir().display()))?;

    let log_path = config.log_path();
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .wrap_err_with(|| format!("opening {}", log_path.display()))?;

    let filter = EnvFilter::try_from_env(ENV_LOG)
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new(super::config::DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| color_eyre::eyre::eyre!("tracing already initialised: {}", e))?;

    tracing::info!("thinktoart {} logging to {}", env!("CARGO_PKG_VERSION"), log_path.display());
    Ok(())
}
