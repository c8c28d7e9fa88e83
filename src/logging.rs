//! Tracing subscriber setup
//!
//! Library code only emits `tracing` events. Binaries and tests call
//! [`init`] once to print them to stderr.

use crate::config::LoggingConfig;
use crate::error::{Result, SdkError};
use tracing::Level;

/// Parses a level name such as `"info"` or `"DEBUG"`.
pub fn parse_level(level: &str) -> Result<Level> {
    level
        .trim()
        .parse::<Level>()
        .map_err(|_| SdkError::ConfigError(format!("Unknown log level: {:?}", level)))
}

/// Installs the global fmt subscriber.
///
/// Returns `Ok(false)` if another subscriber was already installed, which
/// happens when several tests initialize logging in one process.
pub fn init(config: &LoggingConfig) -> Result<bool> {
    let level = parse_level(&config.level)?;
    let installed = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(level = %level, "logging initialized");
    }
    Ok(installed)
}
