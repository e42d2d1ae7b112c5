//! Logger Module
//!
//! Console logging on stderr based on `tracing-subscriber`. Standard output
//! is left to the command results.
//!
//! `RUST_LOG`, when set, takes precedence over the configured level.

pub mod config;
pub mod error;


// Re-export main types
pub use config::*;
pub use error::LoggerError;

use std::io::IsTerminal;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the logger with the given configuration
pub fn init_logger(config: &LoggerConfig) -> Result<(), LoggerError> {
    let filter = build_filter(config)?;
    let use_ansi = config.colored && std::io::stderr().is_terminal();

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match config.format {
        LogFormat::Full => registry
            .with(
                fmt::layer()
                    .with_ansi(use_ansi)
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .with_ansi(use_ansi)
                    .with_target(true)
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().with_ansi(false).json().with_writer(std::io::stderr))
            .try_init(),
    };

    installed.map_err(|e| LoggerError::init(e.to_string()))
}

/// Filter from `RUST_LOG`, falling back to the configured level
pub(crate) fn build_filter(config: &LoggerConfig) -> Result<EnvFilter, LoggerError> {
    config.validate()?;

    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(config.level.to_lowercase()).map_err(|e| LoggerError::config(e.to_string()))
}
