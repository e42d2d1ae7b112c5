//! CLI module for layered-config
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing with clap
//! - Argument validation
//! - Command execution against the configuration resolver

pub mod executor;
pub mod parser;
pub mod validation;

// Re-export public types for convenience
pub use executor::{build_options, execute_command};
pub use parser::{Cli, Commands, LogLevel, OutputFormat, ResolveArgs};

use crate::logger::{LoggerConfig, LoggerError, init_logger};

/// Initialize the logger from the global CLI flags
///
/// # Errors
/// Returns error if the subscriber cannot be installed
pub fn init_logger_from_cli(cli: &Cli) -> Result<(), LoggerError> {
    let config = LoggerConfig::default()
        .with_level(String::from(cli.effective_log_level()))
        .with_format(cli.log_format);
    init_logger(&config)
}
