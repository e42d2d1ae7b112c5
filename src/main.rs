use std::io;

use clap::Parser;
use layered_config::cli::{Cli, execute_command, init_logger_from_cli};
use layered_config::config::EnvSource;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger_from_cli(&cli)?;

    tracing::debug!(version = layered_config::pkg_version(), "Starting layered-config");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute_command(&cli, EnvSource::Process, &mut out)
}
