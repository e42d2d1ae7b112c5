//! Command executor for dispatching CLI commands
//!
//! Output goes to the given writer so commands can be exercised without a
//! terminal; logs go to stderr through `tracing`.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use super::parser::{Cli, Commands, OutputFormat, ResolveArgs};
use crate::config::{
    ConfigOptions, ConfigResolver, DefaultEnvParser, DotenvConfig, EnvMap, EnvSource, FileLocator,
    KeyPath, PathSegment,
};

/// Execute a CLI command
///
/// # Arguments
/// * `cli` - Parsed CLI arguments
/// * `source` - Environment the resolve command reads
/// * `out` - Destination of the command output
///
/// # Errors
/// Returns resolution errors (path conflicts) and output failures
pub fn execute_command<W: Write>(cli: &Cli, source: EnvSource, out: &mut W) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Resolve(args) => resolve(args, source, out),
        Commands::Decode { names } => decode(names, out),
    }
}

/// Translate resolve arguments into resolver options
pub fn build_options(args: &ResolveArgs) -> ConfigOptions {
    let mut options = ConfigOptions::new()
        .files(args.files.iter().cloned())
        .suppress_failed_file_loads(args.suppress_failed_file_loads);

    if let Some(var) = &args.locator_var {
        options = options.file(list_locator(var.clone()));
    }

    for (extension, format) in &args.parsers {
        options = options.parser(extension.clone(), format.parser());
    }

    if let Some(format) = args.default_format {
        options = options.default_parser(format.parser());
    }

    if let Some(path) = &args.dotenv {
        options = options
            .dotenv_config(DotenvConfig::new(path.clone()).with_override(args.dotenv_override));
    }

    if let Some(prefix) = &args.env_prefix {
        options = options.env_parser(Arc::new(DefaultEnvParser::with_prefix(prefix.clone())));
    }

    options
}

/// Locator reading a comma-separated file list from `var`
fn list_locator(var: String) -> FileLocator {
    FileLocator::computed(move |env: &EnvMap| -> Vec<PathBuf> {
        env.get(&var)
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|entry| !entry.is_empty())
                    .map(PathBuf::from)
                    .collect()
            })
            .unwrap_or_default()
    })
}

fn resolve<W: Write>(args: &ResolveArgs, source: EnvSource, out: &mut W) -> anyhow::Result<()> {
    let resolver = ConfigResolver::new(build_options(args));
    tracing::debug!(options = ?resolver.options(), "Resolving configuration");

    let tree = resolver
        .resolve_tree(source)
        .context("Failed to resolve configuration")?;

    let rendered = match args.output {
        OutputFormat::Json => serde_json::to_string_pretty(&tree)? + "\n",
        OutputFormat::Yaml => serde_yaml::to_string(&tree)?,
    };
    out.write_all(rendered.as_bytes())?;
    Ok(())
}

fn decode<W: Write>(names: &[String], out: &mut W) -> anyhow::Result<()> {
    for name in names {
        writeln!(out, "{} => {}", name, describe(&KeyPath::decode(name)))?;
    }
    Ok(())
}

/// Dotted rendering of a key path, e.g. `database.hosts[0]`
fn describe(path: &KeyPath) -> String {
    path.segments()
        .iter()
        .map(|segment| match segment {
            PathSegment::Key(key) => key.clone(),
            PathSegment::Element { key, index } => format!("{key}[{index}]"),
        })
        .collect::<Vec<_>>()
        .join(".")
}
