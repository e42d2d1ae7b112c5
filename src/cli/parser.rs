//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::Format;
use crate::logger::LogFormat;

/// Resolve layered configuration from files and the environment
#[derive(Parser, Debug)]
#[command(name = "layered-config")]
#[command(about = "Resolve layered configuration from files and the environment")]
#[command(long_about = "
layered-config merges configuration files in order, applies environment
variables on top and prints the resulting tree.

Environment variable names map onto paths: '__' separates segments, a
trailing '-N' addresses array element N, and '_x' becomes 'X'.
DATABASE__HOSTS-0 sets database.hosts[0].

EXAMPLES:
    # Merge two files and apply the environment
    layered-config resolve -f config/default.yaml -f config/production.yaml

    # Read the file list from CONFIG_FILES after loading .env
    layered-config resolve --dotenv --locator-var CONFIG_FILES

    # Parse *.conf files as YAML and print YAML
    layered-config resolve -f app.conf --parser .conf=yaml --output yaml

    # Only consider variables starting with APP_
    layered-config resolve -f default.json --env-prefix APP_

    # Show how variable names are decoded
    layered-config decode SERVER__PORT DATABASE__HOSTS-1
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    ///
    /// Increases log output to debug level, showing each stage of the
    /// resolution and every file that was loaded.
    /// Cannot be used with --quiet.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    ///
    /// Reduces log output to error level only.
    /// Cannot be used with --verbose.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level override
    ///
    /// Takes precedence over --verbose and --quiet.
    ///
    /// Available levels: error, warn, info, debug, trace
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Log line format on stderr
    ///
    /// Available formats: full, compact, json
    #[arg(long, value_name = "FORMAT", global = true, default_value = "full")]
    pub log_format: LogFormat,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve and print the merged configuration tree
    ///
    /// Files are merged in the order given; environment variables of the
    /// current process are applied last.
    Resolve(ResolveArgs),

    /// Print the key path each environment variable name decodes to
    ///
    /// Examples:
    ///   layered-config decode SERVER__PORT      # server.port
    ///   layered-config decode MY_LIST-2         # myList[2]
    Decode {
        /// Variable names to decode
        #[arg(required = true, value_name = "NAME")]
        names: Vec<String>,
    },
}

/// Arguments of the resolve command
#[derive(Args, Debug, Clone, Default)]
pub struct ResolveArgs {
    /// Configuration file, may be repeated
    ///
    /// Later files override earlier ones. Missing or malformed files are
    /// skipped with a warning.
    #[arg(short, long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Environment variable holding a comma-separated list of files
    ///
    /// Evaluated after the dotenv file is loaded, so .env may set it.
    /// These files are merged after the --file ones.
    #[arg(long, value_name = "VAR", value_parser = super::validation::validate_env_var_name)]
    pub locator_var: Option<String>,

    /// Parser for an extension, as EXT=FORMAT
    ///
    /// Available formats: json, yaml, toml
    ///
    /// Example: --parser .conf=yaml
    #[arg(long = "parser", value_name = "EXT=FORMAT", value_parser = super::validation::parse_parser_mapping)]
    pub parsers: Vec<(String, Format)>,

    /// Parser for files whose extension has no mapping
    ///
    /// Default: json
    #[arg(long, value_name = "FORMAT")]
    pub default_format: Option<Format>,

    /// Load a dotenv file before resolving (default path: .env)
    #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = ".env")]
    pub dotenv: Option<PathBuf>,

    /// Let dotenv values replace variables that are already set
    #[arg(long, requires = "dotenv")]
    pub dotenv_override: bool,

    /// Only use variables with this prefix (stripped before decoding)
    #[arg(long, value_name = "PREFIX", value_parser = super::validation::validate_env_prefix)]
    pub env_prefix: Option<String>,

    /// Do not report files that fail to load
    #[arg(long)]
    pub suppress_failed_file_loads: bool,

    /// Output format of the merged tree
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    #[value(name = "json")]
    Json,
    #[value(name = "yaml", alias = "yml")]
    Yaml,
}

/// Log level options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl Cli {
    /// Log level selected by --log-level, --verbose or --quiet
    pub fn effective_log_level(&self) -> LogLevel {
        if let Some(level) = self.log_level {
            level
        } else if self.verbose {
            LogLevel::Debug
        } else if self.quiet {
            LogLevel::Error
        } else {
            LogLevel::Warn
        }
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => "error".to_string(),
            LogLevel::Warn => "warn".to_string(),
            LogLevel::Info => "info".to_string(),
            LogLevel::Debug => "debug".to_string(),
            LogLevel::Trace => "trace".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_flag() {
        let result = Cli::try_parse_from(["layered-config", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_flag() {
        let result = Cli::try_parse_from(["layered-config", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["layered-config"]).is_err());
    }

    #[test]
    fn test_resolve_command() {
        let cli = Cli::try_parse_from([
            "layered-config",
            "resolve",
            "-f",
            "a.yaml",
            "--file",
            "b.conf",
            "--parser",
            ".conf=toml",
            "--default-format",
            "yaml",
            "--env-prefix",
            "APP_",
            "--output",
            "yaml",
        ])
        .unwrap();

        let Commands::Resolve(args) = cli.command else {
            panic!("Expected Resolve command");
        };
        assert_eq!(args.files, vec![PathBuf::from("a.yaml"), PathBuf::from("b.conf")]);
        assert_eq!(args.parsers, vec![(".conf".to_string(), Format::Toml)]);
        assert_eq!(args.default_format, Some(Format::Yaml));
        assert_eq!(args.env_prefix.as_deref(), Some("APP_"));
        assert_eq!(args.output, OutputFormat::Yaml);
        assert!(args.dotenv.is_none());
        assert!(!args.suppress_failed_file_loads);
    }

    #[test]
    fn test_dotenv_flag_default_path() {
        let cli = Cli::try_parse_from(["layered-config", "resolve", "--dotenv"]).unwrap();
        let Commands::Resolve(args) = cli.command else {
            panic!("Expected Resolve command");
        };
        assert_eq!(args.dotenv, Some(PathBuf::from(".env")));

        let cli = Cli::try_parse_from(["layered-config", "resolve", "--dotenv", "local.env"]).unwrap();
        let Commands::Resolve(args) = cli.command else {
            panic!("Expected Resolve command");
        };
        assert_eq!(args.dotenv, Some(PathBuf::from("local.env")));
    }

    #[test]
    fn test_dotenv_override_requires_dotenv() {
        let result = Cli::try_parse_from(["layered-config", "resolve", "--dotenv-override"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_parser_mapping() {
        let result = Cli::try_parse_from(["layered-config", "resolve", "--parser", ".conf"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_command() {
        let cli = Cli::try_parse_from(["layered-config", "decode", "A__B", "C-0"]).unwrap();
        match cli.command {
            Commands::Decode { names } => assert_eq!(names, vec!["A__B", "C-0"]),
            _ => panic!("Expected Decode command"),
        }
        assert!(Cli::try_parse_from(["layered-config", "decode"]).is_err());
    }

    #[test]
    fn test_verbose_flag() {
        let cli = Cli::try_parse_from(["layered-config", "decode", "X", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.effective_log_level(), LogLevel::Debug);
        assert_eq!(cli.log_format, LogFormat::Full);
    }

    #[test]
    fn test_conflicting_verbose_quiet() {
        let result = Cli::try_parse_from(["layered-config", "-v", "-q", "decode", "X"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_log_level_strings() {
        assert_eq!(String::from(LogLevel::Warn), "warn");
        let cli = Cli::try_parse_from(["layered-config", "-q", "decode", "X"]).unwrap();
        assert_eq!(String::from(cli.effective_log_level()), "error");
    }

    #[test]
    fn test_log_level_flag_overrides_verbosity() {
        let cli = Cli::try_parse_from(["layered-config", "-q", "--log-level", "trace", "decode", "X"])
            .unwrap();
        assert_eq!(cli.log_level, Some(LogLevel::Trace));
        assert_eq!(cli.effective_log_level(), LogLevel::Trace);

        let cli = Cli::try_parse_from(["layered-config", "decode", "X", "--log-level", "warning"]).unwrap();
        assert_eq!(cli.effective_log_level(), LogLevel::Warn);

        let cli = Cli::try_parse_from(["layered-config", "decode", "X", "--log-level", "info"]).unwrap();
        assert_eq!(String::from(cli.effective_log_level()), "info");

        assert!(Cli::try_parse_from(["layered-config", "--log-level", "loud", "decode", "X"]).is_err());
    }
}
