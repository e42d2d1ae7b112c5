//! Configuration resolution
//!
//! This module assembles one validated configuration object from:
//! - configuration files (JSON, YAML, TOML or custom formats)
//! - an optional `.env` file
//! - environment variables (`DATABASE__HOSTS-0` style names)
//!
//! # Precedence (lowest to highest)
//! 1. Files, in locator order
//! 2. Environment variables
//!
//! # Usage
//!
//! ```rust,ignore
//! use layered_config::config::{ConfigOptions, ConfigurationService, FileLocator};
//!
//! let service = ConfigurationService::<Settings>::new(
//!     ConfigOptions::new()
//!         .file("config/default.yaml")
//!         .file(FileLocator::computed(|env| {
//!             format!("config/{}.yaml", env.get("APP_ENV").map(String::as_str).unwrap_or("development"))
//!         }))
//!         .use_dotenv(true),
//! )?;
//! println!("listening on {}", service.config().server.port);
//! ```

use std::collections::BTreeMap;

pub mod construct;
pub mod dotenv;
pub mod env;
pub mod error;
pub mod key_path;
pub mod loader;
pub mod locator;
pub mod merge;
pub mod options;
pub mod parser;
pub mod pipeline;
pub mod validation;


/// Environment variable mapping threaded through a resolution pass
pub type EnvMap = BTreeMap<String, String>;

// Re-export public types
pub use construct::TransformOptions;
pub use dotenv::DotenvConfig;
pub use env::{DefaultEnvParser, EnvParser};
pub use error::{ConfigError, NodeKind, ParseError, SourceError, ValidationIssue};
pub use key_path::{KeyPath, PathSegment};
pub use loader::{FileLoader, MergedFiles};
pub use locator::{FileLocator, Located, resolve_locators};
pub use merge::{deep_merge, deep_merge_all};
pub use options::ConfigOptions;
pub use parser::{Format, JsonParser, Parser, ParserRegistry, TomlParser, YamlParser};
pub use pipeline::{ConfigResolver, ConfigurationService, EnvSource, Stage};
pub use validation::ValidationOptions;
