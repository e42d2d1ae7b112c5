//! Resolution options
//!
//! Every option has an explicit default. Values set through the builder
//! methods replace the default; parsers are layered over the default
//! registry one extension at a time.

use std::fmt;
use std::sync::Arc;

use crate::config::construct::TransformOptions;
use crate::config::dotenv::DotenvConfig;
use crate::config::env::{DefaultEnvParser, EnvParser};
use crate::config::locator::FileLocator;
use crate::config::parser::{Parser, ParserRegistry};
use crate::config::validation::ValidationOptions;

/// Options driving one configuration resolution
#[derive(Clone)]
pub struct ConfigOptions {
    /// Ordered file locators; later files override earlier ones
    pub files: Vec<FileLocator>,
    /// Extension to parser mapping plus the fallback parser
    pub parsers: ParserRegistry,
    /// Load a dotenv file before resolving locators
    pub use_dotenv: bool,
    pub dotenv: DotenvConfig,
    /// Builds the environment tree
    pub env_parser: Arc<dyn EnvParser>,
    /// Do not log files that fail to load (they are still skipped)
    pub suppress_failed_file_loads: bool,
    pub transform: TransformOptions,
    pub validation: ValidationOptions,
}

impl ConfigOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a file locator
    pub fn file(mut self, locator: impl Into<FileLocator>) -> Self {
        self.files.push(locator.into());
        self
    }

    /// Append several file locators
    pub fn files<I, L>(mut self, locators: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<FileLocator>,
    {
        self.files.extend(locators.into_iter().map(Into::into));
        self
    }

    /// Register a parser for an extension such as `.conf`
    pub fn parser(mut self, extension: impl Into<String>, parser: Arc<dyn Parser>) -> Self {
        self.parsers.register(extension, parser);
        self
    }

    /// Replace the parser used for unmapped extensions
    pub fn default_parser(mut self, parser: Arc<dyn Parser>) -> Self {
        self.parsers.set_default(parser);
        self
    }

    pub fn use_dotenv(mut self, enabled: bool) -> Self {
        self.use_dotenv = enabled;
        self
    }

    /// Configure the dotenv bootstrap and enable it
    pub fn dotenv_config(mut self, config: DotenvConfig) -> Self {
        self.dotenv = config;
        self.use_dotenv = true;
        self
    }

    /// Replace the environment tree builder
    pub fn env_parser(mut self, parser: Arc<dyn EnvParser>) -> Self {
        self.env_parser = parser;
        self
    }

    pub fn suppress_failed_file_loads(mut self, suppress: bool) -> Self {
        self.suppress_failed_file_loads = suppress;
        self
    }

    pub fn transform(mut self, transform: TransformOptions) -> Self {
        self.transform = transform;
        self
    }

    pub fn validation(mut self, validation: ValidationOptions) -> Self {
        self.validation = validation;
        self
    }
}

impl Default for ConfigOptions {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            parsers: ParserRegistry::default(),
            use_dotenv: false,
            dotenv: DotenvConfig::default(),
            env_parser: Arc::new(DefaultEnvParser::new()),
            suppress_failed_file_loads: false,
            transform: TransformOptions::default(),
            validation: ValidationOptions::default(),
        }
    }
}

impl fmt::Debug for ConfigOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigOptions")
            .field("files", &self.files)
            .field("parsers", &self.parsers)
            .field("use_dotenv", &self.use_dotenv)
            .field("dotenv", &self.dotenv)
            .field("suppress_failed_file_loads", &self.suppress_failed_file_loads)
            .field("transform", &self.transform)
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parser::Format;
    use std::path::{Path, PathBuf};

    #[test]
    fn test_defaults() {
        let options = ConfigOptions::default();
        assert!(options.files.is_empty());
        assert!(!options.use_dotenv);
        assert_eq!(options.dotenv.path, PathBuf::from(".env"));
        assert!(!options.suppress_failed_file_loads);
        assert!(options.transform.implicit_conversion);
        assert!(options.validation.enabled);
        assert_eq!(options.parsers.parser_for(Path::new("a.yml")).format(), "yaml");
    }

    #[test]
    fn test_user_parsers_layer_over_defaults() {
        let options = ConfigOptions::new()
            .parser(".json", Format::Yaml.parser())
            .parser(".conf", Format::Toml.parser());

        assert_eq!(options.parsers.parser_for(Path::new("a.json")).format(), "yaml");
        assert_eq!(options.parsers.parser_for(Path::new("a.conf")).format(), "toml");
        // untouched defaults survive
        assert_eq!(options.parsers.parser_for(Path::new("a.yaml")).format(), "yaml");
    }

    #[test]
    fn test_builder() {
        let options = ConfigOptions::new()
            .file("base.json")
            .files(["a.yaml", "b.yaml"])
            .file(FileLocator::computed(|_| "c.toml"))
            .dotenv_config(DotenvConfig::new("config/.env"))
            .suppress_failed_file_loads(true);

        assert_eq!(options.files.len(), 4);
        assert!(options.use_dotenv);
        assert_eq!(options.dotenv.path, PathBuf::from("config/.env"));
        assert!(options.suppress_failed_file_loads);

        let debug = format!("{:?}", options);
        assert!(debug.contains("base.json"));
        assert!(debug.contains("Computed(..)"));
    }
}
