//! Format parsers and the extension-keyed parser registry

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::config::error::ParseError;

/// Turns raw file text into a plain-data tree
///
/// Implementations must be pure: no I/O, no global state.
pub trait Parser: Send + Sync {
    fn parse(&self, content: &str) -> Result<Value, ParseError>;

    /// Short format name used in diagnostics
    fn format(&self) -> &str {
        "custom"
    }
}

impl<F> Parser for F
where
    F: Fn(&str) -> Result<Value, ParseError> + Send + Sync,
{
    fn parse(&self, content: &str) -> Result<Value, ParseError> {
        self(content)
    }
}

/// Strict JSON parser
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl Parser for JsonParser {
    fn parse(&self, content: &str) -> Result<Value, ParseError> {
        Ok(serde_json::from_str(content)?)
    }

    fn format(&self) -> &str {
        "json"
    }
}

/// YAML parser
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlParser;

impl Parser for YamlParser {
    fn parse(&self, content: &str) -> Result<Value, ParseError> {
        Ok(serde_yaml::from_str(content)?)
    }

    fn format(&self) -> &str {
        "yaml"
    }
}

/// TOML parser
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlParser;

impl Parser for TomlParser {
    fn parse(&self, content: &str) -> Result<Value, ParseError> {
        Ok(toml::from_str(content)?)
    }

    fn format(&self) -> &str {
        "toml"
    }
}

/// Built-in parser selectable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Toml,
}

impl Format {
    pub fn parser(self) -> Arc<dyn Parser> {
        match self {
            Format::Json => Arc::new(JsonParser),
            Format::Yaml => Arc::new(YamlParser),
            Format::Toml => Arc::new(TomlParser),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
            Format::Toml => "toml",
        }
    }
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            "toml" => Ok(Format::Toml),
            _ => Err(format!(
                "Invalid format '{}'. Valid formats are: json, yaml, toml",
                s
            )),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extension of a path: everything from the last `.` of its string form
///
/// The match is case-sensitive and includes the dot, so `app.YAML` yields
/// `.YAML`. Paths without a dot have no extension.
pub fn extension_of(path: &Path) -> Option<String> {
    let text = path.to_string_lossy();
    text.rfind('.').map(|idx| text[idx..].to_string())
}

/// Mapping from file extension (with leading dot) to parser, plus a fallback
#[derive(Clone)]
pub struct ParserRegistry {
    parsers: HashMap<String, Arc<dyn Parser>>,
    default: Arc<dyn Parser>,
}

impl ParserRegistry {
    /// Registry with no extension mappings
    pub fn empty(default: Arc<dyn Parser>) -> Self {
        Self {
            parsers: HashMap::new(),
            default,
        }
    }

    /// Map `extension` (e.g. `.conf`) to `parser`, replacing any previous mapping
    pub fn register(&mut self, extension: impl Into<String>, parser: Arc<dyn Parser>) -> &mut Self {
        self.parsers.insert(extension.into(), parser);
        self
    }

    /// Replace the fallback parser
    pub fn set_default(&mut self, parser: Arc<dyn Parser>) -> &mut Self {
        self.default = parser;
        self
    }

    /// Parser for `path`, falling back to the default for unmapped extensions
    pub fn parser_for(&self, path: &Path) -> &dyn Parser {
        extension_of(path)
            .and_then(|ext| self.parsers.get(&ext))
            .unwrap_or(&self.default)
            .as_ref()
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        let mut registry = Self::empty(Arc::new(JsonParser));
        registry
            .register(".json", Arc::new(JsonParser))
            .register(".yaml", Arc::new(YamlParser))
            .register(".yml", Arc::new(YamlParser))
            .register(".toml", Arc::new(TomlParser));
        registry
    }
}

impl fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut mappings: Vec<_> = self
            .parsers
            .iter()
            .map(|(ext, parser)| format!("{ext}={}", parser.format()))
            .collect();
        mappings.sort();

        f.debug_struct("ParserRegistry")
            .field("parsers", &mappings)
            .field("default", &self.default.format())
            .finish()
    }
}
