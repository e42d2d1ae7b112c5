//! Configuration error types

use std::fmt;
use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

/// Shape of a node in the plain-data tree, used to describe path conflicts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Object,
    Array,
    Scalar,
}

impl NodeKind {
    /// Classify a tree node
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => NodeKind::Object,
            Value::Array(_) => NodeKind::Array,
            _ => NodeKind::Scalar,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Object => "object",
            NodeKind::Array => "array",
            NodeKind::Scalar => "scalar",
        };
        f.write_str(name)
    }
}

/// A single violated validation rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Dotted path of the offending field, e.g. `database.hosts[1].port`
    pub field: String,
    /// Validator code, e.g. `range` or `length`
    pub code: String,
    /// Human readable message
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.field, self.message, self.code)
    }
}

/// Fatal (and bootstrap) errors raised while resolving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Two environment variables disagree about the shape at one path
    #[error(
        "Conflicting configuration path '{path}' from variable '{variable}': expected {expected} but found {found}"
    )]
    PathConflict {
        /// Environment variable being applied when the conflict surfaced
        variable: String,
        /// Decoded key path of that variable
        path: String,
        expected: NodeKind,
        found: NodeKind,
    },

    /// Custom environment parser failure
    #[error("Environment parser error: {0}")]
    EnvParser(String),

    /// `.env` bootstrap failure; never aborts resolution
    #[error("Failed to load dotenv file {}: {source}", .path.display())]
    Dotenv {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    /// The merged tree could not be turned into the target type
    #[error("Failed to construct configuration: {0}")]
    Construction(String),

    /// The constructed configuration violates one or more rules
    #[error("Configuration validation failed: {}", format_issues(.issues))]
    Validation { issues: Vec<ValidationIssue> },
}

impl ConfigError {
    /// Create a new path conflict error
    pub fn path_conflict(
        variable: impl Into<String>,
        path: impl fmt::Display,
        expected: NodeKind,
        found: NodeKind,
    ) -> Self {
        ConfigError::PathConflict {
            variable: variable.into(),
            path: path.to_string(),
            expected,
            found,
        }
    }

    /// Create a new construction error
    pub fn construction(message: impl fmt::Display) -> Self {
        ConfigError::Construction(message.to_string())
    }

    /// Whether the error must abort process start-up
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ConfigError::Dotenv { .. })
    }
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Parse failure reported by a format parser
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Custom(String),
}

impl ParseError {
    pub fn custom(message: impl Into<String>) -> Self {
        ParseError::Custom(message.into())
    }
}

/// Recoverable failure of a single configuration file
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("unable to read file: {0}")]
    Read(#[from] std::io::Error),

    #[error("unable to parse file with {format} parser: {source}")]
    Parse {
        format: String,
        #[source]
        source: ParseError,
    },

    #[error("top-level value is {0}, expected an object")]
    NotAnObject(NodeKind),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_kind_of() {
        assert_eq!(NodeKind::of(&json!({})), NodeKind::Object);
        assert_eq!(NodeKind::of(&json!([1])), NodeKind::Array);
        assert_eq!(NodeKind::of(&json!("x")), NodeKind::Scalar);
        assert_eq!(NodeKind::of(&Value::Null), NodeKind::Scalar);
    }

    #[test]
    fn test_path_conflict_message() {
        let err = ConfigError::path_conflict("FOO__BAR", "foo__bar", NodeKind::Object, NodeKind::Array);
        let msg = err.to_string();
        assert!(msg.contains("foo__bar"));
        assert!(msg.contains("FOO__BAR"));
        assert!(msg.contains("expected object but found array"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_validation_message_lists_every_issue() {
        let err = ConfigError::Validation {
            issues: vec![
                ValidationIssue {
                    field: "port".to_string(),
                    code: "range".to_string(),
                    message: "out of range".to_string(),
                },
                ValidationIssue {
                    field: "name".to_string(),
                    code: "length".to_string(),
                    message: "too short".to_string(),
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("port: out of range (range)"));
        assert!(msg.contains("name: too short (length)"));
    }
}
