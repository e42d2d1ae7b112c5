//! Configuration file loader
//!
//! Reads every resolved path in order, parses it with the parser registered
//! for its extension and deep-merges the results. A file that cannot be read
//! or parsed is reported and contributes nothing; it never aborts loading.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::config::error::{NodeKind, SourceError};
use crate::config::merge::deep_merge;
use crate::config::parser::ParserRegistry;

/// Result of loading and merging a list of files
#[derive(Debug)]
pub struct MergedFiles {
    /// Merged tree of every successfully loaded file
    pub tree: Value,
    /// Files that contributed to `tree`, in merge order
    pub loaded: Vec<PathBuf>,
    /// Files that were skipped and why
    pub failed: Vec<(PathBuf, SourceError)>,
}

/// Loads configuration files through a parser registry
#[derive(Debug)]
pub struct FileLoader<'a> {
    parsers: &'a ParserRegistry,
    suppress_failed_loads: bool,
}

impl<'a> FileLoader<'a> {
    /// Create a new loader
    ///
    /// # Arguments
    ///
    /// * `parsers` - Registry used to pick a parser per file extension
    /// * `suppress_failed_loads` - Do not log files that fail to load
    pub fn new(parsers: &'a ParserRegistry, suppress_failed_loads: bool) -> Self {
        Self {
            parsers,
            suppress_failed_loads,
        }
    }

    /// Read and parse a single file
    ///
    /// An empty document (top-level null) is an empty object.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, fails to parse, or its
    /// top-level value is not an object.
    pub fn load_file(&self, path: &Path) -> Result<Value, SourceError> {
        let content = fs::read_to_string(path)?;
        let parser = self.parsers.parser_for(path);

        let value = parser
            .parse(&content)
            .map_err(|source| SourceError::Parse {
                format: parser.format().to_string(),
                source,
            })?;

        match value {
            Value::Object(_) => Ok(value),
            Value::Null => Ok(Value::Object(Map::new())),
            other => Err(SourceError::NotAnObject(NodeKind::of(&other))),
        }
    }

    /// Load every path in order and deep-merge the results
    pub fn load_and_merge(&self, paths: &[PathBuf]) -> MergedFiles {
        let mut tree = Value::Object(Map::new());
        let mut loaded = Vec::new();
        let mut failed = Vec::new();

        for path in paths {
            match self.load_file(path) {
                Ok(value) => {
                    tracing::debug!(path = %path.display(), "Loaded configuration file");
                    tree = deep_merge(tree, value);
                    loaded.push(path.clone());
                }
                Err(e) => {
                    if !self.suppress_failed_loads {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Unable to load configuration file, skipping"
                        );
                    }
                    failed.push((path.clone(), e));
                }
            }
        }

        MergedFiles {
            tree,
            loaded,
            failed,
        }
    }
}
