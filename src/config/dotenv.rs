//! `.env` bootstrap
//!
//! Loads a dotenv file before any locator runs so that computed locators can
//! depend on the variables it defines. Bootstrap is best-effort: callers log
//! the returned error and carry on with the ambient environment.

use std::path::{Path, PathBuf};

use crate::config::EnvMap;
use crate::config::error::ConfigError;

/// Default dotenv file name
pub const DEFAULT_DOTENV_PATH: &str = ".env";

/// Dotenv bootstrap configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotenvConfig {
    /// File to load, relative to the working directory unless absolute
    pub path: PathBuf,
    /// Whether values from the file replace variables that are already set
    pub override_existing: bool,
}

impl DotenvConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            override_existing: false,
        }
    }

    pub fn with_override(mut self, override_existing: bool) -> Self {
        self.override_existing = override_existing;
        self
    }

    fn error(&self, source: dotenvy::Error) -> ConfigError {
        ConfigError::Dotenv {
            path: self.path.clone(),
            source,
        }
    }
}

impl Default for DotenvConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DOTENV_PATH)
    }
}

/// Load the dotenv file into the process environment
///
/// # Errors
///
/// Returns [`ConfigError::Dotenv`] if the file is missing, unreadable or malformed.
pub fn load_into_process(config: &DotenvConfig) -> Result<(), ConfigError> {
    let result = if config.override_existing {
        dotenvy::from_path_override(&config.path)
    } else {
        dotenvy::from_path(&config.path)
    };
    result.map_err(|e| config.error(e))
}

/// Load the dotenv file into an explicit environment mapping
///
/// The process environment is left untouched. Returns the number of
/// variables written into `env`.
///
/// # Errors
///
/// Returns [`ConfigError::Dotenv`] if the file is missing, unreadable or
/// malformed. On a malformed line nothing is written.
pub fn load_into_map(config: &DotenvConfig, env: &mut EnvMap) -> Result<usize, ConfigError> {
    let entries = dotenvy::from_path_iter(&config.path)
        .map_err(|e| config.error(e))?
        .collect::<Result<Vec<(String, String)>, _>>()
        .map_err(|e| config.error(e))?;

    let mut written = 0;
    for (key, value) in entries {
        if !config.override_existing && env.contains_key(&key) {
            continue;
        }
        env.insert(key, value);
        written += 1;
    }

    Ok(written)
}

/// Log a bootstrap failure at the level its cause deserves
pub(crate) fn report_failure(path: &Path, error: &ConfigError) {
    match error {
        ConfigError::Dotenv { source, .. } if source.not_found() => {
            tracing::debug!(path = %path.display(), "No dotenv file found, using ambient environment");
        }
        _ => {
            tracing::warn!(path = %path.display(), error = %error, "Failed to load dotenv file, using ambient environment");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_dotenv(content: &str) -> (TempDir, DotenvConfig) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join(".env");
        fs::write(&path, content).expect("Failed to write .env");
        (dir, DotenvConfig::new(path))
    }

    #[test]
    fn test_default_config() {
        let config = DotenvConfig::default();
        assert_eq!(config.path, PathBuf::from(".env"));
        assert!(!config.override_existing);
    }

    #[test]
    fn test_load_into_map_keeps_existing() {
        let (_dir, config) = write_dotenv("APP_ENV=staging\nDB__HOST=db.local\n# comment\n");
        let mut env = EnvMap::new();
        env.insert("APP_ENV".to_string(), "production".to_string());

        let written = load_into_map(&config, &mut env).unwrap();

        assert_eq!(written, 1);
        assert_eq!(env["APP_ENV"], "production");
        assert_eq!(env["DB__HOST"], "db.local");
    }

    #[test]
    fn test_load_into_map_override() {
        let (_dir, config) = write_dotenv("APP_ENV=staging\n");
        let config = config.with_override(true);
        let mut env = EnvMap::new();
        env.insert("APP_ENV".to_string(), "production".to_string());

        load_into_map(&config, &mut env).unwrap();
        assert_eq!(env["APP_ENV"], "staging");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let config = DotenvConfig::new(dir.path().join("absent.env"));
        let mut env = EnvMap::new();

        let err = load_into_map(&config, &mut env).unwrap_err();
        match &err {
            ConfigError::Dotenv { source, .. } => assert!(source.not_found()),
            other => panic!("Expected Dotenv error, got {:?}", other),
        }
        assert!(!err.is_fatal());
        assert!(env.is_empty());
    }

    #[test]
    fn test_malformed_file_writes_nothing() {
        let (_dir, config) = write_dotenv("GOOD=1\nthis line is broken\n");
        let mut env = EnvMap::new();

        assert!(load_into_map(&config, &mut env).is_err());
        assert!(env.is_empty());
    }
}
