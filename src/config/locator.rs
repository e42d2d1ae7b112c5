//! File locators
//!
//! A locator is either a literal path or a function of the environment
//! returning one or more paths. All locators are evaluated once per
//! resolution pass, after the dotenv bootstrap.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::EnvMap;

/// Paths produced by a computed locator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located {
    One(PathBuf),
    Many(Vec<PathBuf>),
}

impl Located {
    pub fn into_paths(self) -> Vec<PathBuf> {
        match self {
            Located::One(path) => vec![path],
            Located::Many(paths) => paths,
        }
    }
}

impl From<PathBuf> for Located {
    fn from(path: PathBuf) -> Self {
        Located::One(path)
    }
}

impl From<&Path> for Located {
    fn from(path: &Path) -> Self {
        Located::One(path.to_path_buf())
    }
}

impl From<String> for Located {
    fn from(path: String) -> Self {
        Located::One(PathBuf::from(path))
    }
}

impl From<&str> for Located {
    fn from(path: &str) -> Self {
        Located::One(PathBuf::from(path))
    }
}

impl From<Option<PathBuf>> for Located {
    fn from(path: Option<PathBuf>) -> Self {
        Located::Many(path.into_iter().collect())
    }
}

impl<T: Into<PathBuf>> From<Vec<T>> for Located {
    fn from(paths: Vec<T>) -> Self {
        Located::Many(paths.into_iter().map(Into::into).collect())
    }
}

type LocatorFn = dyn Fn(&EnvMap) -> Located + Send + Sync;

/// Where to look for configuration files
#[derive(Clone)]
pub enum FileLocator {
    Literal(PathBuf),
    Computed(Arc<LocatorFn>),
}

impl FileLocator {
    pub fn literal(path: impl Into<PathBuf>) -> Self {
        FileLocator::Literal(path.into())
    }

    /// Locator computed from the environment
    ///
    /// ```
    /// use layered_config::config::FileLocator;
    ///
    /// let by_stage = FileLocator::computed(|env| {
    ///     let stage = env.get("APP_ENV").map(String::as_str).unwrap_or("development");
    ///     vec![format!("config/{stage}.yaml"), "config/local.yaml".to_string()]
    /// });
    /// # let _ = by_stage;
    /// ```
    pub fn computed<F, R>(locate: F) -> Self
    where
        F: Fn(&EnvMap) -> R + Send + Sync + 'static,
        R: Into<Located>,
    {
        FileLocator::Computed(Arc::new(move |env: &EnvMap| -> Located {
            locate(env).into()
        }))
    }

    /// Evaluate the locator against `env`
    pub fn locate(&self, env: &EnvMap) -> Vec<PathBuf> {
        match self {
            FileLocator::Literal(path) => vec![path.clone()],
            FileLocator::Computed(locate) => locate(env).into_paths(),
        }
    }
}

impl fmt::Debug for FileLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileLocator::Literal(path) => f.debug_tuple("Literal").field(path).finish(),
            FileLocator::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<&str> for FileLocator {
    fn from(path: &str) -> Self {
        FileLocator::literal(path)
    }
}

impl From<String> for FileLocator {
    fn from(path: String) -> Self {
        FileLocator::literal(path)
    }
}

impl From<PathBuf> for FileLocator {
    fn from(path: PathBuf) -> Self {
        FileLocator::Literal(path)
    }
}

/// Expand locators into an ordered, de-duplicated path list
///
/// The first occurrence of a path wins; later duplicates are dropped.
/// Paths are compared as given, without canonicalization.
pub fn resolve_locators(locators: &[FileLocator], env: &EnvMap) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = Vec::new();

    for locator in locators {
        for path in locator.locate(env) {
            if paths.contains(&path) {
                tracing::trace!(path = %path.display(), "Skipping duplicate configuration path");
                continue;
            }
            paths.push(path);
        }
    }

    paths
}
