//! Environment variable source
//!
//! Builds a nested plain-data tree out of flat variable names, see
//! [`KeyPath`] for the naming scheme. Leaf values are always strings;
//! type coercion happens later during construction.

use serde_json::{Map, Value};

use crate::config::EnvMap;
use crate::config::error::{ConfigError, NodeKind};
use crate::config::key_path::{KeyPath, PathSegment};

/// Turns the environment mapping into a plain-data tree
pub trait EnvParser: Send + Sync {
    fn parse(&self, env: &EnvMap) -> Result<Value, ConfigError>;
}

impl<F> EnvParser for F
where
    F: Fn(&EnvMap) -> Result<Value, ConfigError> + Send + Sync,
{
    fn parse(&self, env: &EnvMap) -> Result<Value, ConfigError> {
        self(env)
    }
}

/// Default env parser decoding `KEY__SUBKEY-0` style names
#[derive(Debug, Clone, Default)]
pub struct DefaultEnvParser {
    prefix: Option<String>,
}

impl DefaultEnvParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only consider variables starting with `prefix`, stripping it before decoding
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    fn strip<'a>(&self, name: &'a str) -> Option<&'a str> {
        let stripped = match &self.prefix {
            Some(prefix) => name.strip_prefix(prefix.as_str())?,
            None => name,
        };
        (!stripped.is_empty()).then_some(stripped)
    }
}

impl EnvParser for DefaultEnvParser {
    fn parse(&self, env: &EnvMap) -> Result<Value, ConfigError> {
        let mut root = Map::new();

        for (name, value) in env {
            let Some(stripped) = self.strip(name) else {
                continue;
            };
            let path = KeyPath::decode(stripped);
            insert(&mut root, name, &path, value)?;
        }

        tracing::trace!(keys = root.len(), "Built environment tree");
        Ok(Value::Object(root))
    }
}

/// Materialize one decoded variable into the tree
fn insert(
    root: &mut Map<String, Value>,
    variable: &str,
    path: &KeyPath,
    value: &str,
) -> Result<(), ConfigError> {
    let conflict = |expected, found: &Value| {
        ConfigError::path_conflict(variable, path, expected, NodeKind::of(found))
    };

    let Some((last, parents)) = path.segments().split_last() else {
        return Ok(());
    };

    let mut current = root;
    for segment in parents {
        let slot = match segment {
            PathSegment::Key(key) => current
                .entry(key.clone())
                .or_insert_with(|| Value::Object(Map::new())),
            PathSegment::Element { key, index } => {
                let items = array_at(current, key, variable, path)?;
                fill_to(items, *index);
                &mut items[*index]
            }
        };

        current = match slot {
            Value::Object(map) => map,
            other => return Err(conflict(NodeKind::Object, other)),
        };
    }

    let leaf = Value::String(value.to_string());
    match last {
        PathSegment::Key(key) => {
            if let Some(existing) = current.get(key)
                && !is_overwritable(existing)
            {
                return Err(conflict(NodeKind::Scalar, existing));
            }
            current.insert(key.clone(), leaf);
        }
        PathSegment::Element { key, index } => {
            let items = array_at(current, key, variable, path)?;
            fill_to(items, *index);
            if !is_overwritable(&items[*index]) {
                return Err(conflict(NodeKind::Scalar, &items[*index]));
            }
            items[*index] = leaf;
        }
    }

    Ok(())
}

/// Array stored under `key`, created when absent
fn array_at<'a>(
    map: &'a mut Map<String, Value>,
    key: &str,
    variable: &str,
    path: &KeyPath,
) -> Result<&'a mut Vec<Value>, ConfigError> {
    match map
        .entry(key.to_string())
        .or_insert_with(|| Value::Array(Vec::new()))
    {
        Value::Array(items) => Ok(items),
        other => Err(ConfigError::path_conflict(
            variable,
            path,
            NodeKind::Array,
            NodeKind::of(other),
        )),
    }
}

/// Grow with empty-object placeholders until `index` is addressable
fn fill_to(items: &mut Vec<Value>, index: usize) {
    while items.len() <= index {
        items.push(Value::Object(Map::new()));
    }
}

/// Scalars and gap placeholders may be replaced by a leaf value
fn is_overwritable(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::Array(_) => false,
        _ => true,
    }
}
