//! Typed construction of the merged tree
//!
//! Environment values arrive as strings, so by default the tree goes through
//! the `config` crate's value deserializer which parses numeric and boolean
//! strings on demand (`"443"` into a `u16`, `"true"` into a `bool`).

use ::config::{Map as TableMap, Value as TableValue, ValueKind};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::error::ConfigError;

/// Options passed to the construction step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformOptions {
    /// Coerce primitive values implicitly (numeric strings to numbers, ...)
    pub implicit_conversion: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            implicit_conversion: true,
        }
    }
}

/// Build a typed instance out of a plain-data tree
///
/// # Errors
///
/// Returns [`ConfigError::Construction`] when the tree does not fit `T`.
pub fn construct<T: DeserializeOwned>(
    tree: Value,
    options: &TransformOptions,
) -> Result<T, ConfigError> {
    if options.implicit_conversion {
        into_table_value(tree)
            .try_deserialize()
            .map_err(ConfigError::construction)
    } else {
        serde_json::from_value(tree).map_err(ConfigError::construction)
    }
}

fn into_table_value(value: Value) -> TableValue {
    let kind = match value {
        Value::Null => ValueKind::Nil,
        Value::Bool(b) => ValueKind::Boolean(b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                ValueKind::I64(i)
            } else if let Some(u) = n.as_u64() {
                ValueKind::U64(u)
            } else {
                ValueKind::Float(n.as_f64().unwrap_or_default())
            }
        }
        Value::String(s) => ValueKind::String(s),
        Value::Array(items) => ValueKind::Array(items.into_iter().map(into_table_value).collect()),
        Value::Object(map) => {
            let mut table = TableMap::new();
            for (key, value) in map {
                table.insert(key, into_table_value(value));
            }
            ValueKind::Table(table)
        }
    };
    TableValue::new(None, kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Server {
        host: String,
        port: u16,
        #[serde(default)]
        use_tls: bool,
        #[serde(default)]
        replicas: Vec<String>,
        ratio: Option<f64>,
    }

    #[test]
    fn test_implicit_conversion_coerces_strings() {
        let tree = json!({
            "host": "0.0.0.0",
            "port": "443",
            "useTls": "true",
            "replicas": ["a", "b"],
            "ratio": "0.25"
        });

        let server: Server = construct(tree, &TransformOptions::default()).unwrap();

        assert_eq!(
            server,
            Server {
                host: "0.0.0.0".to_string(),
                port: 443,
                use_tls: true,
                replicas: vec!["a".to_string(), "b".to_string()],
                ratio: Some(0.25),
            }
        );
    }

    #[test]
    fn test_native_types_pass_through() {
        let tree = json!({"host": "h", "port": 80, "useTls": false, "ratio": null});
        let server: Server = construct(tree, &TransformOptions::default()).unwrap();
        assert_eq!(server.port, 80);
        assert_eq!(server.ratio, None);
    }

    #[test]
    fn test_strict_construction_rejects_strings() {
        let options = TransformOptions {
            implicit_conversion: false,
        };
        let err = construct::<Server>(json!({"host": "h", "port": "80"}), &options).unwrap_err();
        assert!(matches!(err, ConfigError::Construction(_)));

        let server: Server = construct(json!({"host": "h", "port": 80}), &options).unwrap();
        assert_eq!(server.port, 80);
    }

    #[test]
    fn test_missing_required_field() {
        let err = construct::<Server>(json!({"port": 1}), &TransformOptions::default()).unwrap_err();
        assert!(err.to_string().contains("host"));
    }

    #[test]
    fn test_unparseable_number() {
        let err = construct::<Server>(json!({"host": "h", "port": "eighty"}), &TransformOptions::default());
        assert!(err.is_err());
    }
}
