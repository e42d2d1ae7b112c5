//! Deep merge of plain-data trees
//!
//! Objects merge key by key; everything else (arrays, scalars, null) in the
//! overlay replaces the base value entirely.

use serde_json::{Map, Value};

/// Deep merge two trees, with `overlay` taking precedence over `base`
///
/// # Example
/// ```
/// use serde_json::json;
/// use layered_config::config::deep_merge;
///
/// let base = json!({ "a": 1, "b": { "x": 1 }, "list": [1, 2] });
/// let overlay = json!({ "b": { "y": 2 }, "list": [3] });
/// assert_eq!(
///     deep_merge(base, overlay),
///     json!({ "a": 1, "b": { "x": 1, "y": 2 }, "list": [3] })
/// );
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Merge trees in order, later trees taking precedence
///
/// Starts from an empty object, so an empty input yields `{}`.
pub fn deep_merge_all(values: impl IntoIterator<Item = Value>) -> Value {
    values
        .into_iter()
        .fold(Value::Object(Map::new()), deep_merge)
}
