//! Environment variable name decoding
//!
//! A variable name is turned into a [`KeyPath`]:
//! - the name is lower-cased and split on `__` into segments
//! - inside a segment, `_x` becomes `X` (snake to camel)
//! - a segment ending in `-<digits>` addresses an array element
//!
//! `DATABASE__REPLICA_HOSTS-1__PORT` decodes to
//! `[database, (replicaHosts, 1), port]`.

use std::fmt;

/// Separator between nested keys in a variable name
pub const SEGMENT_SEPARATOR: &str = "__";

/// Marker between an array key and its element index
pub const INDEX_MARKER: char = '-';

/// Largest array index a variable name may address
///
/// Arrays are padded with placeholders up to the index, so larger indices
/// leave the token a plain key.
pub const MAX_ARRAY_INDEX: usize = 9_999;

/// One step of a decoded key path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Plain object key
    Key(String),
    /// Element `index` of the array stored under `key`
    Element { key: String, index: usize },
}

impl PathSegment {
    /// Classify one camel-cased token
    fn classify(token: String) -> Self {
        match token.rsplit_once(INDEX_MARKER) {
            Some((key, digits))
                if !key.is_empty()
                    && !digits.is_empty()
                    && digits.bytes().all(|b| b.is_ascii_digit()) =>
            {
                match digits.parse::<usize>() {
                    Ok(index) if index <= MAX_ARRAY_INDEX => PathSegment::Element {
                        key: key.to_string(),
                        index,
                    },
                    _ => PathSegment::Key(token),
                }
            }
            _ => PathSegment::Key(token),
        }
    }

    /// The object key this segment lives under
    pub fn key(&self) -> &str {
        match self {
            PathSegment::Key(key) => key,
            PathSegment::Element { key, .. } => key,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, PathSegment::Element { .. })
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Element { key, index } => write!(f, "{key}{INDEX_MARKER}{index}"),
        }
    }
}

/// Decoded sequence of nested keys and array indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    segments: Vec<PathSegment>,
}

impl KeyPath {
    /// Decode an environment variable name
    pub fn decode(name: &str) -> Self {
        let segments = name
            .to_lowercase()
            .split(SEGMENT_SEPARATOR)
            .map(camelize)
            .map(PathSegment::classify)
            .collect();

        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(SEGMENT_SEPARATOR)?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// Join `_x` sequences into `X`; an underscore not followed by a letter is kept
fn camelize(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut chars = segment.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' {
            if let Some(next) = chars.peek().copied().filter(char::is_ascii_alphabetic) {
                out.push(next.to_ascii_uppercase());
                chars.next();
                continue;
            }
        }
        out.push(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: &str) -> PathSegment {
        PathSegment::Key(k.to_string())
    }

    fn element(k: &str, index: usize) -> PathSegment {
        PathSegment::Element {
            key: k.to_string(),
            index,
        }
    }

    #[test]
    fn test_decode_nested_path_with_array() {
        let path = KeyPath::decode("A__B-0__C");
        assert_eq!(path.segments(), &[key("a"), element("b", 0), key("c")]);
    }

    #[test]
    fn test_decode_snake_to_camel() {
        assert_eq!(KeyPath::decode("foo_bar").segments(), &[key("fooBar")]);
        assert_eq!(
            KeyPath::decode("DATABASE__MAX_POOL_SIZE").segments(),
            &[key("database"), key("maxPoolSize")]
        );
    }

    #[test]
    fn test_underscore_before_non_letter_is_kept() {
        assert_eq!(KeyPath::decode("PORT_8080").segments(), &[key("port_8080")]);
        assert_eq!(KeyPath::decode("TRAILING_").segments(), &[key("trailing_")]);
    }

    #[test]
    fn test_triple_underscore() {
        // `a___b` splits into `a` and `_b`, the latter camelizes to `B`
        assert_eq!(KeyPath::decode("A___B").segments(), &[key("a"), key("B")]);
    }

    #[test]
    fn test_array_index_parsing() {
        assert_eq!(KeyPath::decode("HOSTS-12").segments(), &[element("hosts", 12)]);
        assert_eq!(
            KeyPath::decode("SERVER_LIST-3").segments(),
            &[element("serverList", 3)]
        );
    }

    #[test]
    fn test_segments_without_digits_are_keys() {
        assert_eq!(KeyPath::decode("FOO-").segments(), &[key("foo-")]);
        assert_eq!(KeyPath::decode("FOO-BAR").segments(), &[key("foo-bar")]);
        assert_eq!(KeyPath::decode("-3").segments(), &[key("-3")]);
        assert_eq!(KeyPath::decode("FOO-1A").segments(), &[key("foo-1a")]);
    }

    #[test]
    fn test_only_last_marker_is_the_index() {
        assert_eq!(
            KeyPath::decode("MY-LIST-2").segments(),
            &[element("my-list", 2)]
        );
    }

    #[test]
    fn test_oversized_index_is_a_key() {
        let name = "ITEMS-99999999999999999999999999";
        assert_eq!(
            KeyPath::decode(name).segments(),
            &[key("items-99999999999999999999999999")]
        );
    }

    #[test]
    fn test_index_above_limit_is_a_key() {
        assert_eq!(
            KeyPath::decode("HOSTS-9999").segments(),
            &[element("hosts", MAX_ARRAY_INDEX)]
        );
        assert_eq!(
            KeyPath::decode("HOSTS-10000").segments(),
            &[key("hosts-10000")]
        );
        assert_eq!(
            KeyPath::decode("HOSTS-18446744073709551615").segments(),
            &[key("hosts-18446744073709551615")]
        );
    }

    #[test]
    fn test_display_round_trips_decoded_form() {
        let path = KeyPath::decode("DB__HOSTS-1__NAME");
        assert_eq!(path.to_string(), "db__hosts-1__name");
        assert_eq!(path.len(), 3);
        assert!(path.segments()[1].is_element());
        assert_eq!(path.segments()[1].key(), "hosts");
    }
}
