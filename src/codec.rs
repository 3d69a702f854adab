//! Fragment Codec
//!
//! Converts between the fragment wire form (`key=value&flag&other=a%20b`) and
//! [`Attributes`]. Both directions are pure and infallible: anything the parser
//! does not understand is dropped or decoded lossily.

use crate::attributes::{AttrValue, Attributes};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Separates `key[=value]` pairs.
pub const PAIR_SEPARATOR: char = '&';

/// Separates a key from its encoded value.
pub const VALUE_SEPARATOR: char = '=';

/// Leading marker the platform reports on a non-empty fragment.
pub const FRAGMENT_MARKER: char = '#';

/// Characters left unescaped in values (same set as `encodeURIComponent`).
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Strip a single leading `#`, if present.
pub fn strip_marker(hash: &str) -> &str {
    hash.strip_prefix(FRAGMENT_MARKER).unwrap_or(hash)
}

/// Parse a fragment into attributes.
///
/// Pairs are split on the first `=`. A pair without `=` (or with an empty
/// value) maps to `None`. Segments with an empty key are skipped, and a
/// repeated key keeps its first position but takes the last value.
pub fn parse(hash: &str) -> Attributes {
    let mut attributes = Attributes::new();
    let body = strip_marker(hash);
    if body.is_empty() {
        return attributes;
    }

    for segment in body.split(PAIR_SEPARATOR) {
        let (key, value) = match segment.split_once(VALUE_SEPARATOR) {
            Some((key, raw)) => (key, decode_value(raw)),
            None => (segment, None),
        };
        if key.is_empty() {
            continue;
        }
        attributes.insert(key, value);
    }

    attributes
}

fn decode_value(raw: &str) -> AttrValue {
    if raw.is_empty() {
        return None;
    }
    Some(percent_decode_str(raw).decode_utf8_lossy().into_owned())
}

/// Percent-encode a single value.
pub fn encode_value(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Encode one pair. Null and empty values produce the bare key.
pub fn encode_pair(key: &str, value: Option<&str>) -> String {
    match value {
        Some(value) if !value.is_empty() => {
            format!("{}{}{}", key, VALUE_SEPARATOR, encode_value(value))
        }
        _ => key.to_string(),
    }
}

/// Encoded pairs in insertion order.
pub fn pairs(attributes: &Attributes) -> Vec<String> {
    attributes
        .iter()
        .map(|(key, value)| encode_pair(key, value.as_deref()))
        .collect()
}

/// Serialize attributes to the fragment wire form (without the leading `#`).
pub fn serialize(attributes: &Attributes) -> String {
    pairs(attributes).join("&")
}
