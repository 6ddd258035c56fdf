//! Property bag <-> attribute value.
//!
//! The payload is JSON, percent-encoded so that only `[A-Za-z0-9-_.~%]`
//! remain. That alphabet needs no escaping inside single or double quoted
//! attributes, so an extra layer of attribute escaping leaves it unchanged.

use crate::PropertyBag;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;

/// Everything except `[A-Za-z0-9-_.~]` is escaped.
const PAYLOAD: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

fn percent_encode(text: &str) -> String {
    utf8_percent_encode(text, PAYLOAD).to_string()
}

/// Encode a property bag as a single attribute-safe string.
pub fn encode(values: &PropertyBag) -> String {
    // Serializing a string map cannot fail.
    let json = serde_json::to_string(values).unwrap_or_else(|_| "{}".to_string());
    percent_encode(&json)
}

/// Decode an attribute value produced by [`encode`].
///
/// Returns `None` for empty or malformed input. Numbers and booleans become
/// their decimal/`true`/`false` spelling and `null` becomes the empty string.
/// Nested arrays and objects are dropped.
pub fn decode(raw: &str) -> Option<PropertyBag> {
    if raw.is_empty() {
        return None;
    }
    let json = percent_decode_str(raw).decode_utf8().ok()?;
    let Value::Object(map) = serde_json::from_str::<Value>(&json).ok()? else {
        return None;
    };

    Some(
        map.into_iter()
            .filter_map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s,
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    Value::Null => String::new(),
                    Value::Array(_) | Value::Object(_) => return None,
                };
                Some((key, value))
            })
            .collect(),
    )
}
