//! Canonical JSON encoding for signed payloads.
//!
//! The signing payload must be reproducible byte-for-byte on the verifying
//! side, so request bodies are encoded with sorted keys and no whitespace
//! before signing. An absent or null body contributes the empty string.

use serde_json::{Map, Value};

/// Encode an optional request body into its canonical signing form.
pub fn canonical_json(body: Option<&Value>) -> String {
    match body {
        None | Some(Value::Null) => String::new(),
        Some(value) => sort_keys(value).to_string(),
    }
}

/// Rebuild a value with every object's keys in sorted order.
///
/// `serde_json`'s default map is ordered, but we sort explicitly so the
/// contract does not hinge on a feature flag.
fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut sorted: Vec<(&String, &Value)> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            let mut out = Map::new();
            for (key, val) in sorted {
                out.insert(key.clone(), sort_keys(val));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}
