//! Error bodies returned by the backend.

use serde_json::Value;

/// Keys the backend uses for a human-readable rejection message, in
/// priority order.
const MESSAGE_KEYS: [&str; 3] = ["error", "detail", "message"];

/// Extract the server-provided message from a rejection body.
///
/// Checks `error`, `detail` and `message` in that order. A field-keyed
/// validation object such as `{"contact": ["already registered"]}` yields
/// its first message. Returns `None` when the body carries nothing usable.
pub fn server_message(body: &Value) -> Option<String> {
    let map = match body {
        Value::String(s) if !s.trim().is_empty() => return Some(s.clone()),
        Value::Object(map) => map,
        _ => return None,
    };

    for key in MESSAGE_KEYS {
        if let Some(text) = map.get(key).and_then(first_text) {
            return Some(text);
        }
    }

    map.values().find_map(first_text)
}

fn first_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_text),
        _ => None,
    }
}
