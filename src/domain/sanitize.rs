use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    /// `javascript:` protocol, any casing.
    static ref JS_PROTOCOL: Regex = Regex::new(r"(?i)javascript:").unwrap();
    /// Inline handler attributes (`onclick=`, `onload=`, ...), any casing.
    static ref EVENT_HANDLER: Regex = Regex::new(r"(?i)on\w+=").unwrap();
}

/// Strips markup-significant characters and script-injection patterns from
/// `input`, then trims surrounding whitespace.
///
/// Pure and idempotent: re-sanitizing the output is a no-op.
pub fn sanitize_string(input: &str) -> String {
    let no_brackets: String = input.chars().filter(|c| *c != '<' && *c != '>').collect();
    let no_protocol = JS_PROTOCOL.replace_all(&no_brackets, "");
    let no_handlers = EVENT_HANDLER.replace_all(&no_protocol, "");
    no_handlers.trim().to_string()
}

/// Applies [`sanitize_string`] to every string reachable inside `value`.
///
/// Arrays are mapped element-wise; object keys and values are both cleaned
/// recursively; numbers, booleans and null pass through unchanged, so the
/// shape and the type of non-string leaves survive.
pub fn sanitize_value(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(sanitize_string(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_value).collect()),
        Value::Object(entries) => Value::Object(
            entries
                .into_iter()
                .map(|(key, value)| (sanitize_string(&key), sanitize_value(value)))
                .collect(),
        ),
        other => other,
    }
}
