//! Typed lookups into a `serde_json::Value` params object.
//!
//! Each helper returns `default` when the key is missing or holds the wrong
//! JSON type. Range checks happen later, in
//! [`StarFieldParams::validate`](crate::config::StarFieldParams::validate).

use serde_json::Value;

/// Extracts an `f64` from `params[name]`. JSON integers are accepted.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts a `usize` from `params[name]`.
///
/// Negative and fractional numbers fall back to `default`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// Extracts a `String` from `params[name]`.
pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}
