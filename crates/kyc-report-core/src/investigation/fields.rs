//! Lenient accessors over untrusted JSON. Every helper returns `None` (or an
//! empty list) instead of failing when a field is missing or wrong-typed.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

/// Numeric field, accepting JSON numbers and numeric strings.
pub(crate) fn decimal(value: Option<&Value>) -> Option<Decimal> {
    match value? {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Non-blank string field, trimmed.
pub(crate) fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// String or number rendered as text (identifiers such as KvK numbers arrive
/// as either).
pub(crate) fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Number(n) => Some(n.to_string()),
        other => text(Some(other)),
    }
}

/// List of non-blank strings; non-string entries are dropped.
pub(crate) fn text_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(|v| text(Some(v))).collect(),
        _ => Vec::new(),
    }
}
