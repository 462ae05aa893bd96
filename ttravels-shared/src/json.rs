//! Lenient accessors over backend documents.
//!
//! Backend documents are heterogeneous: the same concept lives under different
//! keys depending on which service wrote the record, and nested objects are
//! sometimes stored as JSON-encoded strings. Paths use JSON pointer syntax
//! (`/details/destination`).

use serde_json::{Map, Value};

/// Reads a field that may hold an object or a JSON string encoding one.
/// Anything else, including malformed JSON, yields an empty object.
pub fn embedded_object(value: Option<&Value>) -> Map<String, Value> {
    match value {
        Some(Value::Object(map)) => map.clone(),
        Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        },
        _ => Map::new(),
    }
}

/// Same as [`embedded_object`] but wrapped back into a `Value` so pointers work on it.
pub fn embedded(value: Option<&Value>) -> Value {
    Value::Object(embedded_object(value))
}

/// Text form of a truthy scalar. Empty strings, zero, null and containers are absent.
pub fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// First truthy text among `pointers`.
pub fn first_text(doc: &Value, pointers: &[&str]) -> Option<String> {
    pointers.iter().find_map(|p| text(doc.pointer(p)))
}

/// Numeric value of a number or numeric string. Zero counts as absent.
pub fn number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok()?,
        _ => return None,
    };
    (n != 0.0 && n.is_finite()).then_some(n)
}

pub fn first_number(doc: &Value, pointers: &[&str]) -> Option<f64> {
    pointers.iter().find_map(|p| number(doc.pointer(p)))
}

/// Array at `pointer`, or an empty slice when the field is missing or not an array.
pub fn array<'a>(doc: &'a Value, pointer: &str) -> &'a [Value] {
    doc.pointer(pointer)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Strings of an array field, skipping non-string entries.
pub fn strings(doc: &Value, pointer: &str) -> Vec<String> {
    array(doc, pointer)
        .iter()
        .filter_map(|v| text(Some(v)))
        .collect()
}
