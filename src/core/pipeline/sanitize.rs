//! Decoded value to flat record

use crate::domain::{FlatRecord, RecordError};
use serde_json::Value;
use std::path::Path;

/// Flattens a decoded document into a [`FlatRecord`]
///
/// The top level must be an object with non-empty keys. Scalars and arrays of
/// scalars are kept as they are; nested objects and arrays that contain
/// objects or arrays are stored as their JSON text. Key order is preserved.
///
/// # Errors
///
/// Returns [`RecordError::Sanitize`] for any other shape.
pub fn sanitize(path: &Path, value: Value) -> Result<FlatRecord, RecordError> {
    let map = match value {
        Value::Object(map) => map,
        other => {
            return Err(RecordError::sanitize(
                path,
                format!("expected an object at the top level, found {}", type_name(&other)),
            ))
        }
    };

    let mut record = FlatRecord::new();
    for (key, value) in map {
        if key.trim().is_empty() {
            return Err(RecordError::sanitize(path, "empty field name"));
        }
        record.insert(key, flatten_value(value));
    }
    Ok(record)
}

fn flatten_value(value: Value) -> Value {
    match value {
        Value::Object(_) => Value::String(value.to_string()),
        Value::Array(ref items) if items.iter().any(is_nested) => Value::String(value.to_string()),
        scalar_or_flat_array => scalar_or_flat_array,
    }
}

fn is_nested(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
