//! Response-shape normalization
//!
//! The backend is inconsistent about envelopes: list endpoints sometimes
//! return a bare JSON array and sometimes `{"data": [...]}`; object
//! endpoints likewise. Everything is normalized here, at the edge, so the
//! ambiguity never propagates inward. Lists fail closed to an empty
//! collection on unrecognized shapes; single objects fail with a decode
//! error because callers cannot proceed without them.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// Unwrap a possible `{"data": ...}` envelope
fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) => map.remove("data").unwrap_or(Value::Object(map)),
        other => other,
    }
}

/// Normalize a list response, failing closed to an empty vector
pub fn decode_list<T: DeserializeOwned>(value: Value, context: &str) -> Vec<T> {
    let inner = unwrap_envelope(value);
    match inner {
        Value::Array(_) => match serde_json::from_value::<Vec<T>>(inner) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Malformed {} list element, returning empty: {}", context, e);
                Vec::new()
            }
        },
        other => {
            tracing::warn!(
                "Unexpected {} response shape ({}), returning empty",
                context,
                shape_name(&other)
            );
            Vec::new()
        }
    }
}

/// Normalize a single-object response
pub fn decode_object<T: DeserializeOwned>(value: Value, context: &str) -> AppResult<T> {
    let inner = unwrap_envelope(value);
    serde_json::from_value(inner)
        .map_err(|e| AppError::Decode(format!("{}: {}", context, e)))
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
