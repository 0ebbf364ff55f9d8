//! Request validation for the SVG endpoint.
//!
//! Runs before any browser resource is touched, so malformed requests never
//! cost a browser context.

use axum::http::Method;
use serde_json::Value;

use crate::error::ApiError;
use crate::models::{ProcessName, ProcessRequest};

/// JSON field naming the process to render.
pub const PROCESS_NAME_FIELD: &str = "processName";

/// Validate method and raw body of an incoming render request.
pub fn validate_request(method: &Method, body: &[u8]) -> Result<ProcessRequest, ApiError> {
    if *method != Method::POST {
        return Err(ApiError::MethodNotAllowed);
    }

    // No body at all is treated like an empty object
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::MissingField(PROCESS_NAME_FIELD));
    }

    let value: Value = serde_json::from_slice(body).map_err(|_| ApiError::InvalidBody)?;
    validate_payload(value)
}

/// Validate an already-parsed JSON payload.
///
/// A body that is not an object (`null`, arrays, scalars) carries no
/// `processName` and is reported as missing it.
pub fn validate_payload(value: Value) -> Result<ProcessRequest, ApiError> {
    let Value::Object(payload) = value else {
        return Err(ApiError::MissingField(PROCESS_NAME_FIELD));
    };

    let process = match payload.get(PROCESS_NAME_FIELD) {
        None => return Err(ApiError::MissingField(PROCESS_NAME_FIELD)),
        Some(value) if is_blank(value) => {
            return Err(ApiError::MissingField(PROCESS_NAME_FIELD))
        }
        Some(Value::String(s)) => s
            .parse::<ProcessName>()
            .map_err(|e| ApiError::InvalidProcessName(e.0))?,
        // Remaining numbers, `true` and nested values are reported as their JSON text
        Some(other) => return Err(ApiError::InvalidProcessName(other.to_string())),
    };

    Ok(ProcessRequest::new(process, payload))
}

/// Values that count as "no process name given": `null`, `false`, `0` and `""`.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
