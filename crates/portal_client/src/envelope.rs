//! Response body decoding.
//!
//! Most endpoints wrap their payload as `{ success, message?, data? }`; list
//! endpoints may answer with the bare paginated object instead. Both shapes
//! are accepted:
//! - no `success` key: the whole body is the payload
//! - `success: false`: [`ClientError::Rejected`] with the server's message
//! - `success: true` with `data`: `data` is the payload
//! - `success: true` without `data`: the remaining object is the payload, so
//!   ids echoed next to `success` still decode

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::ClientError;

const DEFAULT_REJECTION: &str = "the server rejected the request";

pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ClientError> {
    let value: Value = serde_json::from_slice(body)?;
    decode_value(value)
}

pub fn decode_value<T: DeserializeOwned>(value: Value) -> Result<T, ClientError> {
    let Value::Object(mut map) = value else {
        return Ok(serde_json::from_value(value)?);
    };
    let Some(success) = map.remove("success") else {
        return Ok(serde_json::from_value(Value::Object(map))?);
    };
    let message = map.remove("message");
    if !success.as_bool().unwrap_or(false) {
        return Err(ClientError::Rejected(
            message_text(message).unwrap_or_else(|| DEFAULT_REJECTION.to_string()),
        ));
    }
    match map.remove("data") {
        Some(data) if !data.is_null() => Ok(serde_json::from_value(data)?),
        _ => Ok(serde_json::from_value(Value::Object(map))?),
    }
}

/// Acknowledgement-only endpoints: the server's message, or an empty string.
/// Only called for 2xx responses, so a body that is not JSON (`OK`) still
/// acknowledges.
pub fn acknowledge(body: &[u8]) -> Result<String, ClientError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(String::new());
    }
    let mut value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(err) => {
            debug!(%err, "non-JSON acknowledgement body");
            return Ok(String::new());
        }
    };
    let message = value
        .as_object_mut()
        .and_then(|m| m.get("message").cloned());
    decode_value::<Value>(value)?;
    Ok(message_text(message).unwrap_or_default())
}

/// Best-effort human message out of an error body.
pub fn error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let map = value.as_object()?;
    map.get("message")
        .or_else(|| map.get("error"))
        .or_else(|| map.get("detail"))
        .cloned()
        .and_then(|m| message_text(Some(m)))
}

fn message_text(message: Option<Value>) -> Option<String> {
    match message? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Null | Value::String(_) => None,
        other => Some(other.to_string()),
    }
}
