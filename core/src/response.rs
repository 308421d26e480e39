//! Classification of a completed exchange.
//!
//! The checks run in a fixed order and the first one that matches decides
//! the error message: status, then body shape, then an embedded `error`
//! field. A non-200 response with an unparsable body therefore reports the
//! status failure.

use serde_json::Value;

use crate::error::{ClientError, ClientErrorKind};
use crate::http::{HttpRequest, HttpResponse};

pub(crate) const STATUS_MESSAGE: &str = "Invalid request. Check request and response details for further information";
pub(crate) const UNPARSABLE_MESSAGE: &str = "Unexpected response type: could not parse JSON.";

/// Decode the payload of `response`, or fail with full context.
pub(crate) fn process(request: &HttpRequest, response: &HttpResponse) -> Result<Value, ClientError> {
    let decoded = serde_json::from_str::<Value>(&response.body).ok();

    if response.status != 200 {
        let message = decoded
            .as_ref()
            .and_then(embedded_error)
            .unwrap_or_else(|| STATUS_MESSAGE.to_string());
        return Err(ClientError::from_exchange(ClientErrorKind::Status, message, request, response));
    }

    let payload = match decoded {
        Some(value @ (Value::Object(_) | Value::Array(_))) => value,
        _ => {
            return Err(ClientError::from_exchange(
                ClientErrorKind::Unparsable,
                UNPARSABLE_MESSAGE,
                request,
                response,
            ))
        }
    };

    if let Some(message) = embedded_error(&payload) {
        return Err(ClientError::from_exchange(
            ClientErrorKind::EmbeddedError,
            message,
            request,
            response,
        ));
    }

    Ok(payload)
}

/// The `error` field of a JSON object, if present and not null.
/// Strings are returned verbatim, other values as compact JSON.
fn embedded_error(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::Null => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}
