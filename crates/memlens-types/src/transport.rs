//! Wire-level request/response values exchanged with the transport seam.
//!
//! The transport sees fully built requests (absolute URL, authorization value,
//! optional JSON body) and hands back the status, headers, and body of
//! whatever the vendor answered. Interpreting statuses is the caller's job.

use std::fmt;

use secrecy::SecretString;
use serde_json::Value;

/// HTTP method used against a vendor API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
        }
    }
}

/// A fully built outbound request.
///
/// `authorization` is the complete `Authorization` header value
/// (e.g. `Bearer z_...`). It is a [`SecretString`], so `Debug` output redacts it.
#[derive(Debug)]
pub struct VendorRequest {
    pub method: HttpMethod,
    pub url: String,
    pub authorization: SecretString,
    pub body: Option<Value>,
}

/// Response as received from the vendor, any status.
#[derive(Debug, Clone)]
pub struct VendorResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: RawBody,
}

impl VendorResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A vendor body in whichever shape it arrived.
#[derive(Debug, Clone, PartialEq)]
pub enum RawBody {
    /// Parsed JSON (object, array, or a JSON-encoded string).
    Json(Value),
    /// Non-JSON text.
    Text(String),
    /// No body at all.
    Empty,
}

impl RawBody {
    /// Classify raw bytes: JSON if they parse, text otherwise, empty if blank.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return RawBody::Empty;
        }
        match serde_json::from_slice::<Value>(bytes) {
            Ok(value) => RawBody::Json(value),
            Err(_) => RawBody::Text(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    /// The body as plain text when it is text or a JSON-encoded string.
    ///
    /// Trimmed; `None` when blank.
    pub fn as_text(&self) -> Option<&str> {
        let text = match self {
            RawBody::Text(text) => text.as_str(),
            RawBody::Json(Value::String(text)) => text.as_str(),
            _ => return None,
        };
        let trimmed = text.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Look up a top-level field of a JSON object body.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            RawBody::Json(Value::Object(map)) => map.get(name).filter(|v| !v.is_null()),
            _ => None,
        }
    }

    /// The body as a JSON value for relaying to the browser.
    ///
    /// Text is trimmed; an empty body becomes `{}`.
    pub fn to_details(&self) -> Value {
        match self {
            RawBody::Json(Value::String(text)) => Value::String(text.trim().to_string()),
            RawBody::Json(value) => value.clone(),
            RawBody::Text(text) => Value::String(text.trim().to_string()),
            RawBody::Empty => Value::Object(Default::default()),
        }
    }

    /// The body as JSON for passing through unmodified.
    ///
    /// Text becomes a JSON string as received; an empty body is `null`.
    pub fn into_json(self) -> Value {
        match self {
            RawBody::Json(value) => value,
            RawBody::Text(text) => Value::String(text),
            RawBody::Empty => Value::Null,
        }
    }
}
