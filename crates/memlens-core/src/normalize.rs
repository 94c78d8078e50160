//! Response normalizer.
//!
//! Reduces any vendor failure (error status with an object, string, or empty
//! body; transport failure; local validation/config failure) to a single
//! [`NormalizedError`]. Never fails itself.
//!
//! Logging policy: 400/401 and local validation errors are expected user
//! problems and are not logged as server errors. Everything else is logged
//! with status and body.

use serde_json::Value;

use memlens_types::error::{ErrorKind, NormalizedError, ProxyError, TransportError, TransportErrorKind};
use memlens_types::transport::RawBody;
use memlens_types::vendor::Vendor;

/// Classify a vendor error response.
///
/// `status` is `None` when the failure carried no HTTP status (e.g. a decode
/// error); `cause` is the underlying error message, used only as a fallback.
pub fn normalize(
    vendor: Vendor,
    status: Option<u16>,
    body: &RawBody,
    cause: Option<&str>,
) -> NormalizedError {
    let name = vendor.display_name();
    let details = body.to_details();

    match status {
        Some(401) => NormalizedError {
            http_status: 401,
            user_message: auth_message(vendor),
            kind: ErrorKind::AuthError,
            details,
            code: None,
        },
        Some(400) => NormalizedError {
            http_status: 400,
            user_message: body_message(body)
                .or_else(|| body_detail(body))
                .unwrap_or_else(|| format!("Invalid request to {name} API")),
            kind: ErrorKind::ValidationError,
            details,
            code: None,
        },
        other => {
            let user_message = body_message(body)
                .or_else(|| body_detail(body))
                .or_else(|| cause.map(str::trim).filter(|c| !c.is_empty()).map(String::from))
                .unwrap_or_else(|| format!("Failed to communicate with {name} AI"));

            tracing::error!(
                vendor = %vendor,
                status = ?other,
                body = %details,
                user_message = %user_message,
                "{name} proxy error"
            );

            NormalizedError {
                http_status: other.filter(|s| (400..600).contains(s)).unwrap_or(500),
                user_message,
                kind: if other.is_some() {
                    ErrorKind::VendorError
                } else {
                    ErrorKind::UnknownError
                },
                details,
                code: None,
            }
        }
    }
}

/// Classify a [`ProxyError`] raised anywhere along the adapter chain.
pub fn normalize_error(vendor: Vendor, error: &ProxyError) -> NormalizedError {
    match error {
        ProxyError::Validation(message) => NormalizedError {
            http_status: 400,
            user_message: message.clone(),
            kind: ErrorKind::ValidationError,
            details: Value::Null,
            code: None,
        },
        ProxyError::Config(message) => {
            tracing::error!(vendor = %vendor, error = %message, "proxy configuration error");
            NormalizedError {
                http_status: 500,
                user_message: message.clone(),
                kind: ErrorKind::UnknownError,
                details: Value::Null,
                code: Some("CONFIG_ERROR".to_string()),
            }
        }
        ProxyError::Transport(err) => normalize_transport(vendor, err),
        ProxyError::Http { status, body, .. } => normalize(vendor, Some(*status), body, None),
    }
}

/// Map a transport failure to a 503 that names the unreachable host.
pub fn normalize_transport(vendor: Vendor, err: &TransportError) -> NormalizedError {
    let name = vendor.display_name();
    let host = if err.host.is_empty() {
        vendor.default_host()
    } else {
        err.host.as_str()
    };

    if err.kind == TransportErrorKind::InvalidUrl {
        return NormalizedError {
            http_status: 400,
            user_message: format!("Invalid {name} API URL ({host}): {}", err.message),
            kind: ErrorKind::ValidationError,
            details: Value::String(err.message.clone()),
            code: Some(err.kind.code().to_string()),
        };
    }

    tracing::error!(
        vendor = %vendor,
        code = err.kind.code(),
        host = %host,
        error = %err.message,
        "{name} proxy network error"
    );

    let user_message = match err.kind {
        TransportErrorKind::Dns => format!(
            "Cannot reach {name} API ({host}). Please check your internet connection and API URL."
        ),
        _ => format!("Network error connecting to {name} API ({host}): {}", err.message),
    };

    NormalizedError {
        http_status: 503,
        user_message,
        kind: ErrorKind::NetworkError,
        details: Value::String(err.message.clone()),
        code: Some(err.kind.code().to_string()),
    }
}

/// Fixed message for rejected credentials.
pub fn auth_message(vendor: Vendor) -> String {
    format!(
        "{} API key is invalid or expired. Please check your API key in Settings.",
        vendor.display_name()
    )
}

/// `message` field of an object body, or the whole body if it is text.
fn body_message(body: &RawBody) -> Option<String> {
    if let Some(text) = body.as_text() {
        return Some(text.to_string());
    }
    body.field("message").and_then(stringify)
}

/// `detail` field of an object body, stringified when not a string.
fn body_detail(body: &RawBody) -> Option<String> {
    body.field("detail").and_then(stringify)
}

fn stringify(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}
