use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::transport::RawBody;

/// Why a vendor host could not be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Host name did not resolve.
    Dns,
    /// Host resolved but refused the connection.
    ConnectionRefused,
    /// Connect or read timed out.
    Timeout,
    /// The configured URL could not be turned into a request.
    InvalidUrl,
    /// Any other connection-level failure.
    Connection,
}

impl TransportErrorKind {
    /// Short machine-readable code relayed to the browser as `code`.
    pub fn code(&self) -> &'static str {
        match self {
            TransportErrorKind::Dns => "ENOTFOUND",
            TransportErrorKind::ConnectionRefused => "ECONNREFUSED",
            TransportErrorKind::Timeout => "ETIMEDOUT",
            TransportErrorKind::InvalidUrl => "EINVALIDURL",
            TransportErrorKind::Connection => "ECONNERROR",
        }
    }
}

/// A failure below HTTP: no status code is available.
#[derive(Debug, Clone, Error)]
#[error("cannot reach {host}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub host: String,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, host: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            host: host.into(),
            message: message.into(),
        }
    }
}

/// Errors raised while proxying a chat message to a vendor.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The caller's request is malformed; raised before any network call.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Server-side configuration is missing (e.g. no Zep key anywhere).
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The vendor answered with a status >= 400.
    #[error("HTTP {status} from {url}")]
    Http {
        status: u16,
        url: String,
        headers: Vec<(String, String)>,
        body: RawBody,
    },
}

impl ProxyError {
    /// HTTP status of a vendor error response, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProxyError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Stable error classification relayed to the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    ValidationError,
    AuthError,
    NetworkError,
    VendorError,
    UnknownError,
}

/// A failure reduced to what the browser needs: status, message, raw details.
///
/// Built once per failed call and serialized straight into the HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedError {
    pub http_status: u16,
    pub user_message: String,
    pub kind: ErrorKind,
    pub details: Value,
    pub code: Option<String>,
}

impl NormalizedError {
    /// The `{ error, details, code? }` response body.
    pub fn to_body(&self) -> Value {
        let mut body = json!({
            "error": self.user_message,
            "details": self.details,
        });
        if let Some(code) = &self.code {
            body["code"] = Value::String(code.clone());
        }
        body
    }
}
