//! Application error type mapping to HTTP status codes and the
//! `{ error, details, code? }` body the dashboard expects.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use memlens_core::normalize::normalize_error;
use memlens_types::error::ProxyError;
use memlens_types::vendor::Vendor;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Anything raised while resolving or proxying a vendor call.
    Vendor { vendor: Vendor, error: ProxyError },
    /// Request body could not be read as JSON.
    Validation(String),
}

impl AppError {
    pub fn vendor(vendor: Vendor) -> impl FnOnce(ProxyError) -> Self {
        move |error| AppError::Vendor { vendor, error }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Vendor { vendor, error } => {
                let normalized = normalize_error(*vendor, error);
                (normalized.http_status, normalized.to_body())
            }
            AppError::Validation(message) => (
                400,
                json!({
                    "error": message,
                    "details": Value::Null,
                }),
            ),
        };

        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(body)).into_response()
    }
}
