//! Vendor HTTP client.
//!
//! Thin layer over [`BoxTransport`] that knows a vendor's base URL and
//! authorization convention, and turns HTTP statuses >= 400 into
//! [`ProxyError::Http`]. Transport failures pass through as
//! [`ProxyError::Transport`], so callers can always tell "vendor said no"
//! apart from "vendor unreachable".

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use memlens_types::config::{AuthScheme, VendorConfig};
use memlens_types::error::ProxyError;
use memlens_types::transport::{HttpMethod, VendorRequest, VendorResponse};
use memlens_types::vendor::Vendor;

use crate::transport::box_transport::BoxTransport;

/// Prefix every Zep Cloud project key starts with.
pub const ZEP_KEY_PREFIX: &str = "z_";

/// Authenticated client bound to one resolved [`VendorConfig`].
pub struct VendorClient<'a> {
    transport: &'a BoxTransport,
    config: &'a VendorConfig,
    authorization: SecretString,
}

impl<'a> VendorClient<'a> {
    pub fn new(transport: &'a BoxTransport, config: &'a VendorConfig) -> Self {
        let authorization = authorization_header(config);
        Self {
            transport,
            config,
            authorization,
        }
    }

    pub fn vendor(&self) -> Vendor {
        self.config.vendor
    }

    /// Build the full API URL for a given path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    pub async fn get(&self, path: &str) -> Result<VendorResponse, ProxyError> {
        self.call(HttpMethod::Get, path, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<VendorResponse, ProxyError> {
        self.call(HttpMethod::Post, path, Some(body)).await
    }

    async fn call(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<VendorResponse, ProxyError> {
        let url = self.url(path);
        tracing::debug!(vendor = %self.config.vendor, %method, %url, "vendor request");

        let request = VendorRequest {
            method,
            url: url.clone(),
            authorization: SecretString::from(self.authorization.expose_secret().to_string()),
            body,
        };

        let response = self.transport.send(request).await?;
        tracing::debug!(vendor = %self.config.vendor, status = response.status, %url, "vendor response");

        if response.status >= 400 {
            return Err(ProxyError::Http {
                status: response.status,
                url,
                headers: response.headers,
                body: response.body,
            });
        }
        Ok(response)
    }
}

/// Build the `Authorization` header value for a vendor.
///
/// - Mem0: `<scheme> <key>` with the key trimmed; scheme is configurable.
/// - Zep: always `Bearer <key>` with every whitespace character removed.
///   Keys without the `z_` prefix are sent anyway, with a warning.
pub fn authorization_header(config: &VendorConfig) -> SecretString {
    let raw = config.api_key.expose_secret();
    let value = match config.vendor {
        Vendor::Mem0 => format!("{} {}", config.auth_scheme.prefix(), raw.trim()),
        Vendor::Zep => {
            let key = strip_whitespace(raw);
            if !key.starts_with(ZEP_KEY_PREFIX) {
                tracing::warn!(
                    key_len = key.len(),
                    "Zep API key does not start with '{ZEP_KEY_PREFIX}'; sending it anyway"
                );
            }
            format!("{} {key}", AuthScheme::Bearer.prefix())
        }
    };
    SecretString::from(value)
}

/// Remove all whitespace, including characters inside the key.
pub fn strip_whitespace(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}
