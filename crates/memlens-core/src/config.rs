//! Request-boundary resolution of vendor configuration.
//!
//! Turns an inbound [`ChatRequest`] plus the server defaults into a
//! validated [`ResolvedChat`]. Precedence for each value:
//!
//! 1. Explicit request value
//! 2. Server-side default (Zep only: `ZEP_API_KEY` / `ZEP_API_URL`)
//! 3. Hard-coded vendor default (URL only)
//!
//! Validation happens here, so nothing downstream ever sees a blank
//! message or key and no network call is made for a rejected request.

use secrecy::{ExposeSecret, SecretString};

use memlens_types::chat::ChatRequest;
use memlens_types::config::{AuthScheme, ServerConfig, VendorConfig};
use memlens_types::error::ProxyError;
use memlens_types::vendor::Vendor;

/// User identity Mem0 memories are filed under when the caller sends none.
pub const DEFAULT_MEM0_USER_ID: &str = "default-user";

/// A validated chat call, ready for an adapter.
#[derive(Debug)]
pub struct ResolvedChat {
    pub message: String,
    pub session_id: String,
    pub config: VendorConfig,
}

/// Validate `request` and resolve the configuration for `vendor`.
pub fn resolve_chat(
    vendor: Vendor,
    request: ChatRequest,
    server: &ServerConfig,
) -> Result<ResolvedChat, ProxyError> {
    let api_key = resolve_api_key(vendor, request.api_key.as_deref(), server)?;

    let message = non_blank(request.message.as_deref())
        .ok_or_else(|| ProxyError::Validation("Message is required".to_string()))?
        .to_string();

    let session_id = match non_blank(request.session_id.as_deref()) {
        Some(id) => id.to_string(),
        None => default_session_id(vendor),
    };

    let base_url = resolve_base_url(vendor, request.api_url.as_deref(), server);
    let auth_scheme = match vendor {
        Vendor::Mem0 => server.mem0.auth_scheme,
        Vendor::Zep => AuthScheme::Bearer,
    };

    Ok(ResolvedChat {
        message,
        session_id,
        config: VendorConfig {
            vendor,
            base_url,
            api_key,
            auth_scheme,
        },
    })
}

/// Resolve the API key, rejecting blank values.
///
/// A missing Mem0 key is the caller's fault (400). A missing Zep key is only
/// a configuration error (500) once the server default is also absent.
pub fn resolve_api_key(
    vendor: Vendor,
    request_key: Option<&str>,
    server: &ServerConfig,
) -> Result<SecretString, ProxyError> {
    if let Some(key) = non_blank(request_key) {
        return Ok(SecretString::from(key.to_string()));
    }

    match vendor {
        Vendor::Mem0 => Err(ProxyError::Validation(
            "Mem0 API key is required. Please add it in the Settings page.".to_string(),
        )),
        Vendor::Zep => server
            .zep
            .api_key
            .as_ref()
            .and_then(|key| non_blank(Some(key.expose_secret())))
            .map(|key| SecretString::from(key.to_string()))
            .ok_or_else(|| {
                ProxyError::Config(
                    "Zep API key is not configured. Add it in Settings or set ZEP_API_KEY on the server."
                        .to_string(),
                )
            }),
    }
}

/// Resolve the base URL: request, then server default (Zep), then vendor default.
pub fn resolve_base_url(vendor: Vendor, request_url: Option<&str>, server: &ServerConfig) -> String {
    let server_default = match vendor {
        Vendor::Mem0 => None,
        Vendor::Zep => server.zep.api_url.as_deref(),
    };

    non_blank(request_url)
        .or_else(|| non_blank(server_default))
        .unwrap_or(vendor.default_base_url())
        .trim_end_matches('/')
        .to_string()
}

/// Session identity used when the caller sends none.
///
/// Mem0 files everything under one default user; Zep gets a fresh
/// timestamped session per call.
pub fn default_session_id(vendor: Vendor) -> String {
    match vendor {
        Vendor::Mem0 => DEFAULT_MEM0_USER_ID.to_string(),
        Vendor::Zep => format!("session-{}", chrono::Utc::now().timestamp_millis()),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
