//! Server configuration and the per-call resolved vendor configuration.
//!
//! `ServerConfig` represents the optional `memlens.toml` plus environment
//! overrides. `VendorConfig` is the immutable record each adapter call works
//! from, resolved once at the request boundary.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::vendor::Vendor;

/// Authorization header scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    #[default]
    Bearer,
    Token,
}

impl AuthScheme {
    pub fn prefix(&self) -> &'static str {
        match self {
            AuthScheme::Bearer => "Bearer",
            AuthScheme::Token => "Token",
        }
    }
}

/// Top-level configuration for the proxy server.
///
/// All fields have defaults, so an empty or missing file is valid.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-request timeout for outbound vendor calls.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Directory holding the built dashboard; served only if it exists.
    #[serde(default = "default_web_dir")]
    pub web_dir: String,

    #[serde(default)]
    pub mem0: Mem0Settings,

    #[serde(default)]
    pub zep: ZepSettings,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_web_dir() -> String {
    "dist".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout_secs(),
            web_dir: default_web_dir(),
            mem0: Mem0Settings::default(),
            zep: ZepSettings::default(),
        }
    }
}

/// Mem0-specific server settings.
///
/// Mem0 credentials and URL always come from the caller; only the header
/// scheme is a server decision.
#[derive(Debug, Default, Deserialize)]
pub struct Mem0Settings {
    #[serde(default)]
    pub auth_scheme: AuthScheme,
}

/// Zep-specific server settings, used when the caller omits them.
#[derive(Debug, Default, Deserialize)]
pub struct ZepSettings {
    #[serde(default)]
    pub api_url: Option<String>,

    /// Never read from the config file; populated from `ZEP_API_KEY`.
    #[serde(skip)]
    pub api_key: Option<SecretString>,
}

/// Immutable per-call vendor configuration.
#[derive(Debug)]
pub struct VendorConfig {
    pub vendor: Vendor,
    pub base_url: String,
    pub api_key: SecretString,
    pub auth_scheme: AuthScheme,
}
