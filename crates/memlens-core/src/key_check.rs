//! API key validation without sending a chat message.
//!
//! Makes one cheap authenticated read against the vendor and reports the
//! outcome alongside a masked fingerprint of the key. The full key is never
//! returned or logged.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use memlens_types::config::VendorConfig;
use memlens_types::error::{NormalizedError, ProxyError};
use memlens_types::vendor::Vendor;

use crate::client::{VendorClient, ZEP_KEY_PREFIX, strip_whitespace};
use crate::config::DEFAULT_MEM0_USER_ID;
use crate::normalize::normalize_error;
use crate::transport::box_transport::BoxTransport;

/// Safe-to-print description of an API key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyFingerprint {
    pub length: usize,
    pub preview: String,
    /// Zep only: whether the key carries the expected `z_` prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_expected_prefix: Option<bool>,
}

/// Fingerprint the key exactly as it would be sent.
pub fn fingerprint(vendor: Vendor, key: &SecretString) -> KeyFingerprint {
    let key = match vendor {
        Vendor::Mem0 => key.expose_secret().trim().to_string(),
        Vendor::Zep => strip_whitespace(key.expose_secret()),
    };
    let chars: Vec<char> = key.chars().collect();
    let preview = if chars.len() <= 8 {
        "****".to_string()
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}…{tail}")
    };
    KeyFingerprint {
        length: chars.len(),
        preview,
        has_expected_prefix: match vendor {
            Vendor::Zep => Some(key.starts_with(ZEP_KEY_PREFIX)),
            Vendor::Mem0 => None,
        },
    }
}

/// Outcome of a key check.
#[derive(Debug)]
pub struct KeyCheck {
    pub vendor: Vendor,
    pub url: String,
    pub fingerprint: KeyFingerprint,
    /// `None` when the key was accepted.
    pub error: Option<NormalizedError>,
}

impl KeyCheck {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

fn check_path(vendor: Vendor) -> String {
    match vendor {
        Vendor::Zep => "/api/v2/sessions?limit=1".to_string(),
        Vendor::Mem0 => format!("/v1/memories/?user_id={DEFAULT_MEM0_USER_ID}"),
    }
}

/// Issue one authenticated read and classify the result.
#[tracing::instrument(name = "check_key", skip_all, fields(vendor = %config.vendor))]
pub async fn check_key(transport: &BoxTransport, config: &VendorConfig) -> KeyCheck {
    let client = VendorClient::new(transport, config);
    let path = check_path(config.vendor);
    let result: Result<_, ProxyError> = client.get(&path).await;

    KeyCheck {
        vendor: config.vendor,
        url: client.url(&path),
        fingerprint: fingerprint(config.vendor, &config.api_key),
        error: result.err().map(|err| normalize_error(config.vendor, &err)),
    }
}
