//! Chat request and reply payloads exchanged with the dashboard.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inbound chat request for a single vendor.
///
/// Every field is optional on the wire so that missing values reach the
/// validation step (and get a field-specific message) instead of failing
/// deserialization.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
}

impl fmt::Debug for ChatRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatRequest")
            .field("message", &self.message)
            .field("session_id", &self.session_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Normalized reply returned to the dashboard.
///
/// `text` is the human-readable reply; `raw` is the vendor payload it was
/// derived from, relayed unmodified for debugging.
#[derive(Debug, Clone, Serialize)]
pub struct VendorReply {
    #[serde(rename = "response")]
    pub text: String,
    #[serde(rename = "context")]
    pub raw: Value,
    pub memories: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Value>,
    pub message: String,
}

/// Per-vendor credentials inside a comparison request.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorCredentials {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
}

impl fmt::Debug for VendorCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VendorCredentials")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Send the same message to both vendors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub mem0: VendorCredentials,
    #[serde(default)]
    pub zep: VendorCredentials,
}

impl CompareRequest {
    /// Split into one [`ChatRequest`] per vendor.
    pub fn split(self) -> (ChatRequest, ChatRequest) {
        let mem0 = ChatRequest {
            message: self.message.clone(),
            session_id: self.session_id.clone(),
            api_key: self.mem0.api_key,
            api_url: self.mem0.api_url,
        };
        let zep = ChatRequest {
            message: self.message,
            session_id: self.session_id,
            api_key: self.zep.api_key,
            api_url: self.zep.api_url,
        };
        (mem0, zep)
    }
}

/// Result of one comparison branch. Exactly one of `response`/`error` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl BranchOutcome {
    pub fn success(response: String) -> Self {
        Self {
            response: Some(response),
            error: None,
            status: None,
        }
    }

    pub fn failure(error: String, status: u16) -> Self {
        Self {
            response: None,
            error: Some(error),
            status: Some(status),
        }
    }

    pub fn is_success(&self) -> bool {
        self.response.is_some()
    }
}

/// Both branches of a side-by-side comparison.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    pub mem0: BranchOutcome,
    pub zep: BranchOutcome,
}
