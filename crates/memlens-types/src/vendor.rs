use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A third-party memory service reachable through the proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    Mem0,
    Zep,
}

impl Vendor {
    /// Name used in user-facing messages ("Mem0 API key is invalid...").
    pub fn display_name(&self) -> &'static str {
        match self {
            Vendor::Mem0 => "Mem0",
            Vendor::Zep => "Zep",
        }
    }

    /// Hard-coded base URL used when neither the request nor the server
    /// configuration supplies one.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Vendor::Mem0 => "https://api.mem0.ai",
            Vendor::Zep => "https://api.getzep.com",
        }
    }

    /// Host shown in network error messages when the URL cannot be parsed.
    pub fn default_host(&self) -> &'static str {
        match self {
            Vendor::Mem0 => "api.mem0.ai",
            Vendor::Zep => "api.getzep.com",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vendor::Mem0 => write!(f, "mem0"),
            Vendor::Zep => write!(f, "zep"),
        }
    }
}

impl FromStr for Vendor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mem0" => Ok(Vendor::Mem0),
            "zep" => Ok(Vendor::Zep),
            other => Err(format!("invalid vendor: '{other}'")),
        }
    }
}
