//! Application state shared by the HTTP handlers and CLI commands.

use std::sync::Arc;
use std::time::Duration;

use memlens_core::transport::box_transport::BoxTransport;
use memlens_infra::transport::http::ReqwestTransport;
use memlens_types::config::ServerConfig;

/// Shared application state.
///
/// Holds no per-caller credentials: every request resolves its own
/// `VendorConfig` from its body plus `config`.
#[derive(Clone)]
pub struct AppState {
    pub transport: Arc<BoxTransport>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Wire the reqwest transport with the configured timeout.
    pub fn init(config: ServerConfig) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let transport = ReqwestTransport::new(timeout)?;
        Ok(Self::new(BoxTransport::new(transport), config))
    }

    pub fn new(transport: BoxTransport, config: ServerConfig) -> Self {
        Self {
            transport: Arc::new(transport),
            config: Arc::new(config),
        }
    }
}
