//! Server configuration loader for memlens.
//!
//! Reads an optional TOML file into [`ServerConfig`], falling back to
//! defaults when the file is missing or malformed, then overlays
//! environment variables. Dashboard-era `VITE_*` names are accepted as
//! aliases for the Zep settings.

use std::path::Path;

use secrecy::SecretString;

use memlens_types::config::ServerConfig;

/// Load configuration from `path` (if any) and the process environment.
pub async fn load_config(path: Option<&Path>) -> ServerConfig {
    let mut config = match path {
        Some(path) => load_file(path).await,
        None => ServerConfig::default(),
    };
    apply_env(&mut config, |name| std::env::var(name).ok());
    config
}

/// Parse `path`, returning defaults when it is missing or invalid.
pub async fn load_file(path: &Path) -> ServerConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return ServerConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return ServerConfig::default();
        }
    };

    match toml::from_str::<ServerConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            ServerConfig::default()
        }
    }
}

/// Overlay environment variables onto `config`.
///
/// `lookup` abstracts `std::env::var` so the overlay can be tested without
/// touching the process environment. Blank values are ignored.
pub fn apply_env(config: &mut ServerConfig, lookup: impl Fn(&str) -> Option<String>) {
    let var = |names: &[&str]| {
        names
            .iter()
            .filter_map(|name| lookup(name))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
    };

    if let Some(host) = var(&["HOST"]) {
        config.host = host;
    }
    if let Some(port) = var(&["PORT"]) {
        match port.parse() {
            Ok(port) => config.port = port,
            Err(_) => tracing::warn!("Ignoring invalid PORT value {port:?}"),
        }
    }
    if let Some(dir) = var(&["MEMLENS_WEB_DIR"]) {
        config.web_dir = dir;
    }
    if let Some(url) = var(&["ZEP_API_URL", "VITE_ZEP_API_URL"]) {
        config.zep.api_url = Some(url);
    }
    if let Some(key) = var(&["ZEP_API_KEY", "VITE_ZEP_API_KEY"]) {
        config.zep.api_key = Some(SecretString::from(key));
    }
}
