//! `memlens check-key` -- validate a vendor API key.

use anyhow::{Result, bail};
use console::style;
use tracing::Instrument;

use memlens_core::config::{resolve_api_key, resolve_base_url};
use memlens_core::key_check::check_key;
use memlens_observe::attrs;
use memlens_types::config::{AuthScheme, VendorConfig};
use memlens_types::vendor::Vendor;

use crate::state::AppState;

/// Make one authenticated read and report whether the key works.
///
/// Prints the key length and a masked preview, never the key itself.
pub async fn check(
    state: &AppState,
    vendor: Vendor,
    api_key: Option<String>,
    api_url: Option<String>,
    json: bool,
) -> Result<()> {
    let api_key = resolve_api_key(vendor, api_key.as_deref(), &state.config)?;
    let config = VendorConfig {
        vendor,
        base_url: resolve_base_url(vendor, api_url.as_deref(), &state.config),
        api_key,
        auth_scheme: match vendor {
            Vendor::Mem0 => state.config.mem0.auth_scheme,
            Vendor::Zep => AuthScheme::Bearer,
        },
    };

    let span = tracing::info_span!(
        attrs::SPAN_PROXY,
        operation = attrs::OP_CHECK_KEY,
        surface = attrs::SURFACE_CLI,
        vendor = %vendor,
    );
    let result = check_key(&state.transport, &config).instrument(span).await;

    if json {
        let report = serde_json::json!({
            "vendor": vendor,
            "url": &result.url,
            "key": &result.fingerprint,
            "valid": result.is_valid(),
            "error": result.error.as_ref().map(|e| e.to_body()),
            "status": result.error.as_ref().map(|e| e.http_status),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!();
        println!(
            "  {} Checking {} API key",
            style("🔑").bold(),
            style(vendor.display_name()).cyan()
        );
        println!();
        println!("  URL:     {}", style(&result.url).dim());
        println!("  Length:  {}", result.fingerprint.length);
        println!("  Preview: {}", result.fingerprint.preview);
        if let Some(ok) = result.fingerprint.has_expected_prefix {
            let mark = if ok { style("✓").green() } else { style("✗").yellow() };
            println!("  {mark} Starts with \"z_\"");
        }
        println!();
        match &result.error {
            None => println!("  {} Key accepted", style("✓").green()),
            Some(err) => {
                println!("  {} {}", style("✗").red(), err.user_message);
                println!("  {}", style(format!("HTTP {}", err.http_status)).dim());
            }
        }
        println!();
    }

    if let Some(err) = result.error {
        bail!("{} key check failed (HTTP {})", vendor.display_name(), err.http_status);
    }
    Ok(())
}
