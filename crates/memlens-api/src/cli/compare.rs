//! `memlens compare` -- one message, both vendors.

use anyhow::{Result, bail};
use console::style;
use tracing::Instrument;

use memlens_core::compare::compare;
use memlens_core::config::resolve_chat;
use memlens_observe::attrs;
use memlens_types::chat::{BranchOutcome, CompareRequest, VendorCredentials};
use memlens_types::vendor::Vendor;

use crate::state::AppState;

/// Per-vendor credentials for a CLI comparison.
pub struct CompareArgs {
    pub message: String,
    pub session_id: Option<String>,
    pub mem0: VendorCredentials,
    pub zep: VendorCredentials,
}

/// Run both adapters concurrently and print both outcomes.
pub async fn run(state: &AppState, args: CompareArgs, json: bool) -> Result<()> {
    if args.message.trim().is_empty() {
        bail!("Message is required");
    }

    let request = CompareRequest {
        message: Some(args.message),
        session_id: args.session_id,
        mem0: args.mem0,
        zep: args.zep,
    };
    let (mem0, zep) = request.split();

    let span = tracing::info_span!(
        attrs::SPAN_PROXY,
        operation = attrs::OP_COMPARE,
        surface = attrs::SURFACE_CLI,
    );
    let result = compare(
        &state.transport,
        resolve_chat(Vendor::Mem0, mem0, &state.config),
        resolve_chat(Vendor::Zep, zep, &state.config),
    )
    .instrument(span)
    .await;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!();
    print_branch(Vendor::Mem0, &result.mem0);
    print_branch(Vendor::Zep, &result.zep);
    Ok(())
}

fn print_branch(vendor: Vendor, outcome: &BranchOutcome) {
    println!("  {}", style(format!("── {} ──", vendor.display_name())).dim());
    match (&outcome.response, &outcome.error) {
        (Some(response), _) => println!("  {response}"),
        (None, Some(error)) => {
            let status = outcome.status.map(|s| format!(" (HTTP {s})")).unwrap_or_default();
            println!("  {} {error}{}", style("✗").red(), style(status).dim());
        }
        (None, None) => println!("  {}", style("no response").dim()),
    }
    println!();
}
