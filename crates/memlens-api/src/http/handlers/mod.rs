//! HTTP request handlers for the proxy API.

pub mod compare;
pub mod mem0;
pub mod zep;

use axum::Json;
use tracing::Instrument;

use memlens_core::adapter;
use memlens_core::config::resolve_chat;
use memlens_observe::attrs;
use memlens_types::chat::{ChatRequest, VendorReply};
use memlens_types::vendor::Vendor;

use crate::http::error::AppError;
use crate::state::AppState;

/// Validate, resolve, and run one vendor chat call.
///
/// Validation happens before any transport call, so a rejected request never
/// reaches the vendor.
pub(crate) async fn proxy_chat(
    state: &AppState,
    vendor: Vendor,
    request: ChatRequest,
) -> Result<Json<VendorReply>, AppError> {
    let span = tracing::info_span!(
        attrs::SPAN_PROXY,
        operation = attrs::OP_CHAT,
        surface = attrs::SURFACE_HTTP,
        vendor = %vendor,
    );

    async move {
        let chat = resolve_chat(vendor, request, &state.config).map_err(AppError::vendor(vendor))?;
        let reply = adapter::send(&state.transport, &chat)
            .await
            .map_err(AppError::vendor(vendor))?;
        Ok::<_, AppError>(Json(reply))
    }
    .instrument(span)
    .await
}
