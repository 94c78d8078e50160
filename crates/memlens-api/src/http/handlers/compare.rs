//! Side-by-side comparison endpoint.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use tracing::Instrument;

use memlens_core::compare::compare;
use memlens_core::config::resolve_chat;
use memlens_observe::attrs;
use memlens_types::chat::{CompareRequest, ComparisonResult};
use memlens_types::vendor::Vendor;

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /api/compare - Send one message to both vendors concurrently.
///
/// A blank message fails the whole request; anything else is reported per
/// branch with HTTP 200.
pub async fn compare_vendors(
    State(state): State<AppState>,
    payload: Result<Json<CompareRequest>, JsonRejection>,
) -> Result<Json<ComparisonResult>, AppError> {
    let Json(request) = payload?;
    if request.message.as_deref().is_none_or(|m| m.trim().is_empty()) {
        return Err(AppError::Validation("Message is required".to_string()));
    }

    let span = tracing::info_span!(
        attrs::SPAN_PROXY,
        operation = attrs::OP_COMPARE,
        surface = attrs::SURFACE_HTTP,
    );

    let (mem0, zep) = request.split();
    let result = compare(
        &state.transport,
        resolve_chat(Vendor::Mem0, mem0, &state.config),
        resolve_chat(Vendor::Zep, zep, &state.config),
    )
    .instrument(span)
    .await;

    Ok(Json(result))
}
