//! Zep proxy endpoint.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use memlens_types::chat::{ChatRequest, VendorReply};
use memlens_types::vendor::Vendor;

use super::proxy_chat;
use crate::http::error::AppError;
use crate::state::AppState;

/// POST /api/zep/messages - Append a message to a Zep session and reply from
/// its memory. `apiKey` and `apiUrl` fall back to the server defaults.
pub async fn send_message(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<VendorReply>, AppError> {
    let Json(request) = payload?;
    proxy_chat(&state, Vendor::Zep, request).await
}
