//! HTTP proxy layer for memlens.
//!
//! Axum routes under `/api/` that relay dashboard chat messages to Mem0 and
//! Zep, plus `/health` and optional static dashboard serving.

pub mod error;
pub mod handlers;
pub mod router;
