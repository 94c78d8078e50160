//! Shared domain types for memlens.
//!
//! Transient values that flow through one proxy request: the inbound chat
//! request, the normalized vendor reply, the error taxonomy, resolved vendor
//! configuration, and the wire-level transport request/response shapes.
//!
//! Zero infrastructure dependencies -- only serde, thiserror, secrecy.

pub mod chat;
pub mod config;
pub mod error;
pub mod transport;
pub mod vendor;
