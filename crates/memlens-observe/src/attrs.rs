//! Span names and attribute values shared by the HTTP and CLI surfaces.
//!
//! Usable as `tracing` span names and field values so request spans read the
//! same whether a call came in over HTTP or from the command line.

// --- Span names ---

/// Root span of a proxied vendor call.
pub const SPAN_PROXY: &str = "memlens.proxy";

// --- Operation values (`operation` field) ---

/// Single-vendor chat message.
pub const OP_CHAT: &str = "chat";

/// Same message sent to both vendors.
pub const OP_COMPARE: &str = "compare";

/// Key validation without a chat message.
pub const OP_CHECK_KEY: &str = "check_key";

// --- Surface values (`surface` field) ---

pub const SURFACE_HTTP: &str = "http";
pub const SURFACE_CLI: &str = "cli";
