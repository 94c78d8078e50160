//! Observability for memlens: subscriber setup and span attribute values.

pub mod attrs;
pub mod tracing_setup;
