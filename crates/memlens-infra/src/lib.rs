//! Infrastructure layer for memlens.
//!
//! Concrete implementations of the seams defined in `memlens-core`:
//! the reqwest-backed vendor transport and the server configuration loader.

pub mod config;
pub mod transport;
