//! Proxy logic for memlens.
//!
//! This crate defines the transport seam (`VendorTransport`) that the
//! infrastructure layer implements, plus everything that sits on top of it:
//! the vendor HTTP client, response normalization, reply synthesis, and the
//! Mem0/Zep adapters. It depends only on `memlens-types` -- never on
//! `memlens-infra` or any HTTP library.

pub mod adapter;
pub mod client;
pub mod compare;
pub mod config;
pub mod key_check;
pub mod normalize;
pub mod outcome;
pub mod reply;
pub mod transport;
