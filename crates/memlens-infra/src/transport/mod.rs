//! Vendor transport implementations.

pub mod http;
