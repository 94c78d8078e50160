//! VendorTransport trait definition.
//!
//! The transport is the only place that touches the network. It sends a
//! fully built [`VendorRequest`] and returns the vendor's response whatever
//! its status; only failures below HTTP (DNS, refused, timeout) are errors.
//!
//! Implementations live in memlens-infra (`ReqwestTransport`); tests use
//! [`scripted::ScriptedTransport`].

pub mod box_transport;
#[cfg(any(test, feature = "test-util"))]
pub mod scripted;

use memlens_types::error::TransportError;
use memlens_types::transport::{VendorRequest, VendorResponse};

/// Trait for outbound HTTP backends.
///
/// Uses native async fn in traits (RPITIT). `BoxTransport` provides the
/// object-safe wrapper used by application state.
pub trait VendorTransport: Send + Sync {
    /// Send one request and return the vendor's response.
    fn send(
        &self,
        request: VendorRequest,
    ) -> impl std::future::Future<Output = Result<VendorResponse, TransportError>> + Send;
}
