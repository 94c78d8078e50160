//! BoxTransport -- object-safe dynamic dispatch wrapper for VendorTransport.
//!
//! 1. Define an object-safe `VendorTransportDyn` trait with boxed futures
//! 2. Blanket-impl `VendorTransportDyn` for all `T: VendorTransport`
//! 3. `BoxTransport` wraps `Box<dyn VendorTransportDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use memlens_types::error::TransportError;
use memlens_types::transport::{VendorRequest, VendorResponse};

use super::VendorTransport;

/// Object-safe version of [`VendorTransport`] with boxed futures.
pub trait VendorTransportDyn: Send + Sync {
    fn send_boxed(
        &self,
        request: VendorRequest,
    ) -> Pin<Box<dyn Future<Output = Result<VendorResponse, TransportError>> + Send + '_>>;
}

impl<T: VendorTransport> VendorTransportDyn for T {
    fn send_boxed(
        &self,
        request: VendorRequest,
    ) -> Pin<Box<dyn Future<Output = Result<VendorResponse, TransportError>> + Send + '_>> {
        Box::pin(self.send(request))
    }
}

/// Type-erased transport selected at startup (reqwest in production, a
/// scripted mock in tests).
pub struct BoxTransport {
    inner: Box<dyn VendorTransportDyn + Send + Sync>,
}

impl BoxTransport {
    /// Wrap a concrete `VendorTransport` in a type-erased box.
    pub fn new<T: VendorTransport + 'static>(transport: T) -> Self {
        Self {
            inner: Box::new(transport),
        }
    }

    /// Send one request and return the vendor's response.
    pub async fn send(&self, request: VendorRequest) -> Result<VendorResponse, TransportError> {
        self.inner.send_boxed(request).await
    }
}
