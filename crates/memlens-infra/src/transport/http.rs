//! ReqwestTransport -- concrete [`VendorTransport`] over `reqwest`.
//!
//! One client is shared by every request. It carries no default headers and
//! no cookie store: the authorization value travels with each
//! [`VendorRequest`], so nothing leaks between callers.
//!
//! Connection-level failures are classified into [`TransportErrorKind`] so the
//! normalizer can name the unreachable host.

use std::error::Error as StdError;
use std::future::Future;
use std::time::Duration;

use secrecy::ExposeSecret;

use memlens_core::transport::VendorTransport;
use memlens_types::error::{TransportError, TransportErrorKind};
use memlens_types::transport::{HttpMethod, RawBody, VendorRequest, VendorResponse};

/// Default timeout for a single vendor call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// reqwest-backed vendor transport.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::new(TransportErrorKind::Connection, "", e.to_string()))?;
        Ok(Self { client })
    }

    async fn execute(&self, request: VendorRequest) -> Result<VendorResponse, TransportError> {
        let host = host_of(&request.url);

        let builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };
        let builder = builder.header(
            reqwest::header::AUTHORIZATION,
            request.authorization.expose_secret(),
        );
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| classify(&e, &host))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let bytes = response.bytes().await.map_err(|e| classify(&e, &host))?;

        Ok(VendorResponse {
            status,
            headers,
            body: RawBody::from_bytes(&bytes),
        })
    }
}

impl VendorTransport for ReqwestTransport {
    fn send(
        &self,
        request: VendorRequest,
    ) -> impl Future<Output = Result<VendorResponse, TransportError>> + Send {
        self.execute(request)
    }
}

/// Host portion of `url`, or empty if it does not parse.
fn host_of(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(String::from))
        .unwrap_or_default()
}

/// Map a reqwest failure to a [`TransportError`].
fn classify(err: &reqwest::Error, host: &str) -> TransportError {
    let chain = error_chain(err);
    let kind = if err.is_builder() {
        TransportErrorKind::InvalidUrl
    } else if err.is_timeout() {
        TransportErrorKind::Timeout
    } else if err.is_connect() {
        classify_connect(&chain)
    } else {
        TransportErrorKind::Connection
    };
    let host = if host.is_empty() {
        err.url()
            .and_then(|u| u.host_str())
            .unwrap_or_default()
            .to_string()
    } else {
        host.to_string()
    };
    TransportError::new(kind, host, chain)
}

/// Tell DNS and refused connections apart from the error text.
fn classify_connect(chain: &str) -> TransportErrorKind {
    const DNS_MARKERS: &[&str] = &[
        "dns error",
        "failed to lookup address",
        "name or service not known",
        "no such host",
        "nodename nor servname",
    ];
    let lower = chain.to_lowercase();
    if DNS_MARKERS.iter().any(|m| lower.contains(m)) {
        TransportErrorKind::Dns
    } else if lower.contains("connection refused") {
        TransportErrorKind::ConnectionRefused
    } else {
        TransportErrorKind::Connection
    }
}

/// The error and all its sources, joined with ": ".
fn error_chain(err: &reqwest::Error) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if parts.last() != Some(&text) {
            parts.push(text);
        }
        source = inner.source();
    }
    parts.join(": ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn get(url: &str) -> VendorRequest {
        VendorRequest {
            method: HttpMethod::Get,
            url: url.to_string(),
            authorization: SecretString::from("Bearer z_test".to_string()),
            body: None,
        }
    }

    #[test]
    fn test_classify_connect_messages() {
        assert_eq!(
            classify_connect("error sending request: dns error: failed to lookup address information"),
            TransportErrorKind::Dns
        );
        assert_eq!(
            classify_connect("client error (Connect): Name or service not known"),
            TransportErrorKind::Dns
        );
        assert_eq!(
            classify_connect("tcp connect error: Connection refused (os error 111)"),
            TransportErrorKind::ConnectionRefused
        );
        assert_eq!(
            classify_connect("tls handshake eof"),
            TransportErrorKind::Connection
        );
    }

    #[test]
    fn test_host_of() {
        assert_eq!(host_of("https://api.getzep.com/api/v2/sessions"), "api.getzep.com");
        assert_eq!(host_of("http://localhost:8000/x"), "localhost");
        assert_eq!(host_of("not a url"), "");
    }

    #[tokio::test]
    async fn test_invalid_url_is_classified() {
        let transport = ReqwestTransport::new(DEFAULT_TIMEOUT).unwrap();
        let err = transport.send(get("not a url/api/v2/sessions")).await.unwrap_err();
        assert_eq!(err.kind, TransportErrorKind::InvalidUrl);
    }

    #[tokio::test]
    async fn test_refused_connection_names_host() {
        // Port 1 on loopback has no listener.
        let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
        let err = transport.send(get("http://127.0.0.1:1/v1/memories/")).await.unwrap_err();
        assert_eq!(err.host, "127.0.0.1");
        assert!(matches!(
            err.kind,
            TransportErrorKind::ConnectionRefused | TransportErrorKind::Connection
        ));
    }
}
