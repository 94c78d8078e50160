//! Scripted in-memory transport for tests.
//!
//! Routes are matched on method plus URL path (query string ignored). Each
//! route holds a queue of results; the last result repeats once the queue is
//! drained. Every call is recorded so tests can assert on call counts,
//! ordering, bodies, and the authorization header actually sent.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use secrecy::ExposeSecret;
use serde_json::Value;

use memlens_types::error::{TransportError, TransportErrorKind};
use memlens_types::transport::{HttpMethod, RawBody, VendorRequest, VendorResponse};

use super::VendorTransport;

/// A request as seen by the scripted transport.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: HttpMethod,
    pub url: String,
    pub path: String,
    pub authorization: String,
    pub body: Option<Value>,
}

type Scripted = Result<VendorResponse, TransportError>;

struct Route {
    method: HttpMethod,
    path: String,
    results: VecDeque<Scripted>,
}

#[derive(Default)]
struct Inner {
    routes: Vec<Route>,
    fail_all: Option<TransportError>,
    calls: Vec<RecordedCall>,
}

/// Cloneable handle: keep one clone for assertions, box the other.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    inner: Arc<Mutex<Inner>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails at the transport level.
    pub fn unreachable(kind: TransportErrorKind, host: &str) -> Self {
        let transport = Self::new();
        transport.lock().fail_all = Some(TransportError::new(kind, host, "scripted failure"));
        transport
    }

    /// Queue a JSON response with the given status for `method path`.
    pub fn respond(self, method: HttpMethod, path: &str, status: u16, body: Value) -> Self {
        self.push(method, path, Ok(response(status, RawBody::Json(body))))
    }

    /// Queue a raw-body response (text or empty) for `method path`.
    pub fn respond_raw(self, method: HttpMethod, path: &str, status: u16, body: RawBody) -> Self {
        self.push(method, path, Ok(response(status, body)))
    }

    /// Queue a transport failure for `method path`.
    pub fn fail(self, method: HttpMethod, path: &str, kind: TransportErrorKind) -> Self {
        let host = "scripted.invalid".to_string();
        self.push(method, path, Err(TransportError::new(kind, host, "scripted failure")))
    }

    fn push(self, method: HttpMethod, path: &str, result: Scripted) -> Self {
        {
            let mut inner = self.lock();
            match inner
                .routes
                .iter_mut()
                .find(|r| r.method == method && r.path == path)
            {
                Some(route) => route.results.push_back(result),
                None => inner.routes.push(Route {
                    method,
                    path: path.to_string(),
                    results: VecDeque::from([result]),
                }),
            }
        }
        self
    }

    /// All calls so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// Number of calls matching `method path`.
    pub fn count(&self, method: HttpMethod, path: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn next_result(&self, request: &VendorRequest) -> Scripted {
        let path = url_path(&request.url);
        let mut inner = self.lock();
        inner.calls.push(RecordedCall {
            method: request.method,
            url: request.url.clone(),
            path: path.clone(),
            authorization: request.authorization.expose_secret().to_string(),
            body: request.body.clone(),
        });

        if let Some(err) = &inner.fail_all {
            return Err(err.clone());
        }

        let Some(route) = inner
            .routes
            .iter_mut()
            .find(|r| r.method == request.method && r.path == path)
        else {
            return Ok(response(
                404,
                RawBody::Json(serde_json::json!({"message": "no scripted route"})),
            ));
        };

        if route.results.len() > 1 {
            route.results.pop_front().unwrap_or_else(|| Ok(response(500, RawBody::Empty)))
        } else {
            match route.results.front() {
                Some(Ok(resp)) => Ok(resp.clone()),
                Some(Err(err)) => Err(err.clone()),
                None => Ok(response(500, RawBody::Empty)),
            }
        }
    }
}

impl VendorTransport for ScriptedTransport {
    fn send(
        &self,
        request: VendorRequest,
    ) -> impl std::future::Future<Output = Result<VendorResponse, TransportError>> + Send {
        let result = self.next_result(&request);
        async move { result }
    }
}

fn response(status: u16, body: RawBody) -> VendorResponse {
    VendorResponse {
        status,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body,
    }
}

/// Path component of an absolute URL, without the query string.
fn url_path(url: &str) -> String {
    let after_scheme = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    let path = after_scheme
        .find('/')
        .map(|idx| &after_scheme[idx..])
        .unwrap_or("/");
    path.split('?').next().unwrap_or(path).to_string()
}
