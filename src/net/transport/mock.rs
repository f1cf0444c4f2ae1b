//! In-memory transport used by the test suite.

use super::{Transport, TransportResponse};
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Request, StatusCode};
use std::future::Future;
use std::sync::{Mutex, OnceLock};
use url::Url;

#[derive(Debug, thiserror::Error)]
#[error("mock transport failure")]
pub(crate) struct MockError;

/// Answers every request with the same canned response and records what was sent.
pub(crate) struct MockTransport {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    hang: bool,
    hang_body: bool,
    fail: bool,
    requests: Mutex<Vec<Request<Bytes>>>,
    base_url: OnceLock<Url>,
}

impl MockTransport {
    pub(crate) fn new(status: u16, body: &str) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: Bytes::copy_from_slice(body.as_bytes()),
            hang: false,
            hang_body: false,
            fail: false,
            requests: Mutex::new(Vec::new()),
            base_url: OnceLock::new(),
        }
    }

    pub(crate) fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers
            .insert(HeaderName::from_static(name), HeaderValue::from_static(value));
        self
    }

    /// Never completes the exchange.
    pub(crate) fn hanging(mut self) -> Self {
        self.hang = true;
        self
    }

    /// Completes the exchange but never finishes the body.
    pub(crate) fn hanging_body(mut self) -> Self {
        self.hang_body = true;
        self
    }

    /// Fails every exchange.
    pub(crate) fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Number of requests that reached the transport.
    pub(crate) fn sent(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Removes and returns the last recorded request.
    pub(crate) fn take_last_request(&self) -> Request<Bytes> {
        self.requests.lock().unwrap().pop().expect("no request was sent")
    }
}

pub(crate) struct MockResponse {
    url: Url,
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    hang_body: bool,
}

impl Transport for MockTransport {
    type Error = MockError;
    type Response = MockResponse;

    fn send(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<MockResponse, MockError>> + Send {
        let url = Url::parse(&request.uri().to_string()).unwrap();
        self.requests.lock().unwrap().push(request);

        let hang = self.hang;
        let result = if self.fail {
            Err(MockError)
        } else {
            Ok(MockResponse {
                url,
                status: self.status,
                headers: self.headers.clone(),
                body: self.body.clone(),
                hang_body: self.hang_body,
            })
        };

        async move {
            if hang {
                std::future::pending::<()>().await;
            }
            result
        }
    }

    fn base_url(&self) -> Option<Url> {
        self.base_url.get().cloned()
    }

    fn init_base_url(&self, url: &Url) {
        let _ = self.base_url.set(url.clone());
    }
}

impl TransportResponse for MockResponse {
    type Error = MockError;

    fn url(&self) -> &Url {
        &self.url
    }

    fn status(&self) -> StatusCode {
        self.status
    }

    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn into_body(self) -> impl Future<Output = Result<Bytes, MockError>> + Send {
        async move {
            if self.hang_body {
                std::future::pending::<()>().await;
            }
            Ok(self.body)
        }
    }
}
