//! Web-style HTTP response.
//!
//! A [`Response`] is built exactly once per fetch, after the native exchange completed and the
//! body was fully buffered. It is read-only afterwards; [`Response::clone`] gives an identical,
//! independent copy.
//!
//! ## Notes
//! - The body is kept as UTF-8 text. Invalid sequences in the payload are replaced with
//!   `U+FFFD` when the response is built.
//! - `headers` is an `http::HeaderMap`, which is **case-insensitive** for header names.
//! - `status_text` is the status code's canonical reason phrase and is `"Unknown"` for
//!   non-standard codes.
//!
use crate::errors::FetchError;
use crate::serializer::{JsonSerializer, Serializer};
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    url: Url,
    status: u16,
    status_text: String,
    ok: bool,
    body_used: bool,
    headers: HeaderMap,
    body: String,
}

impl Response {
    pub(crate) fn new(
        url: Url,
        status: StatusCode,
        headers: HeaderMap,
        body: String,
        body_used: bool,
    ) -> Self {
        Self {
            url,
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            ok: status.is_success(),
            body_used,
            headers,
            body,
        }
    }

    /// Final URL of the response (after redirects, if any).
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Numeric HTTP status code (e.g., `200`, `404`).
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Human-readable reason phrase (e.g., `"OK"`, `"Not Found"`).
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// True for a 2xx status.
    pub fn ok(&self) -> bool {
        self.ok
    }

    /// True when the request carried a non-empty body with a method other than GET or DELETE.
    pub fn body_used(&self) -> bool {
        self.body_used
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Body as text.
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Parses the body as JSON. Use `serde_json::Value` for an untyped object.
    ///
    /// Always uses [`JsonSerializer`], whatever serializer the fetch was made with.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        JsonSerializer.deserialize(&self.body)
    }

    /// Body as UTF-8 bytes.
    pub fn blob(&self) -> Bytes {
        Bytes::copy_from_slice(self.body.as_bytes())
    }

    /// Same as [`Response::blob`].
    pub fn array_buffer(&self) -> Bytes {
        self.blob()
    }
}
