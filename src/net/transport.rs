//! Transport abstraction.
//!
//! A **transport** performs the actual byte-level HTTP exchange. The fetch layer hands it a fully
//! built `http::Request<Bytes>` and gets back something that implements [`TransportResponse`].
//! Connection pooling, TLS, DNS and socket-level retries are entirely the transport's business.
//!
//! The redirect behaviour requested by the caller travels in the request extensions as a
//! [`RedirectPolicy`]; transports should honor it when they can.
//!
//! This module exports one implementation:
//! - [`ReqwestTransport`]: backed by `reqwest`, used whenever the caller does not inject a
//!   transport of its own.
mod reqwest_client;

#[cfg(test)]
pub(crate) mod mock;

use bytes::Bytes;
use http::{HeaderMap, Request, StatusCode};
use std::future::Future;
use std::sync::Arc;
use url::Url;

pub use reqwest_client::ReqwestTransport;

/// Redirect handling requested for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedirectPolicy {
    /// Follow redirects automatically
    #[default]
    Follow,
    /// Hand redirect responses back to the caller as-is
    Manual,
}

impl RedirectPolicy {
    /// `"follow"` enables redirect following, anything else disables it.
    pub fn from_option(redirect: &str) -> Self {
        if redirect == "follow" {
            RedirectPolicy::Follow
        } else {
            RedirectPolicy::Manual
        }
    }
}

/// Asynchronous HTTP exchange capability.
///
/// Implementations must be `Send + Sync` so a single transport can serve concurrent calls.
pub trait Transport: Send + Sync {
    /// Error type for failed exchanges.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Response type handed back for a completed exchange.
    type Response: TransportResponse<Error = Self::Error> + Send;

    /// Sends `request` and resolves once the response head has been received.
    ///
    /// Dropping the returned future abandons the exchange; this is how cancellation is
    /// propagated.
    fn send(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send;

    /// Base URL used to resolve relative resources, if any.
    fn base_url(&self) -> Option<Url> {
        None
    }

    /// Sets the base URL, but only when none has been set before.
    fn init_base_url(&self, _url: &Url) {}
}

/// The parts of a native response the fetch layer needs.
pub trait TransportResponse {
    /// Error type when reading the body.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Final URL of the response (after redirects, if any).
    fn url(&self) -> &Url;

    /// HTTP status code.
    fn status(&self) -> StatusCode;

    /// Response headers.
    fn headers(&self) -> &HeaderMap;

    /// Consumes the response and reads the full body.
    fn into_body(self) -> impl Future<Output = Result<Bytes, Self::Error>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    type Error = T::Error;
    type Response = T::Response;

    fn send(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send {
        (**self).send(request)
    }

    fn base_url(&self) -> Option<Url> {
        (**self).base_url()
    }

    fn init_base_url(&self, url: &Url) {
        (**self).init_base_url(url)
    }
}
