use super::{RedirectPolicy, Transport, TransportResponse};
use crate::config::FetchConfig;
use bytes::Bytes;
use http::{HeaderMap, Request, StatusCode};
use reqwest::redirect::Policy;
use std::sync::OnceLock;
use url::Url;

/// Production transport backed by `reqwest`.
///
/// `reqwest` fixes the redirect policy per client, so two clients are kept: one that follows
/// redirects and one that does not. Both are cheap handles onto their own connection pool and
/// are shared by every request sent through this transport.
#[derive(Debug)]
pub struct ReqwestTransport {
    follow: reqwest::Client,
    manual: reqwest::Client,
    base_url: OnceLock<Url>,
}

impl ReqwestTransport {
    /// Creates a transport with the default configuration.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_config(&FetchConfig::default())
    }

    /// Creates a transport from `config`.
    pub fn with_config(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        let follow = client_builder(config)
            .redirect(Policy::limited(config.max_redirects))
            .build()?;
        let manual = client_builder(config).redirect(Policy::none()).build()?;

        let base_url = OnceLock::new();
        if let Some(url) = &config.base_url {
            let _ = base_url.set(url.clone());
        }

        Ok(Self { follow, manual, base_url })
    }
}

fn client_builder(config: &FetchConfig) -> reqwest::ClientBuilder {
    let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    if config.no_proxy {
        builder = builder.no_proxy();
    }
    builder
}

impl Transport for ReqwestTransport {
    type Error = reqwest::Error;
    type Response = reqwest::Response;

    async fn send(&self, request: Request<Bytes>) -> Result<reqwest::Response, reqwest::Error> {
        let policy = request
            .extensions()
            .get::<RedirectPolicy>()
            .copied()
            .unwrap_or_default();
        let client = match policy {
            RedirectPolicy::Follow => &self.follow,
            RedirectPolicy::Manual => &self.manual,
        };

        let request = reqwest::Request::try_from(request)?;
        client.execute(request).await
    }

    fn base_url(&self) -> Option<Url> {
        self.base_url.get().cloned()
    }

    fn init_base_url(&self, url: &Url) {
        let _ = self.base_url.set(url.clone());
    }
}

impl TransportResponse for reqwest::Response {
    type Error = reqwest::Error;

    fn url(&self) -> &Url {
        reqwest::Response::url(self)
    }

    fn status(&self) -> StatusCode {
        reqwest::Response::status(self)
    }

    fn headers(&self) -> &HeaderMap {
        reqwest::Response::headers(self)
    }

    async fn into_body(self) -> Result<Bytes, reqwest::Error> {
        self.bytes().await
    }
}
