//! The fetch orchestrator.
//!
//! A fetch call runs strictly in order: normalize the options, translate them into a native
//! request, send it, buffer and normalize the response, apply the CORS heuristic and return.
//! There are no retries and no partial results. The only suspension points are the exchange
//! itself and the body read, and both race the caller's [`CancellationToken`].
//!
//! Three entry points share that pipeline:
//! - [`fetch`], [`fetch_as`]: use a process-wide default transport and the global strict-CORS
//!   switch.
//! - [`fetch_with`]: borrows a caller-supplied transport for the duration of the call.
//! - [`Fetcher`]: owns a transport and a serializer, and carries its own strict-CORS flag.

use crate::config::{self, FetchConfig};
use crate::errors::FetchError;
use crate::net::cors;
use crate::net::options::{normalize, RequestOptions};
use crate::net::request::build_request;
use crate::net::response::Response;
use crate::net::transport::{ReqwestTransport, Transport, TransportResponse};
use crate::serializer::{JsonSerializer, Serializer};
use http::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;
use url::Url;
use uuid::Uuid;

/// Shared transport for calls that do not inject their own. Created on first use, never replaced.
static DEFAULT_TRANSPORT: OnceCell<ReqwestTransport> = OnceCell::const_new();

/// Identifier of a single fetch call, used to correlate log lines.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FetchId(Uuid);

impl FetchId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FetchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FetchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

async fn default_transport() -> Result<&'static ReqwestTransport, FetchError> {
    DEFAULT_TRANSPORT
        .get_or_try_init(|| async { ReqwestTransport::new().map_err(FetchError::transport) })
        .await
}

/// Fetches `resource` through the shared default transport.
///
/// `options` is the web-style options bag (see [`normalize`]). Pass a fresh
/// `CancellationToken::new()` when the call never needs to be canceled.
pub async fn fetch(
    resource: &str,
    options: Option<&Value>,
    cancel: CancellationToken,
) -> Result<Response, FetchError> {
    let opts = normalize(options);
    let transport = default_transport().await?;
    let url = resolve_resource(transport, resource, false)?;
    execute(transport, &JsonSerializer, url, &opts, &cancel, config::strict_cors()).await
}

/// Fetches `resource` through a caller-supplied transport.
///
/// The transport is only borrowed. Its base URL is set to `resource` when it has none yet, so
/// later calls may pass relative resources.
pub async fn fetch_with<T: Transport>(
    resource: &str,
    options: Option<&Value>,
    cancel: CancellationToken,
    transport: &T,
) -> Result<Response, FetchError> {
    let opts = normalize(options);
    let url = resolve_resource(transport, resource, true)?;
    execute(transport, &JsonSerializer, url, &opts, &cancel, config::strict_cors()).await
}

/// Fetches `resource` and deserializes the body as `D`.
pub async fn fetch_as<D: DeserializeOwned>(
    resource: &str,
    options: Option<&Value>,
    cancel: CancellationToken,
) -> Result<D, FetchError> {
    let response = fetch(resource, options, cancel).await?;
    JsonSerializer.deserialize(response.body())
}

/// Fetch provider owning its transport and serializer.
///
/// ```rust,no_run
/// use webfetch::Fetcher;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn run() -> Result<(), webfetch::FetchError> {
/// let fetcher = Fetcher::new()?.strict_cors(true);
/// let resp = fetcher
///     .fetch("https://jsonplaceholder.typicode.com/todos/1", None, CancellationToken::new())
///     .await?;
/// assert!(resp.ok());
/// # Ok(()) }
/// ```
pub struct Fetcher<T = ReqwestTransport, S = JsonSerializer> {
    transport: T,
    serializer: S,
    strict_cors: bool,
}

impl Fetcher {
    /// Creates a fetcher with a default `reqwest` transport.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(&FetchConfig::default())
    }

    /// Creates a fetcher with a `reqwest` transport built from `config`.
    pub fn with_config(config: &FetchConfig) -> Result<Self, FetchError> {
        let transport = ReqwestTransport::with_config(config).map_err(FetchError::transport)?;
        Ok(Self::with_transport(transport))
    }
}

impl<T: Transport> Fetcher<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            serializer: JsonSerializer,
            strict_cors: false,
        }
    }
}

impl<T: Transport, S: Serializer> Fetcher<T, S> {
    /// Replaces the serializer used to parse request headers and for [`Fetcher::fetch_as`].
    ///
    /// [`Response::json`] is not affected and always parses JSON.
    pub fn serializer<S2: Serializer>(self, serializer: S2) -> Fetcher<T, S2> {
        Fetcher {
            transport: self.transport,
            serializer,
            strict_cors: self.strict_cors,
        }
    }

    /// Reports every non-`ok` response as a CORS failure.
    pub fn strict_cors(mut self, enabled: bool) -> Self {
        self.strict_cors = enabled;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn fetch(
        &self,
        resource: &str,
        options: Option<&Value>,
        cancel: CancellationToken,
    ) -> Result<Response, FetchError> {
        self.fetch_options(resource, normalize(options), cancel).await
    }

    /// Same as [`Fetcher::fetch`], for callers that already hold typed options.
    pub async fn fetch_options(
        &self,
        resource: &str,
        options: RequestOptions,
        cancel: CancellationToken,
    ) -> Result<Response, FetchError> {
        let url = resolve_resource(&self.transport, resource, true)?;
        execute(&self.transport, &self.serializer, url, &options, &cancel, self.strict_cors).await
    }

    pub async fn fetch_as<D: DeserializeOwned>(
        &self,
        resource: &str,
        options: Option<&Value>,
        cancel: CancellationToken,
    ) -> Result<D, FetchError> {
        let response = self.fetch(resource, options, cancel).await?;
        self.serializer.deserialize(response.body())
    }
}

/// Parses `resource`, falling back to the transport's base URL for relative references.
fn resolve_resource<T: Transport>(
    transport: &T,
    resource: &str,
    adopt_base: bool,
) -> Result<Url, FetchError> {
    let url = match Url::parse(resource) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => match transport.base_url() {
            Some(base) => base.join(resource)?,
            None => {
                return Err(FetchError::InvalidUrl(format!(
                    "relative URL without a base: {resource}"
                )))
            }
        },
        Err(e) => return Err(e.into()),
    };

    if adopt_base {
        transport.init_base_url(&url);
    }
    Ok(url)
}

async fn execute<T: Transport, S: Serializer>(
    transport: &T,
    serializer: &S,
    url: Url,
    opts: &RequestOptions,
    cancel: &CancellationToken,
    strict: bool,
) -> Result<Response, FetchError> {
    let id = FetchId::new();

    let request = build_request(&url, opts, serializer)?;
    let body_used = !opts.body.is_empty()
        && request.method() != Method::GET
        && request.method() != Method::DELETE;

    log::debug!("Fetch[{id}]: {} {url}", request.method());

    let native = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            log::debug!("Fetch[{id}]: canceled while waiting for response");
            return Err(FetchError::Canceled);
        }
        r = transport.send(request) => r.map_err(FetchError::transport)?,
    };

    let final_url = native.url().clone();
    let status = native.status();
    let headers = native.headers().clone();

    let bytes = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            log::debug!("Fetch[{id}]: canceled while reading body");
            return Err(FetchError::Canceled);
        }
        b = native.into_body() => b.map_err(FetchError::transport)?,
    };
    let body = String::from_utf8_lossy(&bytes).into_owned();

    log::trace!("Fetch[{id}]: {status} from {final_url}, {} bytes", bytes.len());

    let response = Response::new(final_url, status, headers, body, body_used);

    if let Some(signal) = cors::detect(strict, response.ok(), response.body()) {
        log::debug!("Fetch[{id}]: CORS heuristic triggered ({signal:?})");
        return Err(FetchError::Cors { url: url.to_string() });
    }

    Ok(response)
}
