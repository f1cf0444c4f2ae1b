//! Translation of [`RequestOptions`] into a native `http::Request`.
//!
//! Everything in here is synchronous and network-free. All validation of the options
//! (method, charset, header names and values) happens here, before any exchange is attempted.

use crate::errors::FetchError;
use crate::net::options::RequestOptions;
use crate::net::transport::RedirectPolicy;
use crate::serializer::Serializer;
use bytes::Bytes;
use http::header::{
    HeaderName, HeaderValue, ACCEPT_CHARSET, CACHE_CONTROL, CONNECTION, CONTENT_TYPE, PRAGMA,
};
use http::{HeaderMap, Method, Request, Uri};
use std::collections::BTreeMap;
use url::Url;

pub const DEFAULT_MIME: &str = "text/plain";

const SEC_FETCH_MODE: HeaderName = HeaderName::from_static("sec-fetch-mode");
const ALLOW_CREDENTIALS: HeaderName = HeaderName::from_static("access-control-allow-credentials");

/// Character encoding used for the outgoing body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    #[default]
    Utf8,
    /// Little endian, no byte order mark
    Utf16,
    /// Little endian, no byte order mark
    Utf32,
}

impl Charset {
    /// Resolves an `Accept-Charset` value. `unicode` selects UTF-16.
    pub fn from_label(label: &str) -> Result<Self, FetchError> {
        match label.to_ascii_lowercase().as_str() {
            "" | "utf-8" => Ok(Charset::Utf8),
            "utf-32" => Ok(Charset::Utf32),
            "unicode" => Ok(Charset::Utf16),
            _ => Err(FetchError::InvalidCharset(label.to_string())),
        }
    }

    /// Name used in the `charset` parameter of `Content-Type`.
    pub fn label(&self) -> &'static str {
        match self {
            Charset::Utf8 => "utf-8",
            Charset::Utf16 => "utf-16",
            Charset::Utf32 => "utf-32",
        }
    }

    pub fn encode(&self, text: &str) -> Bytes {
        match self {
            Charset::Utf8 => Bytes::copy_from_slice(text.as_bytes()),
            Charset::Utf16 => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            Charset::Utf32 => text.chars().flat_map(|c| (c as u32).to_le_bytes()).collect(),
        }
    }
}

/// Cache mode of a request, each mapped to its own request directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    Default,
    NoStore,
    Reload,
    NoCache,
    ForceCache,
    OnlyIfCached,
}

impl CacheMode {
    /// Unknown modes yield `None` and add no directive.
    pub fn from_option(cache: &str) -> Option<Self> {
        match cache {
            "default" => Some(CacheMode::Default),
            "no-store" => Some(CacheMode::NoStore),
            "reload" => Some(CacheMode::Reload),
            "no-cache" => Some(CacheMode::NoCache),
            "force-cache" => Some(CacheMode::ForceCache),
            "only-if-cached" => Some(CacheMode::OnlyIfCached),
            _ => None,
        }
    }

    /// `(Cache-Control, Pragma)` values for this mode.
    pub fn directives(&self) -> (Option<&'static str>, Option<&'static str>) {
        match self {
            CacheMode::Default => (None, None),
            CacheMode::NoStore => (Some("no-store"), Some("no-cache")),
            CacheMode::Reload => (Some("no-cache"), Some("no-cache")),
            CacheMode::NoCache => (Some("max-age=0"), None),
            CacheMode::ForceCache => (Some("max-stale"), None),
            CacheMode::OnlyIfCached => (Some("only-if-cached"), None),
        }
    }
}

/// Maps a method name (any casing) onto a supported verb.
pub fn parse_method(method: &str) -> Result<Method, FetchError> {
    match method.to_ascii_lowercase().as_str() {
        "get" => Ok(Method::GET),
        "post" => Ok(Method::POST),
        "put" => Ok(Method::PUT),
        "delete" => Ok(Method::DELETE),
        "patch" => Ok(Method::PATCH),
        "head" => Ok(Method::HEAD),
        "options" => Ok(Method::OPTIONS),
        _ => Err(FetchError::InvalidMethod(method.to_string())),
    }
}

/// Parses the `headers` option into a flat name to value map.
///
/// Anything other than an object of strings is rejected by the serializer.
pub fn parse_headers<S: Serializer>(
    serializer: &S,
    headers: &serde_json::Value,
) -> Result<BTreeMap<String, String>, FetchError> {
    serializer.from_value(headers.clone())
}

fn to_header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, FetchError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| FetchError::InvalidHeader(format!("invalid header name {name:?}")))?;
        map.insert(name, header_value(value)?);
    }
    Ok(map)
}

fn header_value(value: &str) -> Result<HeaderValue, FetchError> {
    HeaderValue::from_str(value)
        .map_err(|_| FetchError::InvalidHeader(format!("invalid header value {value:?}")))
}

/// Media type from `Content-Type`, without parameters.
pub fn resolve_mime(headers: &HeaderMap) -> String {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_MIME)
        .to_string()
}

pub fn resolve_charset(headers: &HeaderMap) -> Result<Charset, FetchError> {
    match headers.get(ACCEPT_CHARSET) {
        None => Ok(Charset::Utf8),
        Some(v) => Charset::from_label(&String::from_utf8_lossy(v.as_bytes())),
    }
}

/// Builds the native request for `url` out of `opts`.
pub fn build_request<S: Serializer>(
    url: &Url,
    opts: &RequestOptions,
    serializer: &S,
) -> Result<Request<Bytes>, FetchError> {
    let mut headers = to_header_map(&parse_headers(serializer, &opts.headers)?)?;

    headers.insert(SEC_FETCH_MODE, header_value(&opts.mode)?);

    let allow_credentials = opts.credentials != "omit";
    headers.insert(
        ALLOW_CREDENTIALS,
        HeaderValue::from_static(if allow_credentials { "true" } else { "false" }),
    );

    headers.insert(
        CONNECTION,
        HeaderValue::from_static(if opts.keep_alive { "keep-alive" } else { "close" }),
    );

    if let Some(mode) = CacheMode::from_option(&opts.cache) {
        let (cache_control, pragma) = mode.directives();
        if let Some(v) = cache_control {
            if !headers.contains_key(CACHE_CONTROL) {
                headers.insert(CACHE_CONTROL, HeaderValue::from_static(v));
            }
        }
        if let Some(v) = pragma {
            if !headers.contains_key(PRAGMA) {
                headers.insert(PRAGMA, HeaderValue::from_static(v));
            }
        }
    }

    let charset = resolve_charset(&headers)?;
    let mime = resolve_mime(&headers);

    let body = if opts.body.is_empty() {
        Bytes::new()
    } else {
        headers.insert(
            CONTENT_TYPE,
            header_value(&format!("{mime}; charset={}", charset.label()))?,
        );
        charset.encode(&opts.body)
    };

    let method = parse_method(&opts.method)?;

    let mut target = url.clone();
    target.set_fragment(None);
    let uri: Uri = target
        .as_str()
        .parse()
        .map_err(|e: http::uri::InvalidUri| FetchError::InvalidUrl(e.to_string()))?;

    let mut request = Request::new(body);
    *request.method_mut() = method;
    *request.uri_mut() = uri;
    *request.headers_mut() = headers;
    request
        .extensions_mut()
        .insert(RedirectPolicy::from_option(&opts.redirect));

    Ok(request)
}
