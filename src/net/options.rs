//! Request options descriptor.
//!
//! [`normalize`] turns the loosely typed, web-style options bag into a fully populated
//! [`RequestOptions`]. Missing keys and values with the wrong shape silently fall back to their
//! documented default, the same way the web `fetch()` treats its `init` dictionary. Nothing is
//! validated here; invalid methods or charsets are only rejected when the request is built.
//!
//! Recognized keys: `headers`, `body`, `method`, `mode`, `credentials`, `cache`, `redirect` and
//! `keep-alive` (`keepAlive` is accepted as well). Everything else is ignored.

use serde_json::{Map, Value};

pub const DEFAULT_METHOD: &str = "get";
pub const DEFAULT_MODE: &str = "no-cors";
pub const DEFAULT_CREDENTIALS: &str = "same-origin";
pub const DEFAULT_CACHE: &str = "default";
pub const DEFAULT_REDIRECT: &str = "follow";

/// Fully normalized options for a single request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    /// Header name to value. Expected to be a JSON object of strings; other value types are
    /// rejected when the request is built.
    pub headers: Value,
    /// Body text, empty means no body
    pub body: String,
    /// get | post | put | delete | patch | head | options
    pub method: String,
    /// cors | no-cors | same-origin (never validated)
    pub mode: String,
    /// omit | same-origin | include
    pub credentials: String,
    /// default | no-store | reload | no-cache | force-cache | only-if-cached
    pub cache: String,
    /// follow | manual
    pub redirect: String,
    /// Ask for the connection to stay open after the response
    pub keep_alive: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            headers: Value::Object(Map::new()),
            body: String::new(),
            method: DEFAULT_METHOD.to_string(),
            mode: DEFAULT_MODE.to_string(),
            credentials: DEFAULT_CREDENTIALS.to_string(),
            cache: DEFAULT_CACHE.to_string(),
            redirect: DEFAULT_REDIRECT.to_string(),
            keep_alive: false,
        }
    }
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a single header.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if !self.headers.is_object() {
            self.headers = Value::Object(Map::new());
        }
        if let Value::Object(map) = &mut self.headers {
            map.insert(name.to_string(), Value::String(value.to_string()));
        }
        self
    }

    pub fn body<S: Into<String>>(mut self, body: S) -> Self {
        self.body = body.into();
        self
    }

    pub fn method<S: Into<String>>(mut self, method: S) -> Self {
        self.method = method.into();
        self
    }

    pub fn mode<S: Into<String>>(mut self, mode: S) -> Self {
        self.mode = mode.into();
        self
    }

    pub fn credentials<S: Into<String>>(mut self, credentials: S) -> Self {
        self.credentials = credentials.into();
        self
    }

    pub fn cache<S: Into<String>>(mut self, cache: S) -> Self {
        self.cache = cache.into();
        self
    }

    pub fn redirect<S: Into<String>>(mut self, redirect: S) -> Self {
        self.redirect = redirect.into();
        self
    }

    pub fn keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }
}

/// Normalizes an optional options bag. Never fails.
///
/// A bag that is not a JSON object is treated as if it were absent.
pub fn normalize(raw: Option<&Value>) -> RequestOptions {
    let defaults = RequestOptions::default();
    let Some(bag) = raw.and_then(Value::as_object) else {
        return defaults;
    };

    RequestOptions {
        headers: match bag.get("headers") {
            Some(v @ Value::Object(_)) => v.clone(),
            _ => defaults.headers,
        },
        body: bag.get("body").map(body_text).unwrap_or_default(),
        method: text_field(bag, "method").unwrap_or(defaults.method),
        mode: text_field(bag, "mode").unwrap_or(defaults.mode),
        credentials: text_field(bag, "credentials").unwrap_or(defaults.credentials),
        cache: text_field(bag, "cache").unwrap_or(defaults.cache),
        redirect: text_field(bag, "redirect").unwrap_or(defaults.redirect),
        keep_alive: bag
            .get("keep-alive")
            .or_else(|| bag.get("keepAlive"))
            .and_then(Value::as_bool)
            .unwrap_or(defaults.keep_alive),
    }
}

/// Strings are taken as-is, other scalars in their JSON text form.
fn text_field(bag: &Map<String, Value>, key: &str) -> Option<String> {
    match bag.get(key)? {
        Value::String(s) => Some(s.clone()),
        v @ (Value::Number(_) | Value::Bool(_)) => Some(v.to_string()),
        _ => None,
    }
}

fn body_text(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
