//! Fetch configuration.
//!
//! [`FetchConfig`] controls how the default [`ReqwestTransport`](crate::net::ReqwestTransport)
//! is built. Most fields map straight onto the `reqwest` client builder; `base_url` is only
//! used to resolve relative resources.
//!
//! The process-wide strict-CORS switch also lives here. When enabled, any non-`ok` response
//! is reported as a CORS failure in addition to the body keyword check.
//!
//! # Examples
//!
//! ```rust
//! use webfetch::config::FetchConfig;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = FetchConfig::builder()
//!     .user_agent("MyApp/1.0")
//!     .max_redirects(5)
//!     .build()?;
//! assert_eq!(cfg.max_redirects, 5);
//! # Ok(()) }
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use url::Url;

const DEFAULT_USER_AGENT: &str = concat!("webfetch/", env!("CARGO_PKG_VERSION"));

static STRICT_CORS: AtomicBool = AtomicBool::new(false);

/// Enables or disables the non-`ok` trigger of the CORS heuristic for all calls that use the
/// free `fetch` functions.
pub fn set_strict_cors(enabled: bool) {
    STRICT_CORS.store(enabled, Ordering::Relaxed);
}

/// Returns the current value of the process-wide strict-CORS switch (default `false`).
pub fn strict_cors() -> bool {
    STRICT_CORS.load(Ordering::Relaxed)
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent sent with every request unless the caller sets one
    pub user_agent: String,
    /// Redirect limit used when redirects are followed
    pub max_redirects: usize,
    /// Total request timeout (none by default)
    pub timeout: Option<Duration>,
    /// Base URL used to resolve relative resources
    pub base_url: Option<Url>,
    /// Ignore system proxy settings (`HTTP_PROXY` and friends)
    pub no_proxy: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_redirects: 10,
            timeout: None,
            base_url: None,
            no_proxy: false,
        }
    }
}

impl FetchConfig {
    pub fn builder() -> FetchConfigBuilder {
        FetchConfigBuilder::default()
    }
}

/// Builder for [`FetchConfig`].
#[derive(Debug, Clone, Default)]
pub struct FetchConfigBuilder {
    inner: FetchConfig,
}

impl FetchConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut FetchConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn user_agent<S: Into<String>>(self, ua: S) -> Self { self.map(|c| c.user_agent = ua.into()) }
    pub fn max_redirects(self, n: usize) -> Self { self.map(|c| c.max_redirects = n) }
    pub fn timeout(self, t: Duration) -> Self { self.map(|c| c.timeout = Some(t)) }
    pub fn base_url(self, url: Url) -> Self { self.map(|c| c.base_url = Some(url)) }
    pub fn no_proxy(self, on: bool) -> Self { self.map(|c| c.no_proxy = on) }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut FetchConfig)) -> Self { self.map(f) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<FetchConfig, FetchConfigError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

#[derive(Debug, Clone, PartialEq)]
pub enum FetchConfigError {
    EmptyUserAgent,
    ZeroTimeout,
    CannotBeABase(Url),
}

impl fmt::Display for FetchConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchConfigError::EmptyUserAgent => write!(f, "user_agent must not be empty"),
            FetchConfigError::ZeroTimeout => write!(f, "timeout must be greater than zero"),
            FetchConfigError::CannotBeABase(u) => write!(f, "base_url {u} cannot be used as a base"),
        }
    }
}
impl std::error::Error for FetchConfigError {}

fn validate(c: &FetchConfig) -> Result<(), FetchConfigError> {
    if c.user_agent.trim().is_empty() {
        return Err(FetchConfigError::EmptyUserAgent);
    }
    if c.timeout == Some(Duration::ZERO) {
        return Err(FetchConfigError::ZeroTimeout);
    }
    if let Some(base) = &c.base_url {
        if base.cannot_be_a_base() {
            return Err(FetchConfigError::CannotBeABase(base.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = FetchConfig::builder().build().unwrap();
        assert!(cfg.user_agent.starts_with("webfetch/"));
        assert_eq!(cfg.max_redirects, 10);
        assert!(cfg.timeout.is_none());
        assert!(cfg.base_url.is_none());
        assert!(!cfg.no_proxy);
    }

    #[test]
    fn builder_rejects_bad_values() {
        assert_eq!(
            FetchConfig::builder().user_agent("  ").build().unwrap_err(),
            FetchConfigError::EmptyUserAgent
        );
        assert_eq!(
            FetchConfig::builder().timeout(Duration::ZERO).build().unwrap_err(),
            FetchConfigError::ZeroTimeout
        );

        let mailto = Url::parse("mailto:someone@example.com").unwrap();
        assert!(matches!(
            FetchConfig::builder().base_url(mailto).build(),
            Err(FetchConfigError::CannotBeABase(_))
        ));
    }

    #[test]
    fn with_applies_several_changes() {
        let cfg = FetchConfig::builder()
            .with(|c| {
                c.max_redirects = 0;
                c.timeout = Some(Duration::from_secs(3));
            })
            .build()
            .unwrap();
        assert_eq!(cfg.max_redirects, 0);
        assert_eq!(cfg.timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn strict_cors_is_off_by_default() {
        // Never toggled by the test suite
        assert!(!strict_cors());
    }
}
