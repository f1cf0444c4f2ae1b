/// Errors surfaced by a fetch call.
///
/// Every kind is returned to the immediate caller. Nothing is retried or swallowed, and a failing
/// call never yields a partially populated response.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid method: {0}")]
    InvalidMethod(String),

    #[error("Invalid charset detected: {0}")]
    InvalidCharset(String),

    #[error("A CORS exception has occurred for {url}, check your request options")]
    Cors { url: String },

    #[error("Deserialization failed: {0}")]
    Deserialization(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Fetch canceled")]
    Canceled,

    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Deserialization(e.to_string())
    }
}

impl From<url::ParseError> for FetchError {
    fn from(e: url::ParseError) -> Self {
        FetchError::InvalidUrl(e.to_string())
    }
}

impl FetchError {
    /// Wraps any transport level failure.
    pub fn transport<E>(e: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        FetchError::Transport(Box::new(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_method_keeps_offending_value() {
        let err = FetchError::InvalidMethod("Invalid".into());
        match &err {
            FetchError::InvalidMethod(m) => assert_eq!(m, "Invalid"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.to_string(), "Invalid method: Invalid");
    }

    #[test]
    fn json_errors_map_to_deserialization() {
        let e = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(FetchError::from(e), FetchError::Deserialization(_)));
    }

    #[test]
    fn cors_message_names_url() {
        let err = FetchError::Cors { url: "https://example.com/".into() };
        assert!(err.to_string().contains("https://example.com/"));
    }
}
