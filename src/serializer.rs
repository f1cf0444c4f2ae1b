//! Text serialization capability.
//!
//! Header maps and typed results go through a [`Serializer`]. The [`JsonSerializer`] is the
//! default and the only implementation shipped; [`Response::json`](crate::net::Response::json)
//! always uses it.

use crate::errors::FetchError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serializes values to text and back.
pub trait Serializer: Send + Sync {
    /// Serializes `value` into its text form.
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, FetchError>;

    /// Deserializes `content` into a `T`.
    ///
    /// Fails with [`FetchError::Deserialization`] on empty or malformed input.
    fn deserialize<T: DeserializeOwned>(&self, content: &str) -> Result<T, FetchError>;

    /// Converts an already parsed JSON value into a `T`.
    fn from_value<T: DeserializeOwned>(&self, value: serde_json::Value) -> Result<T, FetchError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, FetchError> {
        Ok(serde_json::to_string(value)?)
    }

    fn deserialize<T: DeserializeOwned>(&self, content: &str) -> Result<T, FetchError> {
        if content.trim().is_empty() {
            return Err(FetchError::Deserialization(
                "the content cannot be empty or whitespace".to_string(),
            ));
        }
        Ok(serde_json::from_str(content)?)
    }

    fn from_value<T: DeserializeOwned>(&self, value: serde_json::Value) -> Result<T, FetchError> {
        Ok(serde_json::from_value(value)?)
    }
}
