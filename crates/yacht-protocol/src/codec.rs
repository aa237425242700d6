//! Codec trait and the default JSON implementation.
//!
//! The rest of the stack never serializes directly — it goes through the
//! [`Codec`] trait, so a binary codec can be swapped in later without
//! touching the server or room layers.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Converts message types to and from wire bytes.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the bytes are malformed or do
    /// not match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// A [`Codec`] producing JSON via `serde_json`.
///
/// Human-readable on the wire, which is what the browser client speaks
/// and what makes WebSocket frames inspectable in DevTools.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
