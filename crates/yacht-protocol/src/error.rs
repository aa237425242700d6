//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed bytes, missing fields, or a
    /// message of the wrong shape.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message parsed but violates the protocol, e.g. a frame sent
    /// before the hello handshake.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
