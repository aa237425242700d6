//! Unified error type for the server crate.

use yacht_protocol::ProtocolError;
use yacht_room::RoomError;

use crate::transport::TransportError;

/// Top-level error wrapping the layer-specific errors.
///
/// The `#[from]` attributes let `?` convert lower-layer errors
/// automatically.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// A transport-level error (bind, accept, upgrade).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (full, not found, unavailable).
    #[error(transparent)]
    Room(#[from] RoomError),
}
