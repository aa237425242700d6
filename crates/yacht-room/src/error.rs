//! Error types for the room layer.
//!
//! These cover room lifecycle and routing only. In-game rejections
//! (out-of-turn actions, exhausted rolls, filled slots) are not errors —
//! the game silently ignores them by design.

use yacht_protocol::{PlayerId, RoomId};

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// The room has no free seat.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// The player is already in a room.
    #[error("player {0} already in room {1}")]
    AlreadyInRoom(PlayerId, RoomId),

    /// The player is not in this room.
    #[error("player {0} not in room {1}")]
    NotInRoom(PlayerId, RoomId),

    /// The player is not in any room.
    #[error("player {0} is not in any room")]
    NotInAnyRoom(PlayerId),

    /// The room's command channel is closed or full.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}
