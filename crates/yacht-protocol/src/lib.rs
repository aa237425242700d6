//! Wire protocol for Yacht Dice.
//!
//! This crate defines the language clients and the server speak:
//!
//! - **Types** ([`Action`], [`StateMessage`], [`ClientMessage`], ...) —
//!   the message structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages are
//!   converted to and from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong doing so.
//!
//! The protocol layer knows nothing about rooms, turns, or connections —
//! it only describes shapes. Game rules live in `yacht-room`.

mod codec;
mod error;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::{
    Action, CATEGORY_COUNT, ClientMessage, DICE_COUNT, GameData, PlayerId, RoomId,
    RoomListEntry, RoomSnapshot, ScoreBoard, ServerMessage, StateKind, StateMessage,
    UNFILLED,
};
