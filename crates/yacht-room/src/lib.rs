//! Game-room core for Yacht Dice.
//!
//! One [`GameRoom`] holds all mutable state for one match and is driven
//! through a single entry point, [`GameRoom::handle_action`]. Each room
//! runs as an isolated Tokio task (actor model) behind a [`RoomHandle`],
//! so actions on a room are serialized in arrival order while different
//! rooms proceed independently.
//!
//! # Key types
//!
//! - [`GameRoom`] — the match state machine (dice, turns, scores)
//! - [`scoring`] — the pure dice→points engine
//! - [`standings`] — totals, upper bonus, winner resolution
//! - [`RoomRegistry`] — creates/finds/lists/destroys rooms, routes players
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`Roster`] — who is seated, in join order

mod dice;
mod error;
mod game;
mod registry;
mod room;
mod roster;
pub mod scoring;
pub mod standings;

pub use dice::{DiceSet, ROLLS_PER_TURN, UNDETERMINED};
pub use error::RoomError;
pub use game::GameRoom;
pub use registry::RoomRegistry;
pub use room::{PlayerSender, RoomConfig, RoomHandle, RoomInfo, RoomOutbound};
pub use roster::{PlayerRecord, Roster};
