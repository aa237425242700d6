//! Core wire types for Yacht Dice.
//!
//! Everything in this module travels between client and server as JSON.
//! Field names are camelCase and the action/message tags are
//! SCREAMING_SNAKE, matching the browser client's wire format.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of dice in play.
pub const DICE_COUNT: usize = 5;

/// Number of scoring categories on a score board.
pub const CATEGORY_COUNT: usize = 12;

/// Sentinel for a score-board slot that has not been filled yet.
pub const UNFILLED: i32 = -1;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player.
///
/// String-backed because ids key the `scoreBoards` and `playerNames` maps
/// on the wire, and "no current player" is rendered as the empty string.
/// The server mints ids at handshake; clients never choose their own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the empty id used to mean "no current player".
    pub fn is_unset(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// A unique identifier for a room (one match).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Score board
// ---------------------------------------------------------------------------

/// One player's 12 category slots.
///
/// Slot order: 0-5 Ones..Sixes, 6 Choice, 7 Four-of-a-Kind, 8 Full House,
/// 9 Small Straight, 10 Large Straight, 11 Yacht. A slot holds either a
/// committed score (>= 0) or [`UNFILLED`]; once committed it is never
/// overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreBoard([i32; CATEGORY_COUNT]);

impl ScoreBoard {
    /// A fresh board with every slot unfilled.
    pub fn new() -> Self {
        Self([UNFILLED; CATEGORY_COUNT])
    }

    pub fn slot(&self, index: usize) -> Option<i32> {
        self.0.get(index).copied()
    }

    pub fn is_filled(&self, index: usize) -> bool {
        self.0.get(index).is_some_and(|s| *s != UNFILLED)
    }

    /// Commits a score into an unfilled slot. Returns `false` (board
    /// untouched) when the index is out of range or the slot is taken.
    pub fn fill(&mut self, index: usize, score: i32) -> bool {
        match self.0.get_mut(index) {
            Some(slot) if *slot == UNFILLED => {
                *slot = score;
                true
            }
            _ => false,
        }
    }

    /// True once every slot holds a committed score.
    pub fn is_complete(&self) -> bool {
        self.0.iter().all(|s| *s != UNFILLED)
    }

    pub fn slots(&self) -> &[i32; CATEGORY_COUNT] {
        &self.0
    }
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Inbound actions
// ---------------------------------------------------------------------------

/// A player-originated game action.
///
/// The sender's identity is not part of the payload — the server stamps it
/// from the authenticated connection, so clients cannot act as each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "actionType")]
pub enum Action {
    /// Begin a match (also accepted for a rematch after game over).
    #[serde(rename = "START")]
    Start,

    /// Re-roll every non-kept die.
    #[serde(rename = "ROLL")]
    Roll,

    /// Flip the keep flag on one die.
    #[serde(rename = "TOGGLE_KEEP")]
    ToggleKeep { index: usize },

    /// Commit the current dice into one category and end the turn.
    #[serde(rename = "SUBMIT")]
    Submit {
        #[serde(rename = "categoryIdx")]
        category_idx: usize,
    },
}

// ---------------------------------------------------------------------------
// Outbound state messages
// ---------------------------------------------------------------------------

/// Classifies an outbound state broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateKind {
    #[serde(rename = "GAME_START")]
    GameStart,
    #[serde(rename = "UPDATE")]
    Update,
    #[serde(rename = "GAME_OVER")]
    GameOver,
}

/// The shared `data` payload of every state broadcast and snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameData {
    /// Die faces, 1-6; 0 means undetermined (not rolled this turn).
    pub dice_faces: [u8; DICE_COUNT],
    pub keep_flags: [bool; DICE_COUNT],
    pub rolls_remaining: u8,
    /// Empty id while no turn is active.
    pub current_turn_player_id: PlayerId,
    pub score_boards: HashMap<PlayerId, ScoreBoard>,
    pub player_names: HashMap<PlayerId, String>,
}

/// A state broadcast produced by an accepted action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateMessage {
    pub message_type: StateKind,
    pub room_id: RoomId,
    /// Human-readable notice; absent for silent updates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Present only on `GAME_OVER`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_name: Option<String>,
    pub data: GameData,
}

/// The on-demand snapshot: the broadcast payload plus the phase flag,
/// for late joiners and polling observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    pub in_progress: bool,
    #[serde(flatten)]
    pub data: GameData,
}

// ---------------------------------------------------------------------------
// Lobby envelope
// ---------------------------------------------------------------------------

/// A summary of a room returned in room listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomListEntry {
    pub room_id: RoomId,
    pub name: String,
    pub player_count: usize,
    pub max_players: usize,
    pub in_progress: bool,
}

/// Messages a client sends to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// First frame on a connection: pick a display name.
    Hello { nickname: String },

    /// Create a named room.
    CreateRoom { name: String },

    /// Join a specific room.
    #[serde(rename_all = "camelCase")]
    JoinRoom { room_id: RoomId },

    /// Leave the current room.
    LeaveRoom,

    /// List all rooms.
    ListRooms,

    /// Request the current room's state snapshot.
    GetSnapshot,

    /// An in-game action for the current room.
    Action { action: Action },
}

/// Messages the server sends to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Handshake reply carrying the server-minted player id.
    #[serde(rename_all = "camelCase")]
    Welcome { player_id: PlayerId },

    #[serde(rename_all = "camelCase")]
    RoomCreated { room_id: RoomId },

    #[serde(rename_all = "camelCase")]
    RoomJoined { room_id: RoomId },

    RoomLeft,

    RoomList { rooms: Vec<RoomListEntry> },

    /// Room state delivered on join or on request.
    Snapshot { snapshot: RoomSnapshot },

    /// A game-state broadcast.
    State { state: StateMessage },

    /// An infrastructural failure (HTTP-style code). In-game rejections
    /// are silent and never produce this.
    Error { code: u16, message: String },
}

// =========================================================================
// Tests
// =========================================================================
