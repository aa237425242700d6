//! Room registry: creates, finds, lists, and destroys rooms, and routes
//! players' traffic to the room they are seated in.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use yacht_protocol::{Action, PlayerId, RoomId, RoomListEntry, RoomSnapshot};

use crate::room::spawn_room;
use crate::{PlayerSender, RoomConfig, RoomError, RoomHandle, RoomInfo};

/// Counter for generating unique room IDs.
static NEXT_ROOM_ID: AtomicU64 = AtomicU64::new(1);

/// Default command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// The keyed store of active rooms.
///
/// Owned by management code above the game core; the rooms themselves are
/// actors, so this type only holds handles and the player→room index.
/// A player can be in at most one room at a time.
pub struct RoomRegistry {
    rooms: HashMap<RoomId, RoomHandle>,
    player_rooms: HashMap<PlayerId, RoomId>,
    config: RoomConfig,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::with_config(RoomConfig::default())
    }

    pub fn with_config(config: RoomConfig) -> Self {
        Self {
            rooms: HashMap::new(),
            player_rooms: HashMap::new(),
            config,
        }
    }

    /// Creates a named room and returns its ID.
    pub fn create_room(&mut self, name: impl Into<String>) -> RoomId {
        let room_id = RoomId(NEXT_ROOM_ID.fetch_add(1, Ordering::Relaxed));
        let handle = spawn_room(
            room_id,
            name.into(),
            self.config.clone(),
            DEFAULT_CHANNEL_SIZE,
        );
        self.rooms.insert(room_id, handle);
        tracing::info!(%room_id, "room created");
        room_id
    }

    /// Seats a player in a room, enforcing one-room-at-a-time.
    pub async fn join_room(
        &mut self,
        player_id: PlayerId,
        nickname: String,
        room_id: RoomId,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        if let Some(current) = self.player_rooms.get(&player_id) {
            return Err(RoomError::AlreadyInRoom(player_id, *current));
        }

        let handle = self
            .rooms
            .get(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;

        handle.join(player_id.clone(), nickname, sender).await?;
        self.player_rooms.insert(player_id, room_id);
        Ok(())
    }

    /// Removes a player from their current room.
    pub async fn leave_room(&mut self, player_id: &PlayerId) -> Result<(), RoomError> {
        let room_id = self
            .player_rooms
            .get(player_id)
            .copied()
            .ok_or_else(|| RoomError::NotInAnyRoom(player_id.clone()))?;

        if let Some(handle) = self.rooms.get(&room_id) {
            handle.leave(player_id.clone()).await?;
        }

        self.player_rooms.remove(player_id);
        Ok(())
    }

    /// Routes a game action from a player to their current room.
    pub async fn route_action(
        &self,
        player_id: &PlayerId,
        action: Action,
    ) -> Result<(), RoomError> {
        let room_id = self
            .player_rooms
            .get(player_id)
            .ok_or_else(|| RoomError::NotInAnyRoom(player_id.clone()))?;

        let handle = self
            .rooms
            .get(room_id)
            .ok_or(RoomError::NotFound(*room_id))?;

        handle.send_action(player_id.clone(), action).await
    }

    /// Fetches the state snapshot of the player's current room.
    pub async fn snapshot(&self, player_id: &PlayerId) -> Result<RoomSnapshot, RoomError> {
        let room_id = self
            .player_rooms
            .get(player_id)
            .ok_or_else(|| RoomError::NotInAnyRoom(player_id.clone()))?;

        let handle = self
            .rooms
            .get(room_id)
            .ok_or(RoomError::NotFound(*room_id))?;

        handle.snapshot().await
    }

    /// Returns metadata about a specific room.
    pub async fn room_info(&self, room_id: RoomId) -> Result<RoomInfo, RoomError> {
        let handle = self
            .rooms
            .get(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;
        handle.info().await
    }

    /// Shuts a room down and drops all its players from the index.
    pub async fn delete_room(&mut self, room_id: RoomId) -> Result<(), RoomError> {
        let handle = self
            .rooms
            .remove(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;

        let _ = handle.shutdown().await;
        self.player_rooms.retain(|_, rid| *rid != room_id);

        tracing::info!(%room_id, "room destroyed");
        Ok(())
    }

    /// Lists every room, sorted by ID for a stable listing. Rooms that
    /// fail to respond (mid-shutdown) are skipped.
    pub async fn list_rooms(&self) -> Vec<RoomListEntry> {
        let mut entries = Vec::with_capacity(self.rooms.len());
        for handle in self.rooms.values() {
            if let Ok(info) = handle.info().await {
                entries.push(RoomListEntry {
                    room_id: info.room_id,
                    name: info.name,
                    player_count: info.player_count,
                    max_players: info.max_players,
                    in_progress: info.in_progress,
                });
            }
        }
        entries.sort_by_key(|e| e.room_id);
        entries
    }

    /// The room a player is currently seated in, if any.
    pub fn player_room(&self, player_id: &PlayerId) -> Option<RoomId> {
        self.player_rooms.get(player_id).copied()
    }

    /// A cloned handle to one room, for callers that need to talk to the
    /// actor without going through the registry lock.
    pub fn room_handle(&self, room_id: RoomId) -> Option<RoomHandle> {
        self.rooms.get(&room_id).cloned()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.keys().copied().collect()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}
