//! The room's player roster: who is seated, in join order.

use std::collections::HashMap;

use yacht_protocol::PlayerId;

/// One seat in a room: identity plus display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub nickname: String,
}

/// Ordered view of the players currently in a room.
///
/// Join order is the stable order the game snapshots its turn sequence
/// from at game start. Later joins and leaves mutate the roster but never
/// an in-progress turn order.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: Vec<PlayerRecord>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.players.iter().any(|p| &p.id == id)
    }

    /// Seats a player. Returns `false` if the id is already seated.
    pub fn add(&mut self, id: PlayerId, nickname: impl Into<String>) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.players.push(PlayerRecord {
            id,
            nickname: nickname.into(),
        });
        true
    }

    /// Removes a player. Returns `false` if they were not seated.
    pub fn remove(&mut self, id: &PlayerId) -> bool {
        let before = self.players.len();
        self.players.retain(|p| &p.id != id);
        self.players.len() != before
    }

    pub fn nickname(&self, id: &PlayerId) -> Option<&str> {
        self.players
            .iter()
            .find(|p| &p.id == id)
            .map(|p| p.nickname.as_str())
    }

    /// Player ids in join order.
    pub fn ids(&self) -> impl Iterator<Item = &PlayerId> {
        self.players.iter().map(|p| &p.id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlayerRecord> {
        self.players.iter()
    }

    /// The id -> display-name map used in outbound payloads.
    pub fn names(&self) -> HashMap<PlayerId, String> {
        self.players
            .iter()
            .map(|p| (p.id.clone(), p.nickname.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_preserves_join_order() {
        let mut roster = Roster::new();
        assert!(roster.add(PlayerId::from("b"), "Bea"));
        assert!(roster.add(PlayerId::from("a"), "Abe"));
        assert!(roster.add(PlayerId::from("c"), "Cid"));

        let ids: Vec<_> = roster.ids().map(PlayerId::as_str).collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[test]
    fn test_roster_rejects_duplicate_seat() {
        let mut roster = Roster::new();
        assert!(roster.add(PlayerId::from("a"), "Abe"));
        assert!(!roster.add(PlayerId::from("a"), "Abe again"));
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.nickname(&PlayerId::from("a")), Some("Abe"));
    }

    #[test]
    fn test_roster_remove() {
        let mut roster = Roster::new();
        roster.add(PlayerId::from("a"), "Abe");
        assert!(roster.remove(&PlayerId::from("a")));
        assert!(!roster.remove(&PlayerId::from("a")));
        assert!(roster.is_empty());
    }
}
