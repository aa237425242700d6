//! Room actor: an isolated Tokio task that owns one match.
//!
//! Each room runs in its own task, fed by an mpsc command channel. That
//! channel is the room's mutual-exclusion boundary: commands are processed
//! one at a time in arrival order, so the game state needs no locks, and
//! rooms never contend with each other. Nothing inside the actor blocks
//! or awaits while state is being mutated.

use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot};

use yacht_protocol::{Action, PlayerId, RoomId, RoomSnapshot, StateMessage};

use crate::{GameRoom, RoomError, Roster};

/// Capacity settings for a room.
#[derive(Debug, Clone)]
pub struct RoomConfig {
    /// Maximum seats in the room.
    pub max_players: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self { max_players: 4 }
    }
}

/// An outbound message from a room actor to one player's connection.
#[derive(Debug, Clone)]
pub enum RoomOutbound {
    /// Current room state, sent to a player right after they join.
    Snapshot(RoomSnapshot),
    /// A broadcast produced by an accepted game action.
    State(StateMessage),
}

/// Channel sender for delivering outbound messages to a player.
pub type PlayerSender = mpsc::UnboundedSender<RoomOutbound>;

/// Commands sent to a room actor through its channel.
pub(crate) enum RoomCommand {
    Join {
        player_id: PlayerId,
        nickname: String,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Leave {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    /// A game action. Fire-and-forget: a rejected action produces no
    /// reply and no broadcast — silence is the signal.
    Action {
        sender: PlayerId,
        action: Action,
    },
    Snapshot {
        reply: oneshot::Sender<RoomSnapshot>,
    },
    Info {
        reply: oneshot::Sender<RoomInfo>,
    },
    Shutdown,
}

/// A snapshot of room metadata (not the game state itself).
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub name: String,
    pub player_count: usize,
    pub max_players: usize,
    pub in_progress: bool,
}

/// Handle to a running room actor.
///
/// Cheap to clone — it wraps an `mpsc::Sender`. The registry holds one
/// per room; connection handlers clone it to talk to the room.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Seats a player in the room.
    pub async fn join(
        &self,
        player_id: PlayerId,
        nickname: String,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                player_id,
                nickname,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?
    }

    /// Removes a player from the room.
    pub async fn leave(&self, player_id: PlayerId) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Leave {
                player_id,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?
    }

    /// Delivers a game action from a player (fire-and-forget).
    pub async fn send_action(
        &self,
        sender: PlayerId,
        action: Action,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Action { sender, action })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }

    /// Requests the current game-state snapshot.
    pub async fn snapshot(&self) -> Result<RoomSnapshot, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }

    /// Requests the room's metadata.
    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Info { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }

    /// Tells the room to shut down.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }
}

/// The internal room actor. Runs inside a Tokio task.
struct RoomActor {
    game: GameRoom,
    name: String,
    config: RoomConfig,
    roster: Roster,
    /// Per-player outbound channels.
    senders: HashMap<PlayerId, PlayerSender>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    async fn run(mut self) {
        tracing::info!(room_id = %self.game.room_id(), name = %self.name, "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join {
                    player_id,
                    nickname,
                    sender,
                    reply,
                } => {
                    let result = self.handle_join(player_id, nickname, sender);
                    let _ = reply.send(result);
                }
                RoomCommand::Leave { player_id, reply } => {
                    let result = self.handle_leave(&player_id);
                    let _ = reply.send(result);
                }
                RoomCommand::Action { sender, action } => {
                    self.handle_action(sender, action);
                }
                RoomCommand::Snapshot { reply } => {
                    let _ = reply.send(self.game.snapshot(&self.roster));
                }
                RoomCommand::Info { reply } => {
                    let _ = reply.send(self.info());
                }
                RoomCommand::Shutdown => {
                    tracing::info!(room_id = %self.game.room_id(), "room shutting down");
                    break;
                }
            }
        }

        tracing::info!(room_id = %self.game.room_id(), "room actor stopped");
    }

    /// Seats a player and sends them the current snapshot.
    ///
    /// Joins are allowed while a game runs: the fixed turn order is
    /// unaffected, and the late joiner can watch but not act until the
    /// next match starts.
    fn handle_join(
        &mut self,
        player_id: PlayerId,
        nickname: String,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        if self.roster.contains(&player_id) {
            return Err(RoomError::AlreadyInRoom(player_id, self.game.room_id()));
        }
        if self.roster.len() >= self.config.max_players {
            return Err(RoomError::RoomFull(self.game.room_id()));
        }

        self.roster.add(player_id.clone(), nickname);
        self.senders.insert(player_id.clone(), sender);
        tracing::info!(
            room_id = %self.game.room_id(),
            player = %player_id,
            players = self.roster.len(),
            "player joined"
        );

        // Snapshot after seating, so the joiner sees their own name.
        if let Some(tx) = self.senders.get(&player_id) {
            let _ = tx.send(RoomOutbound::Snapshot(self.game.snapshot(&self.roster)));
        }

        Ok(())
    }

    fn handle_leave(&mut self, player_id: &PlayerId) -> Result<(), RoomError> {
        if !self.roster.remove(player_id) {
            return Err(RoomError::NotInRoom(
                player_id.clone(),
                self.game.room_id(),
            ));
        }
        self.senders.remove(player_id);
        tracing::info!(
            room_id = %self.game.room_id(),
            player = %player_id,
            players = self.roster.len(),
            "player left"
        );
        Ok(())
    }

    fn handle_action(&mut self, sender: PlayerId, action: Action) {
        if !self.roster.contains(&sender) {
            tracing::warn!(
                room_id = %self.game.room_id(),
                player = %sender,
                "action from non-member, ignoring"
            );
            return;
        }

        match self.game.handle_action(&self.roster, &sender, &action) {
            Some(msg) => self.broadcast(msg),
            None => tracing::debug!(
                room_id = %self.game.room_id(),
                player = %sender,
                ?action,
                "action rejected"
            ),
        }
    }

    /// Sends one state broadcast to every seated player. Closed channels
    /// (player mid-disconnect) are silently skipped.
    fn broadcast(&self, msg: StateMessage) {
        let outbound = RoomOutbound::State(msg);
        for record in self.roster.iter() {
            if let Some(tx) = self.senders.get(&record.id) {
                let _ = tx.send(outbound.clone());
            }
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            room_id: self.game.room_id(),
            name: self.name.clone(),
            player_count: self.roster.len(),
            max_players: self.config.max_players,
            in_progress: self.game.in_progress(),
        }
    }
}

/// Spawns a new room actor task and returns a handle to it.
///
/// `channel_size` bounds the command queue; when it fills, senders wait.
pub(crate) fn spawn_room(
    room_id: RoomId,
    name: String,
    config: RoomConfig,
    channel_size: usize,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = RoomActor {
        game: GameRoom::new(room_id),
        name,
        config,
        roster: Roster::new(),
        senders: HashMap::new(),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle {
        room_id,
        sender: tx,
    }
}
