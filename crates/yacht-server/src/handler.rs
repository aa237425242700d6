//! Per-connection handler: hello handshake and message routing.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Receive `Hello` → mint a player id, send `Welcome`
//!   2. Loop: decode client messages → lobby ops or game actions
//!
//! Outbound traffic — direct replies and room broadcasts alike — funnels
//! through one writer task per connection, so frames never interleave.

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use rand::Rng;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use yacht_protocol::{ClientMessage, Codec, JsonCodec, PlayerId, ProtocolError, ServerMessage};
use yacht_room::{RoomError, RoomOutbound};

use crate::ServerError;
use crate::server::ServerState;
use crate::transport::{ConnectionId, WsStream};

/// How long a client has to introduce itself before the connection drops.
const HELLO_TIMEOUT: Duration = Duration::from_secs(5);

type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

/// Removes the player from their room when the connection task exits.
///
/// Cleanup runs even if the handler errors. `Drop` is synchronous, so the
/// async leave is spawned fire-and-forget.
struct LeaveGuard {
    player_id: PlayerId,
    state: Arc<ServerState>,
}

impl Drop for LeaveGuard {
    fn drop(&mut self) {
        let player_id = self.player_id.clone();
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let mut rooms = state.rooms.lock().await;
            let _ = rooms.leave_room(&player_id).await;
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn_id: ConnectionId,
    ws: WsStream,
    state: Arc<ServerState>,
) -> Result<(), ServerError> {
    tracing::debug!(%conn_id, "handling new connection");

    let (ws_tx, mut ws_rx) = ws.split();
    let (out_tx, out_rx) = mpsc::unbounded_channel::<ServerMessage>();
    let writer = tokio::spawn(write_loop(ws_tx, out_rx, state.codec));

    let result = run_session(conn_id, &mut ws_rx, &out_tx, &state).await;

    // The writer drains pending frames and exits once every sender —
    // ours and the room-forward tasks' — is gone.
    drop(out_tx);
    let _ = writer.await;
    result
}

async fn run_session(
    conn_id: ConnectionId,
    ws_rx: &mut WsSource,
    out_tx: &mpsc::UnboundedSender<ServerMessage>,
    state: &Arc<ServerState>,
) -> Result<(), ServerError> {
    let (player_id, nickname) = hello(ws_rx, out_tx, state).await?;
    tracing::info!(%conn_id, player = %player_id, nickname = %nickname, "player connected");

    // Dropped when this function returns, on any path.
    let _guard = LeaveGuard {
        player_id: player_id.clone(),
        state: Arc::clone(state),
    };

    while let Some(frame) = ws_rx.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                tracing::debug!(player = %player_id, error = %e, "recv error");
                break;
            }
        };
        let data = match frame {
            Message::Text(text) => text.as_bytes().to_vec(),
            Message::Binary(bytes) => bytes.to_vec(),
            Message::Close(_) => {
                tracing::info!(player = %player_id, "connection closed cleanly");
                break;
            }
            _ => continue, // ping/pong/frame
        };

        let msg: ClientMessage = match state.codec.decode(&data) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(player = %player_id, error = %e, "failed to decode client message");
                send(
                    out_tx,
                    ServerMessage::Error {
                        code: 400,
                        message: "malformed message".into(),
                    },
                );
                continue;
            }
        };

        dispatch(&player_id, &nickname, msg, out_tx, state).await;
    }

    Ok(())
}

/// Waits for the `Hello` frame, mints a player id, and replies `Welcome`.
async fn hello(
    ws_rx: &mut WsSource,
    out_tx: &mpsc::UnboundedSender<ServerMessage>,
    state: &Arc<ServerState>,
) -> Result<(PlayerId, String), ServerError> {
    loop {
        let frame = tokio::time::timeout(HELLO_TIMEOUT, ws_rx.next())
            .await
            .map_err(|_| ProtocolError::InvalidMessage("hello timed out".into()))?
            .ok_or_else(|| {
                ProtocolError::InvalidMessage("connection closed before hello".into())
            })?
            .map_err(|e| {
                ProtocolError::InvalidMessage(format!("transport error before hello: {e}"))
            })?;

        let data = match frame {
            Message::Text(text) => text.as_bytes().to_vec(),
            Message::Binary(bytes) => bytes.to_vec(),
            Message::Close(_) => {
                return Err(ProtocolError::InvalidMessage(
                    "connection closed before hello".into(),
                )
                .into());
            }
            _ => continue,
        };

        return match state.codec.decode::<ClientMessage>(&data) {
            Ok(ClientMessage::Hello { nickname }) => {
                let player_id = mint_player_id();
                send(
                    out_tx,
                    ServerMessage::Welcome {
                        player_id: player_id.clone(),
                    },
                );
                Ok((player_id, nickname))
            }
            Ok(_) | Err(_) => {
                send(
                    out_tx,
                    ServerMessage::Error {
                        code: 400,
                        message: "expected Hello".into(),
                    },
                );
                Err(ProtocolError::InvalidMessage("first message must be Hello".into()).into())
            }
        };
    }
}

async fn dispatch(
    player_id: &PlayerId,
    nickname: &str,
    msg: ClientMessage,
    out_tx: &mpsc::UnboundedSender<ServerMessage>,
    state: &Arc<ServerState>,
) {
    match msg {
        ClientMessage::Hello { .. } => {
            send(
                out_tx,
                ServerMessage::Error {
                    code: 400,
                    message: "already introduced".into(),
                },
            );
        }

        ClientMessage::CreateRoom { name } => {
            let room_id = state.rooms.lock().await.create_room(name);
            send(out_tx, ServerMessage::RoomCreated { room_id });
        }

        ClientMessage::JoinRoom { room_id } => {
            let (room_tx, room_rx) = mpsc::unbounded_channel();
            let result = {
                let mut rooms = state.rooms.lock().await;
                rooms
                    .join_room(player_id.clone(), nickname.to_owned(), room_id, room_tx)
                    .await
            };
            match result {
                Ok(()) => {
                    // Reply before pumping the room channel, so the client
                    // sees RoomJoined ahead of the join snapshot.
                    send(out_tx, ServerMessage::RoomJoined { room_id });
                    spawn_room_forward(room_rx, out_tx.clone());
                }
                Err(e) => send_room_error(out_tx, &e),
            }
        }

        ClientMessage::LeaveRoom => {
            let result = state.rooms.lock().await.leave_room(player_id).await;
            match result {
                Ok(()) => send(out_tx, ServerMessage::RoomLeft),
                Err(e) => send_room_error(out_tx, &e),
            }
        }

        ClientMessage::ListRooms => {
            let rooms = state.rooms.lock().await.list_rooms().await;
            send(out_tx, ServerMessage::RoomList { rooms });
        }

        ClientMessage::GetSnapshot => {
            let result = {
                let rooms = state.rooms.lock().await;
                rooms.snapshot(player_id).await
            };
            match result {
                Ok(snapshot) => send(out_tx, ServerMessage::Snapshot { snapshot }),
                Err(e) => send_room_error(out_tx, &e),
            }
        }

        ClientMessage::Action { action } => {
            let result = {
                let rooms = state.rooms.lock().await;
                rooms.route_action(player_id, action).await
            };
            // An accepted action answers through the room broadcast; a
            // rejected one is intentionally silent. Only routing failures
            // (not in a room, room gone) get an error reply.
            if let Err(e) = result {
                send_room_error(out_tx, &e);
            }
        }
    }
}

/// Forwards one room subscription into the connection's writer channel.
/// Ends when the room drops the player's sender or the connection closes.
fn spawn_room_forward(
    mut room_rx: mpsc::UnboundedReceiver<RoomOutbound>,
    out_tx: mpsc::UnboundedSender<ServerMessage>,
) {
    tokio::spawn(async move {
        while let Some(outbound) = room_rx.recv().await {
            let msg = match outbound {
                RoomOutbound::Snapshot(snapshot) => ServerMessage::Snapshot { snapshot },
                RoomOutbound::State(state) => ServerMessage::State { state },
            };
            if out_tx.send(msg).is_err() {
                break;
            }
        }
    });
}

/// Drains the connection's outbound channel into the WebSocket sink.
async fn write_loop(
    mut ws_tx: WsSink,
    mut out_rx: mpsc::UnboundedReceiver<ServerMessage>,
    codec: JsonCodec,
) {
    while let Some(msg) = out_rx.recv().await {
        let bytes = match codec.encode(&msg) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(error = %e, "failed to encode server message");
                continue;
            }
        };
        let Ok(text) = String::from_utf8(bytes) else {
            continue;
        };
        if ws_tx.send(Message::Text(text.into())).await.is_err() {
            break;
        }
    }
    let _ = ws_tx.close().await;
}

fn send(out_tx: &mpsc::UnboundedSender<ServerMessage>, msg: ServerMessage) {
    let _ = out_tx.send(msg);
}

fn send_room_error(out_tx: &mpsc::UnboundedSender<ServerMessage>, err: &RoomError) {
    let code = match err {
        RoomError::NotFound(_) => 404,
        RoomError::RoomFull(_) | RoomError::AlreadyInRoom(_, _) => 409,
        RoomError::Unavailable(_) => 503,
        RoomError::NotInRoom(_, _) | RoomError::NotInAnyRoom(_) => 400,
    };
    send(
        out_tx,
        ServerMessage::Error {
            code,
            message: err.to_string(),
        },
    );
}

/// Mints a fresh 32-character hex player id (128 bits of randomness).
fn mint_player_id() -> PlayerId {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    PlayerId::new(bytes.iter().map(|b| format!("{b:02x}")).collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minted_player_ids_are_hex_and_unique() {
        let a = mint_player_id();
        let b = mint_player_id();
        assert_eq!(a.as_str().len(), 32);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
