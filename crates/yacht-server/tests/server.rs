//! End-to-end tests: real server, real WebSocket clients, full games.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

use yacht_protocol::{
    Action, ClientMessage, PlayerId, RoomId, ServerMessage, StateKind, StateMessage,
};
use yacht_server::YachtServer;

type Ws = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

async fn start() -> String {
    let server = YachtServer::builder()
        .bind("127.0.0.1:0")
        .build()
        .await
        .unwrap();
    let addr = server.local_addr().unwrap().to_string();
    tokio::spawn(async move {
        let _ = server.run().await;
    });
    addr
}

async fn connect(addr: &str) -> Ws {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .unwrap();
    ws
}

async fn send(ws: &mut Ws, msg: &ClientMessage) {
    let text = serde_json::to_string(msg).unwrap();
    ws.send(Message::Text(text.into())).await.unwrap();
}

async fn recv(ws: &mut Ws) -> ServerMessage {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for server message")
            .expect("stream ended")
            .expect("websocket error");
        match msg {
            Message::Text(text) => return serde_json::from_str(&text).unwrap(),
            Message::Binary(data) => return serde_json::from_slice(&data).unwrap(),
            _ => continue,
        }
    }
}

async fn hello(ws: &mut Ws, nickname: &str) -> PlayerId {
    send(
        ws,
        &ClientMessage::Hello {
            nickname: nickname.into(),
        },
    )
    .await;
    match recv(ws).await {
        ServerMessage::Welcome { player_id } => player_id,
        other => panic!("expected Welcome, got {other:?}"),
    }
}

/// Joins a room, draining the RoomJoined reply and the join snapshot.
async fn join(ws: &mut Ws, room_id: RoomId) {
    send(ws, &ClientMessage::JoinRoom { room_id }).await;
    match recv(ws).await {
        ServerMessage::RoomJoined { .. } => {}
        other => panic!("expected RoomJoined, got {other:?}"),
    }
    match recv(ws).await {
        ServerMessage::Snapshot { .. } => {}
        other => panic!("expected join Snapshot, got {other:?}"),
    }
}

async fn create_and_join(ws: &mut Ws, name: &str) -> RoomId {
    send(
        ws,
        &ClientMessage::CreateRoom { name: name.into() },
    )
    .await;
    let room_id = match recv(ws).await {
        ServerMessage::RoomCreated { room_id } => room_id,
        other => panic!("expected RoomCreated, got {other:?}"),
    };
    join(ws, room_id).await;
    room_id
}

async fn act(ws: &mut Ws, action: Action) {
    send(ws, &ClientMessage::Action { action }).await;
}

async fn recv_state(ws: &mut Ws) -> StateMessage {
    match recv(ws).await {
        ServerMessage::State { state } => state,
        other => panic!("expected State, got {other:?}"),
    }
}

// =========================================================================
// Handshake and lobby
// =========================================================================

#[tokio::test]
async fn test_hello_assigns_distinct_player_ids() {
    let addr = start().await;

    let mut p1 = connect(&addr).await;
    let mut p2 = connect(&addr).await;
    let id1 = hello(&mut p1, "alice").await;
    let id2 = hello(&mut p2, "bob").await;

    assert!(!id1.is_unset());
    assert_eq!(id1.as_str().len(), 32);
    assert_ne!(id1, id2);
}

#[tokio::test]
async fn test_first_message_must_be_hello() {
    let addr = start().await;

    let mut ws = connect(&addr).await;
    send(
        &mut ws,
        &ClientMessage::CreateRoom {
            name: "early".into(),
        },
    )
    .await;

    match recv(&mut ws).await {
        ServerMessage::Error { code, .. } => assert_eq!(code, 400),
        other => panic!("expected Error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_join_unknown_room_returns_error() {
    let addr = start().await;

    let mut ws = connect(&addr).await;
    hello(&mut ws, "alice").await;
    send(
        &mut ws,
        &ClientMessage::JoinRoom {
            room_id: RoomId(u64::MAX),
        },
    )
    .await;

    match recv(&mut ws).await {
        ServerMessage::Error { code, .. } => assert_eq!(code, 404),
        other => panic!("expected Error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_list_rooms_shows_created_rooms() {
    let addr = start().await;

    let mut host = connect(&addr).await;
    hello(&mut host, "host").await;
    let room_id = create_and_join(&mut host, "friday night").await;

    let mut guest = connect(&addr).await;
    hello(&mut guest, "guest").await;
    send(&mut guest, &ClientMessage::ListRooms).await;

    match recv(&mut guest).await {
        ServerMessage::RoomList { rooms } => {
            let entry = rooms.iter().find(|e| e.room_id == room_id).unwrap();
            assert_eq!(entry.name, "friday night");
            assert_eq!(entry.player_count, 1);
        }
        other => panic!("expected RoomList, got {other:?}"),
    }
}

#[tokio::test]
async fn test_leave_room_then_snapshot_fails() {
    let addr = start().await;

    let mut ws = connect(&addr).await;
    hello(&mut ws, "alice").await;
    create_and_join(&mut ws, "brief stay").await;

    send(&mut ws, &ClientMessage::LeaveRoom).await;
    match recv(&mut ws).await {
        ServerMessage::RoomLeft => {}
        other => panic!("expected RoomLeft, got {other:?}"),
    }

    send(&mut ws, &ClientMessage::GetSnapshot).await;
    match recv(&mut ws).await {
        ServerMessage::Error { code, .. } => assert_eq!(code, 400),
        other => panic!("expected Error, got {other:?}"),
    }
}

// =========================================================================
// Game play
// =========================================================================

#[tokio::test]
async fn test_turn_ownership_is_enforced_over_the_wire() {
    let addr = start().await;

    let mut alice = connect(&addr).await;
    let alice_id = hello(&mut alice, "alice").await;
    let room_id = create_and_join(&mut alice, "duel").await;

    let mut bob = connect(&addr).await;
    let bob_id = hello(&mut bob, "bob").await;
    join(&mut bob, room_id).await;

    // Alice joined first, so she owns the first turn.
    act(&mut alice, Action::Start).await;
    for ws in [&mut alice, &mut bob] {
        let msg = recv_state(ws).await;
        assert_eq!(msg.message_type, StateKind::GameStart);
        assert_eq!(msg.data.current_turn_player_id, alice_id);
    }

    // Bob rolls out of turn: silently dropped. Alice rolls: broadcast.
    act(&mut bob, Action::Roll).await;
    act(&mut alice, Action::Roll).await;
    for ws in [&mut alice, &mut bob] {
        let msg = recv_state(ws).await;
        assert_eq!(msg.message_type, StateKind::Update);
        assert_eq!(msg.data.rolls_remaining, 2);
    }

    // Alice submits; the turn passes to Bob.
    act(&mut alice, Action::Submit { category_idx: 6 }).await;
    for ws in [&mut alice, &mut bob] {
        let msg = recv_state(ws).await;
        assert_eq!(msg.data.current_turn_player_id, bob_id);
        assert_eq!(msg.data.rolls_remaining, 3);
    }

    // Now Bob can roll.
    act(&mut bob, Action::Roll).await;
    let msg = recv_state(&mut bob).await;
    assert_eq!(msg.data.rolls_remaining, 2);
}

#[tokio::test]
async fn test_solo_game_to_completion() {
    let addr = start().await;

    let mut ws = connect(&addr).await;
    hello(&mut ws, "carol").await;
    create_and_join(&mut ws, "solo run").await;

    act(&mut ws, Action::Start).await;
    let msg = recv_state(&mut ws).await;
    assert_eq!(msg.message_type, StateKind::GameStart);

    let mut last = None;
    for category_idx in 0..12 {
        act(&mut ws, Action::Roll).await;
        let roll = recv_state(&mut ws).await;
        assert_eq!(roll.message_type, StateKind::Update);
        assert!(roll.data.dice_faces.iter().all(|f| (1..=6).contains(f)));

        act(&mut ws, Action::Submit { category_idx }).await;
        last = Some(recv_state(&mut ws).await);
    }

    let game_over = last.unwrap();
    assert_eq!(game_over.message_type, StateKind::GameOver);
    assert_eq!(game_over.winner_name.as_deref(), Some("carol"));
    assert!(
        game_over
            .content
            .as_deref()
            .unwrap()
            .starts_with("Game over!")
    );

    // The snapshot accessor reports the finished state.
    send(&mut ws, &ClientMessage::GetSnapshot).await;
    match recv(&mut ws).await {
        ServerMessage::Snapshot { snapshot } => {
            assert!(!snapshot.in_progress);
            assert!(snapshot.data.score_boards.values().all(|b| b.is_complete()));
        }
        other => panic!("expected Snapshot, got {other:?}"),
    }
}

#[tokio::test]
async fn test_late_joiner_receives_running_game_snapshot() {
    let addr = start().await;

    let mut alice = connect(&addr).await;
    let alice_id = hello(&mut alice, "alice").await;
    let room_id = create_and_join(&mut alice, "in progress").await;

    act(&mut alice, Action::Start).await;
    let _ = recv_state(&mut alice).await;
    act(&mut alice, Action::Roll).await;
    let _ = recv_state(&mut alice).await;

    // Bob joins mid-game and immediately sees the running state.
    let mut bob = connect(&addr).await;
    hello(&mut bob, "bob").await;
    send(&mut bob, &ClientMessage::JoinRoom { room_id }).await;
    match recv(&mut bob).await {
        ServerMessage::RoomJoined { .. } => {}
        other => panic!("expected RoomJoined, got {other:?}"),
    }
    match recv(&mut bob).await {
        ServerMessage::Snapshot { snapshot } => {
            assert!(snapshot.in_progress);
            assert_eq!(snapshot.data.current_turn_player_id, alice_id);
            assert_eq!(snapshot.data.rolls_remaining, 2);
            // Not part of the fixed turn order: no board for Bob.
            assert_eq!(snapshot.data.score_boards.len(), 1);
        }
        other => panic!("expected Snapshot, got {other:?}"),
    }
}
