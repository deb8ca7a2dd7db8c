//! End-to-end tests: real server, real WebSocket clients, JSON frames.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use parlor::ParlorServerBuilder;
use serde_json::{json, Value};
use tokio_tungstenite::tungstenite::Message;

type Ws = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

async fn start() -> String {
    let server = ParlorServerBuilder::new()
        .bind("127.0.0.1:0")
        .build()
        .await
        .unwrap();
    let addr = server.local_addr().unwrap().to_string();
    tokio::spawn(async move {
        let _ = server.run().await;
    });
    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}

async fn send(ws: &mut Ws, value: Value) {
    ws.send(Message::text(value.to_string())).await.unwrap();
}

async fn recv(ws: &mut Ws) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("receive timeout")
            .expect("stream ended")
            .expect("websocket error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).expect("frame is JSON");
        }
    }
}

/// Connects and drains the `welcome`, returning the assigned player id.
async fn connect(addr: &str) -> (Ws, u64) {
    let (mut ws, _) =
        tokio_tungstenite::connect_async(format!("ws://{addr}"))
            .await
            .expect("client connect");
    let welcome = recv(&mut ws).await;
    assert_eq!(welcome["type"], "welcome");
    let player_id = welcome["playerId"].as_u64().expect("playerId");
    (ws, player_id)
}

fn find_match(game: &str, name: &str) -> Value {
    json!({ "type": "findMatch", "game": game, "name": name })
}

/// Drains `matchFound` + `gameStart` and returns (room code, seat).
async fn drain_start(ws: &mut Ws) -> (String, u64) {
    let found = recv(ws).await;
    assert_eq!(found["type"], "matchFound");
    let start = recv(ws).await;
    assert_eq!(start["type"], "gameStart");
    (
        start["code"].as_str().unwrap().to_string(),
        start["seat"].as_u64().unwrap(),
    )
}

/// Pairs two fresh clients into a room, returned in seat order as
/// ((ws, player_id), (ws, player_id), code).
async fn pair(addr: &str, game: &str) -> ((Ws, u64), (Ws, u64), String) {
    let (mut c1, id1) = connect(addr).await;
    let (mut c2, id2) = connect(addr).await;

    send(&mut c1, find_match(game, "ada")).await;
    let status = recv(&mut c1).await;
    assert_eq!(status["type"], "searchStatus");
    send(&mut c2, find_match(game, "grace")).await;

    let (code1, seat1) = drain_start(&mut c1).await;
    let (code2, seat2) = drain_start(&mut c2).await;
    assert_eq!(code1, code2);
    assert_eq!(seat1, 0, "first ticket takes seat 0");
    assert_eq!(seat2, 1);
    ((c1, id1), (c2, id2), code1)
}

#[tokio::test]
async fn test_welcome_carries_distinct_ids() {
    let addr = start().await;
    let (_c1, id1) = connect(&addr).await;
    let (_c2, id2) = connect(&addr).await;
    assert_ne!(id1, id2);
}

#[tokio::test]
async fn test_unparseable_frame_answered_with_error() {
    let addr = start().await;
    let (mut c1, _) = connect(&addr).await;
    c1.send(Message::text("this is not json")).await.unwrap();
    let reply = recv(&mut c1).await;
    assert_eq!(reply["type"], "error");
}

#[tokio::test]
async fn test_matchmaking_pairs_first_two() {
    let addr = start().await;
    let ((_c1, _), (_c2, _), _code) = pair(&addr, "checkers").await;

    // A third searcher just waits.
    let (mut c3, _) = connect(&addr).await;
    send(&mut c3, find_match("checkers", "trent")).await;
    let status = recv(&mut c3).await;
    assert_eq!(status["type"], "searchStatus");
}

#[tokio::test]
async fn test_checkers_move_broadcasts_to_both() {
    let addr = start().await;
    let ((mut c1, _), (mut c2, _), code) = pair(&addr, "checkers").await;

    send(
        &mut c1,
        json!({
            "type": "playMove",
            "code": code,
            "move": { "game": "checkers", "from": [2, 1], "path": [[3, 2]] },
        }),
    )
    .await;

    for ws in [&mut c1, &mut c2] {
        let update = recv(ws).await;
        assert_eq!(update["type"], "gameUpdate");
        let state = &update["state"];
        assert_eq!(state["game"], "checkers");
        assert_eq!(state["turn"], 1);
        assert_eq!(state["turnCounter"], 1);
        assert_eq!(state["board"][3][2]["color"], "red");
        assert!(state["board"][2][1].is_null());
    }
}

#[tokio::test]
async fn test_out_of_turn_move_rejected_to_sender_only() {
    let addr = start().await;
    let ((mut c1, _), (mut c2, _), code) = pair(&addr, "checkers").await;

    // Seat 1 tries to move first and is told off.
    send(
        &mut c2,
        json!({
            "type": "playMove",
            "code": code,
            "move": { "game": "checkers", "from": [5, 0], "path": [[4, 1]] },
        }),
    )
    .await;
    let reply = recv(&mut c2).await;
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["message"], "not your turn");

    // Seat 0 heard nothing: the very next thing it receives is the
    // update for its own legal move.
    send(
        &mut c1,
        json!({
            "type": "playMove",
            "code": code,
            "move": { "game": "checkers", "from": [2, 1], "path": [[3, 2]] },
        }),
    )
    .await;
    let update = recv(&mut c1).await;
    assert_eq!(update["type"], "gameUpdate");
}

#[tokio::test]
async fn test_draw_with_play_available_rejected() {
    let addr = start().await;
    let ((mut c1, _), (_c2, _), _code) = pair(&addr, "dominoes").await;

    // The opener always has a playable tile (empty chain), so an
    // explicit draw request bounces.
    send(&mut c1, json!({ "type": "drawFromPool" })).await;
    let reply = recv(&mut c1).await;
    assert_eq!(reply["type"], "error");
}

#[tokio::test]
async fn test_dominoes_game_start_views() {
    let addr = start().await;
    let (mut c1, _) = connect(&addr).await;
    let (mut c2, _) = connect(&addr).await;

    send(&mut c1, find_match("dominoes", "ada")).await;
    let _ = recv(&mut c1).await; // searchStatus
    send(&mut c2, find_match("dominoes", "grace")).await;

    let _ = recv(&mut c1).await; // matchFound
    let start = recv(&mut c1).await;
    assert_eq!(start["type"], "gameStart");
    let state = &start["state"];
    assert_eq!(state["game"], "dominoes");
    assert_eq!(state["hand"].as_array().unwrap().len(), 7);
    assert_eq!(state["opponentCount"], 7);
    assert_eq!(state["boneyardCount"], 14);
    assert!(state["chain"].as_array().unwrap().is_empty());
    // The opponent's tiles never appear, only their count.
    assert!(state.get("hands").is_none());
}

#[tokio::test]
async fn test_disconnect_forfeits_to_remaining_player() {
    let addr = start().await;
    let ((mut c1, id1), (c2, _), _code) = pair(&addr, "checkers").await;

    drop(c2); // abrupt disconnect

    let end = recv(&mut c1).await;
    assert_eq!(end["type"], "gameEnd");
    assert_eq!(end["winner"].as_u64(), Some(id1));
    assert_eq!(end["reason"], "opponent disconnected");
}

#[tokio::test]
async fn test_private_room_flow() {
    let addr = start().await;
    let (mut c1, _) = connect(&addr).await;
    let (mut c2, _) = connect(&addr).await;
    let (mut c3, _) = connect(&addr).await;

    send(
        &mut c1,
        json!({ "type": "createRoom", "game": "dominoes", "name": "ada" }),
    )
    .await;
    let created = recv(&mut c1).await;
    assert_eq!(created["type"], "roomCreated");
    let code = created["code"].as_str().unwrap().to_string();

    // Joining with the lowercased code works.
    send(
        &mut c2,
        json!({
            "type": "joinRoom",
            "code": code.to_ascii_lowercase(),
            "name": "grace",
        }),
    )
    .await;
    let (code1, seat1) = drain_start(&mut c1).await;
    let (code2, seat2) = drain_start(&mut c2).await;
    assert_eq!(code1, code);
    assert_eq!(code2, code);
    assert_eq!(seat1, 0);
    assert_eq!(seat2, 1);

    // The room is full now.
    send(
        &mut c3,
        json!({ "type": "joinRoom", "code": code, "name": "trent" }),
    )
    .await;
    let reply = recv(&mut c3).await;
    assert_eq!(reply["type"], "error");
    assert!(reply["message"].as_str().unwrap().contains("full"));
}

#[tokio::test]
async fn test_cancel_search_frees_the_ticket() {
    let addr = start().await;
    let (mut c1, _) = connect(&addr).await;
    send(&mut c1, find_match("checkers", "ada")).await;
    let _ = recv(&mut c1).await; // searchStatus
    send(&mut c1, json!({ "type": "cancelSearch" })).await;
    let cancelled = recv(&mut c1).await;
    assert_eq!(cancelled["type"], "searchStatus");
    assert_eq!(cancelled["message"], "search cancelled");

    // The next two searchers pair with each other, not with c1.
    let ((_c2, _), (_c3, _), _code) = pair(&addr, "checkers").await;
}

#[tokio::test]
async fn test_second_search_while_queued_rejected() {
    let addr = start().await;
    let (mut c1, _) = connect(&addr).await;
    send(&mut c1, find_match("checkers", "ada")).await;
    let _ = recv(&mut c1).await; // searchStatus
    send(&mut c1, find_match("checkers", "ada")).await;
    let reply = recv(&mut c1).await;
    assert_eq!(reply["type"], "error");
    assert!(reply["message"].as_str().unwrap().contains("already"));
}
