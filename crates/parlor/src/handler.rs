//! Per-connection handler: session setup, message routing, teardown.
//!
//! Each accepted connection gets its own task running this handler,
//! plus a writer task that drains the player's outbound channel onto
//! the socket. The flow is:
//!   1. Open a session → the player's opaque id is born
//!   2. Send `welcome` with that id
//!   3. Loop: receive frames → decode → hand to the lobby → deliver the
//!      addressed replies (rejections go to the sender alone)
//!   4. On any exit: lobby disconnect (forfeit, teardown) → close session

use std::sync::Arc;

use parlor_protocol::{ClientMessage, Codec, PlayerId, ServerMessage};
use parlor_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::server::ServerState;
use crate::ParlorError;

pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    state: Arc<ServerState>,
) -> Result<(), ParlorError> {
    let conn_id = conn.id();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    let player_id = state.sessions.lock().await.open(tx);
    tracing::info!(%conn_id, %player_id, "player connected");

    // Writer task: encodes and pushes outbound messages. Ends when the
    // session closes (channel sender dropped) or the socket breaks;
    // either way delivery stays best-effort, at-most-once.
    let writer_conn = conn.clone();
    let codec = state.codec;
    tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let text = match codec.encode(&message) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to encode outbound message");
                    continue;
                }
            };
            if writer_conn.send(&text).await.is_err() {
                break;
            }
        }
    });

    state
        .sessions
        .lock()
        .await
        .deliver(player_id, ServerMessage::Welcome { player_id });

    loop {
        let text = match conn.recv().await {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::info!(%player_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "recv error");
                break;
            }
        };

        let message: ClientMessage = match state.codec.decode(&text) {
            Ok(message) => message,
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "undecodable frame");
                state.sessions.lock().await.deliver(
                    player_id,
                    ServerMessage::Error {
                        message: format!("could not parse message: {e}"),
                    },
                );
                continue;
            }
        };

        dispatch(&state, player_id, message).await;
    }

    // Teardown. The forfeit broadcast is delivered before this player's
    // channel is dropped; their own copy is addressed to no one anyway.
    let outbound = state.lobby.lock().await.handle_disconnect(player_id);
    let mut sessions = state.sessions.lock().await;
    sessions.deliver_all(outbound);
    sessions.close(player_id);
    Ok(())
}

/// Routes one decoded message through the lobby and delivers the result.
///
/// The lobby lock is released before the session lock is taken, so the
/// two are never nested.
async fn dispatch(
    state: &Arc<ServerState>,
    player_id: PlayerId,
    message: ClientMessage,
) {
    // Remember the display name the player introduced themselves with.
    if let ClientMessage::FindMatch { name, .. }
    | ClientMessage::CreateRoom { name, .. }
    | ClientMessage::JoinRoom { name, .. } = &message
    {
        state.sessions.lock().await.set_name(player_id, name);
    }

    let result = {
        let mut lobby = state.lobby.lock().await;
        lobby.handle_message(player_id, message)
    };

    let sessions = state.sessions.lock().await;
    match result {
        Ok(outbound) => sessions.deliver_all(outbound),
        Err(e) => {
            tracing::debug!(%player_id, error = %e, "request rejected");
            sessions.deliver(
                player_id,
                ServerMessage::Error {
                    message: e.to_string(),
                },
            );
        }
    }
}
