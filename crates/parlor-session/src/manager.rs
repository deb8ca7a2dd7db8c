//! The session manager: tracks every connected player.
//!
//! # Concurrency note
//!
//! `SessionManager` is NOT thread-safe by itself — it's a plain
//! `HashMap` owned by the server state and accessed through a mutex at
//! a higher level. Keeping it simple here avoids hidden locking.

use std::collections::HashMap;

use parlor_protocol::{PlayerId, ServerMessage};
use tokio::sync::mpsc;

/// One connected player.
#[derive(Debug)]
pub struct Session {
    pub player_id: PlayerId,
    /// Display name, once the player has sent a message carrying one.
    pub name: Option<String>,
    /// Outbound channel drained by the connection's writer task.
    sender: mpsc::UnboundedSender<ServerMessage>,
}

/// Registry of connected players and their outbound channels.
///
/// Also the allocator for [`PlayerId`]s — the counter lives here rather
/// than in a process-wide static so the whole registry has an explicit
/// owner and lifecycle.
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: HashMap<PlayerId, Session>,
    next_id: u64,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new connection: allocates a fresh id and stores the
    /// outbound channel.
    pub fn open(&mut self, sender: mpsc::UnboundedSender<ServerMessage>) -> PlayerId {
        self.next_id += 1;
        let player_id = PlayerId(self.next_id);
        self.sessions.insert(
            player_id,
            Session {
                player_id,
                name: None,
                sender,
            },
        );
        tracing::info!(%player_id, "session opened");
        player_id
    }

    /// Removes a session. Idempotent: closing an unknown or already
    /// closed session is a no-op.
    pub fn close(&mut self, player_id: PlayerId) {
        if self.sessions.remove(&player_id).is_some() {
            tracing::info!(%player_id, "session closed");
        }
    }

    /// Records the display name a player introduced themselves with.
    pub fn set_name(&mut self, player_id: PlayerId, name: &str) {
        if let Some(session) = self.sessions.get_mut(&player_id) {
            session.name = Some(name.to_string());
        }
    }

    pub fn get(&self, player_id: PlayerId) -> Option<&Session> {
        self.sessions.get(&player_id)
    }

    pub fn connected(&self) -> usize {
        self.sessions.len()
    }

    /// Best-effort delivery: if the player is gone or their channel is
    /// closed the message is dropped, never queued or retried.
    pub fn deliver(&self, player_id: PlayerId, message: ServerMessage) {
        let Some(session) = self.sessions.get(&player_id) else {
            tracing::debug!(%player_id, "dropping message for unknown session");
            return;
        };
        if session.sender.send(message).is_err() {
            tracing::debug!(%player_id, "dropping message for closed channel");
        }
    }

    /// Delivers a batch of addressed messages, each best-effort.
    pub fn deliver_all(
        &self,
        messages: impl IntoIterator<Item = (PlayerId, ServerMessage)>,
    ) {
        for (player_id, message) in messages {
            self.deliver(player_id, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn welcome(id: u64) -> ServerMessage {
        ServerMessage::Welcome {
            player_id: PlayerId(id),
        }
    }

    #[test]
    fn test_open_allocates_distinct_ids() {
        let mut manager = SessionManager::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let a = manager.open(tx.clone());
        let b = manager.open(tx);
        assert_ne!(a, b);
        assert_eq!(manager.connected(), 2);
    }

    #[test]
    fn test_deliver_reaches_the_channel() {
        let mut manager = SessionManager::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = manager.open(tx);
        manager.deliver(id, welcome(1));
        assert_eq!(rx.try_recv().unwrap(), welcome(1));
    }

    #[test]
    fn test_deliver_to_unknown_player_is_dropped() {
        let manager = SessionManager::new();
        // Must not panic or error.
        manager.deliver(PlayerId(99), welcome(1));
    }

    #[test]
    fn test_deliver_after_receiver_dropped_is_dropped() {
        let mut manager = SessionManager::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let id = manager.open(tx);
        drop(rx);
        manager.deliver(id, welcome(1));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut manager = SessionManager::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = manager.open(tx);
        manager.close(id);
        manager.close(id);
        assert_eq!(manager.connected(), 0);
    }

    #[test]
    fn test_set_name_sticks() {
        let mut manager = SessionManager::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = manager.open(tx);
        manager.set_name(id, "ada");
        assert_eq!(manager.get(id).unwrap().name.as_deref(), Some("ada"));
    }
}
