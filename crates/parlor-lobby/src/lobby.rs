//! The lobby: the single entry point for every client request.
//!
//! Each handler locks nothing and blocks on nothing — the caller holds
//! the lobby behind one mutex, so all room mutations are serialized.
//! Handlers return the full list of addressed outbound messages the
//! request produced; rejections come back as a [`LobbyError`] for the
//! originator alone.

use std::collections::HashMap;
use std::time::Instant;

use parlor_games::{EndReason, GameKind, MoveInput};
use parlor_protocol::{
    ClientMessage, PlayerId, PlayerProfile, RoomCode, ServerMessage,
};

use crate::queue::Ticket;
use crate::room::Outbound;
use crate::{LobbyError, MatchQueue, RatingBook, Room, RoomKind, RoomRegistry};

/// Owns the queues, the room registry, and the rating book.
#[derive(Debug, Default)]
pub struct Lobby {
    queues: HashMap<GameKind, MatchQueue>,
    registry: RoomRegistry,
    ratings: RatingBook,
}

impl Lobby {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatches one client request.
    pub fn handle_message(
        &mut self,
        player: PlayerId,
        message: ClientMessage,
    ) -> Result<Vec<Outbound>, LobbyError> {
        match message {
            ClientMessage::FindMatch { game, name } => {
                self.find_match(player, game, name)
            }
            ClientMessage::CancelSearch => Ok(self.cancel_search(player)),
            ClientMessage::CreateRoom { game, name } => {
                self.create_room(player, game, name)
            }
            ClientMessage::JoinRoom { code, name } => {
                self.join_room(player, code, name)
            }
            ClientMessage::PlayMove { code, mv } => {
                self.play_move(player, code, &mv)
            }
            ClientMessage::DrawFromPool => self.draw_from_pool(player),
            ClientMessage::LeaveRoom => Ok(self.leave_room(player)),
        }
    }

    /// Handles a dropped connection. Idempotent and infallible: a
    /// disconnect for a player with no ticket and no room — or one whose
    /// room was already torn down — is a silent no-op.
    pub fn handle_disconnect(&mut self, player: PlayerId) -> Vec<Outbound> {
        self.queues.values_mut().any(|q| q.cancel(player));

        let Some(code) = self.registry.room_of(player).cloned() else {
            return Vec::new();
        };
        tracing::info!(%player, %code, "player disconnected mid-room");
        self.abandon_room(player, &code, EndReason::OpponentDisconnected, false)
    }

    pub fn rating(&self, player: PlayerId) -> u32 {
        self.ratings.rating(player)
    }

    pub fn live_rooms(&self) -> usize {
        self.registry.len()
    }

    // -----------------------------------------------------------------
    // Matchmaking
    // -----------------------------------------------------------------

    fn find_match(
        &mut self,
        player: PlayerId,
        game: GameKind,
        name: String,
    ) -> Result<Vec<Outbound>, LobbyError> {
        self.ensure_unseated(player)?;
        self.ensure_unqueued(player)?;

        let queue = self.queues.entry(game).or_default();
        queue.enqueue(Ticket {
            player,
            name,
            queued_at: Instant::now(),
        })?;
        tracing::info!(%player, %game, waiting = queue.len(), "queued for match");

        let Some((first, second)) = queue.try_pair() else {
            return Ok(vec![(
                player,
                ServerMessage::SearchStatus {
                    message: "searching for an opponent".into(),
                },
            )]);
        };

        let code = self.registry.generate_code(&mut rand::rng());
        tracing::info!(
            %code,
            %game,
            first = %first.player,
            second = %second.player,
            "match found"
        );
        let mut room = Room::pending(
            code,
            RoomKind::Ranked,
            game,
            (first.player, self.ranked_profile(first.player, first.name)),
        );
        let out = room.start(
            (second.player, self.ranked_profile(second.player, second.name)),
            &mut rand::rng(),
        );
        self.registry.insert(room);
        Ok(out)
    }

    fn cancel_search(&mut self, player: PlayerId) -> Vec<Outbound> {
        let removed = self.queues.values_mut().any(|q| q.cancel(player));
        if removed {
            tracing::info!(%player, "left the queue");
            vec![(
                player,
                ServerMessage::SearchStatus {
                    message: "search cancelled".into(),
                },
            )]
        } else {
            // Cancel raced against pairing (or was never queued): no-op.
            Vec::new()
        }
    }

    // -----------------------------------------------------------------
    // Private rooms
    // -----------------------------------------------------------------

    fn create_room(
        &mut self,
        player: PlayerId,
        game: GameKind,
        name: String,
    ) -> Result<Vec<Outbound>, LobbyError> {
        self.ensure_unseated(player)?;
        self.ensure_unqueued(player)?;

        let code = self.registry.generate_code(&mut rand::rng());
        let room = Room::pending(
            code.clone(),
            RoomKind::Casual,
            game,
            (player, PlayerProfile { name, rating: None }),
        );
        self.registry.insert(room);
        tracing::info!(%player, %code, %game, "private room created");
        Ok(vec![(player, ServerMessage::RoomCreated { code })])
    }

    fn join_room(
        &mut self,
        player: PlayerId,
        code: RoomCode,
        name: String,
    ) -> Result<Vec<Outbound>, LobbyError> {
        self.ensure_unseated(player)?;
        self.ensure_unqueued(player)?;

        let room = self
            .registry
            .get_mut(&code)
            .ok_or_else(|| LobbyError::RoomNotFound(code.clone()))?;
        if !room.is_pending() {
            return Err(LobbyError::RoomFull(code));
        }
        let out = room.start(
            (player, PlayerProfile { name, rating: None }),
            &mut rand::rng(),
        );
        self.registry.register_member(player, code.clone());
        tracing::info!(%player, %code, "joined private room");
        Ok(out)
    }

    // -----------------------------------------------------------------
    // In-game
    // -----------------------------------------------------------------

    fn play_move(
        &mut self,
        player: PlayerId,
        code: RoomCode,
        mv: &MoveInput,
    ) -> Result<Vec<Outbound>, LobbyError> {
        let current = self
            .registry
            .room_of(player)
            .cloned()
            .ok_or(LobbyError::NotInRoom)?;
        if current != code {
            return Err(LobbyError::NotInRoom);
        }
        let room = self
            .registry
            .get_mut(&current)
            .expect("membership points at a live room");
        let out = room.play(player, mv)?;
        if room.is_finished() {
            self.finish_room(&current);
        }
        Ok(out)
    }

    fn draw_from_pool(
        &mut self,
        player: PlayerId,
    ) -> Result<Vec<Outbound>, LobbyError> {
        let current = self
            .registry
            .room_of(player)
            .cloned()
            .ok_or(LobbyError::NotInRoom)?;
        let room = self
            .registry
            .get_mut(&current)
            .expect("membership points at a live room");
        Ok(room.draw_from_pool(player)?)
    }

    fn leave_room(&mut self, player: PlayerId) -> Vec<Outbound> {
        let Some(code) = self.registry.room_of(player).cloned() else {
            // Leaving while not in a room is harmless.
            return Vec::new();
        };
        tracing::info!(%player, %code, "leaving room");
        self.abandon_room(player, &code, EndReason::OpponentLeft, true)
    }

    // -----------------------------------------------------------------
    // Teardown
    // -----------------------------------------------------------------

    /// Handles a player departing a room they are indexed in, whether by
    /// an explicit leave or a dropped connection.
    fn abandon_room(
        &mut self,
        player: PlayerId,
        code: &RoomCode,
        reason: EndReason,
        notify_leaver: bool,
    ) -> Vec<Outbound> {
        let Some(room) = self.registry.get_mut(code) else {
            return Vec::new();
        };
        if room.is_pending() {
            self.registry.remove(code);
            return Vec::new();
        }
        let out = room.forfeit(player, reason, notify_leaver);
        self.finish_room(code);
        out
    }

    /// Tears down a finished room, settling ratings for ranked play.
    fn finish_room(&mut self, code: &RoomCode) {
        let Some(room) = self.registry.remove(code) else {
            return;
        };
        if room.kind() == RoomKind::Ranked {
            if let (Some((winner, _)), Some((a, b))) =
                (room.result(), room.player_pair())
            {
                match winner {
                    Some(w) => {
                        let loser = if w == a { b } else { a };
                        self.ratings.record_win(w, loser);
                    }
                    None => self.ratings.record_draw(a, b),
                }
            }
        }
    }

    // -----------------------------------------------------------------
    // Guards
    // -----------------------------------------------------------------

    fn ensure_unseated(&self, player: PlayerId) -> Result<(), LobbyError> {
        if self.registry.room_of(player).is_some() {
            return Err(LobbyError::AlreadyInRoom);
        }
        Ok(())
    }

    fn ensure_unqueued(&self, player: PlayerId) -> Result<(), LobbyError> {
        if self.queues.values().any(|q| q.contains(player)) {
            return Err(LobbyError::AlreadyQueued);
        }
        Ok(())
    }

    fn ranked_profile(&self, player: PlayerId, name: String) -> PlayerProfile {
        PlayerProfile {
            name,
            rating: Some(self.ratings.rating(player)),
        }
    }
}
