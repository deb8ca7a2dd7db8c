//! Matchmaking and room lifecycle for Parlor.
//!
//! The [`Lobby`] is the single owner of all mutable lobby state — the
//! per-game matchmaking queues, the room registry, and the rating book.
//! It is a plain value injected into the message-handling entry point;
//! there are no process-wide registries. Every client request and the
//! disconnect event funnel through it and come back as a list of
//! addressed outbound messages for the session layer to deliver.
//!
//! # Key types
//!
//! - [`Lobby`] — the entry point for every client request
//! - [`MatchQueue`] — FIFO pairing of waiting players
//! - [`RoomRegistry`] — live rooms keyed by code, plus a membership index
//! - [`Room`] — two seats, one game, the turn-engine orchestration
//! - [`RatingBook`] — in-memory Elo, touched only by ranked terminals

mod error;
mod lobby;
mod queue;
mod ratings;
mod registry;
mod room;

pub use error::LobbyError;
pub use lobby::Lobby;
pub use queue::{MatchQueue, Ticket};
pub use ratings::{RatingBook, INITIAL_RATING};
pub use registry::RoomRegistry;
pub use room::{Outbound, Room, RoomKind};
