//! # Parlor
//!
//! An authoritative WebSocket server for small two-player turn-based
//! games (checkers and dominoes). Players are paired by a FIFO
//! matchmaking queue or meet in private rooms joined by code; every
//! move is validated server-side, each player receives their own
//! redacted state snapshot, and rooms are torn down on game end or
//! disconnect.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use parlor::ParlorServerBuilder;
//!
//! # async fn run() -> Result<(), parlor::ParlorError> {
//! let server = ParlorServerBuilder::new()
//!     .bind("0.0.0.0:8080")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::ParlorError;
pub use server::{ParlorServer, ParlorServerBuilder};

/// Convenience re-exports for embedding the server or writing clients.
pub mod prelude {
    pub use crate::{ParlorError, ParlorServer, ParlorServerBuilder};
    pub use parlor_games::{GameKind, MoveInput, RedactedState, Seat};
    pub use parlor_lobby::{Lobby, LobbyError};
    pub use parlor_protocol::{
        ClientMessage, PlayerId, PlayerProfile, RoomCode, ServerMessage,
    };
}
