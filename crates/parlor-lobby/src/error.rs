//! Error types for the lobby layer.

use parlor_games::MoveError;
use parlor_protocol::RoomCode;

/// Why a lobby request was refused.
///
/// Every variant is surfaced to the originating client only, as an
/// `error` message; none of them affect the room or the other player.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LobbyError {
    /// The player is already waiting in a matchmaking queue.
    #[error("already searching for a match")]
    AlreadyQueued,

    /// The player is already seated in a room.
    #[error("already seated in a room")]
    AlreadyInRoom,

    /// No live room has this code.
    #[error("room {0} not found")]
    RoomNotFound(RoomCode),

    /// Both seats of the room are taken.
    #[error("room {0} is full")]
    RoomFull(RoomCode),

    /// The request names a room the player is not seated in.
    #[error("not in that room")]
    NotInRoom,

    /// The move itself was rejected by the game rules.
    #[error(transparent)]
    Move(#[from] MoveError),
}
