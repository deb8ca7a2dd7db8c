//! Core protocol types: identities and the message taxonomy.
//!
//! Every message is an internally tagged JSON object — a `"type"` field
//! names the variant, the remaining fields sit beside it in camelCase.
//! Browser clients read these directly, so the exact JSON shapes are
//! pinned down by the tests at the bottom of this file.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use parlor_games::{GameKind, MoveInput, RedactedState, Seat};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique, opaque identifier for a player.
///
/// Allocated by the session layer and deliberately decoupled from the
/// transport connection, so the same identity could be re-attached to a
/// new connection later without the lobby noticing.
///
/// `#[serde(transparent)]` serializes a `PlayerId(42)` as plain `42`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A short room code, unique among live rooms.
///
/// Codes are case-insensitive on the wire: the constructor (and the
/// `Deserialize` impl, which goes through it) normalizes to uppercase,
/// so a client may type `kq7x2` for a room created as `KQ7X2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomCode(String);

impl RoomCode {
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for RoomCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RoomCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.trim().is_empty() {
            return Err(D::Error::custom("room code must not be empty"));
        }
        Ok(RoomCode::new(raw))
    }
}

// ---------------------------------------------------------------------------
// Public player info
// ---------------------------------------------------------------------------

/// What one player is allowed to know about another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub name: String,
    /// Present for ranked play, absent in private rooms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u32>,
}

// ---------------------------------------------------------------------------
// Client → Server
// ---------------------------------------------------------------------------

/// Everything a client can ask the server to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Enter the matchmaking queue for a game.
    FindMatch { game: GameKind, name: String },

    /// Leave the matchmaking queue. A no-op if already paired.
    CancelSearch,

    /// Allocate a private room and take its first seat.
    CreateRoom { game: GameKind, name: String },

    /// Take the second seat of a private room. The code is
    /// case-insensitive.
    JoinRoom { code: RoomCode, name: String },

    /// Play a move in the named room.
    PlayMove {
        code: RoomCode,
        #[serde(rename = "move")]
        mv: MoveInput,
    },

    /// Explicitly draw a tile from the shared pool.
    DrawFromPool,

    /// Leave the current room. Mid-game this forfeits.
    LeaveRoom,
}

// ---------------------------------------------------------------------------
// Server → Client
// ---------------------------------------------------------------------------

/// Everything the server can tell a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// First message on every connection: the client's assigned identity.
    Welcome { player_id: PlayerId },

    /// Progress report while waiting in the queue.
    SearchStatus { message: String },

    /// A private room was allocated; share the code with a friend.
    RoomCreated { code: RoomCode },

    /// The queue (or a private room join) produced an opponent.
    MatchFound { opponent: PlayerProfile },

    /// The game begins. `seat` is the recipient's position; `state` is
    /// their own projection of the fresh game.
    GameStart {
        code: RoomCode,
        seat: Seat,
        state: RedactedState,
    },

    /// A new state snapshot after an accepted move, projected for the
    /// recipient.
    GameUpdate { state: RedactedState },

    /// The game is over and the room is gone. `winner` is `null` for a
    /// draw.
    GameEnd {
        winner: Option<PlayerId>,
        reason: String,
    },

    /// A rejection, delivered only to the client whose request failed.
    Error { message: String },
}

// =========================================================================
// Tests
// =========================================================================
