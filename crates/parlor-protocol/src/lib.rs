//! Wire protocol for Parlor.
//!
//! This crate defines the "language" clients and the server speak:
//!
//! - **Types** ([`ClientMessage`], [`ServerMessage`], [`PlayerId`],
//!   [`RoomCode`], [`PlayerProfile`]) — the structures that travel on
//!   the wire as internally tagged JSON objects.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages are
//!   converted to and from text frames.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while encoding
//!   or decoding.
//!
//! The protocol layer sits between transport (raw frames) and the lobby
//! (rooms and matchmaking). It knows nothing about connections or game
//! rules beyond the payload shapes re-exported from `parlor-games`.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientMessage, PlayerId, PlayerProfile, RoomCode, ServerMessage,
};
