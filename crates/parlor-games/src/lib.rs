//! Game rules for Parlor.
//!
//! Everything in this crate is pure: validators take a state and a
//! proposed move and return a delta (or a [`MoveError`]), `apply`
//! mutates a state the caller owns, and views are recomputed projections.
//! No I/O, no clocks, no player identity — states track turns by
//! [`Seat`], and the room layer maps seats to real players.
//!
//! # Key types
//!
//! - [`GameState`] — closed enum over the supported rule sets
//! - [`MoveInput`] / [`RedactedState`] — the wire-facing move and view shapes
//! - [`Seat`], [`Terminal`], [`EndReason`] — shared across variants
//! - [`MoveError`] — validator rejections

pub mod checkers;
pub mod dominoes;
mod error;
mod game;

pub use error::MoveError;
pub use game::{
    EndReason, GameKind, GameState, MoveDelta, MoveInput, RedactedState,
    Seat, Terminal,
};
