//! Shared types and the dispatch layer over the two rule sets.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::checkers::{self, CheckersMove, CheckersState, CheckersView};
use crate::dominoes::{self, DominoMove, DominoesState, DominoesView};
use crate::MoveError;

// ---------------------------------------------------------------------------
// Seat
// ---------------------------------------------------------------------------

/// One of the two positions at the table, `0` or `1`.
///
/// Game states are identity-free: they only know which *seat* moves next.
/// The room layer owns the seat → player mapping, so a player's identity
/// can outlive a connection without the rules ever noticing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seat(pub u8);

impl Seat {
    /// The seat that opens the game.
    pub const FIRST: Seat = Seat(0);
    /// The seat that moves second.
    pub const SECOND: Seat = Seat(1);

    /// Returns the other seat.
    pub fn opponent(self) -> Seat {
        Seat(1 - self.0)
    }

    /// Index into two-element per-seat arrays.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "seat-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// GameKind
// ---------------------------------------------------------------------------

/// Which rule set a room runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Checkers,
    Dominoes,
}

impl std::fmt::Display for GameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Checkers => write!(f, "checkers"),
            Self::Dominoes => write!(f, "dominoes"),
        }
    }
}

// ---------------------------------------------------------------------------
// Terminal
// ---------------------------------------------------------------------------

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Dominoes: the winner played their last tile.
    HandEmptied,
    /// Dominoes: neither side could play with an empty pool; the lower
    /// pip total won, or the totals tied for a draw.
    Blocked,
    /// Checkers: the loser has no pieces left.
    PiecesEliminated,
    /// Checkers: the loser had no legal move on their turn.
    NoMoves,
    /// The loser's connection dropped mid-game.
    OpponentDisconnected,
    /// The loser left the room mid-game.
    OpponentLeft,
}

impl std::fmt::Display for EndReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::HandEmptied => "hand emptied",
            Self::Blocked => "blocked game",
            Self::PiecesEliminated => "all pieces captured",
            Self::NoMoves => "no legal moves remaining",
            Self::OpponentDisconnected => "opponent disconnected",
            Self::OpponentLeft => "opponent left the room",
        };
        f.write_str(text)
    }
}

/// The final result of a game. Set at most once; once present, the room
/// is torn down and no further mutation of the state is reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Terminal {
    /// The winning seat, or `None` for a draw.
    pub winner: Option<Seat>,
    pub reason: EndReason,
}

// ---------------------------------------------------------------------------
// Wire-facing move and view shapes
// ---------------------------------------------------------------------------

/// A move as submitted by a client, tagged by game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "lowercase")]
pub enum MoveInput {
    Checkers(CheckersMove),
    Dominoes(DominoMove),
}

/// The result of validating a move: everything `apply` needs, and
/// nothing it has to re-derive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveDelta {
    Checkers(checkers::CheckersDelta),
    Dominoes(dominoes::DominoDelta),
}

/// A per-viewer projection of a game state.
///
/// The viewer's own hand is present in full; the opponent's private
/// resources are reduced to counts. Recomputed fresh for every broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "lowercase")]
pub enum RedactedState {
    Checkers(CheckersView),
    Dominoes(DominoesView),
}

// ---------------------------------------------------------------------------
// GameState
// ---------------------------------------------------------------------------

/// The full authoritative state of one game, exclusively owned by its room.
#[derive(Debug, Clone)]
pub enum GameState {
    Checkers(CheckersState),
    Dominoes(DominoesState),
}

impl GameState {
    /// Creates the initial state for a fresh room. Seat 0 opens.
    pub fn new<R: Rng + ?Sized>(kind: GameKind, rng: &mut R) -> Self {
        match kind {
            GameKind::Checkers => Self::Checkers(CheckersState::new()),
            GameKind::Dominoes => Self::Dominoes(DominoesState::new(rng)),
        }
    }

    pub fn kind(&self) -> GameKind {
        match self {
            Self::Checkers(_) => GameKind::Checkers,
            Self::Dominoes(_) => GameKind::Dominoes,
        }
    }

    /// The seat whose move is expected. Exactly one at any time.
    pub fn current_turn(&self) -> Seat {
        match self {
            Self::Checkers(s) => s.turn,
            Self::Dominoes(s) => s.turn,
        }
    }

    /// Monotonic ply counter, incremented on every accepted move.
    pub fn turn_counter(&self) -> u64 {
        match self {
            Self::Checkers(s) => s.turn_counter,
            Self::Dominoes(s) => s.turn_counter,
        }
    }

    pub fn terminal(&self) -> Option<Terminal> {
        match self {
            Self::Checkers(s) => s.terminal,
            Self::Dominoes(s) => s.terminal,
        }
    }

    /// Pure validation: no state is touched.
    pub fn validate(
        &self,
        seat: Seat,
        mv: &MoveInput,
    ) -> Result<MoveDelta, MoveError> {
        match (self, mv) {
            (Self::Checkers(s), MoveInput::Checkers(m)) => {
                checkers::validate(s, seat, m).map(MoveDelta::Checkers)
            }
            (Self::Dominoes(s), MoveInput::Dominoes(m)) => {
                dominoes::validate(s, seat, m).map(MoveDelta::Dominoes)
            }
            _ => Err(MoveError::IllegalMove(
                "move does not belong to this game".into(),
            )),
        }
    }

    /// Validates and applies a move in one step.
    ///
    /// On success the turn has been handed off (or kept, for a capture
    /// chain with continuations), the ply counter incremented, and any
    /// terminal condition recorded.
    pub fn play(&mut self, seat: Seat, mv: &MoveInput) -> Result<(), MoveError> {
        match (self, mv) {
            (Self::Checkers(s), MoveInput::Checkers(m)) => {
                let delta = checkers::validate(s, seat, m)?;
                checkers::apply(s, &delta);
                Ok(())
            }
            (Self::Dominoes(s), MoveInput::Dominoes(m)) => {
                let delta = dominoes::validate(s, seat, m)?;
                dominoes::apply(s, &delta);
                Ok(())
            }
            _ => Err(MoveError::IllegalMove(
                "move does not belong to this game".into(),
            )),
        }
    }

    /// Handles an explicit draw request.
    ///
    /// The engine already resolves draws at turn handoff, so this is only
    /// satisfiable in states a well-behaved client never sees; it is
    /// validated all the same.
    pub fn draw_from_pool(&mut self, seat: Seat) -> Result<(), MoveError> {
        match self {
            Self::Checkers(_) => Err(MoveError::IllegalMove(
                "this game has no draw pool".into(),
            )),
            Self::Dominoes(s) => dominoes::manual_draw(s, seat),
        }
    }

    /// Ends the game in favor of `winner` (the remaining player after a
    /// disconnect or leave). Does nothing if the game already ended.
    pub fn forfeit(&mut self, winner: Seat, reason: EndReason) {
        let terminal = Terminal {
            winner: Some(winner),
            reason,
        };
        match self {
            Self::Checkers(s) => {
                if s.terminal.is_none() {
                    s.terminal = Some(terminal);
                }
            }
            Self::Dominoes(s) => {
                if s.terminal.is_none() {
                    s.terminal = Some(terminal);
                }
            }
        }
    }

    /// Projects the state for one viewer, hiding the other hand.
    pub fn view_for(&self, viewer: Seat) -> RedactedState {
        match self {
            Self::Checkers(s) => RedactedState::Checkers(s.view()),
            Self::Dominoes(s) => {
                RedactedState::Dominoes(s.view_for(viewer))
            }
        }
    }

    /// Total pieces/tiles across board, hands, and pool. Conserved for
    /// the whole life of a game (24 for checkers, 28 for dominoes).
    pub fn piece_total(&self) -> usize {
        match self {
            Self::Checkers(s) => s.piece_total(),
            Self::Dominoes(s) => s.tile_total(),
        }
    }
}
