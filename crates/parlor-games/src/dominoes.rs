//! Double-six dominoes: an oriented chain with two open ends, two hands,
//! and a shared boneyard.
//!
//! The engine resolves draws at turn handoff: when the turn arrives at a
//! player with no playable tile, tiles are drawn from the boneyard until
//! one fits or the pool runs dry; drawing consumes no ply. If neither
//! side can play with an empty pool the game is blocked and the lower
//! pip total wins (a tie is a draw).

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::{EndReason, Seat, Terminal};
use crate::MoveError;

/// Highest pip value in the set.
pub const MAX_PIP: u8 = 6;

/// Tiles dealt to each hand at setup.
pub const HAND_SIZE: usize = 7;

/// Tiles in a complete double-six set.
pub const SET_SIZE: usize = 28;

// ---------------------------------------------------------------------------
// Tiles
// ---------------------------------------------------------------------------

/// One domino. The pip order is orientation: inside the chain, `.1` of a
/// tile touches `.0` of the tile to its right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile(pub u8, pub u8);

impl Tile {
    pub fn matches(self, pip: u8) -> bool {
        self.0 == pip || self.1 == pip
    }

    pub fn flipped(self) -> Tile {
        Tile(self.1, self.0)
    }

    pub fn is_double(self) -> bool {
        self.0 == self.1
    }

    pub fn pip_sum(self) -> u32 {
        u32::from(self.0) + u32::from(self.1)
    }

    /// Orientation-insensitive equality: `[1,2]` names the same physical
    /// tile as `[2,1]`.
    pub fn same_tile(self, other: Tile) -> bool {
        self == other || self.flipped() == other
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}|{}]", self.0, self.1)
    }
}

/// The complete double-six set, one of each unordered pip pair.
pub fn full_set() -> Vec<Tile> {
    (0..=MAX_PIP)
        .flat_map(|a| (a..=MAX_PIP).map(move |b| Tile(a, b)))
        .collect()
}

/// Which end of the chain a tile is played at. Ignored while the chain
/// is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainEnd {
    Left,
    Right,
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DominoesState {
    /// Placed tiles, oriented left to right.
    pub(crate) chain: VecDeque<Tile>,
    pub(crate) hands: [Vec<Tile>; 2],
    /// The shared draw pool, popped from the back.
    pub(crate) boneyard: Vec<Tile>,
    pub(crate) turn: Seat,
    pub(crate) turn_counter: u64,
    pub(crate) terminal: Option<Terminal>,
}

impl DominoesState {
    /// Shuffles a fresh set and deals seven tiles to each seat; the
    /// remaining fourteen form the boneyard. Seat 0 opens.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut tiles = full_set();
        tiles.shuffle(rng);
        let boneyard = tiles.split_off(2 * HAND_SIZE);
        let second = tiles.split_off(HAND_SIZE);
        Self {
            chain: VecDeque::new(),
            hands: [tiles, second],
            boneyard,
            turn: Seat::FIRST,
            turn_counter: 0,
            terminal: None,
        }
    }

    /// The open pip values at the left and right ends, or `None` while
    /// nothing has been played.
    pub fn open_ends(&self) -> Option<(u8, u8)> {
        let left = self.chain.front()?;
        let right = self.chain.back()?;
        Some((left.0, right.1))
    }

    pub fn hand(&self, seat: Seat) -> &[Tile] {
        &self.hands[seat.index()]
    }

    pub fn pip_total(&self, seat: Seat) -> u32 {
        self.hands[seat.index()].iter().map(|t| t.pip_sum()).sum()
    }

    fn is_playable(&self, tile: Tile) -> bool {
        match self.open_ends() {
            None => true,
            Some((left, right)) => tile.matches(left) || tile.matches(right),
        }
    }

    fn hand_has_play(&self, seat: Seat) -> bool {
        self.hands[seat.index()]
            .iter()
            .any(|&t| self.is_playable(t))
    }

    pub fn tile_total(&self) -> usize {
        self.chain.len()
            + self.hands[0].len()
            + self.hands[1].len()
            + self.boneyard.len()
    }

    pub fn view_for(&self, viewer: Seat) -> DominoesView {
        DominoesView {
            chain: self.chain.iter().copied().collect(),
            open_ends: self.open_ends(),
            hand: self.hands[viewer.index()].clone(),
            opponent_count: self.hands[viewer.opponent().index()].len(),
            boneyard_count: self.boneyard.len(),
            turn: self.turn,
            turn_counter: self.turn_counter,
        }
    }
}

/// One seat's projection: their own hand, the other hand as a count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DominoesView {
    pub chain: Vec<Tile>,
    pub open_ends: Option<(u8, u8)>,
    pub hand: Vec<Tile>,
    pub opponent_count: usize,
    pub boneyard_count: usize,
    pub turn: Seat,
    pub turn_counter: u64,
}

// ---------------------------------------------------------------------------
// Moves
// ---------------------------------------------------------------------------

/// A move as submitted: which tile, and which end to play it at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DominoMove {
    pub tile: Tile,
    pub end: ChainEnd,
}

/// A validated placement: the tile as oriented for the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DominoDelta {
    pub tile: Tile,
    pub end: ChainEnd,
    /// The tile in chain orientation (matching pip facing inward).
    pub oriented: Tile,
}

/// Validates a placement. Pure: the state is never touched. Orientation
/// is chosen automatically so the matching pip faces the chain.
pub fn validate(
    state: &DominoesState,
    seat: Seat,
    mv: &DominoMove,
) -> Result<DominoDelta, MoveError> {
    if state.terminal.is_some() {
        return Err(MoveError::IllegalMove("the game is already over".into()));
    }
    if seat != state.turn {
        return Err(MoveError::OutOfTurn);
    }
    if !state.hands[seat.index()]
        .iter()
        .any(|&t| t.same_tile(mv.tile))
    {
        return Err(MoveError::IllegalMove(format!(
            "tile {} is not in your hand",
            mv.tile
        )));
    }

    let oriented = match state.open_ends() {
        None => mv.tile,
        Some((left, right)) => match mv.end {
            // At the left end the tile's right pip must equal the open value.
            ChainEnd::Left => {
                if mv.tile.1 == left {
                    mv.tile
                } else if mv.tile.0 == left {
                    mv.tile.flipped()
                } else {
                    return Err(MoveError::IllegalMove(format!(
                        "tile {} does not match the open {left}",
                        mv.tile
                    )));
                }
            }
            ChainEnd::Right => {
                if mv.tile.0 == right {
                    mv.tile
                } else if mv.tile.1 == right {
                    mv.tile.flipped()
                } else {
                    return Err(MoveError::IllegalMove(format!(
                        "tile {} does not match the open {right}",
                        mv.tile
                    )));
                }
            }
        },
    };

    Ok(DominoDelta {
        tile: mv.tile,
        end: mv.end,
        oriented,
    })
}

/// Plays a validated placement: removes the tile from the hand, extends
/// the chain, then hands the turn off with the draw/pass/blocked rules.
pub fn apply(state: &mut DominoesState, delta: &DominoDelta) {
    let seat = state.turn;
    let hand = &mut state.hands[seat.index()];
    if let Some(pos) = hand.iter().position(|&t| t.same_tile(delta.tile)) {
        hand.remove(pos);
    }
    match delta.end {
        ChainEnd::Left if !state.chain.is_empty() => {
            state.chain.push_front(delta.oriented)
        }
        _ => state.chain.push_back(delta.oriented),
    }
    state.turn_counter += 1;

    if state.hands[seat.index()].is_empty() {
        state.terminal = Some(Terminal {
            winner: Some(seat),
            reason: EndReason::HandEmptied,
        });
        return;
    }
    advance_turn(state);
}

/// Hands the turn to the next player able to act.
///
/// Auto-draws for a blocked player until they can play or the pool is
/// empty; passes back when the pool is dry; declares the game blocked
/// when neither side can play with an empty pool.
fn advance_turn(state: &mut DominoesState) {
    let mut next = state.turn.opponent();
    loop {
        while !state.hand_has_play(next) && !state.boneyard.is_empty() {
            let tile = state
                .boneyard
                .pop()
                .expect("checked non-empty boneyard");
            state.hands[next.index()].push(tile);
        }
        if state.hand_has_play(next) {
            state.turn = next;
            return;
        }
        // `next` passes. If the other seat is stuck too, the game is blocked.
        let other = next.opponent();
        if !state.hand_has_play(other) {
            state.turn = next;
            state.terminal = Some(blocked_outcome(state));
            return;
        }
        next = other;
    }
}

/// Scores a blocked game: the lower pip total wins, a tie is a draw.
fn blocked_outcome(state: &DominoesState) -> Terminal {
    let first = state.pip_total(Seat::FIRST);
    let second = state.pip_total(Seat::SECOND);
    let winner = match first.cmp(&second) {
        std::cmp::Ordering::Less => Some(Seat::FIRST),
        std::cmp::Ordering::Greater => Some(Seat::SECOND),
        std::cmp::Ordering::Equal => None,
    };
    Terminal {
        winner,
        reason: EndReason::Blocked,
    }
}

/// Handles an explicit draw request from the active player.
///
/// Only satisfiable when they genuinely have no playable tile and the
/// pool still holds one — the handoff logic normally resolves this
/// before the client ever gets the turn.
pub fn manual_draw(
    state: &mut DominoesState,
    seat: Seat,
) -> Result<(), MoveError> {
    if state.terminal.is_some() {
        return Err(MoveError::IllegalMove("the game is already over".into()));
    }
    if seat != state.turn {
        return Err(MoveError::OutOfTurn);
    }
    if state.hand_has_play(seat) {
        return Err(MoveError::IllegalMove(
            "a playable tile is already in hand".into(),
        ));
    }
    match state.boneyard.pop() {
        Some(tile) => {
            state.hands[seat.index()].push(tile);
            Ok(())
        }
        None => Err(MoveError::IllegalMove("the draw pool is empty".into())),
    }
}
