//! Checkers: 8x8 board, forced captures, multi-jump chains, kings.
//!
//! The validator is pure — it works against scratch copies of the board
//! (a flat `Copy` array, so a "snapshot" is a 64-slot memcpy) and returns
//! a [`CheckersDelta`] for [`apply`] to play back onto the real state.
//! Capture chains are searched recursively from each landing square;
//! [`legal_moves`] reports every *maximal* chain as one combined move.

use serde::{Deserialize, Serialize};

use crate::game::{EndReason, Seat, Terminal};
use crate::MoveError;

/// Board dimension. Pieces live on dark squares only ((row + col) odd).
pub const SIZE: usize = 8;

/// Men per side at setup.
pub const MEN_PER_SIDE: usize = 12;

/// A board coordinate, `(row, col)` with row 0 at red's back rank.
pub type Square = (u8, u8);

/// The playing surface.
pub type Board = [[Option<Piece>; SIZE]; SIZE];

// ---------------------------------------------------------------------------
// Pieces
// ---------------------------------------------------------------------------

/// Piece color. Red sits on rows 0-2 and advances toward row 7; black
/// sits on rows 5-7 and advances toward row 0. Red (seat 0) moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Black,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Self::Red => Self::Black,
            Self::Black => Self::Red,
        }
    }

    /// The row on which a man of this color is crowned.
    fn crowning_row(self) -> u8 {
        match self {
            Self::Red => (SIZE - 1) as u8,
            Self::Black => 0,
        }
    }
}

/// Maps a seat to its color: seat 0 plays red.
pub fn color_of(seat: Seat) -> Color {
    if seat == Seat::FIRST {
        Color::Red
    } else {
        Color::Black
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub king: bool,
}

static ALL_DIRS: [(i8, i8); 4] = [(1, -1), (1, 1), (-1, -1), (-1, 1)];

/// Diagonal directions this piece may move and capture in. Men go
/// forward only; kings go all four ways.
fn directions(piece: Piece) -> &'static [(i8, i8)] {
    if piece.king {
        &ALL_DIRS
    } else if piece.color == Color::Red {
        &ALL_DIRS[..2]
    } else {
        &ALL_DIRS[2..]
    }
}

// ---------------------------------------------------------------------------
// Board helpers
// ---------------------------------------------------------------------------

fn in_bounds(sq: Square) -> bool {
    (sq.0 as usize) < SIZE && (sq.1 as usize) < SIZE
}

fn offset(sq: Square, dr: i8, dc: i8) -> Option<Square> {
    let r = sq.0 as i8 + dr;
    let c = sq.1 as i8 + dc;
    if (0..SIZE as i8).contains(&r) && (0..SIZE as i8).contains(&c) {
        Some((r as u8, c as u8))
    } else {
        None
    }
}

fn get(board: &Board, sq: Square) -> Option<Piece> {
    board[sq.0 as usize][sq.1 as usize]
}

fn set(board: &mut Board, sq: Square, piece: Option<Piece>) {
    board[sq.0 as usize][sq.1 as usize] = piece;
}

fn count_pieces(board: &Board, color: Color) -> usize {
    board
        .iter()
        .flatten()
        .filter(|p| p.map(|p| p.color) == Some(color))
        .count()
}

/// A single jump available for `piece` standing at `sq`: returns the
/// captured square and the landing square.
fn jumps_from(
    board: &Board,
    sq: Square,
    piece: Piece,
) -> impl Iterator<Item = (Square, Square)> + '_ {
    directions(piece).iter().filter_map(move |&(dr, dc)| {
        let mid = offset(sq, dr, dc)?;
        let dest = offset(sq, 2 * dr, 2 * dc)?;
        let over = get(board, mid)?;
        if over.color == piece.color.opponent() && get(board, dest).is_none()
        {
            Some((mid, dest))
        } else {
            None
        }
    })
}

fn piece_can_capture(board: &Board, sq: Square, piece: Piece) -> bool {
    jumps_from(board, sq, piece).next().is_some()
}

/// True if any piece of `color` has a capture available anywhere.
pub fn side_can_capture(board: &Board, color: Color) -> bool {
    squares_of(board, color)
        .any(|(sq, p)| piece_can_capture(board, sq, p))
}

fn squares_of(
    board: &Board,
    color: Color,
) -> impl Iterator<Item = (Square, Piece)> + '_ {
    (0..SIZE as u8).flat_map(move |r| {
        (0..SIZE as u8).filter_map(move |c| {
            let p = get(board, (r, c))?;
            (p.color == color).then_some(((r, c), p))
        })
    })
}

fn has_any_move(board: &Board, color: Color) -> bool {
    squares_of(board, color).any(|(sq, p)| {
        piece_can_capture(board, sq, p)
            || directions(p).iter().any(|&(dr, dc)| {
                offset(sq, dr, dc)
                    .is_some_and(|dest| get(board, dest).is_none())
            })
    })
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CheckersState {
    pub(crate) board: Board,
    pub(crate) turn: Seat,
    pub(crate) turn_counter: u64,
    /// Pieces each seat has *lost*. On-board pieces plus these two
    /// counters always sum to `2 * MEN_PER_SIDE`.
    pub(crate) captured: [u8; 2],
    /// Set while a capture chain is in flight: the mover must continue
    /// jumping with the piece on this square.
    pub(crate) chain: Option<Square>,
    pub(crate) terminal: Option<Terminal>,
}

impl CheckersState {
    pub fn new() -> Self {
        Self {
            board: initial_board(),
            turn: Seat::FIRST,
            turn_counter: 0,
            captured: [0, 0],
            chain: None,
            terminal: None,
        }
    }

    pub fn view(&self) -> CheckersView {
        CheckersView {
            board: self.board,
            turn: self.turn,
            turn_counter: self.turn_counter,
            captured: self.captured,
            chain: self.chain,
        }
    }

    pub fn piece_total(&self) -> usize {
        let on_board = self.board.iter().flatten().flatten().count();
        on_board + self.captured[0] as usize + self.captured[1] as usize
    }
}

impl Default for CheckersState {
    fn default() -> Self {
        Self::new()
    }
}

/// Men on the dark squares of the first three rows of each side.
pub fn initial_board() -> Board {
    let mut board: Board = [[None; SIZE]; SIZE];
    for r in 0..3 {
        for c in 0..SIZE {
            if (r + c) % 2 == 1 {
                board[r][c] = Some(Piece {
                    color: Color::Red,
                    king: false,
                });
            }
        }
    }
    for r in SIZE - 3..SIZE {
        for c in 0..SIZE {
            if (r + c) % 2 == 1 {
                board[r][c] = Some(Piece {
                    color: Color::Black,
                    king: false,
                });
            }
        }
    }
    board
}

/// Checkers has no hidden information, so a single view serves both
/// seats; it still goes through the per-viewer projection path so the
/// broadcast layer treats every game alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckersView {
    pub board: Board,
    pub turn: Seat,
    pub turn_counter: u64,
    pub captured: [u8; 2],
    /// The square a capture chain must continue from, if one is live.
    pub chain: Option<Square>,
}

// ---------------------------------------------------------------------------
// Moves
// ---------------------------------------------------------------------------

/// A move as submitted: the origin square and the successive landing
/// squares. A simple step has a single landing; a capture chain lists
/// one landing per jump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckersMove {
    pub from: Square,
    pub path: Vec<Square>,
}

/// Everything `apply` needs to play a validated move back onto the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckersDelta {
    pub from: Square,
    pub path: Vec<Square>,
    /// Squares of the pieces removed by this move, in jump order.
    pub captures: Vec<Square>,
    /// The moving man finishes on its crowning row.
    pub promotes: bool,
    /// Further captures remain from the final landing square, so the
    /// turn stays with the mover.
    pub keeps_turn: bool,
}

/// Validates a proposed move. Pure: the state is never touched.
pub fn validate(
    state: &CheckersState,
    seat: Seat,
    mv: &CheckersMove,
) -> Result<CheckersDelta, MoveError> {
    if state.terminal.is_some() {
        return Err(MoveError::IllegalMove("the game is already over".into()));
    }
    if seat != state.turn {
        return Err(MoveError::OutOfTurn);
    }
    if let Some(lock) = state.chain {
        if mv.from != lock {
            return Err(MoveError::IllegalMove(
                "the capture chain must continue with the same piece"
                    .into(),
            ));
        }
    }
    if !in_bounds(mv.from) || mv.path.iter().any(|&sq| !in_bounds(sq)) {
        return Err(MoveError::IllegalMove("square out of bounds".into()));
    }
    let color = color_of(seat);
    let piece = match get(&state.board, mv.from) {
        Some(p) if p.color == color => p,
        _ => {
            return Err(MoveError::IllegalMove(
                "no piece of yours on the source square".into(),
            ));
        }
    };
    let first = match mv.path.first() {
        Some(&sq) => sq,
        None => {
            return Err(MoveError::IllegalMove("empty move path".into()));
        }
    };

    let dr = first.0 as i8 - mv.from.0 as i8;
    let dc = first.1 as i8 - mv.from.1 as i8;
    if dr.abs() == 1 && dc.abs() == 1 {
        validate_step(state, piece, mv, (dr, dc))
    } else {
        validate_chain(state, piece, mv)
    }
}

fn validate_step(
    state: &CheckersState,
    piece: Piece,
    mv: &CheckersMove,
    dir: (i8, i8),
) -> Result<CheckersDelta, MoveError> {
    if mv.path.len() != 1 {
        return Err(MoveError::IllegalMove(
            "a simple move is a single step".into(),
        ));
    }
    if side_can_capture(&state.board, piece.color) {
        return Err(MoveError::CaptureRequired);
    }
    if !directions(piece).contains(&dir) {
        return Err(MoveError::IllegalMove(
            "men may not move backwards".into(),
        ));
    }
    let dest = mv.path[0];
    if get(&state.board, dest).is_some() {
        return Err(MoveError::IllegalMove(
            "destination square is occupied".into(),
        ));
    }
    Ok(CheckersDelta {
        from: mv.from,
        path: mv.path.clone(),
        captures: Vec::new(),
        promotes: !piece.king && dest.0 == piece.color.crowning_row(),
        keeps_turn: false,
    })
}

fn validate_chain(
    state: &CheckersState,
    piece: Piece,
    mv: &CheckersMove,
) -> Result<CheckersDelta, MoveError> {
    // Simulate hop by hop on a scratch board with the mover lifted off.
    let mut board = state.board;
    set(&mut board, mv.from, None);
    let mut at = mv.from;
    let mut moving = piece;
    let mut captures = Vec::with_capacity(mv.path.len());
    let mut promoted = false;

    for (i, &dest) in mv.path.iter().enumerate() {
        if promoted {
            return Err(MoveError::IllegalMove(
                "a chain cannot continue past promotion".into(),
            ));
        }
        let dr = dest.0 as i8 - at.0 as i8;
        let dc = dest.1 as i8 - at.1 as i8;
        if dr.abs() != 2 || dc.abs() != 2 {
            return Err(MoveError::IllegalMove(format!(
                "hop {} is neither a step nor a jump",
                i + 1
            )));
        }
        if !directions(moving).contains(&(dr / 2, dc / 2)) {
            return Err(MoveError::IllegalMove(
                "men may not jump backwards".into(),
            ));
        }
        let mid = match offset(at, dr / 2, dc / 2) {
            Some(sq) => sq,
            None => {
                return Err(MoveError::IllegalMove(
                    "jump leaves the board".into(),
                ));
            }
        };
        match get(&board, mid) {
            Some(p) if p.color == moving.color.opponent() => {}
            _ => {
                return Err(MoveError::IllegalMove(
                    "nothing to capture on that jump".into(),
                ));
            }
        }
        if get(&board, dest).is_some() {
            return Err(MoveError::IllegalMove(
                "landing square is occupied".into(),
            ));
        }
        set(&mut board, mid, None);
        captures.push(mid);
        if !moving.king && dest.0 == moving.color.crowning_row() {
            moving.king = true;
            promoted = true;
        }
        at = dest;
    }

    let keeps_turn = !promoted && piece_can_capture(&board, at, moving);
    Ok(CheckersDelta {
        from: mv.from,
        path: mv.path.clone(),
        captures,
        promotes: promoted,
        keeps_turn,
    })
}

/// Plays a validated delta onto the state: moves the piece, removes the
/// captured men, hands the turn off (or keeps it for a live chain), and
/// records any terminal condition.
pub fn apply(state: &mut CheckersState, delta: &CheckersDelta) {
    let mover = state.turn;
    let mut piece = get(&state.board, delta.from)
        .expect("validated delta references a live piece");
    set(&mut state.board, delta.from, None);
    for &sq in &delta.captures {
        set(&mut state.board, sq, None);
    }
    if delta.promotes {
        piece.king = true;
    }
    let landing = *delta.path.last().expect("validated path is non-empty");
    set(&mut state.board, landing, Some(piece));

    state.captured[mover.opponent().index()] += delta.captures.len() as u8;
    state.turn_counter += 1;
    state.chain = delta.keeps_turn.then_some(landing);

    let opponent = mover.opponent();
    if count_pieces(&state.board, color_of(opponent)) == 0 {
        state.terminal = Some(Terminal {
            winner: Some(mover),
            reason: EndReason::PiecesEliminated,
        });
        return;
    }
    if delta.keeps_turn {
        // Same player must continue the chain.
        return;
    }
    state.turn = opponent;
    if !has_any_move(&state.board, color_of(opponent)) {
        state.terminal = Some(Terminal {
            winner: Some(mover),
            reason: EndReason::NoMoves,
        });
    }
}

// ---------------------------------------------------------------------------
// Move enumeration
// ---------------------------------------------------------------------------

/// Every legal move for `seat`. When a capture exists anywhere, only
/// capture chains are returned, each extended to a *maximal* chain — a
/// forced double jump comes back as one combined move.
pub fn legal_moves(state: &CheckersState, seat: Seat) -> Vec<CheckersMove> {
    let color = color_of(seat);
    let mut moves = Vec::new();
    if let Some(lock) = state.chain {
        for path in capture_chains(&state.board, lock) {
            moves.push(CheckersMove { from: lock, path });
        }
        return moves;
    }
    if side_can_capture(&state.board, color) {
        for (sq, _) in squares_of(&state.board, color) {
            for path in capture_chains(&state.board, sq) {
                moves.push(CheckersMove { from: sq, path });
            }
        }
    } else {
        for (sq, p) in squares_of(&state.board, color) {
            for &(dr, dc) in directions(p) {
                if let Some(dest) = offset(sq, dr, dc) {
                    if get(&state.board, dest).is_none() {
                        moves.push(CheckersMove {
                            from: sq,
                            path: vec![dest],
                        });
                    }
                }
            }
        }
    }
    moves
}

/// All maximal capture chains for the piece at `from`, as landing-square
/// paths. Empty when the square is empty or no jump is available.
pub fn capture_chains(board: &Board, from: Square) -> Vec<Vec<Square>> {
    let piece = match get(board, from) {
        Some(p) => p,
        None => return Vec::new(),
    };
    let mut scratch = *board;
    set(&mut scratch, from, None);
    let mut chains = Vec::new();
    let mut path = Vec::new();
    extend_chain(&scratch, from, piece, &mut path, &mut chains);
    chains
}

fn extend_chain(
    board: &Board,
    at: Square,
    piece: Piece,
    path: &mut Vec<Square>,
    out: &mut Vec<Vec<Square>>,
) {
    let mut extended = false;
    let hops: Vec<(Square, Square)> = jumps_from(board, at, piece).collect();
    for (mid, dest) in hops {
        extended = true;
        let mut next = *board;
        set(&mut next, mid, None);
        let mut moving = piece;
        let promoted =
            !moving.king && dest.0 == moving.color.crowning_row();
        if promoted {
            moving.king = true;
        }
        path.push(dest);
        if promoted {
            // Crowning ends the move; the chain is maximal here.
            out.push(path.clone());
        } else {
            extend_chain(&next, dest, moving, path, out);
        }
        path.pop();
    }
    if !extended && !path.is_empty() {
        out.push(path.clone());
    }
}
