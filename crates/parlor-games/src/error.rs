//! Validator rejections.

/// Why a proposed move was refused.
///
/// Rejections are delivered to the player who sent the move and never
/// touch the opponent or the room.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// The sender is not the seat whose move is expected.
    #[error("not your turn")]
    OutOfTurn,

    /// The move is structurally invalid: wrong square, wrong occupancy,
    /// a tile not in hand, a pip that doesn't match, and so on.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    /// A capture exists somewhere on the board for the mover, so a
    /// non-capture move may not be played.
    #[error("a capture is available and must be played")]
    CaptureRequired,
}
