//! A room: two seats, one exclusively-owned game, and the orchestration
//! that turns accepted moves into per-seat broadcasts.

use rand::Rng;

use parlor_games::{
    EndReason, GameKind, GameState, MoveError, MoveInput, Seat, Terminal,
};
use parlor_protocol::{PlayerId, PlayerProfile, RoomCode, ServerMessage};

/// An addressed outbound message, delivered best-effort by the session
/// layer.
pub type Outbound = (PlayerId, ServerMessage);

/// Whether a room's terminal touches the rating book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomKind {
    /// Matchmade; Elo applies at the terminal.
    Ranked,
    /// Private; no rating movement.
    Casual,
}

/// One paired (or pending) session between two players.
///
/// `seats[0]` opens the game. While a private room waits for its second
/// player there is one seat and no game; `start` fills the second seat
/// and deals.
#[derive(Debug)]
pub struct Room {
    code: RoomCode,
    kind: RoomKind,
    game_kind: GameKind,
    seats: Vec<(PlayerId, PlayerProfile)>,
    game: Option<GameState>,
}

impl Room {
    /// Allocates a room holding its first seat, game not yet dealt.
    pub fn pending(
        code: RoomCode,
        kind: RoomKind,
        game_kind: GameKind,
        creator: (PlayerId, PlayerProfile),
    ) -> Self {
        Self {
            code,
            kind,
            game_kind,
            seats: vec![creator],
            game: None,
        }
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub fn kind(&self) -> RoomKind {
        self.kind
    }

    pub fn game_kind(&self) -> GameKind {
        self.game_kind
    }

    /// True until the second seat is taken and the game dealt.
    pub fn is_pending(&self) -> bool {
        self.game.is_none()
    }

    pub fn players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.seats.iter().map(|(id, _)| *id)
    }

    pub fn seat_of(&self, player: PlayerId) -> Option<Seat> {
        self.seats
            .iter()
            .position(|(id, _)| *id == player)
            .map(|i| Seat(i as u8))
    }

    fn player_at(&self, seat: Seat) -> PlayerId {
        self.seats[seat.index()].0
    }

    /// Fills the second seat, deals the game, and returns the start
    /// messages (`matchFound` + `gameStart` for each player).
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        second: (PlayerId, PlayerProfile),
        rng: &mut R,
    ) -> Vec<Outbound> {
        self.seats.push(second);
        let game = GameState::new(self.game_kind, rng);
        tracing::info!(
            code = %self.code,
            game = %self.game_kind,
            "game started"
        );

        let mut out = Vec::with_capacity(4);
        for index in 0..2 {
            let seat = Seat(index as u8);
            let player = self.seats[index].0;
            let opponent = self.seats[1 - index].1.clone();
            out.push((player, ServerMessage::MatchFound { opponent }));
            out.push((
                player,
                ServerMessage::GameStart {
                    code: self.code.clone(),
                    seat,
                    state: game.view_for(seat),
                },
            ));
        }
        self.game = Some(game);
        out
    }

    /// Runs one ply: validate, apply, broadcast, and report the end of
    /// the game if this move finished it.
    pub fn play(
        &mut self,
        player: PlayerId,
        mv: &MoveInput,
    ) -> Result<Vec<Outbound>, MoveError> {
        let seat = self.require_seat(player)?;
        let game = self.require_game()?;
        game.play(seat, mv)?;

        let mut out = self.broadcast_state();
        if let Some(terminal) = self.terminal() {
            out.extend(self.end_messages(terminal, None));
        }
        Ok(out)
    }

    /// Runs an explicit draw request; a successful draw changes the
    /// drawer's hand, so both seats get a fresh snapshot.
    pub fn draw_from_pool(
        &mut self,
        player: PlayerId,
    ) -> Result<Vec<Outbound>, MoveError> {
        let seat = self.require_seat(player)?;
        let game = self.require_game()?;
        game.draw_from_pool(seat)?;
        Ok(self.broadcast_state())
    }

    /// Ends the game in favor of whoever remains after `leaver` departs.
    ///
    /// `notify_leaver` is false for disconnects (their socket is gone);
    /// the remaining player is always told. A forfeit in an already
    /// finished room yields no messages.
    pub fn forfeit(
        &mut self,
        leaver: PlayerId,
        reason: EndReason,
        notify_leaver: bool,
    ) -> Vec<Outbound> {
        let Some(seat) = self.seat_of(leaver) else {
            return Vec::new();
        };
        let Some(game) = self.game.as_mut() else {
            return Vec::new();
        };
        if game.terminal().is_some() {
            return Vec::new();
        }
        game.forfeit(seat.opponent(), reason);
        let terminal = game
            .terminal()
            .expect("forfeit on a live game sets the terminal");
        let skip = (!notify_leaver).then_some(leaver);
        self.end_messages(terminal, skip)
    }

    pub fn terminal(&self) -> Option<Terminal> {
        self.game.as_ref().and_then(|g| g.terminal())
    }

    pub fn is_finished(&self) -> bool {
        self.terminal().is_some()
    }

    /// The final result as player ids, once the game has ended.
    pub fn result(&self) -> Option<(Option<PlayerId>, EndReason)> {
        let terminal = self.terminal()?;
        Some((terminal.winner.map(|s| self.player_at(s)), terminal.reason))
    }

    /// Both seats as player ids, once the room has started.
    pub fn player_pair(&self) -> Option<(PlayerId, PlayerId)> {
        match self.seats.as_slice() {
            [(a, _), (b, _)] => Some((*a, *b)),
            _ => None,
        }
    }

    fn require_seat(&self, player: PlayerId) -> Result<Seat, MoveError> {
        self.seat_of(player).ok_or_else(|| {
            MoveError::IllegalMove("you are not seated in this room".into())
        })
    }

    fn require_game(&mut self) -> Result<&mut GameState, MoveError> {
        self.game.as_mut().ok_or_else(|| {
            MoveError::IllegalMove("the game has not started yet".into())
        })
    }

    /// A fresh `gameUpdate` projection for each seat. Recomputed on
    /// every call; views are never cached.
    fn broadcast_state(&self) -> Vec<Outbound> {
        let Some(game) = self.game.as_ref() else {
            return Vec::new();
        };
        self.seats
            .iter()
            .enumerate()
            .map(|(index, (player, _))| {
                (
                    *player,
                    ServerMessage::GameUpdate {
                        state: game.view_for(Seat(index as u8)),
                    },
                )
            })
            .collect()
    }

    fn end_messages(
        &self,
        terminal: Terminal,
        skip: Option<PlayerId>,
    ) -> Vec<Outbound> {
        let winner = terminal.winner.map(|s| self.player_at(s));
        self.players()
            .filter(|p| Some(*p) != skip)
            .map(|player| {
                (
                    player,
                    ServerMessage::GameEnd {
                        winner,
                        reason: terminal.reason.to_string(),
                    },
                )
            })
            .collect()
    }
}
