//! End-to-end lobby flows without any sockets: every request goes
//! through `Lobby::handle_message` and the assertions read the addressed
//! outbound messages it returns.

use parlor_games::{
    checkers::CheckersMove, GameKind, MoveError, MoveInput, Seat,
};
use parlor_lobby::{Lobby, LobbyError, Outbound, INITIAL_RATING};
use parlor_protocol::{ClientMessage, PlayerId, RoomCode, ServerMessage};

const A: PlayerId = PlayerId(1);
const B: PlayerId = PlayerId(2);
const C: PlayerId = PlayerId(3);

fn find_match(player: PlayerId, game: GameKind) -> ClientMessage {
    ClientMessage::FindMatch {
        game,
        name: format!("player-{}", player.0),
    }
}

/// The room code and seat from a player's `gameStart`.
fn game_start_of(outbound: &[Outbound], player: PlayerId) -> (RoomCode, Seat) {
    outbound
        .iter()
        .find_map(|(p, m)| match m {
            ServerMessage::GameStart { code, seat, .. } if *p == player => {
                Some((code.clone(), *seat))
            }
            _ => None,
        })
        .expect("gameStart for player")
}

fn messages_for(outbound: &[Outbound], player: PlayerId) -> Vec<&ServerMessage> {
    outbound
        .iter()
        .filter(|(p, _)| *p == player)
        .map(|(_, m)| m)
        .collect()
}

/// Pairs A and B into a ranked checkers room; returns the start batch.
fn paired_checkers(lobby: &mut Lobby) -> Vec<Outbound> {
    let first = lobby
        .handle_message(A, find_match(A, GameKind::Checkers))
        .unwrap();
    assert!(matches!(
        first.as_slice(),
        [(p, ServerMessage::SearchStatus { .. })] if *p == A
    ));
    lobby
        .handle_message(B, find_match(B, GameKind::Checkers))
        .unwrap()
}

#[test]
fn test_queue_pairs_first_two_and_leaves_third() {
    let mut lobby = Lobby::new();
    let out = paired_checkers(&mut lobby);

    // A and B each got matchFound + gameStart; A (first ticket) sits at
    // seat 0 and B at seat 1, in the same room.
    let (code_a, seat_a) = game_start_of(&out, A);
    let (code_b, seat_b) = game_start_of(&out, B);
    assert_eq!(code_a, code_b);
    assert_eq!(seat_a, Seat::FIRST);
    assert_eq!(seat_b, Seat::SECOND);
    assert_eq!(messages_for(&out, A).len(), 2);
    assert_eq!(messages_for(&out, B).len(), 2);

    // C enqueues after the pairing and just waits.
    let out = lobby
        .handle_message(C, find_match(C, GameKind::Checkers))
        .unwrap();
    assert!(matches!(
        out.as_slice(),
        [(p, ServerMessage::SearchStatus { .. })] if *p == C
    ));
    assert_eq!(lobby.live_rooms(), 1);
}

#[test]
fn test_match_found_carries_opponent_profile_with_rating() {
    let mut lobby = Lobby::new();
    let out = paired_checkers(&mut lobby);
    let found = messages_for(&out, A)
        .into_iter()
        .find_map(|m| match m {
            ServerMessage::MatchFound { opponent } => Some(opponent.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(found.name, "player-2");
    assert_eq!(found.rating, Some(INITIAL_RATING));
}

#[test]
fn test_double_find_match_rejected() {
    let mut lobby = Lobby::new();
    lobby
        .handle_message(A, find_match(A, GameKind::Dominoes))
        .unwrap();
    assert_eq!(
        lobby.handle_message(A, find_match(A, GameKind::Dominoes)),
        Err(LobbyError::AlreadyQueued)
    );
    // Queueing for the other game while waiting is refused too.
    assert_eq!(
        lobby.handle_message(A, find_match(A, GameKind::Checkers)),
        Err(LobbyError::AlreadyQueued)
    );
}

#[test]
fn test_find_match_while_seated_rejected() {
    let mut lobby = Lobby::new();
    paired_checkers(&mut lobby);
    assert_eq!(
        lobby.handle_message(A, find_match(A, GameKind::Checkers)),
        Err(LobbyError::AlreadyInRoom)
    );
}

#[test]
fn test_cancel_before_and_after_pairing() {
    let mut lobby = Lobby::new();
    lobby
        .handle_message(A, find_match(A, GameKind::Checkers))
        .unwrap();
    let out = lobby.handle_message(A, ClientMessage::CancelSearch).unwrap();
    assert!(matches!(
        out.as_slice(),
        [(p, ServerMessage::SearchStatus { .. })] if *p == A
    ));

    // Cancel after already being matched is a silent no-op.
    paired_checkers(&mut lobby);
    let out = lobby.handle_message(A, ClientMessage::CancelSearch).unwrap();
    assert!(out.is_empty());
    assert_eq!(lobby.live_rooms(), 1);
}

#[test]
fn test_private_room_lifecycle() {
    let mut lobby = Lobby::new();
    let out = lobby
        .handle_message(
            A,
            ClientMessage::CreateRoom {
                game: GameKind::Dominoes,
                name: "ada".into(),
            },
        )
        .unwrap();
    let code = match out.as_slice() {
        [(p, ServerMessage::RoomCreated { code })] if *p == A => code.clone(),
        other => panic!("unexpected reply: {other:?}"),
    };

    // Joining with the lowercased code works: codes normalize on entry.
    let lowered = RoomCode::new(code.as_str().to_ascii_lowercase());
    let out = lobby
        .handle_message(
            B,
            ClientMessage::JoinRoom {
                code: lowered,
                name: "grace".into(),
            },
        )
        .unwrap();
    let (code_a, seat_a) = game_start_of(&out, A);
    let (_, seat_b) = game_start_of(&out, B);
    assert_eq!(code_a, code);
    assert_eq!(seat_a, Seat::FIRST);
    assert_eq!(seat_b, Seat::SECOND);

    // Private rooms are casual: profiles carry no rating.
    let found = messages_for(&out, B)
        .into_iter()
        .find_map(|m| match m {
            ServerMessage::MatchFound { opponent } => Some(opponent.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(found.rating, None);

    // A third player bounces off the now-full room.
    assert_eq!(
        lobby.handle_message(
            C,
            ClientMessage::JoinRoom {
                code: code.clone(),
                name: "trent".into(),
            },
        ),
        Err(LobbyError::RoomFull(code))
    );
}

#[test]
fn test_join_unknown_room_rejected() {
    let mut lobby = Lobby::new();
    let code = RoomCode::new("ZZZZZ");
    assert_eq!(
        lobby.handle_message(
            B,
            ClientMessage::JoinRoom {
                code: code.clone(),
                name: "grace".into(),
            },
        ),
        Err(LobbyError::RoomNotFound(code))
    );
}

#[test]
fn test_checkers_move_broadcasts_to_both_seats() {
    let mut lobby = Lobby::new();
    let out = paired_checkers(&mut lobby);
    let (code, _) = game_start_of(&out, A);

    let mv = MoveInput::Checkers(CheckersMove {
        from: (2, 1),
        path: vec![(3, 2)],
    });
    let out = lobby
        .handle_message(
            A,
            ClientMessage::PlayMove {
                code: code.clone(),
                mv,
            },
        )
        .unwrap();
    // One fresh projection per seat, nothing else.
    assert_eq!(out.len(), 2);
    assert!(out
        .iter()
        .all(|(_, m)| matches!(m, ServerMessage::GameUpdate { .. })));
    let recipients: Vec<PlayerId> = out.iter().map(|(p, _)| *p).collect();
    assert!(recipients.contains(&A) && recipients.contains(&B));
}

#[test]
fn test_out_of_turn_rejected_for_originator_only() {
    let mut lobby = Lobby::new();
    let out = paired_checkers(&mut lobby);
    let (code, _) = game_start_of(&out, B);

    let mv = MoveInput::Checkers(CheckersMove {
        from: (5, 0),
        path: vec![(4, 1)],
    });
    assert_eq!(
        lobby.handle_message(B, ClientMessage::PlayMove { code, mv }),
        Err(LobbyError::Move(MoveError::OutOfTurn))
    );
    // The room is untouched.
    assert_eq!(lobby.live_rooms(), 1);
}

#[test]
fn test_play_move_naming_wrong_room_rejected() {
    let mut lobby = Lobby::new();
    paired_checkers(&mut lobby);
    let mv = MoveInput::Checkers(CheckersMove {
        from: (2, 1),
        path: vec![(3, 2)],
    });
    assert_eq!(
        lobby.handle_message(
            A,
            ClientMessage::PlayMove {
                code: RoomCode::new("WRONG"),
                mv,
            },
        ),
        Err(LobbyError::NotInRoom)
    );
}

#[test]
fn test_disconnect_forfeits_and_tears_down() {
    let mut lobby = Lobby::new();
    paired_checkers(&mut lobby);

    let out = lobby.handle_disconnect(B);
    // Only the remaining player hears about it, and they win.
    assert_eq!(
        out,
        vec![(
            A,
            ServerMessage::GameEnd {
                winner: Some(A),
                reason: "opponent disconnected".into(),
            }
        )]
    );
    assert_eq!(lobby.live_rooms(), 0);

    // Ranked: the forfeit moved rating points.
    assert_eq!(lobby.rating(A), INITIAL_RATING + 16);
    assert_eq!(lobby.rating(B), INITIAL_RATING - 16);

    // A second disconnect for the same player is a silent no-op.
    assert!(lobby.handle_disconnect(B).is_empty());
    assert!(lobby.handle_disconnect(A).is_empty());
}

#[test]
fn test_disconnect_while_queued_drops_ticket() {
    let mut lobby = Lobby::new();
    lobby
        .handle_message(A, find_match(A, GameKind::Checkers))
        .unwrap();
    assert!(lobby.handle_disconnect(A).is_empty());
    // B then C pair with each other, not with the ghost of A.
    lobby
        .handle_message(B, find_match(B, GameKind::Checkers))
        .unwrap();
    let out = lobby
        .handle_message(C, find_match(C, GameKind::Checkers))
        .unwrap();
    let (_, seat_b) = game_start_of(&out, B);
    assert_eq!(seat_b, Seat::FIRST);
}

#[test]
fn test_leave_room_notifies_both_players() {
    let mut lobby = Lobby::new();
    paired_checkers(&mut lobby);

    let out = lobby.handle_message(A, ClientMessage::LeaveRoom).unwrap();
    let expected = ServerMessage::GameEnd {
        winner: Some(B),
        reason: "opponent left the room".into(),
    };
    assert_eq!(messages_for(&out, A), vec![&expected]);
    assert_eq!(messages_for(&out, B), vec![&expected]);
    assert_eq!(lobby.live_rooms(), 0);

    // Leaving again, now roomless, is harmless.
    assert!(lobby.handle_message(A, ClientMessage::LeaveRoom).unwrap().is_empty());
}

#[test]
fn test_creator_leaving_pending_room_deletes_it() {
    let mut lobby = Lobby::new();
    let out = lobby
        .handle_message(
            A,
            ClientMessage::CreateRoom {
                game: GameKind::Checkers,
                name: "ada".into(),
            },
        )
        .unwrap();
    let code = match out.as_slice() {
        [(_, ServerMessage::RoomCreated { code })] => code.clone(),
        other => panic!("unexpected reply: {other:?}"),
    };

    assert!(lobby.handle_message(A, ClientMessage::LeaveRoom).unwrap().is_empty());
    assert_eq!(lobby.live_rooms(), 0);
    assert_eq!(
        lobby.handle_message(
            B,
            ClientMessage::JoinRoom {
                code: code.clone(),
                name: "grace".into(),
            },
        ),
        Err(LobbyError::RoomNotFound(code))
    );
}

#[test]
fn test_draw_from_pool_outside_a_room_rejected() {
    let mut lobby = Lobby::new();
    assert_eq!(
        lobby.handle_message(A, ClientMessage::DrawFromPool),
        Err(LobbyError::NotInRoom)
    );
}

#[test]
fn test_draw_from_pool_with_play_available_rejected() {
    let mut lobby = Lobby::new();
    // Dominoes this time; the opener always has a playable tile.
    lobby
        .handle_message(A, find_match(A, GameKind::Dominoes))
        .unwrap();
    lobby
        .handle_message(B, find_match(B, GameKind::Dominoes))
        .unwrap();
    let result = lobby.handle_message(A, ClientMessage::DrawFromPool);
    assert!(matches!(
        result,
        Err(LobbyError::Move(MoveError::IllegalMove(_)))
    ));
}
