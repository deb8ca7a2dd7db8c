//! The room registry: live rooms keyed by code, plus a membership index.

use std::collections::HashMap;

use parlor_protocol::{PlayerId, RoomCode};
use rand::Rng;

use crate::Room;

/// Room codes use an alphabet without the easily-confused characters
/// (no 0/O, 1/I/L), since players relay them out loud.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
const CODE_LEN: usize = 5;

/// Owns every live room and knows which room each player sits in.
///
/// A player can be in at most one room at a time; the membership index
/// enforces lookups for that invariant and is kept in sync with the
/// room table on insert and remove.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomCode, Room>,
    memberships: HashMap<PlayerId, RoomCode>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates a code that is unique among the currently-live rooms,
    /// retrying on collision.
    pub fn generate_code<R: Rng + ?Sized>(&self, rng: &mut R) -> RoomCode {
        loop {
            let code: String = (0..CODE_LEN)
                .map(|_| {
                    let i = rng.random_range(0..CODE_ALPHABET.len());
                    CODE_ALPHABET[i] as char
                })
                .collect();
            let code = RoomCode::new(code);
            if !self.rooms.contains_key(&code) {
                return code;
            }
        }
    }

    /// Stores a room and indexes its current members.
    pub fn insert(&mut self, room: Room) {
        let code = room.code().clone();
        for player in room.players() {
            self.memberships.insert(player, code.clone());
        }
        tracing::info!(%code, "room registered");
        self.rooms.insert(code, room);
    }

    /// Indexes a player who took a seat after the room was registered.
    pub fn register_member(&mut self, player: PlayerId, code: RoomCode) {
        self.memberships.insert(player, code);
    }

    pub fn room_of(&self, player: PlayerId) -> Option<&RoomCode> {
        self.memberships.get(&player)
    }

    pub fn get(&self, code: &RoomCode) -> Option<&Room> {
        self.rooms.get(code)
    }

    pub fn get_mut(&mut self, code: &RoomCode) -> Option<&mut Room> {
        self.rooms.get_mut(code)
    }

    /// Tears a room down, clearing every membership that pointed at it.
    pub fn remove(&mut self, code: &RoomCode) -> Option<Room> {
        let room = self.rooms.remove(code)?;
        self.memberships.retain(|_, c| c != code);
        tracing::info!(%code, "room removed");
        Some(room)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RoomKind;
    use parlor_games::GameKind;
    use parlor_protocol::PlayerProfile;

    fn profile(name: &str) -> PlayerProfile {
        PlayerProfile {
            name: name.into(),
            rating: None,
        }
    }

    #[test]
    fn test_generated_codes_use_the_alphabet() {
        let registry = RoomRegistry::new();
        let mut rng = rand::rng();
        for _ in 0..50 {
            let code = registry.generate_code(&mut rng);
            assert_eq!(code.as_str().len(), CODE_LEN);
            assert!(code
                .as_str()
                .bytes()
                .all(|b| CODE_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn test_remove_clears_memberships() {
        let mut registry = RoomRegistry::new();
        let code = registry.generate_code(&mut rand::rng());
        let room = Room::pending(
            code.clone(),
            RoomKind::Casual,
            GameKind::Checkers,
            (PlayerId(1), profile("ada")),
        );
        registry.insert(room);
        assert_eq!(registry.room_of(PlayerId(1)), Some(&code));

        registry.remove(&code);
        assert!(registry.room_of(PlayerId(1)).is_none());
        assert!(registry.is_empty());
        // Removing again is a no-op.
        assert!(registry.remove(&code).is_none());
    }
}
