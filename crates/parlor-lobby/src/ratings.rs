//! In-memory Elo ratings, updated only at ranked terminals.

use std::collections::HashMap;

use parlor_protocol::PlayerId;

/// Rating a player starts with.
pub const INITIAL_RATING: u32 = 1000;

const K_FACTOR: f64 = 32.0;

/// The rating table. Players appear once they finish a ranked game;
/// everyone else reads as [`INITIAL_RATING`].
#[derive(Debug, Default)]
pub struct RatingBook {
    ratings: HashMap<PlayerId, u32>,
}

impl RatingBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rating(&self, player: PlayerId) -> u32 {
        self.ratings.get(&player).copied().unwrap_or(INITIAL_RATING)
    }

    pub fn record_win(&mut self, winner: PlayerId, loser: PlayerId) {
        self.update(winner, loser, 1.0);
    }

    pub fn record_draw(&mut self, a: PlayerId, b: PlayerId) {
        self.update(a, b, 0.5);
    }

    /// Standard Elo update; `score_a` is 1.0 for an `a` win, 0.5 for a
    /// draw.
    fn update(&mut self, a: PlayerId, b: PlayerId, score_a: f64) {
        let rating_a = f64::from(self.rating(a));
        let rating_b = f64::from(self.rating(b));
        let expected_a =
            1.0 / (1.0 + 10f64.powf((rating_b - rating_a) / 400.0));
        let new_a = rating_a + K_FACTOR * (score_a - expected_a);
        let new_b = rating_b + K_FACTOR * ((1.0 - score_a) - (1.0 - expected_a));
        self.ratings.insert(a, new_a.round().max(0.0) as u32);
        self.ratings.insert(b, new_b.round().max(0.0) as u32);
        tracing::debug!(
            player_a = %a,
            player_b = %b,
            rating_a = self.rating(a),
            rating_b = self.rating(b),
            "ratings updated"
        );
    }
}
