//! Team data structure: one or two players on one side of the net.

use crate::models::player::PlayerId;
use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team.
pub type TeamId = Uuid;

/// A team of one or two players. `player2` is None when the team plays
/// short-handed (odd player count at setup). Created once, never mutated.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub tournament_id: TournamentId,
    pub player1_id: PlayerId,
    pub player2_id: Option<PlayerId>,
}

impl Team {
    pub fn new(
        tournament_id: TournamentId,
        player1_id: PlayerId,
        player2_id: Option<PlayerId>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            player1_id,
            player2_id,
        }
    }
}
