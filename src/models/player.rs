//! Player data structure.

use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in team rows and lookups).
pub type PlayerId = Uuid;

/// A player: identity plus display name. Immutable once created; owned by a tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub tournament_id: TournamentId,
    pub name: String,
}

impl Player {
    pub fn new(tournament_id: TournamentId, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            name: name.into(),
        }
    }
}
