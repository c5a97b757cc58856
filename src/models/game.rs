//! Match data structure and its lifecycle helpers.

use crate::models::team::TeamId;
use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// A single match between two teams.
///
/// `winner_team_id` is None while the match is pending. Scores and `played_at`
/// are set exactly once, when the match completes. `match_order` is the
/// creation/scheduling sequence within a tournament: unique and strictly
/// increasing, and the tie-breaker everywhere ordering matters.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub team_a_id: TeamId,
    pub team_b_id: TeamId,
    pub winner_team_id: Option<TeamId>,
    pub score_team_a: Option<u32>,
    pub score_team_b: Option<u32>,
    pub match_order: u32,
    pub played_at: Option<DateTime<Utc>>,
}

impl MatchRecord {
    /// New pending match between two teams at the given order slot.
    pub fn new(
        tournament_id: TournamentId,
        team_a_id: TeamId,
        team_b_id: TeamId,
        match_order: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            team_a_id,
            team_b_id,
            winner_team_id: None,
            score_team_a: None,
            score_team_b: None,
            match_order,
            played_at: None,
        }
    }

    /// Both teams assigned, no winner yet.
    pub fn is_pending(&self) -> bool {
        self.winner_team_id.is_none()
    }

    pub fn is_completed(&self) -> bool {
        self.winner_team_id.is_some()
    }

    /// The losing side of a completed match, or None while pending.
    pub fn loser_team_id(&self) -> Option<TeamId> {
        let winner = self.winner_team_id?;
        if winner == self.team_a_id {
            Some(self.team_b_id)
        } else {
            Some(self.team_a_id)
        }
    }

    pub fn involves(&self, team_id: TeamId) -> bool {
        self.team_a_id == team_id || self.team_b_id == team_id
    }
}
