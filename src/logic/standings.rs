//! Standings calculator: reduce completed matches into per-team statistics.

use crate::models::{MatchRecord, Team, TeamId, TournamentError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Legacy "void" marker: a completed match whose `score_team_a` equals this
/// value is excluded from standings. No write path produces it; kept for
/// compatibility with old rows.
pub const VOID_SCORE: u32 = 999;

/// Accumulated statistics for one team.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub team_id: TeamId,
    pub wins: u32,
    pub losses: u32,
    pub matches_played: u32,
    pub goals_scored: u32,
    pub goals_conceded: u32,
    /// Current run of wins, reset to 0 by any loss.
    pub consecutive_wins: u32,
    /// High-water mark of `consecutive_wins`.
    pub max_consecutive_wins: u32,
}

impl TeamStanding {
    pub fn goal_diff(&self) -> i64 {
        i64::from(self.goals_scored) - i64::from(self.goals_conceded)
    }
}

/// Compute standings for every team, sorted best-first.
///
/// Matches are processed in ascending `match_order`; pending matches and rows
/// carrying the [`VOID_SCORE`] sentinel are skipped. Sort order: wins
/// descending, then goal differential descending, then losses ascending.
/// Total over any match list; the empty list yields all-zero rows.
///
/// A completed match referencing a team outside `teams` means the snapshot is
/// corrupt; standings are refused rather than guessed.
pub fn team_standings(
    teams: &[Team],
    matches: &[MatchRecord],
) -> Result<Vec<TeamStanding>, TournamentError> {
    let mut stats: HashMap<TeamId, TeamStanding> = teams
        .iter()
        .map(|t| {
            (
                t.id,
                TeamStanding {
                    team_id: t.id,
                    ..TeamStanding::default()
                },
            )
        })
        .collect();

    let mut ordered: Vec<&MatchRecord> = matches.iter().collect();
    ordered.sort_by_key(|m| m.match_order);

    for m in ordered {
        let Some(winner_id) = m.winner_team_id else {
            continue;
        };
        let (Some(score_a), Some(score_b)) = (m.score_team_a, m.score_team_b) else {
            continue;
        };
        if score_a == VOID_SCORE {
            continue;
        }
        let loser_id = if winner_id == m.team_a_id {
            m.team_b_id
        } else {
            m.team_a_id
        };
        let (winner_goals, loser_goals) = if winner_id == m.team_a_id {
            (score_a, score_b)
        } else {
            (score_b, score_a)
        };

        let winner = stats
            .get_mut(&winner_id)
            .ok_or(TournamentError::ConsistencyViolation(winner_id))?;
        winner.wins += 1;
        winner.matches_played += 1;
        winner.goals_scored += winner_goals;
        winner.goals_conceded += loser_goals;
        winner.consecutive_wins += 1;
        winner.max_consecutive_wins = winner.max_consecutive_wins.max(winner.consecutive_wins);

        let loser = stats
            .get_mut(&loser_id)
            .ok_or(TournamentError::ConsistencyViolation(loser_id))?;
        loser.losses += 1;
        loser.matches_played += 1;
        loser.goals_scored += loser_goals;
        loser.goals_conceded += winner_goals;
        loser.consecutive_wins = 0;
    }

    // Keep team-creation order as the final tie-breaker so output is stable.
    let mut ranked: Vec<TeamStanding> = teams
        .iter()
        .filter_map(|t| stats.remove(&t.id))
        .collect();
    ranked.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then(b.goal_diff().cmp(&a.goal_diff()))
            .then(a.losses.cmp(&b.losses))
    });
    Ok(ranked)
}

/// The suggested tournament winner: the top-ranked team, if any.
pub fn suggested_winner(
    teams: &[Team],
    matches: &[MatchRecord],
) -> Result<Option<TeamId>, TournamentError> {
    Ok(team_standings(teams, matches)?.first().map(|s| s.team_id))
}
