//! League round generation: one match for every pair of teams.

use crate::models::{MatchRecord, Team, TeamId, TournamentId};

/// A team pairing that has not been assigned an order slot yet.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Pairing {
    pub team_a_id: TeamId,
    pub team_b_id: TeamId,
}

/// All unordered pairs `(i, j)`, `i < j`, in team-list order: the full
/// round-robin. N teams yield N*(N-1)/2 pairings.
pub fn round_pairings(teams: &[Team]) -> Vec<Pairing> {
    let mut pairings = Vec::with_capacity(teams.len() * teams.len().saturating_sub(1) / 2);
    for i in 0..teams.len() {
        for j in (i + 1)..teams.len() {
            pairings.push(Pairing {
                team_a_id: teams[i].id,
                team_b_id: teams[j].id,
            });
        }
    }
    pairings
}

/// Materialize pairings into pending match rows with consecutive
/// `match_order` slots starting at `start_order`.
///
/// Calling this again for a new round appends another complete all-pairs set;
/// pairs repeat across rounds by design.
pub fn round_matches(
    tournament_id: TournamentId,
    pairings: &[Pairing],
    start_order: u32,
) -> Vec<MatchRecord> {
    pairings
        .iter()
        .enumerate()
        .map(|(i, p)| {
            MatchRecord::new(
                tournament_id,
                p.team_a_id,
                p.team_b_id,
                start_order + i as u32,
            )
        })
        .collect()
}
