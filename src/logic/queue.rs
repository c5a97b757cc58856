//! Winner-stays-on queue engine: next match, on-deck projection, and the
//! opponent ranking used to requeue after a result or a skip.

use crate::models::{MatchRecord, Team, TeamId};

/// The match up next: earliest-created pending match with both teams set.
/// The engine maintains at most one such match per tournament.
pub fn next_match<'a>(matches: &'a [MatchRecord]) -> Option<&'a MatchRecord> {
    matches
        .iter()
        .filter(|m| m.is_pending())
        .min_by_key(|m| m.match_order)
}

/// Completed matches in the order they were played. `played_at` can collide
/// when results land in the same instant; `match_order` breaks the tie.
fn completed_chronological<'a>(matches: &'a [MatchRecord]) -> Vec<&'a MatchRecord> {
    let mut completed: Vec<&MatchRecord> = matches.iter().filter(|m| m.is_completed()).collect();
    completed.sort_by_key(|m| (m.played_at, m.match_order));
    completed
}

/// Project the team waiting to face the winner of the current match.
///
/// Read-only. Before any match has been played, the on-deck team is the third
/// team in creation order (the first two are in the seed match). Afterwards,
/// replay the completed matches into a loser queue: each loser moves to the
/// back, superseding any earlier position. Teams that have never appeared in
/// a completed match jump the queue, in creation order. The current match's
/// teams and the most recent winner are never on deck.
pub fn on_deck_team<'a>(teams: &'a [Team], matches: &[MatchRecord]) -> Option<&'a Team> {
    let current = next_match(matches)?;
    let playing = [current.team_a_id, current.team_b_id];

    let completed = completed_chronological(matches);
    if completed.is_empty() {
        return teams.get(2);
    }

    let mut loser_queue: Vec<TeamId> = Vec::new();
    for m in &completed {
        let loser = m.loser_team_id()?;
        loser_queue.retain(|&id| id != loser);
        loser_queue.push(loser);
    }

    let fresh = teams.iter().find(|t| {
        !playing.contains(&t.id) && !completed.iter().any(|m| m.involves(t.id))
    });
    if fresh.is_some() {
        return fresh;
    }

    let last_winner = completed.last()?.winner_team_id?;
    let next_id = loser_queue
        .iter()
        .find(|&&id| id != last_winner && !playing.contains(&id))?;
    teams.iter().find(|t| t.id == *next_id)
}

/// Rank the candidate opponents for the team holding the court and pick the
/// first one.
///
/// Ranking: teams that have never played come first (creation order), then
/// played teams least-recently-played first, and the just-defeated `loser`
/// (real or synthetic, after a skip) is forced to the very back regardless of
/// its recency. Returns None only when no candidate exists, which signals the
/// queue is exhausted rather than an error.
pub fn next_opponent(
    teams: &[Team],
    matches: &[MatchRecord],
    winner: TeamId,
    loser: TeamId,
) -> Option<TeamId> {
    // Appearance order, most recent first, from completed matches.
    let mut recent: Vec<TeamId> = Vec::new();
    for m in completed_chronological(matches).iter().rev() {
        for id in [m.team_a_id, m.team_b_id] {
            if !recent.contains(&id) {
                recent.push(id);
            }
        }
    }

    let mut ranked: Vec<TeamId> = teams
        .iter()
        .filter(|t| t.id != winner && t.id != loser && !recent.contains(&t.id))
        .map(|t| t.id)
        .collect();
    ranked.extend(
        recent
            .iter()
            .rev()
            .filter(|&&id| id != winner && id != loser && teams.iter().any(|t| t.id == id)),
    );
    ranked.push(loser);

    ranked
        .into_iter()
        .find(|&id| id != winner && teams.iter().any(|t| t.id == id))
}
