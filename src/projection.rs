//! Snapshot and projection: the pull model consumers run on every change
//! notification. `recompute` is a pure function of the snapshot, so repeating
//! it after a stale or duplicated notification is harmless.

use crate::logic::{next_match, on_deck_team, team_standings, TeamStanding};
use crate::models::{
    MatchRecord, Player, Team, TeamId, Tournament, TournamentError, TournamentId,
};
use crate::store::EntityStore;
use serde::{Deserialize, Serialize};

/// Full rows for one tournament, fetched in one pass.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TournamentSnapshot {
    pub tournament: Tournament,
    pub players: Vec<Player>,
    pub teams: Vec<Team>,
    /// Sorted by `match_order` ascending.
    pub matches: Vec<MatchRecord>,
}

impl TournamentSnapshot {
    pub fn load(store: &dyn EntityStore, id: TournamentId) -> Result<Self, TournamentError> {
        Ok(Self {
            tournament: store.tournament(id)?,
            players: store.players(id)?,
            teams: store.teams(id)?,
            matches: store.matches(id)?,
        })
    }
}

/// Everything the presentation layer needs, derived from one snapshot.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TournamentProjection {
    pub standings: Vec<TeamStanding>,
    /// The pending match up next, if any.
    pub next_match: Option<MatchRecord>,
    /// Team projected to face the winner of `next_match` (winner-stays-on).
    pub on_deck_team_id: Option<TeamId>,
    /// Pending matches after the next one, in order.
    pub upcoming_matches: Vec<MatchRecord>,
    /// Most recent completed matches, newest first (capped at 5).
    pub recent_matches: Vec<MatchRecord>,
}

/// How many completed matches the projection keeps for display.
const RECENT_LIMIT: usize = 5;

/// Reduce a snapshot to its projection.
pub fn recompute(snapshot: &TournamentSnapshot) -> Result<TournamentProjection, TournamentError> {
    let standings = team_standings(&snapshot.teams, &snapshot.matches)?;
    let ended = snapshot.tournament.is_ended();

    let next = if ended {
        None
    } else {
        next_match(&snapshot.matches).cloned()
    };
    let on_deck = if ended {
        None
    } else {
        on_deck_team(&snapshot.teams, &snapshot.matches).map(|t| t.id)
    };

    let upcoming = if ended {
        Vec::new()
    } else {
        snapshot
            .matches
            .iter()
            .filter(|m| m.is_pending() && next.as_ref().map_or(true, |n| m.id != n.id))
            .cloned()
            .collect()
    };

    let mut recent: Vec<MatchRecord> = snapshot
        .matches
        .iter()
        .filter(|m| m.is_completed())
        .cloned()
        .collect();
    recent.sort_by(|a, b| (b.played_at, b.match_order).cmp(&(a.played_at, a.match_order)));
    recent.truncate(RECENT_LIMIT);

    Ok(TournamentProjection {
        standings,
        next_match: next,
        on_deck_team_id: on_deck,
        upcoming_matches: upcoming,
        recent_matches: recent,
    })
}
