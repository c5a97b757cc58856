//! Mutating tournament operations: setup, score, skip, new round, finish.
//!
//! Every operation loads a fresh snapshot, validates before any write, and
//! holds the tournament's mutation lock for the whole multi-step flow so two
//! writers can never compute a follow-up match from the same stale history.
//! A failed write surfaces as an error; the engine never inserts a follow-up
//! match unless the score update already succeeded.

use crate::logic::{
    self, next_match, next_opponent, round_matches, round_pairings, sequencer, suggested_winner,
};
use crate::models::{
    MatchId, MatchRecord, TeamId, Tournament, TournamentError, TournamentId, TournamentMode,
};
use crate::projection::TournamentSnapshot;
use crate::store::EntityStore;
use chrono::Utc;
use log::{info, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Scheduling engine bound to an entity store.
pub struct Engine<S: EntityStore> {
    store: Arc<S>,
    /// Per-tournament mutation locks. Tournaments are independent; there is
    /// no cross-tournament coordination.
    locks: Mutex<HashMap<TournamentId, Arc<Mutex<()>>>>,
}

/// Result of recording a score.
#[derive(Clone, Debug)]
pub struct RecordedResult {
    pub match_id: MatchId,
    pub winner_team_id: TeamId,
    /// Follow-up match created for the winner (WinnerStaysOn only; None when
    /// the queue is exhausted or the tournament runs in League mode).
    pub follow_up: Option<MatchRecord>,
}

impl<S: EntityStore> Engine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    fn mutation_lock(&self, id: TournamentId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.entry(id).or_default().clone()
    }

    /// Create a tournament from a raw player list: players are paired into
    /// random teams, and the initial matches are written in the same insert
    /// (seed match for WinnerStaysOn, one full sequenced round for League).
    pub fn create_tournament(
        &self,
        name: &str,
        mode: TournamentMode,
        player_names: &[String],
    ) -> Result<Tournament, TournamentError> {
        let names = logic::validate_player_names(player_names)?;
        let tournament = Tournament::new(name.trim(), mode);
        let (players, teams) = logic::draw_teams(tournament.id, &names);

        let matches = match mode {
            TournamentMode::WinnerStaysOn => {
                // Seed match: first two drawn teams; the third is on deck.
                vec![MatchRecord::new(tournament.id, teams[0].id, teams[1].id, 1)]
            }
            TournamentMode::League => {
                let pairings = sequencer::spread(&round_pairings(&teams));
                round_matches(tournament.id, &pairings, 1)
            }
        };

        info!(
            "creating tournament '{}' ({:?}): {} players, {} teams, {} initial matches",
            tournament.name,
            mode,
            players.len(),
            teams.len(),
            matches.len()
        );
        self.store
            .insert_tournament(tournament.clone(), players, teams, matches)?;
        Ok(tournament)
    }

    /// Record a result for a pending match: `Pending -> Completed`.
    ///
    /// Scores must be non-negative, distinct, and fit a `u32`; the higher
    /// score wins. In WinnerStaysOn mode the winner's follow-up match is
    /// created in the same operation, with the opponent drawn from the
    /// recency ranking.
    pub fn record_result(
        &self,
        tournament_id: TournamentId,
        match_id: MatchId,
        score_a: i64,
        score_b: i64,
    ) -> Result<RecordedResult, TournamentError> {
        let lock = self.mutation_lock(tournament_id);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        let snapshot = TournamentSnapshot::load(self.store.as_ref(), tournament_id)?;
        if snapshot.tournament.is_ended() {
            warn!("result rejected: tournament {tournament_id} has ended");
            return Err(TournamentError::TournamentEnded);
        }
        if score_a < 0 || score_b < 0 {
            return Err(TournamentError::NegativeScore);
        }
        if score_a == score_b {
            warn!("result rejected for match {match_id}: tied {score_a}-{score_b}");
            return Err(TournamentError::TiedScore { score_a, score_b });
        }

        let mut record = snapshot
            .matches
            .iter()
            .find(|m| m.id == match_id)
            .cloned()
            .ok_or(TournamentError::MatchNotFound(match_id))?;
        if record.is_completed() {
            return Err(TournamentError::MatchAlreadyPlayed(match_id));
        }

        let score_a =
            u32::try_from(score_a).map_err(|_| TournamentError::ScoreOutOfRange(score_a))?;
        let score_b =
            u32::try_from(score_b).map_err(|_| TournamentError::ScoreOutOfRange(score_b))?;
        let winner = if score_a > score_b {
            record.team_a_id
        } else {
            record.team_b_id
        };
        let loser = if winner == record.team_a_id {
            record.team_b_id
        } else {
            record.team_a_id
        };

        record.winner_team_id = Some(winner);
        record.score_team_a = Some(score_a);
        record.score_team_b = Some(score_b);
        record.played_at = Some(Utc::now());
        self.store.update_match(&record)?;
        info!("match {match_id}: {score_a}-{score_b}, winner {winner}");

        let mut follow_up = None;
        if snapshot.tournament.mode == TournamentMode::WinnerStaysOn {
            let mut tournament = snapshot.tournament.clone();
            tournament.current_streak = if tournament.current_winner_team_id == Some(winner) {
                tournament.current_streak + 1
            } else {
                1
            };
            tournament.current_winner_team_id = Some(winner);
            self.store.update_tournament(&tournament)?;

            // Re-read so the ranking sees the result we just wrote.
            let matches = self.store.matches(tournament_id)?;
            if next_match(&matches).is_none() {
                if let Some(opponent) = next_opponent(&snapshot.teams, &matches, winner, loser) {
                    let order = matches.len() as u32 + 1;
                    let next = MatchRecord::new(tournament_id, winner, opponent, order);
                    self.store.insert_matches(vec![next.clone()])?;
                    info!("queued match {} for winner {winner} vs {opponent}", next.id);
                    follow_up = Some(next);
                } else {
                    info!("queue exhausted for tournament {tournament_id}");
                }
            }
        }

        Ok(RecordedResult {
            match_id,
            winner_team_id: winner,
            follow_up,
        })
    }

    /// Skip the pending match: delete it and queue a replacement.
    ///
    /// The holder of the court keeps `team_a`; the non-holder is treated as a
    /// synthetic loser and sent to the back of the same ranking used after a
    /// real result. Before any completed match there is no holder yet, so
    /// `team_a` of the seed match holds. WinnerStaysOn only.
    pub fn skip_match(
        &self,
        tournament_id: TournamentId,
        match_id: MatchId,
    ) -> Result<Option<MatchRecord>, TournamentError> {
        let lock = self.mutation_lock(tournament_id);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        let snapshot = TournamentSnapshot::load(self.store.as_ref(), tournament_id)?;
        if snapshot.tournament.is_ended() {
            return Err(TournamentError::TournamentEnded);
        }
        if snapshot.tournament.mode != TournamentMode::WinnerStaysOn {
            return Err(TournamentError::WrongMode);
        }

        let pending = snapshot
            .matches
            .iter()
            .find(|m| m.id == match_id)
            .ok_or(TournamentError::MatchNotFound(match_id))?;
        if pending.is_completed() {
            return Err(TournamentError::MatchAlreadyPlayed(match_id));
        }

        let holder = snapshot
            .tournament
            .current_winner_team_id
            .filter(|&id| pending.involves(id))
            .unwrap_or(pending.team_a_id);
        let skipped = if holder == pending.team_a_id {
            pending.team_b_id
        } else {
            pending.team_a_id
        };

        self.store.delete_match(tournament_id, match_id)?;
        info!("skipped match {match_id}: {skipped} sent to the back of the queue");

        let matches = self.store.matches(tournament_id)?;
        match next_opponent(&snapshot.teams, &matches, holder, skipped) {
            Some(opponent) => {
                let order = matches.len() as u32 + 1;
                let replacement = MatchRecord::new(tournament_id, holder, opponent, order);
                self.store.insert_matches(vec![replacement.clone()])?;
                Ok(Some(replacement))
            }
            None => Ok(None),
        }
    }

    /// Append a full round-robin round (League mode), rest-sequenced, with
    /// orders continuing after the existing matches.
    pub fn create_round(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Vec<MatchRecord>, TournamentError> {
        let lock = self.mutation_lock(tournament_id);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        let snapshot = TournamentSnapshot::load(self.store.as_ref(), tournament_id)?;
        if snapshot.tournament.is_ended() {
            return Err(TournamentError::TournamentEnded);
        }
        if snapshot.tournament.mode != TournamentMode::League {
            return Err(TournamentError::WrongMode);
        }

        let start_order = snapshot
            .matches
            .iter()
            .map(|m| m.match_order)
            .max()
            .unwrap_or(0)
            + 1;
        let pairings = sequencer::spread(&round_pairings(&snapshot.teams));
        let round = round_matches(tournament_id, &pairings, start_order);
        info!(
            "new round for tournament {tournament_id}: {} matches from order {start_order}",
            round.len()
        );
        self.store.insert_matches(round.clone())?;
        Ok(round)
    }

    /// Delete a tournament and everything it owns (players, teams, matches).
    pub fn delete_tournament(&self, tournament_id: TournamentId) -> Result<(), TournamentError> {
        let lock = self.mutation_lock(tournament_id);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());
        self.store.delete_tournament(tournament_id)?;
        info!("deleted tournament {tournament_id}");
        Ok(())
    }

    /// The standings leader, offered as the default winner when finishing.
    pub fn suggested_winner(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Option<TeamId>, TournamentError> {
        let snapshot = TournamentSnapshot::load(self.store.as_ref(), tournament_id)?;
        suggested_winner(&snapshot.teams, &snapshot.matches)
    }

    /// Declare the tournament winner and end it. `winner` overrides the
    /// standings suggestion; it must be one of the tournament's teams.
    /// One-way transition: every later mutation is rejected.
    pub fn finish_tournament(
        &self,
        tournament_id: TournamentId,
        winner: Option<TeamId>,
    ) -> Result<Tournament, TournamentError> {
        let lock = self.mutation_lock(tournament_id);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        let snapshot = TournamentSnapshot::load(self.store.as_ref(), tournament_id)?;
        if snapshot.tournament.is_ended() {
            return Err(TournamentError::TournamentEnded);
        }

        let winner_id = match winner {
            Some(id) => {
                if !snapshot.teams.iter().any(|t| t.id == id) {
                    return Err(TournamentError::UnknownTeam(id));
                }
                id
            }
            None => suggested_winner(&snapshot.teams, &snapshot.matches)?
                .ok_or(TournamentError::NoTeams)?,
        };

        let mut tournament = snapshot.tournament;
        tournament.winner_team_id = Some(winner_id);
        tournament.ended_at = Some(Utc::now());
        self.store.update_tournament(&tournament)?;
        info!("tournament {tournament_id} finished; winner {winner_id}");
        Ok(tournament)
    }
}
