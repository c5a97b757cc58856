//! In-memory entity store: one map of tournaments behind a lock, with a
//! broadcast change feed.

use crate::models::{MatchId, MatchRecord, Player, Team, Tournament, TournamentId};
use crate::store::{ChangeEvent, ChangeKind, ChangeTable, EntityStore, StoreError};
use std::collections::HashMap;
use std::sync::RwLock;
use tokio::sync::broadcast;

/// All rows belonging to one tournament.
#[derive(Clone, Debug, Default)]
struct TournamentRows {
    tournament: Option<Tournament>,
    players: Vec<Player>,
    teams: Vec<Team>,
    matches: Vec<MatchRecord>,
}

/// In-process store. Writes are serialized by the `RwLock`; every successful
/// write publishes a [`ChangeEvent`]. Dropped events (no live subscriber, or
/// a lagging one) are fine: consumers refetch the full snapshot anyway.
pub struct MemoryStore {
    rows: RwLock<HashMap<TournamentId, TournamentRows>>,
    changes: broadcast::Sender<ChangeEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(64);
        Self {
            rows: RwLock::new(HashMap::new()),
            changes,
        }
    }

    fn notify(&self, tournament_id: TournamentId, table: ChangeTable, kind: ChangeKind) {
        let _ = self.changes.send(ChangeEvent {
            tournament_id,
            table,
            kind,
        });
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore for MemoryStore {
    fn insert_tournament(
        &self,
        tournament: Tournament,
        players: Vec<Player>,
        teams: Vec<Team>,
        matches: Vec<MatchRecord>,
    ) -> Result<(), StoreError> {
        let id = tournament.id;
        let mut rows = self.rows.write().map_err(|_| StoreError::LockPoisoned)?;
        rows.insert(
            id,
            TournamentRows {
                tournament: Some(tournament),
                players,
                teams,
                matches,
            },
        );
        drop(rows);
        self.notify(id, ChangeTable::Tournaments, ChangeKind::Insert);
        self.notify(id, ChangeTable::Teams, ChangeKind::Insert);
        self.notify(id, ChangeTable::Matches, ChangeKind::Insert);
        Ok(())
    }

    fn tournament(&self, id: TournamentId) -> Result<Tournament, StoreError> {
        let rows = self.rows.read().map_err(|_| StoreError::LockPoisoned)?;
        rows.get(&id)
            .and_then(|r| r.tournament.clone())
            .ok_or(StoreError::TournamentNotFound(id))
    }

    fn tournaments(&self) -> Result<Vec<Tournament>, StoreError> {
        let rows = self.rows.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut all: Vec<Tournament> = rows.values().filter_map(|r| r.tournament.clone()).collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    fn players(&self, tournament_id: TournamentId) -> Result<Vec<Player>, StoreError> {
        let rows = self.rows.read().map_err(|_| StoreError::LockPoisoned)?;
        rows.get(&tournament_id)
            .map(|r| r.players.clone())
            .ok_or(StoreError::TournamentNotFound(tournament_id))
    }

    fn teams(&self, tournament_id: TournamentId) -> Result<Vec<Team>, StoreError> {
        let rows = self.rows.read().map_err(|_| StoreError::LockPoisoned)?;
        rows.get(&tournament_id)
            .map(|r| r.teams.clone())
            .ok_or(StoreError::TournamentNotFound(tournament_id))
    }

    fn matches(&self, tournament_id: TournamentId) -> Result<Vec<MatchRecord>, StoreError> {
        let rows = self.rows.read().map_err(|_| StoreError::LockPoisoned)?;
        let r = rows
            .get(&tournament_id)
            .ok_or(StoreError::TournamentNotFound(tournament_id))?;
        let mut matches = r.matches.clone();
        matches.sort_by_key(|m| m.match_order);
        Ok(matches)
    }

    fn insert_matches(&self, matches: Vec<MatchRecord>) -> Result<(), StoreError> {
        if matches.is_empty() {
            return Ok(());
        }
        let tournament_id = matches[0].tournament_id;
        let mut rows = self.rows.write().map_err(|_| StoreError::LockPoisoned)?;
        let r = rows
            .get_mut(&tournament_id)
            .ok_or(StoreError::TournamentNotFound(tournament_id))?;
        r.matches.extend(matches);
        drop(rows);
        self.notify(tournament_id, ChangeTable::Matches, ChangeKind::Insert);
        Ok(())
    }

    fn update_match(&self, record: &MatchRecord) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(|_| StoreError::LockPoisoned)?;
        let r = rows
            .get_mut(&record.tournament_id)
            .ok_or(StoreError::TournamentNotFound(record.tournament_id))?;
        let slot = r
            .matches
            .iter_mut()
            .find(|m| m.id == record.id)
            .ok_or(StoreError::MatchNotFound(record.id))?;
        *slot = record.clone();
        drop(rows);
        self.notify(record.tournament_id, ChangeTable::Matches, ChangeKind::Update);
        Ok(())
    }

    fn delete_match(&self, tournament_id: TournamentId, id: MatchId) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(|_| StoreError::LockPoisoned)?;
        let r = rows
            .get_mut(&tournament_id)
            .ok_or(StoreError::TournamentNotFound(tournament_id))?;
        let before = r.matches.len();
        r.matches.retain(|m| m.id != id);
        if r.matches.len() == before {
            return Err(StoreError::MatchNotFound(id));
        }
        drop(rows);
        self.notify(tournament_id, ChangeTable::Matches, ChangeKind::Delete);
        Ok(())
    }

    fn update_tournament(&self, tournament: &Tournament) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(|_| StoreError::LockPoisoned)?;
        let r = rows
            .get_mut(&tournament.id)
            .ok_or(StoreError::TournamentNotFound(tournament.id))?;
        r.tournament = Some(tournament.clone());
        drop(rows);
        self.notify(tournament.id, ChangeTable::Tournaments, ChangeKind::Update);
        Ok(())
    }

    fn delete_tournament(&self, id: TournamentId) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(|_| StoreError::LockPoisoned)?;
        rows.remove(&id).ok_or(StoreError::TournamentNotFound(id))?;
        drop(rows);
        self.notify(id, ChangeTable::Tournaments, ChangeKind::Delete);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }
}
