//! Entity store contract: durable rows plus a change feed.
//!
//! The scheduling engine treats persistence as an external collaborator; the
//! trait below is the read/write contract it needs. Every write must emit a
//! [`ChangeEvent`] so consumers can invalidate their snapshot and recompute.

mod memory;

pub use memory::MemoryStore;

use crate::models::{MatchId, MatchRecord, Player, Team, Tournament, TournamentId};
use tokio::sync::broadcast;

/// Which table a change touched.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChangeTable {
    Tournaments,
    Teams,
    Matches,
}

/// What happened to the row.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A row-level change notification, scoped to one tournament.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ChangeEvent {
    pub tournament_id: TournamentId,
    pub table: ChangeTable,
    pub kind: ChangeKind,
}

/// Errors from the entity store.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StoreError {
    TournamentNotFound(TournamentId),
    MatchNotFound(MatchId),
    /// The store's internal lock was poisoned by a panicking writer.
    LockPoisoned,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::TournamentNotFound(id) => write!(f, "No tournament with id {id}"),
            StoreError::MatchNotFound(id) => write!(f, "No match with id {id}"),
            StoreError::LockPoisoned => write!(f, "Store lock poisoned"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Read/write contract the engine needs from durable storage.
///
/// Reads return rows for one tournament; `matches` is sorted by `match_order`
/// ascending. Writes are row-granular; multi-step flows (score + cursor +
/// follow-up insert) are sequenced by the engine, not the store.
pub trait EntityStore: Send + Sync {
    fn insert_tournament(
        &self,
        tournament: Tournament,
        players: Vec<Player>,
        teams: Vec<Team>,
        matches: Vec<MatchRecord>,
    ) -> Result<(), StoreError>;

    fn tournament(&self, id: TournamentId) -> Result<Tournament, StoreError>;
    fn tournaments(&self) -> Result<Vec<Tournament>, StoreError>;
    fn players(&self, tournament_id: TournamentId) -> Result<Vec<Player>, StoreError>;
    fn teams(&self, tournament_id: TournamentId) -> Result<Vec<Team>, StoreError>;
    fn matches(&self, tournament_id: TournamentId) -> Result<Vec<MatchRecord>, StoreError>;

    fn insert_matches(&self, matches: Vec<MatchRecord>) -> Result<(), StoreError>;
    fn update_match(&self, record: &MatchRecord) -> Result<(), StoreError>;
    /// Delete a pending match (skip is the only caller).
    fn delete_match(&self, tournament_id: TournamentId, id: MatchId) -> Result<(), StoreError>;
    fn update_tournament(&self, tournament: &Tournament) -> Result<(), StoreError>;
    /// Cascade delete: the tournament and all its players, teams and matches.
    fn delete_tournament(&self, id: TournamentId) -> Result<(), StoreError>;

    /// Subscribe to the change feed. Events carry a tournament id; consumers
    /// filter for the tournaments they watch.
    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent>;
}
