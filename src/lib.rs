//! Spikeball tournament engine: match queues, league rounds, and standings.
//!
//! Two formats: winner-stays-on (the winner holds the court, losers requeue
//! by recency) and league (full round-robin, repeatable rounds). Scheduling
//! decisions are pure functions of a tournament snapshot; mutations go
//! through [`engine::Engine`] against an [`store::EntityStore`].

pub mod engine;
pub mod logic;
pub mod models;
pub mod projection;
pub mod store;

pub use engine::{Engine, RecordedResult};
pub use logic::{
    next_match, next_opponent, on_deck_team, round_matches, round_pairings, spread,
    suggested_winner, team_standings, Pairing, TeamStanding, VOID_SCORE,
};
pub use models::{
    MatchId, MatchRecord, Player, PlayerId, Team, TeamId, Tournament, TournamentError,
    TournamentId, TournamentMode,
};
pub use projection::{recompute, TournamentProjection, TournamentSnapshot};
pub use store::{ChangeEvent, ChangeKind, ChangeTable, EntityStore, MemoryStore, StoreError};
