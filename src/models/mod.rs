//! Data structures for tournaments: players, teams, matches, tournament state.

mod game;
mod player;
mod team;
mod tournament;

pub use game::{MatchId, MatchRecord};
pub use player::{Player, PlayerId};
pub use team::{Team, TeamId};
pub use tournament::{Tournament, TournamentError, TournamentId, TournamentMode};
