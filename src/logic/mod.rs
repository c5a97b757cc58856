//! Scheduling and standings logic: pure functions over tournament snapshots.

pub mod league;
pub mod queue;
pub mod sequencer;
pub mod setup;
pub mod standings;

pub use league::{round_matches, round_pairings, Pairing};
pub use queue::{next_match, next_opponent, on_deck_team};
pub use sequencer::spread;
pub use setup::{draw_teams, validate_player_names, MIN_PLAYERS};
pub use standings::{suggested_winner, team_standings, TeamStanding, VOID_SCORE};
