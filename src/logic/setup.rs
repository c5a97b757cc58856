//! Tournament setup: validate the player list and pair players into teams.

use crate::models::{Player, Team, TournamentError, TournamentId};
use rand::seq::SliceRandom;

/// Minimum players to form a tournament (two teams of two).
pub const MIN_PLAYERS: usize = 4;

/// Validate raw player names: trimmed, non-empty, unique (case-insensitive),
/// and at least [`MIN_PLAYERS`] of them.
pub fn validate_player_names(names: &[String]) -> Result<Vec<String>, TournamentError> {
    let trimmed: Vec<String> = names
        .iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();
    if trimmed.len() < MIN_PLAYERS {
        return Err(TournamentError::NotEnoughPlayers {
            required: MIN_PLAYERS,
            provided: trimmed.len(),
        });
    }
    for (i, name) in trimmed.iter().enumerate() {
        if trimmed[..i].iter().any(|o| o.eq_ignore_ascii_case(name)) {
            return Err(TournamentError::DuplicatePlayerName(name.clone()));
        }
    }
    Ok(trimmed)
}

/// Create player rows and randomly pair them into teams of two.
///
/// Players are shuffled, then chunked in twos; an odd player forms a
/// short-handed team with no second player.
pub fn draw_teams(
    tournament_id: TournamentId,
    names: &[String],
) -> (Vec<Player>, Vec<Team>) {
    let mut players: Vec<Player> = names
        .iter()
        .map(|n| Player::new(tournament_id, n.clone()))
        .collect();
    players.shuffle(&mut rand::thread_rng());

    let teams: Vec<Team> = players
        .chunks(2)
        .map(|pair| Team::new(tournament_id, pair[0].id, pair.get(1).map(|p| p.id)))
        .collect();
    (players, teams)
}
