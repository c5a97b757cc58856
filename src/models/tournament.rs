//! Tournament data structure, mode, and error type.

use crate::models::game::MatchId;
use crate::models::team::TeamId;
use crate::store::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Competition format.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentMode {
    /// Continuous queue: the winner holds the court, losers requeue.
    #[default]
    WinnerStaysOn,
    /// All-play-all rounds; more rounds may be appended at will.
    League,
}

/// A tournament and its scheduling cursor.
///
/// `current_winner_team_id`/`current_streak` track the team holding the court
/// and are only maintained in WinnerStaysOn mode. `winner_team_id`/`ended_at`
/// are set once at completion; after that the tournament is terminal and no
/// match may be created or mutated.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub mode: TournamentMode,
    pub winner_team_id: Option<TeamId>,
    pub current_winner_team_id: Option<TeamId>,
    pub current_streak: u32,
    pub ended_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    pub fn new(name: impl Into<String>, mode: TournamentMode) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            mode,
            winner_team_id: None,
            current_winner_team_id: None,
            current_streak: 0,
            ended_at: None,
            created_at: Utc::now(),
        }
    }

    /// A tournament with a declared winner accepts no further mutations.
    pub fn is_ended(&self) -> bool {
        self.winner_team_id.is_some()
    }
}

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, PartialEq)]
pub enum TournamentError {
    /// Scores are equal; a match must have a winner.
    TiedScore { score_a: i64, score_b: i64 },
    /// A submitted score is negative.
    NegativeScore,
    /// A submitted score exceeds what a match score can hold.
    ScoreOutOfRange(i64),
    /// A player with this name already exists (names are unique, case-insensitive).
    DuplicatePlayerName(String),
    /// Not enough players at setup (need at least 4).
    NotEnoughPlayers { required: usize, provided: usize },
    /// Tournament not found in the store.
    TournamentNotFound(TournamentId),
    /// Match not found in the tournament.
    MatchNotFound(MatchId),
    /// The match already has a result recorded.
    MatchAlreadyPlayed(MatchId),
    /// The tournament has a declared winner; no further mutations allowed.
    TournamentEnded,
    /// The referenced team does not belong to this tournament.
    UnknownTeam(TeamId),
    /// This operation does not apply to the tournament's mode.
    WrongMode,
    /// The tournament has no teams to declare a winner from.
    NoTeams,
    /// A completed match references data outside the tournament's team set;
    /// standings cannot be computed.
    ConsistencyViolation(TeamId),
    /// The entity store failed a read or write.
    Store(StoreError),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::TiedScore { score_a, score_b } => {
                write!(f, "Scores cannot be tied ({score_a}-{score_b})")
            }
            TournamentError::NegativeScore => write!(f, "Scores cannot be negative"),
            TournamentError::ScoreOutOfRange(v) => write!(f, "Score {v} is out of range"),
            TournamentError::DuplicatePlayerName(name) => {
                write!(f, "A player named '{name}' already exists")
            }
            TournamentError::NotEnoughPlayers { required, provided } => {
                write!(f, "Need at least {required} players (got {provided})")
            }
            TournamentError::TournamentNotFound(_) => write!(f, "Tournament not found"),
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::MatchAlreadyPlayed(_) => write!(f, "Match already has a result"),
            TournamentError::TournamentEnded => {
                write!(f, "Tournament has ended; no further matches allowed")
            }
            TournamentError::UnknownTeam(_) => write!(f, "Team does not belong to this tournament"),
            TournamentError::WrongMode => {
                write!(f, "Operation not available in this tournament mode")
            }
            TournamentError::NoTeams => write!(f, "Tournament has no teams"),
            TournamentError::ConsistencyViolation(id) => {
                write!(f, "Completed match references unknown team {id}")
            }
            TournamentError::Store(e) => write!(f, "Storage error: {e}"),
        }
    }
}

impl std::error::Error for TournamentError {}

impl From<StoreError> for TournamentError {
    fn from(e: StoreError) -> Self {
        TournamentError::Store(e)
    }
}
