use thiserror::Error;

use crate::domain::{MatchId, PlayerId, TeamId};

/// Errors that can occur during tournament operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArenaError {
    /// Single-elimination brackets support 2 to 16 entrants.
    #[error("tournament requires 2 to 16 players, got {0}")]
    InvalidPlayerCount(usize),
    #[error("tournament requires 2 to 16 teams, got {0}")]
    InvalidTeamCount(usize),
    /// Teams hold 2 or 3 members.
    #[error("team requires 2 or 3 members, got {0}")]
    InvalidTeamSize(usize),
    #[error("match {0} not found in tournament")]
    MatchNotFound(MatchId),
    #[error("player {player_id} is not in match {match_id}")]
    PlayerNotInMatch {
        match_id: MatchId,
        player_id: PlayerId,
    },
    #[error("team {team_id} is not in match {match_id}")]
    TeamNotInMatch { match_id: MatchId, team_id: TeamId },
    #[error("invalid state for this operation: {0}")]
    InvalidState(&'static str),
}
