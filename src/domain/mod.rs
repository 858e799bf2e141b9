pub mod models;

pub use models::{
    DifficultyTier, Match, MatchId, MatchStatus, Matchup, OutcomePrediction, PlayStyle, PlayerId,
    PlayerSkillProfile, PlayerStats, SeededPlayer, SeededTeam, Team, TeamId, TeamMatch,
    TeamPlayer, TeamTournament, Tournament, TournamentId, TournamentStatus,
};
