use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type PlayerId = i64;
pub type TeamId = i64;
pub type MatchId = i64;
pub type TournamentId = i64;

/// Per-player aggregate statistics, read from the stats snapshot.
/// This core never writes back to the store that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub player_id: PlayerId,
    pub name: String,
    pub games_played: i32,
    pub targets_hit: i64,
    pub targets_missed: i64,
    pub highest_score: i64,
    pub highest_combo: i32,
    pub perfect_rounds: i32,
    pub insane_completions: i32,
    pub total_play_time_secs: i64,
    #[serde(default)]
    pub average_reaction_ms: f64,
    /// Most recent scores last; trimmed to the configured history length.
    #[serde(default)]
    pub recent_scores: Vec<i64>,
}

/// Derived skill summary for one player. Built per matchmaking request
/// from a `PlayerStats` snapshot; immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSkillProfile {
    pub player_id: PlayerId,
    pub name: String,
    pub skill_rating: f64,
    pub consistency: f64,
    pub average_reaction_ms: f64,
    pub preferred_difficulty: DifficultyTier,
    pub recent_scores: Vec<i64>,
    pub volatility: f64,
    pub play_style: PlayStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayStyle {
    Consistent,
    Aggressive,
    Adaptive,
}

impl PlayStyle {
    pub fn as_str(&self) -> &str {
        match self {
            PlayStyle::Consistent => "consistent",
            PlayStyle::Aggressive => "aggressive",
            PlayStyle::Adaptive => "adaptive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTier {
    Easy,
    Medium,
    Hard,
    Insane,
}

impl DifficultyTier {
    /// Step function of skill rating.
    pub fn from_rating(rating: f64) -> Self {
        if rating < 1200.0 {
            DifficultyTier::Easy
        } else if rating < 2000.0 {
            DifficultyTier::Medium
        } else if rating < 3000.0 {
            DifficultyTier::Hard
        } else {
            DifficultyTier::Insane
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DifficultyTier::Easy => "easy",
            DifficultyTier::Medium => "medium",
            DifficultyTier::Hard => "hard",
            DifficultyTier::Insane => "insane",
        }
    }
}

/// Tournament entrant with its assigned seed (1 = top seed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeededPlayer {
    pub player_id: PlayerId,
    pub name: String,
    pub seed: u32,
    pub skill_rating: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    Pending,
    Active,
    Completed,
}

/// One bracket match. A bye holds the same player in both slots and is
/// created already completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub round: u32,
    pub number: u32,
    pub player1: SeededPlayer,
    pub player2: SeededPlayer,
    pub score1: Option<i64>,
    pub score2: Option<i64>,
    pub winner_id: Option<PlayerId>,
    pub status: MatchStatus,
}

impl Match {
    pub fn is_bye(&self) -> bool {
        self.player1.player_id == self.player2.player_id
    }

    pub fn involves(&self, player_id: PlayerId) -> bool {
        self.player1.player_id == player_id || self.player2.player_id == player_id
    }
}

/// Single-elimination tournament aggregate. Mutating operations return a
/// new value; callers replace their snapshot wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub difficulty: DifficultyTier,
    pub players: Vec<SeededPlayer>,
    pub matches: Vec<Match>,
    pub rounds: u32,
    pub current_round: u32,
    pub status: TournamentStatus,
    pub winner_id: Option<PlayerId>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Team member, carrying the derived skill fields team math needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamPlayer {
    pub player_id: PlayerId,
    pub name: String,
    pub skill_rating: f64,
    pub consistency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub color: String,
    pub members: Vec<TeamPlayer>,
    pub captain_id: PlayerId,
    pub average_skill: f64,
    pub wins: u32,
    pub losses: u32,
}

impl Team {
    pub fn average_consistency(&self) -> f64 {
        if self.members.is_empty() {
            return 0.5;
        }
        self.members.iter().map(|m| m.consistency).sum::<f64>() / self.members.len() as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeededTeam {
    pub team: Team,
    pub seed: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMatch {
    pub id: MatchId,
    pub round: u32,
    pub number: u32,
    pub team1: TeamId,
    pub team2: TeamId,
    pub score1: Option<i64>,
    pub score2: Option<i64>,
    pub winner_id: Option<TeamId>,
    pub status: MatchStatus,
}

impl TeamMatch {
    pub fn is_bye(&self) -> bool {
        self.team1 == self.team2
    }

    pub fn involves(&self, team_id: TeamId) -> bool {
        self.team1 == team_id || self.team2 == team_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamTournament {
    pub id: TournamentId,
    pub name: String,
    pub difficulty: DifficultyTier,
    pub teams: Vec<SeededTeam>,
    pub matches: Vec<TeamMatch>,
    pub rounds: u32,
    pub current_round: u32,
    pub status: TournamentStatus,
    pub winner_id: Option<TeamId>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// A proposed pairing or group produced by the matchmaking engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub players: Vec<PlayerSkillProfile>,
    pub average_skill: f64,
    pub skill_spread: f64,
    pub synergy: f64,
    pub recommended_difficulty: DifficultyTier,
}

/// Win-probability split for a prospective match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomePrediction {
    pub first_win_probability: f64,
    pub second_win_probability: f64,
    pub competitiveness: f64,
}
