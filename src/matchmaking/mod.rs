pub mod engine;
pub mod prediction;

pub use engine::{MatchmakingEngine, NoSuggestions};
pub use prediction::{predict_match, predict_outcome, predict_team_match};
