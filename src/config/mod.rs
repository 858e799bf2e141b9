pub mod settings;

pub use settings::{AppConfig, MatchmakingSettings, SkillSettings, SuggestionSettings};
