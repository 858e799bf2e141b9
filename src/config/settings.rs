/// Weights and bounds for the skill-rating formula.
#[derive(Debug, Clone)]
pub struct SkillSettings {
    /// Rating for players with zero recorded games.
    pub default_rating: f64,
    pub min_rating: f64,
    pub max_rating: f64,
    /// Weight applied to hit accuracy (a [0,1] ratio).
    pub accuracy_weight: f64,
    /// Weight applied to the mean of the recent-score history.
    pub score_weight: f64,
    /// Weight applied per point of highest combo.
    pub combo_weight: f64,
    /// Weight applied to the perfect-rounds-per-game ratio.
    pub perfect_weight: f64,
    /// Weight applied to the insane-completions-per-game ratio.
    pub insane_weight: f64,
    /// Maximum recent-score entries kept on a profile.
    pub recent_history_len: usize,
}

impl Default for SkillSettings {
    fn default() -> Self {
        Self {
            default_rating: 1000.0,
            min_rating: 100.0,
            max_rating: 5000.0,
            accuracy_weight: 1500.0,
            score_weight: 0.5,
            combo_weight: 20.0,
            perfect_weight: 800.0,
            insane_weight: 600.0,
            recent_history_len: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchmakingSettings {
    /// Players per matchup group (2 = 1v1 pairing).
    pub group_size: usize,
    pub min_win_probability: f64,
    pub max_win_probability: f64,
    /// Scale of the consistency-difference adjustment on win probability.
    pub consistency_factor: f64,
    /// Skill-difference scale for synergy and competitiveness (points of
    /// spread at which the score bottoms out).
    pub spread_scale: f64,
}

impl Default for MatchmakingSettings {
    fn default() -> Self {
        Self {
            group_size: 2,
            min_win_probability: 0.1,
            max_win_probability: 0.9,
            consistency_factor: 0.1,
            spread_scale: 1000.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SuggestionSettings {
    pub api_url: &'static str,
    pub model: &'static str,
    pub user_agent: &'static str,
    pub timeout_secs: u64,
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/chat/completions",
            model: "gpt-4o-mini",
            user_agent: "ReflexArena/1.0",
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub skill: SkillSettings,
    pub matchmaking: MatchmakingSettings,
    pub suggestion: SuggestionSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            skill: SkillSettings::default(),
            matchmaking: MatchmakingSettings::default(),
            suggestion: SuggestionSettings::default(),
        }
    }
}
