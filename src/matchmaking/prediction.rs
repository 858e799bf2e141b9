use crate::config::MatchmakingSettings;
use crate::domain::{OutcomePrediction, PlayerSkillProfile, Team};

/// Win-probability split for two skill/consistency aggregates.
///
/// Base split is `0.5 + (skill_a - skill_b) / (4 * avg_skill)`, clamped to
/// the configured probability bounds, then nudged by the consistency
/// difference and re-clamped. Competitiveness falls off linearly with the
/// skill gap and bottoms out at 0.
pub fn predict_outcome(
    skill_a: f64,
    consistency_a: f64,
    skill_b: f64,
    consistency_b: f64,
    settings: &MatchmakingSettings,
) -> OutcomePrediction {
    let avg_skill = (skill_a + skill_b) / 2.0;

    let base = if avg_skill > 0.0 {
        0.5 + (skill_a - skill_b) / (4.0 * avg_skill)
    } else {
        0.5
    };

    let clamped = base.clamp(settings.min_win_probability, settings.max_win_probability);
    let adjusted = (clamped + (consistency_a - consistency_b) * settings.consistency_factor)
        .clamp(settings.min_win_probability, settings.max_win_probability);

    let skill_diff = (skill_a - skill_b).abs();
    let competitiveness = (1.0 - skill_diff / settings.spread_scale).max(0.0);

    OutcomePrediction {
        first_win_probability: adjusted,
        second_win_probability: 1.0 - adjusted,
        competitiveness,
    }
}

pub fn predict_match(
    a: &PlayerSkillProfile,
    b: &PlayerSkillProfile,
    settings: &MatchmakingSettings,
) -> OutcomePrediction {
    predict_outcome(
        a.skill_rating,
        a.consistency,
        b.skill_rating,
        b.consistency,
        settings,
    )
}

pub fn predict_team_match(a: &Team, b: &Team, settings: &MatchmakingSettings) -> OutcomePrediction {
    predict_outcome(
        a.average_skill,
        a.average_consistency(),
        b.average_skill,
        b.average_consistency(),
        settings,
    )
}
