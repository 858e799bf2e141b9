use log::debug;

use crate::config::SkillSettings;
use crate::domain::{DifficultyTier, PlayStyle, PlayerSkillProfile, PlayerStats};

/// Build a skill profile from a player's aggregate statistics.
/// Pure function of its inputs; never fails.
pub fn build_profile(stats: &PlayerStats, settings: &SkillSettings) -> PlayerSkillProfile {
    let rating = calculate_skill_rating(stats, settings);
    let recent = recent_window(&stats.recent_scores, settings.recent_history_len);
    let volatility = coefficient_of_variation(&recent);
    let consistency = consistency_score(&recent);
    let play_style = classify_play_style(stats, consistency);

    debug!(
        "Built profile for {}: rating={:.0} consistency={:.2} style={}",
        stats.name,
        rating,
        consistency,
        play_style.as_str()
    );

    PlayerSkillProfile {
        player_id: stats.player_id,
        name: stats.name.clone(),
        skill_rating: rating,
        consistency,
        average_reaction_ms: stats.average_reaction_ms,
        preferred_difficulty: DifficultyTier::from_rating(rating),
        recent_scores: recent,
        volatility,
        play_style,
    }
}

/// Weighted sum of accuracy, average recent score, highest combo, and the
/// per-game perfect/insane ratios, clamped to the configured bounds.
/// Players with no recorded games get the default rating.
pub fn calculate_skill_rating(stats: &PlayerStats, settings: &SkillSettings) -> f64 {
    if stats.games_played <= 0 {
        return settings.default_rating;
    }

    let games = stats.games_played as f64;
    let accuracy = hit_accuracy(stats);
    let avg_score = mean(&stats.recent_scores);
    let perfect_ratio = stats.perfect_rounds as f64 / games;
    let insane_ratio = stats.insane_completions as f64 / games;

    let rating = accuracy * settings.accuracy_weight
        + avg_score * settings.score_weight
        + stats.highest_combo as f64 * settings.combo_weight
        + perfect_ratio * settings.perfect_weight
        + insane_ratio * settings.insane_weight;

    rating.clamp(settings.min_rating, settings.max_rating)
}

/// `1 - coefficient_of_variation` of the recent scores, clamped to [0,1].
/// Fewer than 2 samples gives a neutral 0.5.
pub fn consistency_score(recent_scores: &[i64]) -> f64 {
    if recent_scores.len() < 2 {
        return 0.5;
    }
    (1.0 - coefficient_of_variation(recent_scores)).clamp(0.0, 1.0)
}

/// Population stddev over mean of the recent scores; 0 when there are
/// fewer than 2 samples or the mean is not positive.
pub fn coefficient_of_variation(recent_scores: &[i64]) -> f64 {
    if recent_scores.len() < 2 {
        return 0.0;
    }
    let mean = mean(recent_scores);
    if mean <= 0.0 {
        return 0.0;
    }
    let variance = recent_scores
        .iter()
        .map(|&s| {
            let d = s as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / recent_scores.len() as f64;
    variance.sqrt() / mean
}

fn classify_play_style(stats: &PlayerStats, consistency: f64) -> PlayStyle {
    let games = stats.games_played.max(1) as f64;
    let perfect_ratio = stats.perfect_rounds as f64 / games;
    let hits_per_game = stats.targets_hit as f64 / games;

    // Priority order matters: consistent outranks aggressive.
    if consistency > 0.8 && perfect_ratio > 0.3 {
        PlayStyle::Consistent
    } else if stats.highest_combo > 15 && hits_per_game > 20.0 {
        PlayStyle::Aggressive
    } else {
        PlayStyle::Adaptive
    }
}

fn hit_accuracy(stats: &PlayerStats) -> f64 {
    let attempts = stats.targets_hit + stats.targets_missed;
    if attempts <= 0 {
        return 0.0;
    }
    stats.targets_hit as f64 / attempts as f64
}

fn mean(scores: &[i64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<i64>() as f64 / scores.len() as f64
}

fn recent_window(scores: &[i64], max_len: usize) -> Vec<i64> {
    let start = scores.len().saturating_sub(max_len);
    scores[start..].to_vec()
}
