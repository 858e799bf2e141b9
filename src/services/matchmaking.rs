use anyhow::{Context, Result};
use colored::Colorize;
use log::info;
use std::path::Path;

use crate::config::AppConfig;
use crate::domain::{Matchup, PlayerSkillProfile};
use crate::matchmaking::{predict_match, MatchmakingEngine};
use crate::skill;
use crate::stats::StatsStore;
use crate::suggestion::SuggestionClient;

const API_KEY_ENV: &str = "SUGGESTION_API_KEY";

/// Builds profiles from a stats snapshot and prints balanced matchups.
pub struct MatchmakingService {
    config: AppConfig,
}

impl MatchmakingService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub async fn run(&self, stats_path: &Path, group_size: Option<usize>) -> Result<()> {
        let store = StatsStore::load(stats_path)?;
        let profiles = self.build_profiles(&store);

        if profiles.len() < 2 {
            println!("Not enough players in the snapshot to match (need at least 2).");
            return Ok(());
        }

        let matchups = self.build_matchups(&profiles, group_size).await?;
        self.print_matchups(&matchups);
        Ok(())
    }

    /// Predict the outcome between two players, addressed by id or name.
    pub fn predict(&self, stats_path: &Path, player_a: &str, player_b: &str) -> Result<()> {
        let store = StatsStore::load(stats_path)?;
        let a = self.resolve_profile(&store, player_a)?;
        let b = self.resolve_profile(&store, player_b)?;

        let prediction = predict_match(&a, &b, &self.config.matchmaking);

        println!(
            "{} ({:.0}) vs {} ({:.0})",
            a.name.bold(),
            a.skill_rating,
            b.name.bold(),
            b.skill_rating
        );
        println!(
            "  win probability: {:.0}% / {:.0}%",
            prediction.first_win_probability * 100.0,
            prediction.second_win_probability * 100.0
        );
        println!("  competitiveness: {:.2}", prediction.competitiveness);
        Ok(())
    }

    fn build_profiles(&self, store: &StatsStore) -> Vec<PlayerSkillProfile> {
        let profiles: Vec<PlayerSkillProfile> = store
            .all()
            .into_iter()
            .map(|stats| skill::build_profile(stats, &self.config.skill))
            .collect();
        info!("Built {} skill profiles", profiles.len());
        profiles
    }

    async fn build_matchups(
        &self,
        profiles: &[PlayerSkillProfile],
        group_size: Option<usize>,
    ) -> Result<Vec<Matchup>> {
        let mut settings = self.config.matchmaking.clone();
        if let Some(size) = group_size {
            settings.group_size = size;
        }

        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.is_empty() => {
                let client = SuggestionClient::new(&self.config.suggestion, key)?;
                let engine = MatchmakingEngine::with_provider(client, settings);
                Ok(engine.build_matchups(profiles).await)
            }
            _ => {
                info!("{API_KEY_ENV} not set, using deterministic pairing only");
                let engine = MatchmakingEngine::deterministic(settings);
                Ok(engine.build_matchups(profiles).await)
            }
        }
    }

    fn resolve_profile(&self, store: &StatsStore, key: &str) -> Result<PlayerSkillProfile> {
        let stats = key
            .parse::<i64>()
            .ok()
            .and_then(|id| store.get(id))
            .or_else(|| store.find_by_name(key))
            .with_context(|| format!("No player '{key}' in the snapshot"))?;
        Ok(skill::build_profile(stats, &self.config.skill))
    }

    fn print_matchups(&self, matchups: &[Matchup]) {
        println!("{}", "=== Matchups ===".bold());
        for (idx, m) in matchups.iter().enumerate() {
            let names: Vec<String> = m
                .players
                .iter()
                .map(|p| format!("{} ({:.0}, {})", p.name, p.skill_rating, p.play_style.as_str()))
                .collect();
            println!(
                "{} {} [avg {:.0}, spread {:.0}, synergy {:.2}, {}]",
                format!("#{}", idx + 1).cyan(),
                names.join(" vs "),
                m.average_skill,
                m.skill_spread,
                m.synergy,
                m.recommended_difficulty.as_str()
            );

            if let [a, b] = m.players.as_slice() {
                let p = predict_match(a, b, &self.config.matchmaking);
                println!(
                    "     predicted: {:.0}% / {:.0}% (competitiveness {:.2})",
                    p.first_win_probability * 100.0,
                    p.second_win_probability * 100.0,
                    p.competitiveness
                );
            }
        }
    }
}
