use log::{info, warn};
use std::collections::HashMap;

use crate::config::MatchmakingSettings;
use crate::domain::{DifficultyTier, Matchup, PlayerId, PlayerSkillProfile};
use crate::suggestion::SuggestionProvider;

/// Groups players into balanced matchups. An optional suggestion provider
/// is consulted first; the deterministic adjacent-skill pairing is both the
/// fallback and the reference behavior.
pub struct MatchmakingEngine<P> {
    provider: Option<P>,
    settings: MatchmakingSettings,
}

/// Placeholder provider for purely deterministic engines.
pub struct NoSuggestions;

impl SuggestionProvider for NoSuggestions {
    async fn suggest_groups(
        &self,
        _profiles: &[PlayerSkillProfile],
        _group_size: usize,
    ) -> anyhow::Result<Vec<Vec<PlayerId>>> {
        anyhow::bail!("no suggestion provider configured")
    }
}

impl MatchmakingEngine<NoSuggestions> {
    pub fn deterministic(settings: MatchmakingSettings) -> Self {
        Self {
            provider: None,
            settings,
        }
    }
}

impl<P: SuggestionProvider> MatchmakingEngine<P> {
    pub fn with_provider(provider: P, settings: MatchmakingSettings) -> Self {
        Self {
            provider: Some(provider),
            settings,
        }
    }

    /// Produce matchups for the given profiles. Fewer than 2 profiles is an
    /// empty result, not an error. Provider failures are logged and recovered
    /// via the fallback; the provider is attempted exactly once.
    pub async fn build_matchups(&self, profiles: &[PlayerSkillProfile]) -> Vec<Matchup> {
        if profiles.len() < 2 {
            return Vec::new();
        }

        if let Some(provider) = &self.provider {
            match provider
                .suggest_groups(profiles, self.settings.group_size)
                .await
            {
                Ok(groups) => {
                    if let Some(matchups) = self.matchups_from_groups(profiles, &groups) {
                        info!("Using suggested grouping ({} groups)", matchups.len());
                        return matchups;
                    }
                    warn!("Suggested grouping is not a valid cover, using fallback");
                }
                Err(e) => warn!("Suggestion provider failed ({e:#}), using fallback"),
            }
        }

        self.fallback_matchups(profiles)
    }

    /// Deterministic pairing: sort descending by skill rating (ties by id),
    /// then take adjacent entries in group-size chunks. A short final chunk
    /// is kept so every player appears in exactly one matchup.
    pub fn fallback_matchups(&self, profiles: &[PlayerSkillProfile]) -> Vec<Matchup> {
        if profiles.len() < 2 {
            return Vec::new();
        }

        let mut sorted: Vec<PlayerSkillProfile> = profiles.to_vec();
        sorted.sort_by(|a, b| {
            b.skill_rating
                .partial_cmp(&a.skill_rating)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.player_id.cmp(&b.player_id))
        });

        sorted
            .chunks(self.settings.group_size.max(2))
            .map(|chunk| self.build_matchup(chunk.to_vec()))
            .collect()
    }

    /// Map a suggested id grouping back onto profiles. Accepted only if it
    /// covers every input id exactly once in groups of the requested size
    /// (the final group may be short); anything else is discarded.
    fn matchups_from_groups(
        &self,
        profiles: &[PlayerSkillProfile],
        groups: &[Vec<PlayerId>],
    ) -> Option<Vec<Matchup>> {
        if groups.is_empty() {
            return None;
        }

        let by_id: HashMap<PlayerId, &PlayerSkillProfile> =
            profiles.iter().map(|p| (p.player_id, p)).collect();

        let group_size = self.settings.group_size.max(2);
        let mut seen = 0usize;
        let mut matchups = Vec::with_capacity(groups.len());

        for (idx, group) in groups.iter().enumerate() {
            let is_last = idx == groups.len() - 1;
            if group.len() > group_size || (!is_last && group.len() != group_size) {
                return None;
            }

            let mut members = Vec::with_capacity(group.len());
            for id in group {
                members.push((*by_id.get(id)?).clone());
            }
            seen += members.len();
            matchups.push(self.build_matchup(members));
        }

        // Duplicate ids inside the groups would double-count against `seen`
        // only if another id went missing, so check both directions.
        let mut ids: Vec<PlayerId> = groups.iter().flatten().copied().collect();
        ids.sort_unstable();
        ids.dedup();
        if seen != profiles.len() || ids.len() != profiles.len() {
            return None;
        }

        Some(matchups)
    }

    fn build_matchup(&self, players: Vec<PlayerSkillProfile>) -> Matchup {
        let ratings: Vec<f64> = players.iter().map(|p| p.skill_rating).collect();
        let average_skill = ratings.iter().sum::<f64>() / ratings.len() as f64;
        let max = ratings.iter().cloned().fold(f64::MIN, f64::max);
        let min = ratings.iter().cloned().fold(f64::MAX, f64::min);
        let skill_spread = max - min;
        let synergy = (1.0 - skill_spread / self.settings.spread_scale).max(0.0);

        Matchup {
            average_skill,
            skill_spread,
            synergy,
            recommended_difficulty: DifficultyTier::from_rating(average_skill),
            players,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PlayStyle;
    use anyhow::Result;

    fn profile(id: PlayerId, rating: f64) -> PlayerSkillProfile {
        PlayerSkillProfile {
            player_id: id,
            name: format!("p{id}"),
            skill_rating: rating,
            consistency: 0.5,
            average_reaction_ms: 300.0,
            preferred_difficulty: DifficultyTier::from_rating(rating),
            recent_scores: vec![],
            volatility: 0.0,
            play_style: PlayStyle::Adaptive,
        }
    }

    struct FailingProvider;

    impl SuggestionProvider for FailingProvider {
        async fn suggest_groups(
            &self,
            _profiles: &[PlayerSkillProfile],
            _group_size: usize,
        ) -> Result<Vec<Vec<PlayerId>>> {
            anyhow::bail!("service unreachable")
        }
    }

    struct FixedProvider(Vec<Vec<PlayerId>>);

    impl SuggestionProvider for FixedProvider {
        async fn suggest_groups(
            &self,
            _profiles: &[PlayerSkillProfile],
            _group_size: usize,
        ) -> Result<Vec<Vec<PlayerId>>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn fallback_pairs_adjacent_ranks() {
        let engine = MatchmakingEngine::deterministic(MatchmakingSettings::default());
        let profiles = vec![
            profile(1, 3000.0),
            profile(2, 2500.0),
            profile(3, 2000.0),
            profile(4, 1500.0),
        ];
        let matchups = engine.fallback_matchups(&profiles);
        assert_eq!(matchups.len(), 2);
        let ids: Vec<Vec<PlayerId>> = matchups
            .iter()
            .map(|m| m.players.iter().map(|p| p.player_id).collect())
            .collect();
        assert_eq!(ids, vec![vec![1, 2], vec![3, 4]]);
    }

    #[test]
    fn fallback_is_order_independent() {
        let engine = MatchmakingEngine::deterministic(MatchmakingSettings::default());
        let shuffled = vec![
            profile(4, 1500.0),
            profile(1, 3000.0),
            profile(3, 2000.0),
            profile(2, 2500.0),
        ];
        let matchups = engine.fallback_matchups(&shuffled);
        assert_eq!(matchups[0].players[0].player_id, 1);
        assert_eq!(matchups[0].players[1].player_id, 2);
    }

    #[test]
    fn matchup_annotations() {
        let engine = MatchmakingEngine::deterministic(MatchmakingSettings::default());
        let matchups = engine.fallback_matchups(&[profile(1, 2200.0), profile(2, 1800.0)]);
        let m = &matchups[0];
        assert_eq!(m.average_skill, 2000.0);
        assert_eq!(m.skill_spread, 400.0);
        assert!((m.synergy - 0.6).abs() < 1e-12);
        assert_eq!(m.recommended_difficulty, DifficultyTier::Hard);
    }

    #[test]
    fn fewer_than_two_profiles_is_empty() {
        let engine = MatchmakingEngine::deterministic(MatchmakingSettings::default());
        assert!(engine.fallback_matchups(&[profile(1, 1000.0)]).is_empty());
    }

    #[tokio::test]
    async fn provider_failure_falls_back_silently() {
        let engine =
            MatchmakingEngine::with_provider(FailingProvider, MatchmakingSettings::default());
        let profiles = vec![profile(1, 2000.0), profile(2, 1000.0)];
        let matchups = engine.build_matchups(&profiles).await;
        assert_eq!(matchups.len(), 1);
        assert_eq!(matchups[0].players[0].player_id, 1);
    }

    #[tokio::test]
    async fn valid_suggestion_is_used() {
        let engine = MatchmakingEngine::with_provider(
            FixedProvider(vec![vec![1, 4], vec![2, 3]]),
            MatchmakingSettings::default(),
        );
        let profiles = vec![
            profile(1, 3000.0),
            profile(2, 2500.0),
            profile(3, 2000.0),
            profile(4, 1500.0),
        ];
        let matchups = engine.build_matchups(&profiles).await;
        let ids: Vec<Vec<PlayerId>> = matchups
            .iter()
            .map(|m| m.players.iter().map(|p| p.player_id).collect())
            .collect();
        assert_eq!(ids, vec![vec![1, 4], vec![2, 3]]);
    }

    #[tokio::test]
    async fn non_permutation_suggestion_is_rejected() {
        // Id 9 does not exist and id 3 is missing: fallback must run.
        let engine = MatchmakingEngine::with_provider(
            FixedProvider(vec![vec![1, 2], vec![9, 4]]),
            MatchmakingSettings::default(),
        );
        let profiles = vec![
            profile(1, 3000.0),
            profile(2, 2500.0),
            profile(3, 2000.0),
            profile(4, 1500.0),
        ];
        let matchups = engine.build_matchups(&profiles).await;
        let ids: Vec<Vec<PlayerId>> = matchups
            .iter()
            .map(|m| m.players.iter().map(|p| p.player_id).collect())
            .collect();
        assert_eq!(ids, vec![vec![1, 2], vec![3, 4]]);
    }

    #[tokio::test]
    async fn duplicate_id_suggestion_is_rejected() {
        let engine = MatchmakingEngine::with_provider(
            FixedProvider(vec![vec![1, 1], vec![2, 3]]),
            MatchmakingSettings::default(),
        );
        let profiles = vec![profile(1, 3000.0), profile(2, 2500.0), profile(3, 2000.0)];
        let matchups = engine.build_matchups(&profiles).await;
        // Fallback on 3 players: pair of the top two plus a leftover group.
        assert_eq!(matchups.len(), 2);
        assert_eq!(matchups[0].players.len(), 2);
        assert_eq!(matchups[1].players.len(), 1);
    }
}
