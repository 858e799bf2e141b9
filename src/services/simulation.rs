use anyhow::{bail, Result};
use colored::Colorize;
use log::info;
use std::collections::HashMap;
use std::path::Path;

use crate::config::AppConfig;
use crate::domain::{
    DifficultyTier, Match, MatchStatus, PlayerId, PlayerSkillProfile, SeededPlayer, Tournament,
    TournamentStatus,
};
use crate::matchmaking::predict_outcome;
use crate::skill;
use crate::stats::StatsStore;
use crate::tournament::MAX_PLAYERS;

/// Seeds a tournament from a stats snapshot and plays it out using the
/// outcome predictor. Fully deterministic: the same snapshot always
/// produces the same bracket.
pub struct SimulationService {
    config: AppConfig,
}

impl SimulationService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, stats_path: &Path, name: &str, difficulty: Option<&str>) -> Result<()> {
        let store = StatsStore::load(stats_path)?;
        let profiles = self.ranked_profiles(&store);

        if profiles.len() < 2 {
            bail!("Need at least 2 players in the snapshot to run a tournament");
        }

        let field: Vec<PlayerSkillProfile> = profiles.into_iter().take(MAX_PLAYERS).collect();
        let difficulty = match difficulty {
            Some(s) => parse_difficulty(s)?,
            None => field_difficulty(&field),
        };

        let by_id: HashMap<PlayerId, PlayerSkillProfile> =
            field.iter().map(|p| (p.player_id, p.clone())).collect();

        let mut tournament = Tournament::create(name, difficulty, seed_field(&field))?;
        println!(
            "{} {} players, {} rounds, difficulty {}",
            format!("=== {} ===", tournament.name).bold(),
            tournament.players.len(),
            tournament.rounds,
            tournament.difficulty.as_str()
        );

        while tournament.status != TournamentStatus::Completed {
            tournament = self.play_round(&tournament, &by_id)?;
            self.print_round(&tournament);
            tournament = tournament.advance();
        }

        let champion = tournament
            .winner()
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "unknown".to_string());
        println!("{} {}", "Champion:".bold(), champion.green().bold());
        Ok(())
    }

    fn ranked_profiles(&self, store: &StatsStore) -> Vec<PlayerSkillProfile> {
        let mut profiles: Vec<PlayerSkillProfile> = store
            .all()
            .into_iter()
            .map(|stats| skill::build_profile(stats, &self.config.skill))
            .collect();
        profiles.sort_by(|a, b| {
            b.skill_rating
                .partial_cmp(&a.skill_rating)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.player_id.cmp(&b.player_id))
        });
        profiles
    }

    /// Score every open match of the current round with the predictor.
    /// The synthesized scores are the win probabilities in percent, so the
    /// favorite always wins and a dead-even match goes to the first slot.
    fn play_round(
        &self,
        tournament: &Tournament,
        by_id: &HashMap<PlayerId, PlayerSkillProfile>,
    ) -> Result<Tournament> {
        let open: Vec<(i64, PlayerId, PlayerId)> = tournament
            .matches
            .iter()
            .filter(|m| m.round == tournament.current_round && m.status != MatchStatus::Completed)
            .map(|m| (m.id, m.player1.player_id, m.player2.player_id))
            .collect();

        let mut current = tournament.clone();
        for (match_id, p1, p2) in open {
            let (skill1, cons1) = rating_of(by_id, p1);
            let (skill2, cons2) = rating_of(by_id, p2);
            let prediction = predict_outcome(skill1, cons1, skill2, cons2, &self.config.matchmaking);

            let score1 = (prediction.first_win_probability * 100.0).round() as i64;
            let score2 = (prediction.second_win_probability * 100.0).round() as i64;

            current = current.record_score(match_id, p1, score1)?;
            current = current.record_score(match_id, p2, score2)?;
        }
        info!(
            "Played round {}/{}",
            current.current_round, current.rounds
        );
        Ok(current)
    }

    fn print_round(&self, tournament: &Tournament) {
        println!("{}", format!("-- Round {} --", tournament.current_round).cyan());
        let round: Vec<&Match> = tournament
            .matches
            .iter()
            .filter(|m| m.round == tournament.current_round)
            .collect();

        for m in round {
            if m.is_bye() {
                println!("  {} advances on a bye", m.player1.name);
                continue;
            }
            let s1 = m.score1.unwrap_or(0);
            let s2 = m.score2.unwrap_or(0);
            let (w, l, ws, ls) = if m.winner_id == Some(m.player2.player_id) {
                (&m.player2, &m.player1, s2, s1)
            } else {
                (&m.player1, &m.player2, s1, s2)
            };
            println!(
                "  {} {} {} {}-{}",
                w.name.green(),
                "def.".dimmed(),
                l.name,
                ws,
                ls
            );
        }
    }
}

fn seed_field(field: &[PlayerSkillProfile]) -> Vec<SeededPlayer> {
    field
        .iter()
        .enumerate()
        .map(|(idx, p)| SeededPlayer {
            player_id: p.player_id,
            name: p.name.clone(),
            seed: idx as u32 + 1,
            skill_rating: p.skill_rating,
        })
        .collect()
}

fn field_difficulty(field: &[PlayerSkillProfile]) -> DifficultyTier {
    let avg = field.iter().map(|p| p.skill_rating).sum::<f64>() / field.len() as f64;
    DifficultyTier::from_rating(avg)
}

fn rating_of(by_id: &HashMap<PlayerId, PlayerSkillProfile>, id: PlayerId) -> (f64, f64) {
    by_id
        .get(&id)
        .map(|p| (p.skill_rating, p.consistency))
        .unwrap_or((1000.0, 0.5))
}

pub fn parse_difficulty(s: &str) -> Result<DifficultyTier> {
    match s.to_ascii_lowercase().as_str() {
        "easy" => Ok(DifficultyTier::Easy),
        "medium" => Ok(DifficultyTier::Medium),
        "hard" => Ok(DifficultyTier::Hard),
        "insane" => Ok(DifficultyTier::Insane),
        other => bail!("Unknown difficulty '{other}' (easy|medium|hard|insane)"),
    }
}
