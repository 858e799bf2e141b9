use chrono::Utc;
use log::info;

use super::bracket::{MAX_PLAYERS, MIN_PLAYERS};
use super::round_count;
use crate::domain::{
    DifficultyTier, MatchId, MatchStatus, PlayerSkillProfile, SeededTeam, Team, TeamId, TeamMatch,
    TeamPlayer, TeamTournament, TournamentStatus,
};
use crate::errors::ArenaError;

pub const MIN_TEAM_MEMBERS: usize = 2;
pub const MAX_TEAM_MEMBERS: usize = 3;

impl Team {
    /// Build a team from 2-3 members. The captain is the highest-rated
    /// member; average skill is derived from the roster.
    pub fn create(
        id: TeamId,
        name: &str,
        color: &str,
        members: Vec<TeamPlayer>,
    ) -> Result<Self, ArenaError> {
        let n = members.len();
        if !(MIN_TEAM_MEMBERS..=MAX_TEAM_MEMBERS).contains(&n) {
            return Err(ArenaError::InvalidTeamSize(n));
        }

        let average_skill = members.iter().map(|m| m.skill_rating).sum::<f64>() / n as f64;
        let captain_id = members
            .iter()
            .max_by(|a, b| {
                a.skill_rating
                    .partial_cmp(&b.skill_rating)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(b.player_id.cmp(&a.player_id))
            })
            .map(|m| m.player_id)
            .unwrap_or_default();

        Ok(Self {
            id,
            name: name.to_string(),
            color: color.to_string(),
            members,
            captain_id,
            average_skill,
            wins: 0,
            losses: 0,
        })
    }

    pub fn from_profiles(
        id: TeamId,
        name: &str,
        color: &str,
        profiles: &[PlayerSkillProfile],
    ) -> Result<Self, ArenaError> {
        let members = profiles
            .iter()
            .map(|p| TeamPlayer {
                player_id: p.player_id,
                name: p.name.clone(),
                skill_rating: p.skill_rating,
                consistency: p.consistency,
            })
            .collect();
        Self::create(id, name, color, members)
    }
}

impl TeamTournament {
    /// Team mirror of `Tournament::create`: 2-16 teams, seeded by average
    /// skill descending (ties by id), consecutive seeds paired in round 1.
    pub fn create(
        name: &str,
        difficulty: DifficultyTier,
        teams: Vec<Team>,
    ) -> Result<Self, ArenaError> {
        let n = teams.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&n) {
            return Err(ArenaError::InvalidTeamCount(n));
        }

        let mut ordered = teams;
        ordered.sort_by(|a, b| {
            b.average_skill
                .partial_cmp(&a.average_skill)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.id.cmp(&b.id))
        });

        let seeded: Vec<SeededTeam> = ordered
            .into_iter()
            .enumerate()
            .map(|(idx, team)| SeededTeam {
                team,
                seed: idx as u32 + 1,
            })
            .collect();

        let entrant_ids: Vec<TeamId> = seeded.iter().map(|s| s.team.id).collect();
        let matches = build_round_matches(&entrant_ids, 1, 1);

        info!(
            "Created team tournament '{}' with {} teams, {} rounds",
            name,
            n,
            round_count(n)
        );

        Ok(Self {
            id: Utc::now().timestamp_millis(),
            name: name.to_string(),
            difficulty,
            rounds: round_count(n),
            teams: seeded,
            matches,
            current_round: 1,
            status: TournamentStatus::Pending,
            winner_id: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        })
    }

    /// Record one team's score; same lifecycle rules as the solo bracket.
    /// Team win/loss counters are recomputed from completed matches on
    /// every update.
    pub fn record_score(
        &self,
        match_id: MatchId,
        team_id: TeamId,
        score: i64,
    ) -> Result<Self, ArenaError> {
        if self.status == TournamentStatus::Completed {
            return Err(ArenaError::InvalidState("tournament already completed"));
        }

        let mut next = self.clone();
        let m = next
            .matches
            .iter_mut()
            .find(|m| m.id == match_id)
            .ok_or(ArenaError::MatchNotFound(match_id))?;

        if m.status == MatchStatus::Completed {
            return Err(ArenaError::InvalidState("match already completed"));
        }

        if m.team1 == team_id {
            m.score1 = Some(score);
        } else if m.team2 == team_id {
            m.score2 = Some(score);
        } else {
            return Err(ArenaError::TeamNotInMatch { match_id, team_id });
        }

        match (m.score1, m.score2) {
            (Some(s1), Some(s2)) => {
                m.winner_id = Some(if s2 > s1 { m.team2 } else { m.team1 });
                m.status = MatchStatus::Completed;
            }
            _ => m.status = MatchStatus::InProgress,
        }

        if next.status == TournamentStatus::Pending {
            next.status = TournamentStatus::Active;
            next.started_at = Some(Utc::now());
        }

        next.recompute_records();
        Ok(next)
    }

    /// Same idempotent round-advancement rules as the solo bracket.
    pub fn advance(&self) -> Self {
        if self.status == TournamentStatus::Completed {
            return self.clone();
        }

        let round_matches: Vec<&TeamMatch> = self
            .matches
            .iter()
            .filter(|m| m.round == self.current_round)
            .collect();

        if round_matches
            .iter()
            .any(|m| m.status != MatchStatus::Completed)
        {
            return self.clone();
        }

        let mut next = self.clone();

        if self.current_round >= self.rounds {
            next.status = TournamentStatus::Completed;
            next.winner_id = round_matches.last().and_then(|m| m.winner_id);
            next.completed_at = Some(Utc::now());
            info!(
                "Team tournament '{}' completed, winner {:?}",
                next.name, next.winner_id
            );
            return next;
        }

        let winners: Vec<TeamId> = round_matches.iter().filter_map(|m| m.winner_id).collect();

        let next_id = self.matches.len() as MatchId + 1;
        let mut new_matches = build_round_matches(&winners, self.current_round + 1, next_id);
        next.matches.append(&mut new_matches);
        next.current_round += 1;
        next
    }

    pub fn next_match_for(&self, team_id: TeamId) -> Option<&TeamMatch> {
        self.matches.iter().find(|m| {
            m.round == self.current_round
                && m.status != MatchStatus::Completed
                && m.involves(team_id)
        })
    }

    pub fn team(&self, team_id: TeamId) -> Option<&Team> {
        self.teams
            .iter()
            .map(|s| &s.team)
            .find(|t| t.id == team_id)
    }

    pub fn winner(&self) -> Option<&Team> {
        self.team(self.winner_id?)
    }

    /// Derive every team's win/loss record from completed matches. Byes
    /// count as wins; pending and in-progress matches count as nothing.
    fn recompute_records(&mut self) {
        let completed: Vec<(TeamId, TeamId, TeamId)> = self
            .matches
            .iter()
            .filter(|m| m.status == MatchStatus::Completed)
            .filter_map(|m| m.winner_id.map(|w| (m.team1, m.team2, w)))
            .collect();

        for seeded in &mut self.teams {
            let id = seeded.team.id;
            let mut wins = 0;
            let mut losses = 0;
            for &(t1, t2, winner) in &completed {
                if t1 != id && t2 != id {
                    continue;
                }
                if winner == id {
                    wins += 1;
                } else {
                    losses += 1;
                }
            }
            seeded.team.wins = wins;
            seeded.team.losses = losses;
        }
    }
}

/// Pair team ids consecutively into matches for `round`, with the same
/// trailing-bye rule as the solo bracket.
fn build_round_matches(entrants: &[TeamId], round: u32, first_id: MatchId) -> Vec<TeamMatch> {
    let mut matches = Vec::with_capacity(entrants.len().div_ceil(2));

    for (idx, chunk) in entrants.chunks(2).enumerate() {
        let id = first_id + idx as MatchId;
        let number = idx as u32 + 1;
        let m = match chunk {
            [a, b] => TeamMatch {
                id,
                round,
                number,
                team1: *a,
                team2: *b,
                score1: None,
                score2: None,
                winner_id: None,
                status: MatchStatus::Pending,
            },
            [a] => TeamMatch {
                id,
                round,
                number,
                team1: *a,
                team2: *a,
                score1: None,
                score2: None,
                winner_id: Some(*a),
                status: MatchStatus::Completed,
            },
            _ => unreachable!("chunks(2) yields 1 or 2 entrants"),
        };
        matches.push(m);
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PlayerId;

    fn member(id: PlayerId, rating: f64) -> TeamPlayer {
        TeamPlayer {
            player_id: id,
            name: format!("m{id}"),
            skill_rating: rating,
            consistency: 0.6,
        }
    }

    fn team(id: TeamId, rating: f64) -> Team {
        Team::create(
            id,
            &format!("Team {id}"),
            "crimson",
            vec![member(id * 10, rating + 100.0), member(id * 10 + 1, rating - 100.0)],
        )
        .unwrap()
    }

    fn create(n: usize) -> TeamTournament {
        // Team 1 strongest, descending, so seeds follow team ids.
        let teams = (1..=n as TeamId)
            .map(|id| team(id, 2500.0 - id as f64 * 100.0))
            .collect();
        TeamTournament::create("Team Cup", DifficultyTier::Hard, teams).unwrap()
    }

    fn complete_round(t: &TeamTournament) -> TeamTournament {
        let open: Vec<(MatchId, TeamId, TeamId)> = t
            .matches
            .iter()
            .filter(|m| m.round == t.current_round && m.status != MatchStatus::Completed)
            .map(|m| (m.id, m.team1, m.team2))
            .collect();

        let mut current = t.clone();
        for (id, t1, t2) in open {
            current = current.record_score(id, t1, 20).unwrap();
            current = current.record_score(id, t2, 15).unwrap();
        }
        current
    }

    #[test]
    fn team_size_is_validated() {
        assert_eq!(
            Team::create(1, "Solo", "teal", vec![member(1, 1000.0)]).unwrap_err(),
            ArenaError::InvalidTeamSize(1)
        );
        let too_many = (1..=4).map(|i| member(i, 1000.0)).collect();
        assert_eq!(
            Team::create(1, "Crowd", "teal", too_many).unwrap_err(),
            ArenaError::InvalidTeamSize(4)
        );
    }

    #[test]
    fn captain_is_highest_rated_member() {
        let t = Team::create(
            1,
            "Aces",
            "gold",
            vec![member(5, 1800.0), member(6, 2400.0), member(7, 2000.0)],
        )
        .unwrap();
        assert_eq!(t.captain_id, 6);
        assert!((t.average_skill - 2066.666).abs() < 0.01);
    }

    #[test]
    fn team_from_profiles_carries_skill_fields() {
        use crate::domain::{DifficultyTier, PlayStyle, PlayerSkillProfile};

        let profiles: Vec<PlayerSkillProfile> = [(4, 2200.0, 0.9), (8, 1600.0, 0.4)]
            .iter()
            .map(|&(id, rating, consistency)| PlayerSkillProfile {
                player_id: id,
                name: format!("p{id}"),
                skill_rating: rating,
                consistency,
                average_reaction_ms: 300.0,
                preferred_difficulty: DifficultyTier::from_rating(rating),
                recent_scores: vec![],
                volatility: 0.0,
                play_style: PlayStyle::Adaptive,
            })
            .collect();

        let t = Team::from_profiles(1, "Duo", "violet", &profiles).unwrap();
        assert_eq!(t.members.len(), 2);
        assert_eq!(t.captain_id, 4);
        assert_eq!(t.average_skill, 1900.0);
        assert!((t.average_consistency() - 0.65).abs() < 1e-12);
    }

    #[test]
    fn rejects_invalid_team_counts() {
        let one = vec![team(1, 2000.0)];
        assert_eq!(
            TeamTournament::create("Bad", DifficultyTier::Easy, one).unwrap_err(),
            ArenaError::InvalidTeamCount(1)
        );
    }

    #[test]
    fn seeds_follow_average_skill() {
        let teams = vec![team(1, 1500.0), team(2, 2500.0), team(3, 2000.0), team(4, 1000.0)];
        let t = TeamTournament::create("Seeded", DifficultyTier::Medium, teams).unwrap();
        let order: Vec<TeamId> = t.teams.iter().map(|s| s.team.id).collect();
        assert_eq!(order, vec![2, 3, 1, 4]);
        assert_eq!(t.matches[0].team1, 2);
        assert_eq!(t.matches[0].team2, 3);
    }

    #[test]
    fn records_are_recomputed_each_update() {
        let t = create(4);
        let t = t.record_score(1, 1, 20).unwrap();
        assert_eq!(t.team(1).unwrap().wins, 0, "no win until match completes");

        let t = t.record_score(1, 2, 10).unwrap();
        assert_eq!(t.team(1).unwrap().wins, 1);
        assert_eq!(t.team(2).unwrap().losses, 1);
        assert_eq!(t.team(3).unwrap().wins, 0);
    }

    #[test]
    fn bye_counts_as_a_win() {
        let t = create(3);
        assert_eq!(t.matches.iter().filter(|m| m.is_bye()).count(), 1);
        let t = complete_round(&t);
        assert_eq!(t.team(3).unwrap().wins, 1, "bye team gets the win on recompute");
    }

    #[test]
    fn full_playout_crowns_a_team() {
        let mut t = create(4);
        assert_eq!(t.rounds, 2);

        t = complete_round(&t).advance();
        assert_eq!(t.current_round, 2);
        t = complete_round(&t).advance();

        assert_eq!(t.status, TournamentStatus::Completed);
        // team1 always scored higher: seed-1 team (id 1) takes it.
        assert_eq!(t.winner_id, Some(1));
        assert_eq!(t.winner().unwrap().id, 1);
        assert_eq!(t.winner().unwrap().wins, 2);
    }

    #[test]
    fn advance_is_idempotent_and_final_state_sticks() {
        let t = create(4);
        assert_eq!(t.advance(), t);

        let done = {
            let mut cur = t;
            while cur.status != TournamentStatus::Completed {
                cur = complete_round(&cur).advance();
            }
            cur
        };
        assert_eq!(done.advance(), done);
        assert!(matches!(
            done.record_score(1, 1, 9).unwrap_err(),
            ArenaError::InvalidState(_)
        ));
    }

    #[test]
    fn score_errors_are_typed() {
        let t = create(4);
        assert_eq!(
            t.record_score(42, 1, 5).unwrap_err(),
            ArenaError::MatchNotFound(42)
        );
        assert_eq!(
            t.record_score(1, 4, 5).unwrap_err(),
            ArenaError::TeamNotInMatch {
                match_id: 1,
                team_id: 4
            }
        );
    }

    #[test]
    fn next_match_lookup() {
        let t = create(4);
        assert_eq!(t.next_match_for(4).unwrap().id, 2);
        assert!(t.next_match_for(99).is_none());
    }
}
