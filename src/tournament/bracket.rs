use chrono::Utc;
use log::info;

use super::round_count;
use crate::domain::{
    DifficultyTier, Match, MatchId, MatchStatus, PlayerId, SeededPlayer, Tournament,
    TournamentStatus,
};
use crate::errors::ArenaError;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 16;

impl Match {
    /// The winning entrant, once decided.
    pub fn winner(&self) -> Option<&SeededPlayer> {
        let id = self.winner_id?;
        if self.player1.player_id == id {
            Some(&self.player1)
        } else {
            Some(&self.player2)
        }
    }
}

impl Tournament {
    /// Create a single-elimination tournament. Players are ordered by seed;
    /// round 1 pairs consecutive seeds, with an auto-completed bye for an
    /// unpaired last entrant. Round count is fixed here and never changes.
    pub fn create(
        name: &str,
        difficulty: DifficultyTier,
        players: Vec<SeededPlayer>,
    ) -> Result<Self, ArenaError> {
        let n = players.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&n) {
            return Err(ArenaError::InvalidPlayerCount(n));
        }

        let mut seeded = players;
        seeded.sort_by_key(|p| p.seed);
        let matches = build_round_matches(&seeded, 1, 1);

        info!(
            "Created tournament '{}' with {} players, {} rounds",
            name,
            n,
            round_count(n)
        );

        Ok(Self {
            id: Utc::now().timestamp_millis(),
            name: name.to_string(),
            difficulty,
            rounds: round_count(n),
            players: seeded,
            matches,
            current_round: 1,
            status: TournamentStatus::Pending,
            winner_id: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        })
    }

    /// Record one player's score in a match, returning the updated
    /// tournament. The first score of a pending tournament makes it active.
    /// Once both scores are in, the match completes with the higher scorer
    /// as winner; equal scores resolve to the first-listed player.
    pub fn record_score(
        &self,
        match_id: MatchId,
        player_id: PlayerId,
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

        if m.player1.player_id == player_id {
            m.score1 = Some(score);
        } else if m.player2.player_id == player_id {
            m.score2 = Some(score);
        } else {
            return Err(ArenaError::PlayerNotInMatch {
                match_id,
                player_id,
            });
        }

        match (m.score1, m.score2) {
            (Some(s1), Some(s2)) => {
                m.winner_id = Some(if s2 > s1 {
                    m.player2.player_id
                } else {
                    m.player1.player_id
                });
                m.status = MatchStatus::Completed;
            }
            _ => m.status = MatchStatus::InProgress,
        }

        if next.status == TournamentStatus::Pending {
            next.status = TournamentStatus::Active;
            next.started_at = Some(Utc::now());
        }

        Ok(next)
    }

    /// Advance to the next round if every match of the current round is
    /// completed; otherwise (and on completed tournaments) return an
    /// unchanged copy, making repeated calls idempotent. Completing the
    /// final round crowns the champion.
    pub fn advance(&self) -> Self {
        if self.status == TournamentStatus::Completed {
            return self.clone();
        }

        let round_matches: Vec<&Match> = self
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
                "Tournament '{}' completed, winner {:?}",
                next.name, next.winner_id
            );
            return next;
        }

        let winners: Vec<SeededPlayer> = round_matches
            .iter()
            .filter_map(|m| m.winner().cloned())
            .collect();

        let next_id = self.matches.len() as MatchId + 1;
        let mut new_matches = build_round_matches(&winners, self.current_round + 1, next_id);
        next.matches.append(&mut new_matches);
        next.current_round += 1;
        next
    }

    /// The player's unfinished match in the current round, if any.
    pub fn next_match_for(&self, player_id: PlayerId) -> Option<&Match> {
        self.matches.iter().find(|m| {
            m.round == self.current_round
                && m.status != MatchStatus::Completed
                && m.involves(player_id)
        })
    }

    pub fn winner(&self) -> Option<&SeededPlayer> {
        let id = self.winner_id?;
        self.players.iter().find(|p| p.player_id == id)
    }
}

/// Pair entrants consecutively into matches for `round`. An odd entrant
/// count yields one trailing bye: the same player in both slots, already
/// completed and won.
fn build_round_matches(entrants: &[SeededPlayer], round: u32, first_id: MatchId) -> Vec<Match> {
    let mut matches = Vec::with_capacity(entrants.len().div_ceil(2));

    for (idx, chunk) in entrants.chunks(2).enumerate() {
        let id = first_id + idx as MatchId;
        let number = idx as u32 + 1;
        let m = match chunk {
            [a, b] => Match {
                id,
                round,
                number,
                player1: a.clone(),
                player2: b.clone(),
                score1: None,
                score2: None,
                winner_id: None,
                status: MatchStatus::Pending,
            },
            [a] => Match {
                id,
                round,
                number,
                player1: a.clone(),
                player2: a.clone(),
                score1: None,
                score2: None,
                winner_id: Some(a.player_id),
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

    fn players(n: usize) -> Vec<SeededPlayer> {
        (1..=n)
            .map(|i| SeededPlayer {
                player_id: i as PlayerId,
                name: format!("p{i}"),
                seed: i as u32,
                skill_rating: 3000.0 - i as f64 * 100.0,
            })
            .collect()
    }

    fn create(n: usize) -> Tournament {
        Tournament::create("Test Cup", DifficultyTier::Medium, players(n)).unwrap()
    }

    /// Score every open match of the current round; player1 always wins.
    fn complete_round(t: &Tournament) -> Tournament {
        let open: Vec<(MatchId, PlayerId, PlayerId)> = t
            .matches
            .iter()
            .filter(|m| m.round == t.current_round && m.status != MatchStatus::Completed)
            .map(|m| (m.id, m.player1.player_id, m.player2.player_id))
            .collect();

        let mut current = t.clone();
        for (id, p1, p2) in open {
            current = current.record_score(id, p1, 10).unwrap();
            current = current.record_score(id, p2, 5).unwrap();
        }
        current
    }

    #[test]
    fn rejects_invalid_player_counts() {
        for n in [0, 1, 17, 32] {
            let err = Tournament::create("Bad", DifficultyTier::Easy, players(n)).unwrap_err();
            assert_eq!(err, ArenaError::InvalidPlayerCount(n));
        }
    }

    #[test]
    fn round_and_match_counts_for_all_valid_sizes() {
        for n in 2..=16usize {
            let t = create(n);
            let expected_rounds = (n as f64).log2().ceil() as u32;
            assert_eq!(t.rounds, expected_rounds, "rounds for n={n}");
            let round1 = t.matches.iter().filter(|m| m.round == 1).count();
            assert_eq!(round1, n.div_ceil(2), "round-1 matches for n={n}");
        }
    }

    #[test]
    fn odd_count_gets_exactly_one_bye() {
        for n in [3usize, 5, 7, 9, 11, 13, 15] {
            let t = create(n);
            let byes: Vec<&Match> = t.matches.iter().filter(|m| m.is_bye()).collect();
            assert_eq!(byes.len(), 1, "byes for n={n}");
            let bye = byes[0];
            assert_eq!(bye.status, MatchStatus::Completed);
            assert_eq!(bye.winner_id, Some(n as PlayerId));
        }
    }

    #[test]
    fn seeds_pair_consecutively() {
        let t = create(4);
        assert_eq!(t.matches[0].player1.seed, 1);
        assert_eq!(t.matches[0].player2.seed, 2);
        assert_eq!(t.matches[1].player1.seed, 3);
        assert_eq!(t.matches[1].player2.seed, 4);
    }

    #[test]
    fn first_score_activates_tournament() {
        let t = create(4);
        assert_eq!(t.status, TournamentStatus::Pending);
        assert!(t.started_at.is_none());

        let t = t.record_score(1, 1, 12).unwrap();
        assert_eq!(t.status, TournamentStatus::Active);
        assert!(t.started_at.is_some());
        assert_eq!(t.matches[0].status, MatchStatus::InProgress);
    }

    #[test]
    fn both_scores_complete_the_match() {
        let t = create(2);
        let t = t.record_score(1, 1, 7).unwrap();
        let t = t.record_score(1, 2, 11).unwrap();
        let m = &t.matches[0];
        assert_eq!(m.status, MatchStatus::Completed);
        assert_eq!(m.winner_id, Some(2));
    }

    #[test]
    fn ties_resolve_to_first_listed_player() {
        let t = create(2);
        let t = t.record_score(1, 2, 9).unwrap();
        let t = t.record_score(1, 1, 9).unwrap();
        assert_eq!(t.matches[0].winner_id, Some(1));
    }

    #[test]
    fn score_errors_are_typed() {
        let t = create(4);
        assert_eq!(
            t.record_score(99, 1, 5).unwrap_err(),
            ArenaError::MatchNotFound(99)
        );
        assert_eq!(
            t.record_score(1, 3, 5).unwrap_err(),
            ArenaError::PlayerNotInMatch {
                match_id: 1,
                player_id: 3
            }
        );

        let done = t.record_score(1, 1, 9).unwrap().record_score(1, 2, 4).unwrap();
        assert!(matches!(
            done.record_score(1, 1, 3).unwrap_err(),
            ArenaError::InvalidState(_)
        ));
    }

    #[test]
    fn advance_is_idempotent_on_incomplete_round() {
        let t = create(4).record_score(1, 1, 10).unwrap();
        let once = t.advance();
        let twice = once.advance();
        assert_eq!(once, t);
        assert_eq!(twice, t);
    }

    #[test]
    fn four_player_walkthrough() {
        let t = create(4);
        assert_eq!(t.rounds, 2);

        let t = complete_round(&t).advance();
        assert_eq!(t.current_round, 2);
        let round2: Vec<&Match> = t.matches.iter().filter(|m| m.round == 2).collect();
        assert_eq!(round2.len(), 1);
        // player1 won both round-1 matches: seeds 1 and 3 meet in the final.
        assert_eq!(round2[0].player1.player_id, 1);
        assert_eq!(round2[0].player2.player_id, 3);

        let t = complete_round(&t).advance();
        assert_eq!(t.status, TournamentStatus::Completed);
        assert_eq!(t.winner_id, Some(1));
        assert_eq!(t.winner().unwrap().player_id, 1);
        assert!(t.completed_at.is_some());
    }

    #[test]
    fn completed_tournament_never_regresses() {
        let mut t = create(2);
        t = complete_round(&t).advance();
        assert_eq!(t.status, TournamentStatus::Completed);

        let again = t.advance();
        assert_eq!(again, t);
        assert!(matches!(
            t.record_score(1, 1, 50).unwrap_err(),
            ArenaError::InvalidState(_)
        ));
    }

    #[test]
    fn every_size_plays_out_to_a_champion() {
        for n in 2..=16usize {
            let mut t = create(n);
            let mut guard = 0;
            while t.status != TournamentStatus::Completed {
                t = complete_round(&t).advance();
                guard += 1;
                assert!(guard <= t.rounds, "n={n} took too many advances");
            }
            assert!(t.winner_id.is_some(), "no winner for n={n}");
            assert!(t.players.iter().any(|p| Some(p.player_id) == t.winner_id));
            // Matches only ever got appended, one set per round.
            assert_eq!(t.current_round, t.rounds);
        }
    }

    #[test]
    fn bye_winner_advances_to_next_round() {
        let t = create(3);
        let t = complete_round(&t).advance();
        let round2: Vec<&Match> = t.matches.iter().filter(|m| m.round == 2).collect();
        assert_eq!(round2.len(), 1);
        assert!(round2[0].involves(3), "bye player must reach round 2");
    }

    #[test]
    fn next_match_lookup() {
        let t = create(4);
        assert_eq!(t.next_match_for(4).unwrap().id, 2);
        assert!(t.next_match_for(99).is_none());

        let t = complete_round(&t);
        assert!(t.next_match_for(4).is_none(), "round done, nothing open");
        let t = t.advance();
        assert_eq!(t.next_match_for(1).unwrap().round, 2);
        assert!(t.next_match_for(4).is_none(), "eliminated player has no match");
    }
}
