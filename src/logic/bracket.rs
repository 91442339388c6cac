//! Bracket builder: turns a seed-ordered participant list into the match arena for
//! single or double elimination.
//!
//! The bracket is first laid out as a plan of nodes whose seats name their source
//! (a seed, or the winner/loser of an earlier node). Liveness of each seat follows
//! from the number of participants, which tells which losers-bracket nodes can be
//! skipped: a node with a single live seat passes its participant straight on, a
//! node with none is never played. Only the remaining nodes become `Match`es, and
//! their forward pointers are resolved through the skipped ones.

use crate::models::{
    BracketSide, Feed, Match, MatchStatus, ParticipantId, Side, TournamentError, TournamentId,
};
use chrono::Utc;

/// Smallest power of two >= n, never below 2.
pub fn bracket_size(n: usize) -> usize {
    n.max(2).next_power_of_two()
}

/// Number of winners-bracket rounds for a bracket of `size` slots.
pub fn round_count(size: usize) -> u32 {
    size.trailing_zeros()
}

/// Standard seeding: `order[slot]` is the 0-based seed placed in that slot.
///
/// For 8 slots: `[0, 7, 3, 4, 1, 6, 2, 5]`, i.e. 1v8, 4v5, 2v7, 3v6. The better seed
/// of every pair sits on side A, so padding seeds (byes) always land on side B.
pub fn seed_order(size: usize) -> Vec<usize> {
    let mut order = vec![0, 1];
    while order.len() < size {
        let next_size = order.len() * 2;
        order = order
            .iter()
            .flat_map(|&seed| [seed, next_size - 1 - seed])
            .collect();
    }
    order.truncate(size.max(2));
    order
}

#[derive(Clone, Copy, Debug)]
enum Source {
    Seed(usize),
    Winner(usize),
    Loser(usize),
}

#[derive(Clone, Debug)]
struct Node {
    side: Option<BracketSide>,
    round: u32,
    slot: u32,
    seats: [Source; 2],
}

#[derive(Default)]
struct Plan {
    nodes: Vec<Node>,
}

impl Plan {
    fn push(&mut self, side: Option<BracketSide>, round: u32, slot: usize, seats: [Source; 2]) -> usize {
        self.nodes.push(Node {
            side,
            round,
            slot: slot as u32,
            seats,
        });
        self.nodes.len() - 1
    }

    /// Winners tree (or the whole single-elimination bracket). Returns node ids by round.
    fn winners(&mut self, size: usize, side: Option<BracketSide>) -> Vec<Vec<usize>> {
        let order = seed_order(size);
        let mut rounds: Vec<Vec<usize>> = Vec::new();
        let first: Vec<usize> = (0..size / 2)
            .map(|slot| {
                let seats = [Source::Seed(order[slot * 2]), Source::Seed(order[slot * 2 + 1])];
                self.push(side, 1, slot, seats)
            })
            .collect();
        rounds.push(first);
        for round in 2..=round_count(size) {
            let prev = rounds[rounds.len() - 1].clone();
            let ids: Vec<usize> = prev
                .chunks(2)
                .enumerate()
                .map(|(slot, pair)| {
                    self.push(side, round, slot, [Source::Winner(pair[0]), Source::Winner(pair[1])])
                })
                .collect();
            rounds.push(ids);
        }
        rounds
    }

    /// Losers tree fed by `winners` (node ids by winners round). Returns node ids by round.
    fn losers(&mut self, winners: &[Vec<usize>]) -> Vec<Vec<usize>> {
        let side = Some(BracketSide::Losers);
        let mut rounds: Vec<Vec<usize>> = Vec::new();
        if winners.len() < 2 {
            return rounds;
        }
        // Round 1: losers of winners round 1, paired in slot order.
        let first: Vec<usize> = winners[0]
            .chunks(2)
            .enumerate()
            .map(|(slot, pair)| self.push(side, 1, slot, [Source::Loser(pair[0]), Source::Loser(pair[1])]))
            .collect();
        rounds.push(first);

        for k in 1..winners.len() {
            // Drop-in round: losers of winners round k+1 against the survivors.
            let drops = &winners[k];
            let survivors = rounds[rounds.len() - 1].clone();
            let count = drops.len();
            let reversed = k % 2 == 1;
            let round = (2 * k) as u32;
            let ids: Vec<usize> = (0..count)
                .map(|slot| {
                    let from = if reversed { count - 1 - slot } else { slot };
                    let seats = [Source::Loser(drops[from]), Source::Winner(survivors[slot])];
                    self.push(side, round, slot, seats)
                })
                .collect();
            rounds.push(ids);

            if k + 1 < winners.len() {
                // Halving round among survivors only.
                let prev = rounds[rounds.len() - 1].clone();
                let ids: Vec<usize> = prev
                    .chunks(2)
                    .enumerate()
                    .map(|(slot, pair)| {
                        let seats = [Source::Winner(pair[0]), Source::Winner(pair[1])];
                        self.push(side, round + 1, slot, seats)
                    })
                    .collect();
                rounds.push(ids);
            }
        }
        rounds
    }

    fn materialize(&self, tournament_id: TournamentId, seeds: &[ParticipantId]) -> Vec<Match> {
        let n = seeds.len();
        let len = self.nodes.len();

        let mut live = vec![[false; 2]; len];
        let mut winner_consumer: Vec<Option<(usize, Side)>> = vec![None; len];
        let mut loser_consumer: Vec<Option<(usize, Side)>> = vec![None; len];
        for (i, node) in self.nodes.iter().enumerate() {
            for (k, source) in node.seats.iter().enumerate() {
                let side = if k == 0 { Side::A } else { Side::B };
                live[i][k] = match *source {
                    Source::Seed(s) => s < n,
                    Source::Winner(j) => {
                        winner_consumer[j] = Some((i, side));
                        live[j][0] || live[j][1]
                    }
                    Source::Loser(j) => {
                        loser_consumer[j] = Some((i, side));
                        live[j][0] && live[j][1]
                    }
                };
            }
        }

        let mut index: Vec<Option<usize>> = vec![None; len];
        let mut next = 0;
        for (i, node) in self.nodes.iter().enumerate() {
            let played = live[i][0] && live[i][1];
            if node.side != Some(BracketSide::Losers) || played {
                index[i] = Some(next);
                next += 1;
            }
        }

        let resolve = |start: (usize, Side)| -> Option<Feed> {
            let mut at = start;
            loop {
                match index[at.0] {
                    Some(idx) => return Some(Feed::new(idx, at.1)),
                    None => at = winner_consumer[at.0]?,
                }
            }
        };

        self.nodes
            .iter()
            .enumerate()
            .filter(|(i, _)| index[*i].is_some())
            .map(|(i, node)| {
                let mut m = Match::new(tournament_id, node.round, node.slot, node.side);
                let mut seated = node.seats.iter().filter_map(|source| match *source {
                    Source::Seed(s) if s < n => Some(seeds[s]),
                    _ => None,
                });
                if matches!(node.seats[0], Source::Seed(_)) {
                    // Round 1: whoever is present sits on A first.
                    m.a_id = seated.next();
                    m.b_id = seated.next();
                }
                m.winner_to = winner_consumer[i].and_then(&resolve);
                if live[i][0] && live[i][1] {
                    m.loser_to = loser_consumer[i].and_then(&resolve);
                }
                m
            })
            .collect()
    }
}

/// Complete round-1 byes and move their participant into the next round.
fn settle_byes(matches: &mut [Match]) {
    let now = Utc::now();
    for i in 0..matches.len() {
        let m = &mut matches[i];
        if m.round != 1 || m.bracket_side == Some(BracketSide::Losers) {
            continue;
        }
        let (Some(a), None) = (m.a_id, m.b_id) else {
            continue;
        };
        m.status = MatchStatus::Completed;
        m.winner_id = Some(a);
        m.played_at = Some(now);
        let feed = m.winner_to;
        if let Some(feed) = feed {
            *matches[feed.index].seat_mut(feed.side) = Some(a);
        }
    }
}

fn check_size(seeds: &[ParticipantId]) -> Result<usize, TournamentError> {
    if seeds.len() < 2 {
        return Err(TournamentError::InsufficientParticipants { actual: seeds.len() });
    }
    Ok(bracket_size(seeds.len()))
}

/// Single-elimination bracket. `seeds[0]` is seed 1.
pub fn build_single_elimination(
    tournament_id: TournamentId,
    seeds: &[ParticipantId],
) -> Result<Vec<Match>, TournamentError> {
    let size = check_size(seeds)?;
    let mut plan = Plan::default();
    plan.winners(size, None);
    let mut matches = plan.materialize(tournament_id, seeds);
    settle_byes(&mut matches);
    log::debug!(
        "built single elimination: {} participants, size {}, {} rounds",
        seeds.len(),
        size,
        round_count(size)
    );
    Ok(matches)
}

/// Double-elimination bracket: winners tree, losers tree and the Grand Final.
/// The decider after a bracket reset is created later, when it is needed.
pub fn build_double_elimination(
    tournament_id: TournamentId,
    seeds: &[ParticipantId],
) -> Result<Vec<Match>, TournamentError> {
    let size = check_size(seeds)?;
    let mut plan = Plan::default();
    let winners = plan.winners(size, Some(BracketSide::Winners));
    let losers = plan.losers(&winners);

    let winners_final = winners[winners.len() - 1][0];
    let challenger = match losers.last() {
        Some(round) => Source::Winner(round[0]),
        None => Source::Loser(winners_final),
    };
    plan.push(
        Some(BracketSide::GrandFinal),
        1,
        0,
        [Source::Winner(winners_final), challenger],
    );

    let mut matches = plan.materialize(tournament_id, seeds);
    settle_byes(&mut matches);
    log::debug!(
        "built double elimination: {} participants, size {}, {} matches",
        seeds.len(),
        size,
        matches.len()
    );
    Ok(matches)
}

/// Matches of one bracket side grouped by round (index 0 = round 1), in slot order.
pub fn rounds(matches: &[Match], side: Option<BracketSide>) -> Vec<Vec<&Match>> {
    let mut by_round: Vec<Vec<&Match>> = Vec::new();
    for m in matches.iter().filter(|m| m.round > 0 && m.bracket_side == side) {
        let r = m.round as usize;
        if by_round.len() < r {
            by_round.resize_with(r, Vec::new);
        }
        by_round[r - 1].push(m);
    }
    for round in &mut by_round {
        round.sort_by_key(|m| m.slot);
    }
    by_round
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn seed_order_for_eight() {
        assert_eq!(seed_order(8), vec![0, 7, 3, 4, 1, 6, 2, 5]);
    }

    #[test]
    fn seed_order_pairs_sum_to_size() {
        let order = seed_order(16);
        for pair in order.chunks(2) {
            assert_eq!(pair[0] + pair[1], 15);
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn bracket_size_has_minimum_two() {
        assert_eq!(bracket_size(1), 2);
        assert_eq!(bracket_size(2), 2);
        assert_eq!(bracket_size(5), 8);
        assert_eq!(bracket_size(16), 16);
    }

    #[test]
    fn empty_losers_nodes_are_skipped() {
        // 5 entrants in 8 slots: losers round 1 has one pass-through and one empty node.
        let seeds: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
        let matches = build_double_elimination(Uuid::new_v4(), &seeds).unwrap();
        let losers = rounds(&matches, Some(BracketSide::Losers));
        assert!(losers.first().map_or(true, |r| r.is_empty()));
        // 2n - 2 matches without a reset, plus 3 round-1 byes.
        assert_eq!(matches.len(), 2 * 5 - 2 + 3);
    }
}
