//! Champion, runner-up and third place of a completed tournament.

use crate::logic::ladder::tournament_standings;
use crate::models::{BracketSide, Match, ParticipantId, Tournament, TournamentMode, TournamentStatus};

/// The match that decided the title, if the tournament is over.
fn deciding_match<'a>(tournament: &Tournament, matches: &'a [Match]) -> Option<&'a Match> {
    if tournament.status != TournamentStatus::Completed {
        return None;
    }
    let bracket = matches.iter().filter(|m| m.tournament_id == tournament.id);
    match tournament.mode {
        TournamentMode::SingleElim => bracket
            .filter(|m| m.round > 0 && m.winner_to.is_none() && m.is_completed())
            .max_by_key(|m| m.round),
        TournamentMode::DoubleElim => bracket
            .filter(|m| m.bracket_side == Some(BracketSide::GrandFinal) && m.is_completed())
            .max_by_key(|m| m.round),
        TournamentMode::Ladder => None,
    }
}

/// Ladder ranks count only participants with a score.
fn ladder_place(tournament: &Tournament, matches: &[Match], place: usize) -> Option<ParticipantId> {
    tournament_standings(tournament, matches)
        .into_iter()
        .filter(|s| s.has_score)
        .nth(place)
        .map(|s| s.participant_id)
}

pub fn get_champion(tournament: &Tournament, matches: &[Match]) -> Option<ParticipantId> {
    if tournament.mode == TournamentMode::Ladder {
        if tournament.status != TournamentStatus::Completed {
            return None;
        }
        return ladder_place(tournament, matches, 0);
    }
    deciding_match(tournament, matches).and_then(|m| m.winner_id)
}

pub fn get_runner_up(tournament: &Tournament, matches: &[Match]) -> Option<ParticipantId> {
    if tournament.mode == TournamentMode::Ladder {
        if tournament.status != TournamentStatus::Completed {
            return None;
        }
        return ladder_place(tournament, matches, 1);
    }
    deciding_match(tournament, matches).and_then(|m| m.loser_id)
}

/// Single elimination has no consolation match, so both semifinal losers share
/// third place. Double elimination: the loser of the losers-bracket final.
pub fn get_third_place(tournament: &Tournament, matches: &[Match]) -> Vec<ParticipantId> {
    if tournament.status != TournamentStatus::Completed {
        return Vec::new();
    }
    match tournament.mode {
        TournamentMode::Ladder => ladder_place(tournament, matches, 2).into_iter().collect(),
        TournamentMode::SingleElim => {
            let Some(last) = deciding_match(tournament, matches) else {
                return Vec::new();
            };
            matches
                .iter()
                .filter(|m| m.tournament_id == tournament.id && m.round > 0)
                .filter(|m| m.round + 1 == last.round && m.bracket_side.is_none())
                .filter_map(|m| m.loser_id)
                .collect()
        }
        TournamentMode::DoubleElim => {
            let Some(gf) = matches.iter().position(|m| {
                m.bracket_side == Some(BracketSide::GrandFinal) && m.round == 1
            }) else {
                return Vec::new();
            };
            matches
                .iter()
                .find(|m| {
                    m.bracket_side == Some(BracketSide::Losers)
                        && m.winner_to.is_some_and(|f| f.index == gf)
                })
                .and_then(|m| m.loser_id)
                .into_iter()
                .collect()
        }
    }
}
