//! Match advancer: apply a reported result and carry winner/loser into later matches.

use crate::models::{
    BracketSide, Feed, Match, MatchId, MatchStatus, ParticipantId, Tournament, TournamentError,
    TournamentStatus,
};
use chrono::Utc;

/// First match that can be reported right now (pending, both seats filled), in arena order.
pub fn next_playable(matches: &[Match]) -> Option<MatchId> {
    matches.iter().find(|m| m.is_ready()).map(|m| m.id)
}

fn validate_scores(score_a: f64, score_b: f64) -> Result<(), TournamentError> {
    if !score_a.is_finite() || !score_b.is_finite() || score_a < 0.0 || score_b < 0.0 {
        return Err(TournamentError::InvalidScore);
    }
    if score_a == score_b {
        return Err(TournamentError::AmbiguousResult);
    }
    Ok(())
}

/// Put `participant` into the seat a forward pointer names.
fn place(
    matches: &mut [Match],
    from: MatchId,
    feed: Feed,
    participant: ParticipantId,
) -> Result<(), TournamentError> {
    let target = matches
        .get_mut(feed.index)
        .ok_or(TournamentError::CorruptBracket(from))?;
    let completed = target.status == MatchStatus::Completed;
    let seat = target.seat_mut(feed.side);
    if seat.is_some() || completed {
        return Err(TournamentError::CorruptBracket(from));
    }
    *seat = Some(participant);
    log::debug!("advanced {} into match {} ({:?})", participant, target.id, feed.side);
    Ok(())
}

/// Record the result of an elimination match.
///
/// The winner is the side with the strictly greater score. The winner (and in double
/// elimination the winners-bracket loser) is written into the downstream seats. When
/// the terminal match completes, the tournament becomes `Completed`. If the losers-bracket
/// champion takes the Grand Final, a decider is appended to `matches`.
///
/// On error nothing is modified. Returns the tournament status after the result.
pub fn record_match_result(
    tournament: &mut Tournament,
    matches: &mut Vec<Match>,
    match_id: MatchId,
    score_a: f64,
    score_b: f64,
) -> Result<TournamentStatus, TournamentError> {
    let idx = matches
        .iter()
        .position(|m| m.id == match_id && m.tournament_id == tournament.id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if matches[idx].is_completed() {
        return Err(TournamentError::MatchAlreadyCompleted(match_id));
    }
    if tournament.status != TournamentStatus::Active {
        return Err(TournamentError::InvalidTransition {
            status: tournament.status,
        });
    }
    let (Some(a), Some(b)) = (matches[idx].a_id, matches[idx].b_id) else {
        return Err(TournamentError::MatchNotReady(match_id));
    };
    validate_scores(score_a, score_b)?;

    let (winner, loser) = if score_a > score_b { (a, b) } else { (b, a) };
    let mut next = matches.clone();
    let m = &mut next[idx];
    m.score_a = score_a;
    m.score_b = score_b;
    m.winner_id = Some(winner);
    m.loser_id = Some(loser);
    m.status = MatchStatus::Completed;
    m.played_at = Some(Utc::now());
    let reported = m.clone();

    if let Some(feed) = reported.winner_to {
        place(&mut next, match_id, feed, winner)?;
    }
    if let Some(feed) = reported.loser_to {
        place(&mut next, match_id, feed, loser)?;
    }

    let finished = match (reported.bracket_side, reported.round) {
        (Some(BracketSide::GrandFinal), 1) if winner == a => true,
        (Some(BracketSide::GrandFinal), 1) => {
            let mut decider = Match::new(tournament.id, 2, 0, Some(BracketSide::GrandFinal));
            decider.a_id = Some(a);
            decider.b_id = Some(b);
            next[idx].next_match_id = Some(decider.id);
            log::info!(
                "tournament {}: bracket reset, decider {} created",
                tournament.id,
                decider.id
            );
            next.push(decider);
            false
        }
        (Some(BracketSide::GrandFinal), _) => true,
        _ => reported.winner_to.is_none(),
    };

    *matches = next;
    if finished {
        tournament.status = TournamentStatus::Completed;
        log::info!("tournament {} completed, champion {}", tournament.id, winner);
    }
    tournament.now_playing = next_playable(matches);
    tournament.touch();
    Ok(tournament.status)
}
