//! Ladder mode: score/time reports and standings recomputed from match history.

use crate::models::{
    LadderType, Match, ParticipantId, Tournament, TournamentError, TournamentMode,
    TournamentStatus,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// One row of the ladder. Derived on demand, never stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub participant_id: ParticipantId,
    pub score: f64,
    /// False until the participant has at least one result.
    pub has_score: bool,
    /// 1-based, unique.
    pub rank: usize,
}

/// The value that currently counts for a participant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreEntry {
    pub score: f64,
    pub recorded_at: Option<DateTime<Utc>>,
}

/// Which way to move within a tie group.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

fn ladder_entries(matches: &[Match]) -> impl Iterator<Item = &Match> {
    matches
        .iter()
        .filter(|m| m.is_ladder_entry() && m.is_completed() && m.a_id.is_some())
}

/// Current value per participant: the latest report for points, the lowest for time.
/// Participants without any report are absent from the map.
pub fn current_scores(
    participant_ids: &[ParticipantId],
    matches: &[Match],
    ladder_type: LadderType,
) -> HashMap<ParticipantId, ScoreEntry> {
    let mut scores: HashMap<ParticipantId, ScoreEntry> = HashMap::new();
    for m in ladder_entries(matches) {
        let Some(pid) = m.a_id else { continue };
        if !participant_ids.contains(&pid) {
            continue;
        }
        let entry = ScoreEntry {
            score: m.score_a,
            recorded_at: m.played_at,
        };
        let replace = match (scores.get(&pid), ladder_type) {
            (None, _) => true,
            (Some(cur), LadderType::Time) => entry.score < cur.score,
            // Later in the list wins when timestamps are equal.
            (Some(cur), LadderType::Points) => entry.recorded_at >= cur.recorded_at,
        };
        if replace {
            scores.insert(pid, entry);
        }
    }
    scores
}

/// Rank participants.
///
/// Participants with a score come first, ordered by score (descending for points,
/// ascending for time). Equal scores, and everyone without a score, keep the order
/// of `ladder_order` when given (ids missing from it go last), then the order of
/// `participant_ids`. Ranks are sequential, never shared.
pub fn compute_ladder_standings(
    participant_ids: &[ParticipantId],
    matches: &[Match],
    ladder_order: Option<&[ParticipantId]>,
    ladder_type: LadderType,
) -> Vec<Standing> {
    let scores = current_scores(participant_ids, matches, ladder_type);
    let tie_position: HashMap<ParticipantId, usize> = ladder_order
        .map(|order| order.iter().enumerate().map(|(i, id)| (*id, i)).collect())
        .unwrap_or_default();

    let mut standings: Vec<Standing> = participant_ids
        .iter()
        .map(|id| {
            let entry = scores.get(id);
            Standing {
                participant_id: *id,
                score: entry.map_or(0.0, |e| e.score),
                has_score: entry.is_some(),
                rank: 0,
            }
        })
        .collect();

    // `sort_by` is stable: anything still equal keeps registration order.
    standings.sort_by(|a, b| {
        b.has_score
            .cmp(&a.has_score)
            .then_with(|| {
                if !a.has_score {
                    return Ordering::Equal;
                }
                match ladder_type {
                    LadderType::Points => b.score.total_cmp(&a.score),
                    LadderType::Time => a.score.total_cmp(&b.score),
                }
            })
            .then_with(|| {
                let pa = tie_position.get(&a.participant_id).unwrap_or(&usize::MAX);
                let pb = tie_position.get(&b.participant_id).unwrap_or(&usize::MAX);
                pa.cmp(pb)
            })
    });

    for (i, s) in standings.iter_mut().enumerate() {
        s.rank = i + 1;
    }
    standings
}

/// Standings for a ladder tournament using its own settings.
pub fn tournament_standings(tournament: &Tournament, matches: &[Match]) -> Vec<Standing> {
    compute_ladder_standings(
        &tournament.participant_ids,
        matches,
        tournament.ladder_order.as_deref(),
        tournament.ladder_type(),
    )
}

fn require_active_ladder(tournament: &Tournament) -> Result<(), TournamentError> {
    if tournament.mode != TournamentMode::Ladder {
        return Err(TournamentError::ModeMismatch {
            expected: TournamentMode::Ladder,
            actual: tournament.mode,
        });
    }
    if tournament.status != TournamentStatus::Active {
        return Err(TournamentError::InvalidTransition {
            status: tournament.status,
        });
    }
    Ok(())
}

/// Record a participant's score (points) or time.
///
/// Points: every report is kept and the latest counts. Time: a report is kept only
/// when it beats the participant's best; otherwise `Ok(None)` and nothing changes.
pub fn report_ladder_score(
    tournament: &mut Tournament,
    matches: &mut Vec<Match>,
    participant_id: ParticipantId,
    value: f64,
) -> Result<Option<Match>, TournamentError> {
    require_active_ladder(tournament)?;
    if !tournament.participant_ids.contains(&participant_id) {
        return Err(TournamentError::ParticipantNotFound(participant_id));
    }
    if !value.is_finite() || value < 0.0 {
        return Err(TournamentError::InvalidScore);
    }

    let ladder_type = tournament.ladder_type();
    if ladder_type == LadderType::Time {
        let best = current_scores(&[participant_id], matches, ladder_type);
        if best.get(&participant_id).is_some_and(|b| value >= b.score) {
            log::debug!("ignoring time {} for {}: not a personal best", value, participant_id);
            return Ok(None);
        }
    }

    let entry = Match::ladder_entry(tournament.id, participant_id, value);
    matches.push(entry.clone());
    tournament.touch();
    Ok(Some(entry))
}

/// Reported values for a participant, newest first.
pub fn score_history(participant_id: ParticipantId, matches: &[Match]) -> Vec<ScoreEntry> {
    let mut history: Vec<ScoreEntry> = ladder_entries(matches)
        .filter(|m| m.a_id == Some(participant_id))
        .map(|m| ScoreEntry {
            score: m.score_a,
            recorded_at: m.played_at,
        })
        .collect();
    history.reverse();
    history.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
    history
}

/// Swap a participant with the nearest equal-score neighbour above or below it and
/// store the resulting order as the tournament's tie-break order.
///
/// Returns `Ok(false)` when there is no such neighbour.
pub fn reorder_tie_group(
    tournament: &mut Tournament,
    matches: &[Match],
    participant_id: ParticipantId,
    direction: Direction,
) -> Result<bool, TournamentError> {
    if tournament.mode != TournamentMode::Ladder {
        return Err(TournamentError::ModeMismatch {
            expected: TournamentMode::Ladder,
            actual: tournament.mode,
        });
    }
    if tournament.status == TournamentStatus::Completed {
        return Err(TournamentError::InvalidTransition {
            status: tournament.status,
        });
    }
    let standings = tournament_standings(tournament, matches);
    let current = standings
        .iter()
        .position(|s| s.participant_id == participant_id)
        .ok_or(TournamentError::ParticipantNotFound(participant_id))?;
    let me = &standings[current];
    let same_group = |s: &Standing| s.has_score == me.has_score && s.score == me.score;

    let target = match direction {
        Direction::Up => (0..current).rev().find(|&i| same_group(&standings[i])),
        Direction::Down => (current + 1..standings.len()).find(|&i| same_group(&standings[i])),
    };
    let Some(target) = target else {
        return Ok(false);
    };

    let mut order: Vec<ParticipantId> = standings.iter().map(|s| s.participant_id).collect();
    order.swap(current, target);
    tournament.ladder_order = Some(order);
    tournament.touch();
    Ok(true)
}
