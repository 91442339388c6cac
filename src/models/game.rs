//! Match, Side, BracketSide and the forward pointers that link matches into a bracket.

use crate::models::participant::ParticipantId;
use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// One of the two seats in a match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    A,
    B,
}

/// Which tree of a double-elimination bracket a match belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketSide {
    Winners,
    Losers,
    /// Round 1 is the Grand Final, round 2 the decider after a bracket reset.
    GrandFinal,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    Completed,
}

/// Forward pointer: position in the match arena and the seat to fill there.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    pub index: usize,
    pub side: Side,
}

impl Feed {
    pub fn new(index: usize, side: Side) -> Self {
        Self { index, side }
    }
}

/// A single match. Elimination matches live in an arena (`Vec<Match>`) and point
/// downstream by index; ladder results reuse the same shape with `round == 0`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    /// 1-based within its side; 0 for ladder results.
    pub round: u32,
    /// 0-based position within the round.
    pub slot: u32,
    /// None for single elimination and ladder.
    pub bracket_side: Option<BracketSide>,
    /// None denotes a bye or a seat not yet determined.
    pub a_id: Option<ParticipantId>,
    pub b_id: Option<ParticipantId>,
    pub winner_id: Option<ParticipantId>,
    pub loser_id: Option<ParticipantId>,
    pub score_a: f64,
    pub score_b: f64,
    pub status: MatchStatus,
    /// Where the winner goes. None for the terminal match.
    pub winner_to: Option<Feed>,
    /// Where the loser goes (double elimination, winners side only).
    pub loser_to: Option<Feed>,
    /// Set on the Grand Final once a decider has been created.
    pub next_match_id: Option<MatchId>,
    pub played_at: Option<DateTime<Utc>>,
}

impl Match {
    /// Empty pending bracket match.
    pub fn new(
        tournament_id: TournamentId,
        round: u32,
        slot: u32,
        bracket_side: Option<BracketSide>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            round,
            slot,
            bracket_side,
            a_id: None,
            b_id: None,
            winner_id: None,
            loser_id: None,
            score_a: 0.0,
            score_b: 0.0,
            status: MatchStatus::Pending,
            winner_to: None,
            loser_to: None,
            next_match_id: None,
            played_at: None,
        }
    }

    /// A ladder result: one participant, one value, already completed.
    pub fn ladder_entry(tournament_id: TournamentId, participant_id: ParticipantId, value: f64) -> Self {
        Self {
            round: 0,
            a_id: Some(participant_id),
            winner_id: Some(participant_id),
            score_a: value,
            status: MatchStatus::Completed,
            played_at: Some(Utc::now()),
            ..Self::new(tournament_id, 0, 0, None)
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// Pending with both seats filled: a result can be reported.
    pub fn is_ready(&self) -> bool {
        self.status == MatchStatus::Pending && self.a_id.is_some() && self.b_id.is_some()
    }

    /// Completed without an opponent.
    pub fn is_bye(&self) -> bool {
        self.is_completed() && self.round > 0 && self.a_id.is_some() && self.b_id.is_none()
    }

    pub fn is_ladder_entry(&self) -> bool {
        self.round == 0 && self.b_id.is_none()
    }

    pub fn seat(&self, side: Side) -> Option<ParticipantId> {
        match side {
            Side::A => self.a_id,
            Side::B => self.b_id,
        }
    }

    pub fn seat_mut(&mut self, side: Side) -> &mut Option<ParticipantId> {
        match side {
            Side::A => &mut self.a_id,
            Side::B => &mut self.b_id,
        }
    }

    pub fn involves(&self, id: ParticipantId) -> bool {
        self.a_id == Some(id) || self.b_id == Some(id)
    }
}
