//! Tournament, its status/mode enums, and TournamentError.

use crate::models::game::MatchId;
use crate::models::participant::{ParticipantId, ParticipantRegistry, ParticipantType};
use chrono::{DateTime, NaiveDate, Utc};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, PartialEq)]
pub enum TournamentError {
    /// Fewer than 2 participants when starting or building a bracket.
    InsufficientParticipants { actual: usize },
    /// The tournament's status does not allow this action.
    InvalidTransition { status: TournamentStatus },
    /// Operation meant for another format (e.g. single-elim start on a ladder).
    ModeMismatch { expected: TournamentMode, actual: TournamentMode },
    MatchNotFound(MatchId),
    MatchAlreadyCompleted(MatchId),
    /// Pending match that still waits for one of its participants.
    MatchNotReady(MatchId),
    /// Equal scores on an elimination match.
    AmbiguousResult,
    /// Negative, NaN or infinite score.
    InvalidScore,
    ParticipantNotFound(ParticipantId),
    ParticipantTypeMismatch { expected: ParticipantType, actual: ParticipantType },
    /// Participant already played a completed match and can no longer be edited.
    ParticipantLocked(ParticipantId),
    EmptyName,
    MembersNotAllowed,
    InvalidDateRange,
    /// A forward pointer leads outside the match list.
    CorruptBracket(MatchId),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InsufficientParticipants { actual } => {
                write!(f, "Need at least 2 participants (have {})", actual)
            }
            TournamentError::InvalidTransition { status } => {
                write!(f, "Action not allowed while tournament is {}", status.as_str())
            }
            TournamentError::ModeMismatch { expected, actual } => write!(
                f,
                "Tournament mode is {}, expected {}",
                actual.as_str(),
                expected.as_str()
            ),
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::MatchAlreadyCompleted(_) => write!(f, "Match already completed"),
            TournamentError::MatchNotReady(_) => write!(f, "Match is missing a participant"),
            TournamentError::AmbiguousResult => write!(f, "Draws are not allowed"),
            TournamentError::InvalidScore => write!(f, "Scores must be finite and non-negative"),
            TournamentError::ParticipantNotFound(_) => write!(f, "Participant not found"),
            TournamentError::ParticipantTypeMismatch { expected, actual } => write!(
                f,
                "Tournament takes {:?} participants, got {:?}",
                expected, actual
            ),
            TournamentError::ParticipantLocked(_) => {
                write!(f, "Participant has completed matches and cannot be changed")
            }
            TournamentError::EmptyName => write!(f, "Name is required"),
            TournamentError::MembersNotAllowed => write!(f, "Individuals cannot have members"),
            TournamentError::InvalidDateRange => write!(f, "End date is before start date"),
            TournamentError::CorruptBracket(_) => write!(f, "Bracket structure is inconsistent"),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Competition format.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentMode {
    #[default]
    SingleElim,
    DoubleElim,
    Ladder,
}

impl TournamentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TournamentMode::SingleElim => "single_elim",
            TournamentMode::DoubleElim => "double_elim",
            TournamentMode::Ladder => "ladder",
        }
    }

    pub fn is_elimination(&self) -> bool {
        !matches!(self, TournamentMode::Ladder)
    }
}

/// How ladder values are ranked.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LadderType {
    /// Higher is better; the latest report counts.
    #[default]
    Points,
    /// Lower is better; the best report counts.
    Time,
}

/// Lifecycle: Draft -> Active -> Completed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Registering participants; seed order may still change.
    #[default]
    Draft,
    /// Bracket built (or ladder open); results are being reported.
    Active,
    /// Terminal match played or ladder cycle ended. No further changes.
    Completed,
}

impl TournamentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TournamentStatus::Draft => "draft",
            TournamentStatus::Active => "active",
            TournamentStatus::Completed => "completed",
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentSettings {
    /// Only set for ladder tournaments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ladder_type: Option<LadderType>,
}

/// Tournament record. Matches are kept separately (see `Match`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub mode: TournamentMode,
    pub participant_type: ParticipantType,
    pub status: TournamentStatus,
    /// Seed order for elimination formats (seed 1 first).
    pub participant_ids: Vec<ParticipantId>,
    /// Manual tie-break order for ladder standings.
    #[serde(default)]
    pub ladder_order: Option<Vec<ParticipantId>>,
    pub settings: TournamentSettings,
    /// First reportable match, if any.
    #[serde(default)]
    pub now_playing: Option<MatchId>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Hidden from the default listing. Independent of `status`.
    #[serde(default)]
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a new tournament in Draft with no participants.
    pub fn new(name: impl Into<String>, mode: TournamentMode, participant_type: ParticipantType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into().trim().to_string(),
            mode,
            participant_type,
            status: TournamentStatus::Draft,
            participant_ids: Vec::new(),
            ladder_order: None,
            settings: TournamentSettings {
                ladder_type: (mode == TournamentMode::Ladder).then_some(LadderType::Points),
            },
            now_playing: None,
            start_date: None,
            end_date: None,
            archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Choose how ladder values are ranked. Ignored for elimination formats.
    pub fn with_ladder_type(mut self, ladder_type: LadderType) -> Self {
        if self.mode == TournamentMode::Ladder {
            self.settings.ladder_type = Some(ladder_type);
        }
        self
    }

    /// Set the event dates. An end date equal to the start date is dropped.
    pub fn with_dates(
        mut self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self, TournamentError> {
        if let (Some(s), Some(e)) = (start, end) {
            if e < s {
                return Err(TournamentError::InvalidDateRange);
            }
        }
        self.start_date = start;
        self.end_date = end.filter(|e| Some(*e) != start);
        Ok(self)
    }

    pub fn ladder_type(&self) -> LadderType {
        self.settings.ladder_type.unwrap_or_default()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn archive(&mut self) {
        self.archived = true;
        self.touch();
    }

    pub fn unarchive(&mut self) {
        self.archived = false;
        self.touch();
    }

    fn require_draft(&self) -> Result<(), TournamentError> {
        if self.status != TournamentStatus::Draft {
            return Err(TournamentError::InvalidTransition { status: self.status });
        }
        Ok(())
    }

    /// Add a registered participant at the end of the seed order (Draft only).
    /// Adding someone already listed is a no-op.
    pub fn add_participant(
        &mut self,
        registry: &ParticipantRegistry,
        participant_id: ParticipantId,
    ) -> Result<(), TournamentError> {
        self.require_draft()?;
        let p = registry
            .get(participant_id)
            .ok_or(TournamentError::ParticipantNotFound(participant_id))?;
        if p.kind != self.participant_type {
            return Err(TournamentError::ParticipantTypeMismatch {
                expected: self.participant_type,
                actual: p.kind,
            });
        }
        if !self.participant_ids.contains(&participant_id) {
            self.participant_ids.push(participant_id);
            self.touch();
        }
        Ok(())
    }

    /// Remove a participant from the seed order (Draft only).
    pub fn remove_participant(&mut self, participant_id: ParticipantId) -> Result<(), TournamentError> {
        self.require_draft()?;
        let idx = self
            .participant_ids
            .iter()
            .position(|id| *id == participant_id)
            .ok_or(TournamentError::ParticipantNotFound(participant_id))?;
        self.participant_ids.remove(idx);
        self.touch();
        Ok(())
    }

    /// Randomize the seed order (Draft only).
    pub fn shuffle_seeds(&mut self) -> Result<(), TournamentError> {
        self.require_draft()?;
        self.participant_ids.shuffle(&mut rand::thread_rng());
        self.touch();
        Ok(())
    }
}
