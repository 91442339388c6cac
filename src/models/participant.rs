//! Participant and ParticipantRegistry data structures.

use crate::models::game::Match;
use crate::models::tournament::TournamentError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for a participant (used in matches and seed lists).
pub type ParticipantId = Uuid;

/// Whether a participant is a single person or a pair.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantType {
    #[default]
    Individual,
    Pair,
}

/// An entrant in a tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ParticipantType,
    /// Member names, in order. Always empty for individuals.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Participant {
    /// Validate and build a new participant. Name and member names are trimmed.
    pub fn new(
        name: impl Into<String>,
        kind: ParticipantType,
        members: Vec<String>,
    ) -> Result<Self, TournamentError> {
        let name = clean_name(name.into())?;
        let members = clean_members(kind, members)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            kind,
            members,
            created_at: now,
            updated_at: now,
        })
    }

    /// Shorthand for an individual participant.
    pub fn individual(name: impl Into<String>) -> Result<Self, TournamentError> {
        Self::new(name, ParticipantType::Individual, Vec::new())
    }

    /// Name as shown to users: pairs list their members in parentheses.
    pub fn display_name(&self) -> String {
        if self.kind == ParticipantType::Pair && !self.members.is_empty() {
            format!("{} ({})", self.name, self.members.join(", "))
        } else {
            self.name.clone()
        }
    }
}

fn clean_name(name: String) -> Result<String, TournamentError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TournamentError::EmptyName);
    }
    Ok(trimmed.to_string())
}

fn clean_members(kind: ParticipantType, members: Vec<String>) -> Result<Vec<String>, TournamentError> {
    let members: Vec<String> = members
        .into_iter()
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .collect();
    if kind == ParticipantType::Individual && !members.is_empty() {
        return Err(TournamentError::MembersNotAllowed);
    }
    Ok(members)
}

/// True when a completed, two-sided match references this participant.
fn is_locked(id: ParticipantId, matches: &[Match]) -> bool {
    matches
        .iter()
        .any(|m| m.is_completed() && m.b_id.is_some() && m.involves(id))
}

/// All known participants, keyed by id.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ParticipantRegistry {
    participants: HashMap<ParticipantId, Participant>,
}

impl ParticipantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an existing list (e.g. loaded from storage).
    pub fn from_participants(participants: impl IntoIterator<Item = Participant>) -> Self {
        Self {
            participants: participants.into_iter().map(|p| (p.id, p)).collect(),
        }
    }

    /// Create and register a participant, returning a copy.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        kind: ParticipantType,
        members: Vec<String>,
    ) -> Result<Participant, TournamentError> {
        let participant = Participant::new(name, kind, members)?;
        self.participants.insert(participant.id, participant.clone());
        Ok(participant)
    }

    pub fn get(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.get(&id)
    }


    /// Rename a participant and/or replace its members.
    ///
    /// `matches` is every match that may reference the participant; a participant
    /// that already played a completed match cannot be edited.
    pub fn update(
        &mut self,
        id: ParticipantId,
        name: Option<String>,
        members: Option<Vec<String>>,
        matches: &[Match],
    ) -> Result<&Participant, TournamentError> {
        if is_locked(id, matches) {
            return Err(TournamentError::ParticipantLocked(id));
        }
        let p = self
            .participants
            .get_mut(&id)
            .ok_or(TournamentError::ParticipantNotFound(id))?;
        let name = name.map(clean_name).transpose()?;
        let members = members.map(|m| clean_members(p.kind, m)).transpose()?;
        if let Some(name) = name {
            p.name = name;
        }
        if let Some(members) = members {
            p.members = members;
        }
        p.updated_at = Utc::now();
        Ok(p)
    }

    /// Remove a participant that never played a completed match.
    pub fn delete(&mut self, id: ParticipantId, matches: &[Match]) -> Result<Participant, TournamentError> {
        if is_locked(id, matches) {
            return Err(TournamentError::ParticipantLocked(id));
        }
        self.participants
            .remove(&id)
            .ok_or(TournamentError::ParticipantNotFound(id))
    }
}
