//! Storage collaborator: whole-snapshot load and save per tournament.

use crate::models::{Match, Participant, ParticipantId, Tournament, TournamentId};
use std::collections::HashMap;

/// What the engine needs from storage. Saves replace the stored collection; callers
/// write back the full snapshot an operation returned, never a part of it.
pub trait TournamentStore {
    fn load_tournament(&self, id: TournamentId) -> Option<Tournament>;
    /// All tournaments, most recently updated first.
    fn list_tournaments(&self) -> Vec<Tournament>;
    fn load_participants(&self, ids: &[ParticipantId]) -> Vec<Participant>;
    fn load_matches(&self, tournament_id: TournamentId) -> Vec<Match>;
    fn save_tournament(&mut self, tournament: Tournament);
    fn save_participants(&mut self, participants: Vec<Participant>);
    fn save_matches(&mut self, tournament_id: TournamentId, matches: Vec<Match>);
    /// Remove a tournament and its matches. Participants stay registered.
    fn delete_tournament(&mut self, id: TournamentId) -> Option<Tournament>;
}

/// In-memory store used by the web binary.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tournaments: HashMap<TournamentId, Tournament>,
    participants: HashMap<ParticipantId, Participant>,
    matches: HashMap<TournamentId, Vec<Match>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all_participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values()
    }

    /// Every stored match, across tournaments.
    pub fn all_matches(&self) -> Vec<Match> {
        self.matches.values().flatten().cloned().collect()
    }

    pub fn tournament_ids(&self) -> Vec<TournamentId> {
        self.tournaments.keys().copied().collect()
    }

    pub fn remove_participant(&mut self, id: ParticipantId) -> Option<Participant> {
        self.participants.remove(&id)
    }

}

impl TournamentStore for MemoryStore {
    fn load_tournament(&self, id: TournamentId) -> Option<Tournament> {
        self.tournaments.get(&id).cloned()
    }

    fn list_tournaments(&self) -> Vec<Tournament> {
        let mut all: Vec<Tournament> = self.tournaments.values().cloned().collect();
        all.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        all
    }

    fn load_participants(&self, ids: &[ParticipantId]) -> Vec<Participant> {
        ids.iter()
            .filter_map(|id| self.participants.get(id).cloned())
            .collect()
    }

    fn load_matches(&self, tournament_id: TournamentId) -> Vec<Match> {
        self.matches.get(&tournament_id).cloned().unwrap_or_default()
    }

    fn save_tournament(&mut self, tournament: Tournament) {
        self.tournaments.insert(tournament.id, tournament);
    }

    fn save_participants(&mut self, participants: Vec<Participant>) {
        for p in participants {
            self.participants.insert(p.id, p);
        }
    }

    fn save_matches(&mut self, tournament_id: TournamentId, matches: Vec<Match>) {
        self.matches.insert(tournament_id, matches);
    }

    fn delete_tournament(&mut self, id: TournamentId) -> Option<Tournament> {
        self.matches.remove(&id);
        self.tournaments.remove(&id)
    }
}
