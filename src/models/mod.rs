//! Data structures for the tournament engine: participants, matches, tournaments.

mod game;
mod participant;
mod tournament;

pub use game::{BracketSide, Feed, Match, MatchId, MatchStatus, Side};
pub use participant::{Participant, ParticipantId, ParticipantRegistry, ParticipantType};
pub use tournament::{
    LadderType, Tournament, TournamentError, TournamentId, TournamentMode, TournamentSettings,
    TournamentStatus,
};
