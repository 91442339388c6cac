//! Tournament organizer: library with models, the progression engine, and storage.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    build_double_elimination, build_single_elimination, compute_ladder_standings, current_scores,
    end_ladder_cycle, get_champion, get_runner_up, get_third_place, next_playable, parse_roster,
    record_match_result, reorder_tie_group, report_ladder_score, score_history,
    start_double_elim_tournament, start_ladder_tournament, start_single_elim_tournament,
    start_tournament, tournament_standings, Direction, RosterError, ScoreEntry, Standing,
};
pub use models::{
    BracketSide, Feed, LadderType, Match, MatchId, MatchStatus, Participant, ParticipantId,
    ParticipantRegistry, ParticipantType, Side, Tournament, TournamentError, TournamentId,
    TournamentMode, TournamentSettings, TournamentStatus,
};
pub use store::{MemoryStore, TournamentStore};
