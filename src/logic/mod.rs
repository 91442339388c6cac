//! Tournament engine: bracket building, result advancement, ladder ranking, lifecycle.

pub mod bracket;
mod advance;
mod ladder;
mod lifecycle;
mod podium;
mod roster;

pub use advance::{next_playable, record_match_result};
pub use bracket::{build_double_elimination, build_single_elimination};
pub use ladder::{
    compute_ladder_standings, current_scores, reorder_tie_group, report_ladder_score,
    score_history, tournament_standings, Direction, ScoreEntry, Standing,
};
pub use lifecycle::{
    end_ladder_cycle, start_double_elim_tournament, start_ladder_tournament,
    start_single_elim_tournament, start_tournament,
};
pub use podium::{get_champion, get_runner_up, get_third_place};
pub use roster::{parse_roster, RosterError};
