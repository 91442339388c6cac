//! Tournament lifecycle: Draft -> Active -> Completed.

use crate::logic::advance::next_playable;
use crate::logic::bracket::{build_double_elimination, build_single_elimination};
use crate::models::{Match, Tournament, TournamentError, TournamentMode, TournamentStatus};

/// Checks shared by every start: Draft, expected mode, at least 2 participants.
fn check_startable(tournament: &Tournament, mode: TournamentMode) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::Draft {
        return Err(TournamentError::InvalidTransition {
            status: tournament.status,
        });
    }
    if tournament.mode != mode {
        return Err(TournamentError::ModeMismatch {
            expected: mode,
            actual: tournament.mode,
        });
    }
    if tournament.participant_ids.len() < 2 {
        return Err(TournamentError::InsufficientParticipants {
            actual: tournament.participant_ids.len(),
        });
    }
    Ok(())
}

fn activate(tournament: &mut Tournament, matches: &[Match]) {
    tournament.status = TournamentStatus::Active;
    tournament.now_playing = next_playable(matches);
    tournament.touch();
    log::info!(
        "tournament {} started ({}, {} participants, {} matches)",
        tournament.id,
        tournament.mode.as_str(),
        tournament.participant_ids.len(),
        matches.len()
    );
}

/// Build the single-elimination bracket and activate the tournament.
/// Returns the full match set; the tournament is untouched on error.
pub fn start_single_elim_tournament(tournament: &mut Tournament) -> Result<Vec<Match>, TournamentError> {
    check_startable(tournament, TournamentMode::SingleElim)?;
    let matches = build_single_elimination(tournament.id, &tournament.participant_ids)?;
    activate(tournament, &matches);
    Ok(matches)
}

/// Build the double-elimination bracket and activate the tournament.
pub fn start_double_elim_tournament(tournament: &mut Tournament) -> Result<Vec<Match>, TournamentError> {
    check_startable(tournament, TournamentMode::DoubleElim)?;
    let matches = build_double_elimination(tournament.id, &tournament.participant_ids)?;
    activate(tournament, &matches);
    Ok(matches)
}

/// Open the ladder. No matches are created; the registration order becomes the
/// initial tie-break order.
pub fn start_ladder_tournament(tournament: &mut Tournament) -> Result<Vec<Match>, TournamentError> {
    check_startable(tournament, TournamentMode::Ladder)?;
    tournament.ladder_order = Some(tournament.participant_ids.clone());
    activate(tournament, &[]);
    Ok(Vec::new())
}

/// Start the tournament with the builder matching its mode.
pub fn start_tournament(tournament: &mut Tournament) -> Result<Vec<Match>, TournamentError> {
    match tournament.mode {
        TournamentMode::SingleElim => start_single_elim_tournament(tournament),
        TournamentMode::DoubleElim => start_double_elim_tournament(tournament),
        TournamentMode::Ladder => start_ladder_tournament(tournament),
    }
}

/// End the current ladder cycle: Active ladder -> Completed.
pub fn end_ladder_cycle(tournament: &mut Tournament) -> Result<(), TournamentError> {
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
    tournament.status = TournamentStatus::Completed;
    tournament.touch();
    log::info!("ladder {} cycle ended", tournament.id);
    Ok(())
}
