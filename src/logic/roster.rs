//! Roster import: one participant per CSV row, `name[,member...]`, no header.

use crate::models::{Participant, ParticipantType, TournamentError};
use std::io::Read;

#[derive(Debug)]
pub enum RosterError {
    Csv(csv::Error),
    /// Row (1-based) rejected by participant validation.
    InvalidRow { row: usize, error: TournamentError },
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterError::Csv(e) => write!(f, "Could not read roster: {}", e),
            RosterError::InvalidRow { row, error } => write!(f, "Row {}: {}", row, error),
        }
    }
}

impl std::error::Error for RosterError {}

impl From<csv::Error> for RosterError {
    fn from(e: csv::Error) -> Self {
        RosterError::Csv(e)
    }
}

/// Parse a roster. Blank lines are skipped; rows may have differing lengths.
/// Individuals take only the first column.
pub fn parse_roster<R: Read>(reader: R, kind: ParticipantType) -> Result<Vec<Participant>, RosterError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut participants = Vec::new();
    for (i, record) in csv_reader.records().enumerate() {
        let record = record?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        let name = record.get(0).unwrap_or_default();
        let participant = match kind {
            ParticipantType::Individual => Participant::individual(name),
            ParticipantType::Pair => {
                Participant::new(name, kind, record.iter().skip(1).map(str::to_string).collect())
            }
        }
        .map_err(|error| RosterError::InvalidRow { row: i + 1, error })?;
        participants.push(participant);
    }
    Ok(participants)
}
