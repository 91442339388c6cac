//! Integration tests for participants and the participant registry.

use gamemaster_web::{
    Match, MatchStatus, Participant, ParticipantRegistry, ParticipantType, TournamentError,
};
use uuid::Uuid;

fn played(a: Uuid, b: Option<Uuid>) -> Match {
    let mut m = Match::new(Uuid::new_v4(), 1, 0, None);
    m.a_id = Some(a);
    m.b_id = b;
    m.winner_id = Some(a);
    m.loser_id = b;
    m.status = MatchStatus::Completed;
    m
}

#[test]
fn names_are_trimmed_and_required() {
    let p = Participant::individual("  Alice ").unwrap();
    assert_eq!(p.name, "Alice");
    assert_eq!(p.kind, ParticipantType::Individual);
    assert!(p.members.is_empty());
    assert_eq!(Participant::individual("   "), Err(TournamentError::EmptyName));
}

#[test]
fn only_pairs_have_members() {
    assert_eq!(
        Participant::new("Solo", ParticipantType::Individual, vec!["Someone".into()]),
        Err(TournamentError::MembersNotAllowed)
    );
    let pair = Participant::new(
        "Double Trouble",
        ParticipantType::Pair,
        vec![" Ann ".into(), "".into(), "Bea".into()],
    )
    .unwrap();
    assert_eq!(pair.members, vec!["Ann", "Bea"]);
}

#[test]
fn display_name_lists_pair_members() {
    let pair = Participant::new("Double Trouble", ParticipantType::Pair, vec!["Ann".into(), "Bea".into()])
        .unwrap();
    assert_eq!(pair.display_name(), "Double Trouble (Ann, Bea)");
    let lonely = Participant::new("Lonely Pair", ParticipantType::Pair, Vec::new()).unwrap();
    assert_eq!(lonely.display_name(), "Lonely Pair");
    assert_eq!(Participant::individual("Alice").unwrap().display_name(), "Alice");
}

#[test]
fn participant_type_serializes_as_type() {
    let pair = Participant::new("Duo", ParticipantType::Pair, vec!["A".into(), "B".into()]).unwrap();
    let json = serde_json::to_value(&pair).unwrap();
    assert_eq!(json["type"], "pair");
    assert_eq!(json["members"][1], "B");
}

#[test]
fn registry_create_update_delete() {
    let mut registry = ParticipantRegistry::new();
    let p = registry
        .create("Alice", ParticipantType::Individual, Vec::new())
        .unwrap();
    assert_eq!(registry.get(p.id), Some(&p));

    let updated = registry.update(p.id, Some(" Alicia ".into()), None, &[]).unwrap();
    assert_eq!(updated.name, "Alicia");
    assert!(matches!(
        registry.update(p.id, Some("".into()), None, &[]),
        Err(TournamentError::EmptyName)
    ));
    assert_eq!(registry.get(p.id).unwrap().name, "Alicia");

    let removed = registry.delete(p.id, &[]).unwrap();
    assert_eq!(removed.id, p.id);
    assert!(registry.get(p.id).is_none());
    assert_eq!(registry.delete(p.id, &[]), Err(TournamentError::ParticipantNotFound(p.id)));
}

#[test]
fn update_can_replace_pair_members() {
    let mut registry = ParticipantRegistry::new();
    let duo = registry
        .create("Duo", ParticipantType::Pair, vec!["A".into(), "B".into()])
        .unwrap();
    let updated = registry
        .update(duo.id, None, Some(vec!["C".into(), "D".into()]), &[])
        .unwrap();
    assert_eq!(updated.members, vec!["C", "D"]);
    assert_eq!(updated.name, "Duo");
}

#[test]
fn completed_matches_lock_participants() {
    let mut registry = ParticipantRegistry::new();
    let a = registry.create("A", ParticipantType::Individual, Vec::new()).unwrap();
    let b = registry.create("B", ParticipantType::Individual, Vec::new()).unwrap();
    let matches = vec![played(a.id, Some(b.id))];
    assert!(matches[0].involves(b.id));
    assert!(!matches[0].involves(Uuid::new_v4()));

    assert_eq!(
        registry.update(b.id, Some("Bee".into()), None, &matches).unwrap_err(),
        TournamentError::ParticipantLocked(b.id)
    );
    assert_eq!(
        registry.delete(a.id, &matches).unwrap_err(),
        TournamentError::ParticipantLocked(a.id)
    );
    assert!(registry.get(a.id).is_some());
    assert_eq!(registry.get(b.id).map(|p| p.name.as_str()), Some("B"));
}

#[test]
fn byes_and_pending_matches_do_not_lock() {
    let mut registry = ParticipantRegistry::new();
    let a = registry.create("A", ParticipantType::Individual, Vec::new()).unwrap();
    let b = registry.create("B", ParticipantType::Individual, Vec::new()).unwrap();
    let mut pending = played(a.id, Some(b.id));
    pending.status = MatchStatus::Pending;
    let matches = vec![played(a.id, None), pending];

    registry.update(a.id, Some("Ada".into()), None, &matches).unwrap();
    registry.delete(b.id, &matches).unwrap();
}

#[test]
fn registry_loads_from_storage() {
    let people: Vec<Participant> = ["A", "B", "C"]
        .into_iter()
        .map(|n| Participant::individual(n).unwrap())
        .collect();
    let registry = ParticipantRegistry::from_participants(people.clone());
    for p in &people {
        assert_eq!(registry.get(p.id), Some(p));
    }
    assert!(registry.get(Uuid::new_v4()).is_none());
}
