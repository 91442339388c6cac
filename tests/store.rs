//! Integration tests for the in-memory store: snapshot load/save round trips.

use gamemaster_web::{
    record_match_result, start_tournament, MemoryStore, Participant, ParticipantRegistry,
    ParticipantType, Tournament, TournamentMode, TournamentStatus, TournamentStore,
};
use uuid::Uuid;

#[test]
fn unknown_ids_load_nothing() {
    let store = MemoryStore::new();
    assert!(store.load_tournament(Uuid::new_v4()).is_none());
    assert!(store.load_matches(Uuid::new_v4()).is_empty());
    assert!(store.load_participants(&[Uuid::new_v4()]).is_empty());
}

#[test]
fn snapshot_round_trip_through_an_operation() {
    let mut store = MemoryStore::new();
    let mut registry = ParticipantRegistry::new();
    let mut t = Tournament::new("Cup", TournamentMode::SingleElim, ParticipantType::Individual);
    let mut people = Vec::new();
    for name in ["A", "B", "C"] {
        let p = registry.create(name, ParticipantType::Individual, Vec::new()).unwrap();
        t.add_participant(&registry, p.id).unwrap();
        people.push(p);
    }
    store.save_participants(people);
    let matches = start_tournament(&mut t).unwrap();
    let id = t.id;
    store.save_matches(id, matches);
    store.save_tournament(t);

    // Load, apply one result, save everything back.
    let mut t = store.load_tournament(id).unwrap();
    let mut matches = store.load_matches(id);
    let next = t.now_playing.unwrap();
    record_match_result(&mut t, &mut matches, next, 2.0, 1.0).unwrap();
    store.save_matches(id, matches.clone());
    store.save_tournament(t);

    let reloaded = store.load_tournament(id).unwrap();
    assert_eq!(reloaded.status, TournamentStatus::Active);
    assert_eq!(store.load_matches(id), matches);
    assert_eq!(store.load_participants(&reloaded.participant_ids).len(), 3);
    assert_eq!(store.all_matches().len(), matches.len());
}

#[test]
fn saving_matches_replaces_the_collection() {
    let mut store = MemoryStore::new();
    let t = Tournament::new("Cup", TournamentMode::SingleElim, ParticipantType::Individual);
    let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
    let matches = gamemaster_web::build_single_elimination(t.id, &ids).unwrap();
    store.save_matches(t.id, matches);
    store.save_matches(t.id, Vec::new());
    assert!(store.load_matches(t.id).is_empty());
}

#[test]
fn removing_a_tournament_keeps_participants() {
    let mut store = MemoryStore::new();
    let p = Participant::individual("Alice").unwrap();
    let t = Tournament::new("Cup", TournamentMode::Ladder, ParticipantType::Individual);
    let id = t.id;
    store.save_participants(vec![p.clone()]);
    store.save_tournament(t);
    assert_eq!(store.tournament_ids(), vec![id]);

    assert!(store.delete_tournament(id).is_some());
    assert!(store.load_tournament(id).is_none());
    assert!(store.tournament_ids().is_empty());
    assert_eq!(store.load_participants(&[p.id]), vec![p.clone()]);
    assert_eq!(store.remove_participant(p.id), Some(p));
    assert_eq!(store.all_participants().count(), 0);
}

#[test]
fn list_is_most_recently_updated_first() {
    let mut store = MemoryStore::new();
    let mut older = Tournament::new("Older", TournamentMode::SingleElim, ParticipantType::Individual);
    let mut newer = Tournament::new("Newer", TournamentMode::Ladder, ParticipantType::Individual);
    older.updated_at = newer.updated_at - chrono::Duration::hours(1);
    store.save_tournament(older.clone());
    store.save_tournament(newer.clone());

    let names: Vec<String> = store.list_tournaments().into_iter().map(|t| t.name).collect();
    assert_eq!(names, vec!["Newer", "Older"]);

    // Archiving touches the tournament and moves it to the front.
    newer.updated_at -= chrono::Duration::hours(2);
    store.save_tournament(newer.clone());
    older.archive();
    store.save_tournament(older.clone());
    let listed = store.list_tournaments();
    assert_eq!(listed[0].id, older.id);
    assert!(listed[0].archived);

    newer.unarchive();
    assert!(!newer.archived);
}

#[test]
fn deleting_a_tournament_drops_its_matches() {
    let mut store = MemoryStore::new();
    let t = Tournament::new("Cup", TournamentMode::DoubleElim, ParticipantType::Individual);
    let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
    store.save_matches(t.id, gamemaster_web::build_double_elimination(t.id, &ids).unwrap());
    let id = t.id;
    store.save_tournament(t);

    assert_eq!(store.delete_tournament(id).map(|t| t.name), Some("Cup".to_string()));
    assert!(store.load_matches(id).is_empty());
    assert!(store.list_tournaments().is_empty());
    assert!(store.delete_tournament(id).is_none());
}
