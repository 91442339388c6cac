//! Integration tests for reporting results in single elimination.

use gamemaster_web::{
    get_champion, get_runner_up, get_third_place, next_playable, record_match_result,
    start_tournament, Match, MatchStatus, ParticipantId, ParticipantRegistry, ParticipantType,
    Tournament, TournamentError, TournamentMode, TournamentStatus,
};
use uuid::Uuid;

fn started(n: usize) -> (Tournament, Vec<Match>) {
    let mut registry = ParticipantRegistry::new();
    let mut t = Tournament::new("Friday Cup", TournamentMode::SingleElim, ParticipantType::Individual);
    for i in 0..n {
        let p = registry
            .create(format!("P{i}"), ParticipantType::Individual, Vec::new())
            .unwrap();
        t.add_participant(&registry, p.id).unwrap();
    }
    let matches = start_tournament(&mut t).unwrap();
    (t, matches)
}

fn by_id(matches: &[Match], id: Uuid) -> &Match {
    matches.iter().find(|m| m.id == id).unwrap()
}

/// Play every reportable match with side A winning. Returns the number of reports.
fn play_out(t: &mut Tournament, matches: &mut Vec<Match>) -> usize {
    let mut reported = 0;
    while let Some(id) = t.now_playing {
        record_match_result(t, matches, id, 3.0, 1.0).unwrap();
        reported += 1;
        assert!(reported <= matches.len());
    }
    reported
}

#[test]
fn favourites_win_every_bracket_size() {
    for n in 2..=17 {
        let (mut t, mut matches) = started(n);
        let seeds: Vec<ParticipantId> = t.participant_ids.clone();
        assert_eq!(play_out(&mut t, &mut matches), n - 1, "n = {}", n);
        assert_eq!(t.status, TournamentStatus::Completed);
        assert_eq!(t.now_playing, None);
        assert_eq!(get_champion(&t, &matches), Some(seeds[0]));
        assert_eq!(get_runner_up(&t, &matches), Some(seeds[1]));
        assert!(matches.iter().all(|m| m.status == MatchStatus::Completed));
    }
}

#[test]
fn winner_moves_into_the_next_round() {
    let (mut t, mut matches) = started(4);
    let first = t.now_playing.unwrap();
    let m = by_id(&matches, first).clone();
    let status = record_match_result(&mut t, &mut matches, first, 1.0, 2.0).unwrap();
    assert_eq!(status, TournamentStatus::Active);

    let m_after = by_id(&matches, first);
    assert_eq!(m_after.winner_id, m.b_id);
    assert_eq!(m_after.loser_id, m.a_id);
    assert_eq!(m_after.score_a, 1.0);
    assert_eq!(m_after.score_b, 2.0);
    assert!(m_after.played_at.is_some());
    let feed = m.winner_to.unwrap();
    assert_eq!(matches[feed.index].seat(feed.side), m.b_id);
}

#[test]
fn completed_match_cannot_be_reported_again() {
    let (mut t, mut matches) = started(4);
    let id = t.now_playing.unwrap();
    record_match_result(&mut t, &mut matches, id, 5.0, 2.0).unwrap();
    let before = matches.clone();

    let err = record_match_result(&mut t, &mut matches, id, 0.0, 9.0).unwrap_err();
    assert_eq!(err, TournamentError::MatchAlreadyCompleted(id));
    assert_eq!(matches, before);
    let m = by_id(&matches, id);
    assert_eq!((m.score_a, m.score_b), (5.0, 2.0));
}

#[test]
fn byes_are_already_completed() {
    let (mut t, mut matches) = started(3);
    let bye = matches.iter().find(|m| m.is_bye()).unwrap().id;
    assert!(matches!(
        record_match_result(&mut t, &mut matches, bye, 1.0, 0.0),
        Err(TournamentError::MatchAlreadyCompleted(_))
    ));
}

#[test]
fn draws_and_bad_scores_change_nothing() {
    let (mut t, mut matches) = started(4);
    let id = t.now_playing.unwrap();
    let before = matches.clone();
    assert_eq!(
        record_match_result(&mut t, &mut matches, id, 2.0, 2.0),
        Err(TournamentError::AmbiguousResult)
    );
    assert_eq!(
        record_match_result(&mut t, &mut matches, id, -1.0, 2.0),
        Err(TournamentError::InvalidScore)
    );
    assert_eq!(
        record_match_result(&mut t, &mut matches, id, f64::NAN, 2.0),
        Err(TournamentError::InvalidScore)
    );
    assert_eq!(matches, before);
    assert_eq!(t.now_playing, Some(id));
}

#[test]
fn match_waiting_for_a_participant_is_not_ready() {
    let (mut t, mut matches) = started(4);
    let final_id = matches.iter().find(|m| m.winner_to.is_none()).unwrap().id;
    assert_eq!(
        record_match_result(&mut t, &mut matches, final_id, 1.0, 0.0),
        Err(TournamentError::MatchNotReady(final_id))
    );
}

#[test]
fn unknown_match_is_not_found() {
    let (mut t, mut matches) = started(4);
    let id = Uuid::new_v4();
    assert_eq!(
        record_match_result(&mut t, &mut matches, id, 1.0, 0.0),
        Err(TournamentError::MatchNotFound(id))
    );
}

#[test]
fn results_need_an_active_tournament() {
    let (mut t, mut matches) = started(2);
    let id = t.now_playing.unwrap();
    t.status = TournamentStatus::Draft;
    assert!(matches!(
        record_match_result(&mut t, &mut matches, id, 1.0, 0.0),
        Err(TournamentError::InvalidTransition { status: TournamentStatus::Draft })
    ));
}

#[test]
fn semifinal_losers_share_third_place() {
    let (mut t, mut matches) = started(4);
    let s = t.participant_ids.clone();
    assert!(get_third_place(&t, &matches).is_empty());
    assert_eq!(get_champion(&t, &matches), None);

    play_out(&mut t, &mut matches);
    let mut third = get_third_place(&t, &matches);
    third.sort();
    let mut expected = vec![s[3], s[2]];
    expected.sort();
    assert_eq!(third, expected);
}

#[test]
fn two_participants_have_no_third_place() {
    let (mut t, mut matches) = started(2);
    play_out(&mut t, &mut matches);
    assert!(get_third_place(&t, &matches).is_empty());
}

#[test]
fn now_playing_is_the_first_ready_match() {
    let (mut t, mut matches) = started(5);
    // Seeds 1-3 have byes; only seeds 4 and 5 can play.
    let first = next_playable(&matches).unwrap();
    assert_eq!(t.now_playing, Some(first));
    assert_eq!(by_id(&matches, first).a_id, Some(t.participant_ids[3]));

    record_match_result(&mut t, &mut matches, first, 1.0, 0.0).unwrap();
    assert_eq!(t.now_playing, next_playable(&matches));
    assert!(by_id(&matches, t.now_playing.unwrap()).is_ready());
}
