//! End-to-end engine flows against the in-memory store: setup, scoring,
//! skips, rounds, completion, and change notifications.

use spikeball_tournament_web::{
    next_match, ChangeKind, ChangeTable, Engine, EntityStore, MemoryStore, MatchRecord,
    TournamentError, TournamentId, TournamentMode,
};
use std::sync::Arc;

fn engine() -> Engine<MemoryStore> {
    Engine::new(Arc::new(MemoryStore::new()))
}

fn names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("Player {i}")).collect()
}

fn pending_match(engine: &Engine<MemoryStore>, id: TournamentId) -> MatchRecord {
    let matches = engine.store().matches(id).unwrap();
    next_match(&matches).cloned().expect("a pending match")
}

#[test]
fn setup_rejects_short_or_duplicate_player_lists() {
    let engine = engine();

    let err = engine
        .create_tournament("Short", TournamentMode::WinnerStaysOn, &names(3))
        .unwrap_err();
    assert!(matches!(err, TournamentError::NotEnoughPlayers { .. }));

    let mut dupes = names(4);
    dupes[3] = "player 0".to_string(); // case-insensitive clash
    let err = engine
        .create_tournament("Dupes", TournamentMode::WinnerStaysOn, &dupes)
        .unwrap_err();
    assert!(matches!(err, TournamentError::DuplicatePlayerName(_)));
}

#[test]
fn winner_stays_on_setup_seeds_one_match() {
    let engine = engine();
    let t = engine
        .create_tournament("Court", TournamentMode::WinnerStaysOn, &names(8))
        .unwrap();

    let teams = engine.store().teams(t.id).unwrap();
    let matches = engine.store().matches(t.id).unwrap();
    assert_eq!(teams.len(), 4);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].match_order, 1);
    assert_eq!(matches[0].team_a_id, teams[0].id);
    assert_eq!(matches[0].team_b_id, teams[1].id);
}

#[test]
fn odd_player_count_forms_a_short_handed_team() {
    let engine = engine();
    let t = engine
        .create_tournament("Odd", TournamentMode::WinnerStaysOn, &names(5))
        .unwrap();

    let teams = engine.store().teams(t.id).unwrap();
    assert_eq!(teams.len(), 3);
    assert_eq!(teams.iter().filter(|t| t.player2_id.is_none()).count(), 1);
}

#[test]
fn league_setup_creates_a_full_round() {
    let engine = engine();
    let t = engine
        .create_tournament("Liga", TournamentMode::League, &names(12))
        .unwrap();

    let matches = engine.store().matches(t.id).unwrap();
    assert_eq!(matches.len(), 15); // 6 teams
    for (i, m) in matches.iter().enumerate() {
        assert_eq!(m.match_order, i as u32 + 1);
        assert!(m.is_pending());
    }
}

#[test]
fn scoring_queues_a_follow_up_for_the_winner() {
    let engine = engine();
    let t = engine
        .create_tournament("Court", TournamentMode::WinnerStaysOn, &names(8))
        .unwrap();
    let seed = pending_match(&engine, t.id);

    let recorded = engine
        .record_result(t.id, seed.id, 21, 15)
        .unwrap();
    assert_eq!(recorded.winner_team_id, seed.team_a_id);

    let follow_up = recorded.follow_up.expect("follow-up match");
    assert_eq!(follow_up.team_a_id, seed.team_a_id);
    assert_eq!(follow_up.match_order, 2);
    // The winner keeps the court against the third team in creation order.
    let teams = engine.store().teams(t.id).unwrap();
    assert_eq!(follow_up.team_b_id, teams[2].id);

    // Never two simultaneous pending matches.
    let matches = engine.store().matches(t.id).unwrap();
    assert_eq!(matches.iter().filter(|m| m.is_pending()).count(), 1);

    let updated = engine.store().tournament(t.id).unwrap();
    assert_eq!(updated.current_winner_team_id, Some(seed.team_a_id));
    assert_eq!(updated.current_streak, 1);
}

#[test]
fn streak_cursor_resets_when_the_court_changes_hands() {
    let engine = engine();
    let t = engine
        .create_tournament("Court", TournamentMode::WinnerStaysOn, &names(8))
        .unwrap();

    // Holder wins twice, then loses.
    let m = pending_match(&engine, t.id);
    engine.record_result(t.id, m.id, 21, 10).unwrap();
    let m = pending_match(&engine, t.id);
    engine.record_result(t.id, m.id, 21, 12).unwrap();
    assert_eq!(engine.store().tournament(t.id).unwrap().current_streak, 2);

    let m = pending_match(&engine, t.id);
    let recorded = engine.record_result(t.id, m.id, 7, 21).unwrap();
    let updated = engine.store().tournament(t.id).unwrap();
    assert_eq!(updated.current_winner_team_id, Some(recorded.winner_team_id));
    assert_eq!(updated.current_streak, 1);
}

#[test]
fn tied_and_negative_scores_are_rejected_without_side_effects() {
    let engine = engine();
    let t = engine
        .create_tournament("Court", TournamentMode::WinnerStaysOn, &names(8))
        .unwrap();
    let seed = pending_match(&engine, t.id);

    let err = engine.record_result(t.id, seed.id, 10, 10).unwrap_err();
    assert!(matches!(err, TournamentError::TiedScore { .. }));
    let err = engine.record_result(t.id, seed.id, -1, 5).unwrap_err();
    assert_eq!(err, TournamentError::NegativeScore);

    let matches = engine.store().matches(t.id).unwrap();
    assert_eq!(matches.len(), 1);
    assert!(matches[0].is_pending());
    assert!(matches[0].played_at.is_none());
}

#[test]
fn scores_beyond_u32_are_rejected_not_truncated() {
    let engine = engine();
    let t = engine
        .create_tournament("Court", TournamentMode::WinnerStaysOn, &names(8))
        .unwrap();
    let seed = pending_match(&engine, t.id);

    // 2^32 would wrap to 0 under a naive cast, handing the win to team_b.
    let err = engine
        .record_result(t.id, seed.id, 4_294_967_296, 0)
        .unwrap_err();
    assert_eq!(err, TournamentError::ScoreOutOfRange(4_294_967_296));

    let matches = engine.store().matches(t.id).unwrap();
    assert!(matches[0].is_pending());
    assert!(matches[0].score_team_a.is_none());
}

#[test]
fn completed_match_cannot_be_scored_twice() {
    let engine = engine();
    let t = engine
        .create_tournament("Court", TournamentMode::WinnerStaysOn, &names(8))
        .unwrap();
    let seed = pending_match(&engine, t.id);
    engine.record_result(t.id, seed.id, 21, 15).unwrap();

    let err = engine.record_result(t.id, seed.id, 15, 21).unwrap_err();
    assert!(matches!(err, TournamentError::MatchAlreadyPlayed(_)));
}

#[test]
fn skip_keeps_the_holder_and_requeues_the_other_team() {
    let engine = engine();
    let t = engine
        .create_tournament("Court", TournamentMode::WinnerStaysOn, &names(8))
        .unwrap();
    let teams = engine.store().teams(t.id).unwrap();

    // Holder wins the seed match, then skips the follow-up.
    let seed = pending_match(&engine, t.id);
    engine.record_result(t.id, seed.id, 21, 15).unwrap();
    let holder = seed.team_a_id;

    let to_skip = pending_match(&engine, t.id);
    assert_eq!(to_skip.team_a_id, holder);
    let skipped_team = to_skip.team_b_id;

    let replacement = engine
        .skip_match(t.id, to_skip.id)
        .unwrap()
        .expect("replacement match");
    assert_eq!(replacement.team_a_id, holder);
    assert_ne!(replacement.team_b_id, skipped_team);
    // Replacement reuses the vacated order slot.
    assert_eq!(replacement.match_order, to_skip.match_order);
    // The skipped team (teams[2]) waits behind the remaining fresh team.
    assert_eq!(replacement.team_b_id, teams[3].id);

    let matches = engine.store().matches(t.id).unwrap();
    assert_eq!(matches.iter().filter(|m| m.is_pending()).count(), 1);
}

#[test]
fn skip_is_league_mode_error() {
    let engine = engine();
    let t = engine
        .create_tournament("Liga", TournamentMode::League, &names(8))
        .unwrap();
    let m = pending_match(&engine, t.id);
    assert_eq!(engine.skip_match(t.id, m.id).unwrap_err(), TournamentError::WrongMode);
}

#[test]
fn league_scoring_creates_no_follow_up() {
    let engine = engine();
    let t = engine
        .create_tournament("Liga", TournamentMode::League, &names(8))
        .unwrap();
    let before = engine.store().matches(t.id).unwrap().len();

    let m = pending_match(&engine, t.id);
    let recorded = engine.record_result(t.id, m.id, 21, 18).unwrap();
    assert!(recorded.follow_up.is_none());
    assert_eq!(engine.store().matches(t.id).unwrap().len(), before);
}

#[test]
fn new_league_round_continues_the_order_sequence() {
    let engine = engine();
    let t = engine
        .create_tournament("Liga", TournamentMode::League, &names(8))
        .unwrap();

    let round = engine.create_round(t.id).unwrap();
    assert_eq!(round.len(), 6); // 4 teams
    assert_eq!(round[0].match_order, 7);
    assert_eq!(round.last().unwrap().match_order, 12);
}

#[test]
fn finishing_is_terminal() {
    let engine = engine();
    let t = engine
        .create_tournament("Court", TournamentMode::WinnerStaysOn, &names(8))
        .unwrap();
    let seed = pending_match(&engine, t.id);
    engine.record_result(t.id, seed.id, 21, 15).unwrap();

    // Default winner is the standings leader: the seed winner.
    let suggestion = engine.suggested_winner(t.id).unwrap();
    assert_eq!(suggestion, Some(seed.team_a_id));

    let finished = engine.finish_tournament(t.id, None).unwrap();
    assert_eq!(finished.winner_team_id, Some(seed.team_a_id));
    assert!(finished.ended_at.is_some());

    let m = pending_match(&engine, t.id);
    let err = engine.record_result(t.id, m.id, 21, 3).unwrap_err();
    assert_eq!(err, TournamentError::TournamentEnded);
    let err = engine.skip_match(t.id, m.id).unwrap_err();
    assert_eq!(err, TournamentError::TournamentEnded);
    let err = engine.finish_tournament(t.id, None).unwrap_err();
    assert_eq!(err, TournamentError::TournamentEnded);
}

#[test]
fn winner_override_must_be_a_tournament_team() {
    let engine = engine();
    let t = engine
        .create_tournament("Court", TournamentMode::WinnerStaysOn, &names(8))
        .unwrap();
    let err = engine
        .finish_tournament(t.id, Some(uuid::Uuid::new_v4()))
        .unwrap_err();
    assert!(matches!(err, TournamentError::UnknownTeam(_)));

    let teams = engine.store().teams(t.id).unwrap();
    let finished = engine.finish_tournament(t.id, Some(teams[3].id)).unwrap();
    assert_eq!(finished.winner_team_id, Some(teams[3].id));
}

#[test]
fn store_writes_publish_change_events() {
    let engine = engine();
    let mut feed = engine.store().subscribe();

    let t = engine
        .create_tournament("Court", TournamentMode::WinnerStaysOn, &names(8))
        .unwrap();
    let seed = pending_match(&engine, t.id);
    engine.record_result(t.id, seed.id, 21, 15).unwrap();

    let mut events = Vec::new();
    while let Ok(e) = feed.try_recv() {
        events.push(e);
    }
    assert!(events.iter().all(|e| e.tournament_id == t.id));
    // Setup inserts, then the score update, cursor update, follow-up insert.
    assert!(events
        .iter()
        .any(|e| e.table == ChangeTable::Matches && e.kind == ChangeKind::Update));
    assert!(events
        .iter()
        .any(|e| e.table == ChangeTable::Tournaments && e.kind == ChangeKind::Update));
    assert!(events
        .iter()
        .filter(|e| e.table == ChangeTable::Matches && e.kind == ChangeKind::Insert)
        .count() >= 2);
}
