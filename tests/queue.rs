//! Winner-stays-on queue: next match, on-deck projection, opponent ranking.

use chrono::{Duration, TimeZone, Utc};
use spikeball_tournament_web::{
    next_match, next_opponent, on_deck_team, MatchRecord, Team, TeamId, Tournament, TournamentMode,
};
use uuid::Uuid;

fn fixture(n: usize) -> (Tournament, Vec<Team>) {
    let t = Tournament::new("Queue", TournamentMode::WinnerStaysOn);
    let teams = (0..n)
        .map(|_| Team::new(t.id, Uuid::new_v4(), Some(Uuid::new_v4())))
        .collect();
    (t, teams)
}

fn pending(t: &Tournament, a: TeamId, b: TeamId, order: u32) -> MatchRecord {
    MatchRecord::new(t.id, a, b, order)
}

fn played(t: &Tournament, a: TeamId, b: TeamId, order: u32, winner: TeamId) -> MatchRecord {
    let mut m = MatchRecord::new(t.id, a, b, order);
    m.winner_team_id = Some(winner);
    let (sa, sb) = if winner == a { (21, 15) } else { (15, 21) };
    m.score_team_a = Some(sa);
    m.score_team_b = Some(sb);
    m.played_at = Some(
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap() + Duration::minutes(i64::from(order)),
    );
    m
}

#[test]
fn next_match_is_earliest_pending() {
    let (t, teams) = fixture(4);
    let (a, b, c, d) = (teams[0].id, teams[1].id, teams[2].id, teams[3].id);
    let matches = vec![
        played(&t, a, b, 1, a),
        pending(&t, c, d, 3),
        pending(&t, a, c, 2),
    ];
    assert_eq!(next_match(&matches).unwrap().match_order, 2);
}

#[test]
fn on_deck_before_any_result_is_third_team() {
    let (t, teams) = fixture(4);
    let matches = vec![pending(&t, teams[0].id, teams[1].id, 1)];
    let on_deck = on_deck_team(&teams, &matches).unwrap();
    assert_eq!(on_deck.id, teams[2].id);
}

#[test]
fn on_deck_prefers_teams_that_never_played() {
    let (t, teams) = fixture(4);
    let (a, b, c, d) = (teams[0].id, teams[1].id, teams[2].id, teams[3].id);
    // a beat b in the seed match; a now faces c. d has never appeared.
    let matches = vec![played(&t, a, b, 1, a), pending(&t, a, c, 2)];
    assert_eq!(on_deck_team(&teams, &matches).unwrap().id, d);
}

#[test]
fn on_deck_takes_front_of_loser_queue_once_everyone_played() {
    let (t, teams) = fixture(4);
    let (a, b, c, d) = (teams[0].id, teams[1].id, teams[2].id, teams[3].id);
    // b lost first, then c, then d; a keeps winning and now plays b again.
    let matches = vec![
        played(&t, a, b, 1, a),
        played(&t, a, c, 2, a),
        played(&t, a, d, 3, a),
        pending(&t, a, b, 4),
    ];
    // Loser queue is [b, c, d]; b is playing, so c is on deck.
    assert_eq!(on_deck_team(&teams, &matches).unwrap().id, c);
}

#[test]
fn repeat_loser_moves_to_back_of_loser_queue() {
    let (t, teams) = fixture(4);
    let (a, b, c, d) = (teams[0].id, teams[1].id, teams[2].id, teams[3].id);
    let matches = vec![
        played(&t, a, b, 1, a), // b loses
        played(&t, a, c, 2, a), // c loses
        played(&t, a, b, 3, a), // b loses again, goes behind c
        pending(&t, a, d, 4),
    ];
    // Loser queue replays to [c, b]; front is c.
    assert_eq!(on_deck_team(&teams, &matches).unwrap().id, c);
}

#[test]
fn opponent_ranking_prefers_never_played_then_least_recent() {
    let (t, teams) = fixture(5);
    let (a, b, c, d, e) = (
        teams[0].id,
        teams[1].id,
        teams[2].id,
        teams[3].id,
        teams[4].id,
    );
    let matches = vec![played(&t, a, b, 1, a), played(&t, a, c, 2, a)];

    // d and e never played: d (earlier in creation order) is first.
    assert_eq!(next_opponent(&teams, &matches, a, c), Some(d));

    // Once everyone has played, the least recently seen team is first.
    let matches = vec![
        played(&t, a, b, 1, a),
        played(&t, a, c, 2, a),
        played(&t, a, d, 3, a),
        played(&t, a, e, 4, a),
    ];
    assert_eq!(next_opponent(&teams, &matches, a, e), Some(b));
}

#[test]
fn loser_goes_to_the_back_regardless_of_recency() {
    let (t, teams) = fixture(3);
    let (a, b, c) = (teams[0].id, teams[1].id, teams[2].id);
    // b played long ago, c just lost. b must still be preferred over c.
    let matches = vec![played(&t, a, b, 1, a), played(&t, a, c, 2, a)];
    assert_eq!(next_opponent(&teams, &matches, a, c), Some(b));
}

#[test]
fn two_team_tournament_requeues_the_loser() {
    let (t, teams) = fixture(2);
    let (a, b) = (teams[0].id, teams[1].id);
    let matches = vec![played(&t, a, b, 1, a)];
    assert_eq!(next_opponent(&teams, &matches, a, b), Some(b));
}

#[test]
fn queue_exhausts_below_two_teams() {
    let (t, teams) = fixture(1);
    let a = teams[0].id;
    let gone = Uuid::new_v4();
    let matches = vec![played(&t, a, gone, 1, a)];
    assert_eq!(next_opponent(&teams, &matches, a, gone), None);
}

#[test]
fn four_team_scenario_from_the_court() {
    // Seed t1 vs t2; t1 wins -> plays t3; t3 wins -> plays t4, t1 queued
    // behind t2.
    let (t, teams) = fixture(4);
    let (t1, t2, t3, t4) = (teams[0].id, teams[1].id, teams[2].id, teams[3].id);

    let mut matches = vec![pending(&t, t1, t2, 1)];
    assert_eq!(on_deck_team(&teams, &matches).unwrap().id, t3);

    matches[0] = played(&t, t1, t2, 1, t1);
    let opponent = next_opponent(&teams, &matches, t1, t2).unwrap();
    assert_eq!(opponent, t3);
    matches.push(pending(&t, t1, opponent, 2));

    matches[1] = played(&t, t1, t3, 2, t3);
    let opponent = next_opponent(&teams, &matches, t3, t1).unwrap();
    assert_eq!(opponent, t4);

    // t1 sits behind t2 now: with t4 playing, t2 comes first.
    matches.push(pending(&t, t3, opponent, 3));
    assert_eq!(on_deck_team(&teams, &matches).unwrap().id, t2);
}
