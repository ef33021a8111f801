//! Snapshot round trips across phases, plus view redaction checks.

use crate::domain::cards_types::Rank;
use crate::domain::engine::{apply, Intent};
use crate::domain::player_view::view_for;
use crate::domain::snapshot::{from_json, to_json};
use crate::domain::state::{DragonGift, GameState, Phase, Wish};
use crate::domain::test_state_helpers::{cards, hands, play_state};
use crate::domain::tricks::{pass, play};

fn round_trip(state: &GameState) -> GameState {
    let json = to_json(state).unwrap();
    from_json(&json).unwrap()
}

#[test]
fn snapshot_round_trip_fresh_match() {
    let state = GameState::new([3; 32]);
    assert_eq!(round_trip(&state), state);
}

#[test]
fn snapshot_round_trip_dealt_and_exchange_phases() {
    let mut state = GameState::new([3; 32]);
    apply(&mut state, Intent::BeginRound).unwrap();
    assert_eq!(state.phase, Phase::GrandTichuWindow);
    assert_eq!(round_trip(&state), state);

    for seat in 0..4 {
        apply(&mut state, Intent::RevealHidden { seat }).unwrap();
    }
    assert_eq!(state.phase, Phase::Exchange);
    assert_eq!(round_trip(&state), state);
}

#[test]
fn snapshot_round_trip_mid_trick() {
    let mut state = play_state(hands("MA 2C 8H", "TC 9H", "4C 9D", "5C 9C"), 0);
    play(&mut state, 0, &cards("MA"), Some(Rank::Ten)).unwrap();
    play(&mut state, 1, &cards("TC"), None).unwrap();
    pass(&mut state, 2).unwrap();
    let restored = round_trip(&state);
    assert_eq!(restored, state);

    // The restored state behaves identically.
    let mut a = state.clone();
    let mut b = restored;
    assert_eq!(pass(&mut a, 3).unwrap(), pass(&mut b, 3).unwrap());
    assert_eq!(a, b);
}

#[test]
fn snapshot_round_trip_with_pending_gift_and_wish() {
    let mut state = play_state(hands("2C", "3C 9H", "4C 9D", "5C 9C"), 0);
    state.round.wish = Some(Wish { rank: Rank::Ten, active: true });
    state.round.dragon_pending = Some(DragonGift {
        giver: 0,
        cards: cards("DR 8C"),
        points: 25,
    });
    state.round.turn = None;
    assert_eq!(round_trip(&state), state);
}

#[test]
fn snapshot_round_trip_round_ended() {
    let mut state = play_state(hands("", "", "", "2C 9H"), 0);
    state.round.out = vec![0, 1, 2];
    let mut events = Vec::new();
    crate::domain::scoring::resolve_round_end(
        &mut state,
        crate::domain::scoring::RoundEndKind::Normal,
        &mut events,
    )
    .unwrap();
    assert_eq!(state.phase, Phase::RoundEnded);
    assert_eq!(round_trip(&state), state);
}

#[test]
fn views_redact_other_hands() {
    let mut state = GameState::new([5; 32]);
    apply(&mut state, Intent::BeginRound).unwrap();
    for seat in 0..4u8 {
        let view = view_for(&state, seat);
        assert_eq!(view.hand, state.round.hands[seat as usize]);
        assert_eq!(view.hidden_count, 6);
        // Counts cover every seat; no other hand is exposed.
        assert_eq!(view.hand_counts, [14, 14, 14, 14]);
        let json = serde_json::to_string(&view).unwrap();
        for other in 0..4u8 {
            if other != seat {
                for card in &state.round.hands[other as usize] {
                    let token = format!("\"{card}\"");
                    // The token may coincide with one of the viewer's own
                    // cards; only assert when it cannot.
                    if !state.round.hands[seat as usize].contains(card) {
                        assert!(
                            !json.contains(&token),
                            "seat {seat} view leaks {token} of seat {other}"
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn view_exposes_public_trick_state() {
    let mut state = play_state(hands("8C 2H", "3C 9H", "4C 9D", "5C 9C"), 0);
    play(&mut state, 0, &cards("8C"), None).unwrap();
    let view = view_for(&state, 2);
    assert_eq!(view.trick.len(), 1);
    assert_eq!(view.turn, Some(1));
    assert_eq!(view.lead, Some(0));
    assert!(!view.may_pass);
    let view = view_for(&state, 1);
    assert!(view.may_pass);
}
