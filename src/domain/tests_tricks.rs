//! Trick engine unit tests: guards, turn advance, termination, bombs.

use crate::domain::engine::{apply, GameEvent, Intent};
use crate::domain::state::Phase;
use crate::domain::test_state_helpers::{cards, hands, play_state};
use crate::domain::tricks::{pass, play};
use crate::errors::domain::{DomainError, RejectKind};

#[test]
fn lead_play_advances_turn() {
    let mut state = play_state(hands("2C 9H", "3C 9S", "4C 9D", "5C 9C"), 0);
    let events = play(&mut state, 0, &cards("2C"), None).unwrap();
    assert!(events.is_empty());
    assert_eq!(state.round.trick.len(), 1);
    assert_eq!(state.round.lead, Some(0));
    assert_eq!(state.round.turn, Some(1));
    assert_eq!(state.round.hand(0), cards("9H").as_slice());
}

#[test]
fn out_of_turn_play_rejected() {
    let mut state = play_state(hands("2C 9H", "3C 9S", "4C 9D", "5C 9C"), 0);
    let err = play(&mut state, 1, &cards("3C"), None).unwrap_err();
    assert_eq!(err.kind(), Some(RejectKind::NotYourTurn));
}

#[test]
fn play_must_beat_current_top() {
    let mut state = play_state(hands("8C 9H", "3C TS", "4C 9D", "5C 9C"), 0);
    play(&mut state, 0, &cards("8C"), None).unwrap();
    let err = play(&mut state, 1, &cards("3C"), None).unwrap_err();
    assert_eq!(err.kind(), Some(RejectKind::DoesNotBeatCurrent));
    play(&mut state, 1, &cards("TS"), None).unwrap();
    assert_eq!(state.round.trick.len(), 2);
}

#[test]
fn cross_shape_play_rejected_as_not_beating() {
    let mut state = play_state(hands("8C 9H", "3C 3S", "4C 9D", "5C 9C"), 0);
    play(&mut state, 0, &cards("8C"), None).unwrap();
    let err = play(&mut state, 1, &cards("3C 3S"), None).unwrap_err();
    assert_eq!(err.kind(), Some(RejectKind::DoesNotBeatCurrent));
}

#[test]
fn cards_not_in_hand_rejected() {
    let mut state = play_state(hands("2C 9H", "3C", "4C", "5C"), 0);
    let err = play(&mut state, 0, &cards("AC"), None).unwrap_err();
    assert_eq!(err.kind(), Some(RejectKind::CardsNotInHand));
    // The same card twice is not in the hand twice.
    let err = play(&mut state, 0, &cards("2C 2C"), None).unwrap_err();
    assert_eq!(err.kind(), Some(RejectKind::CardsNotInHand));
}

#[test]
fn wrong_phase_rejected() {
    let mut state = play_state(hands("2C", "3C", "4C", "5C"), 0);
    state.phase = Phase::Exchange;
    let err = play(&mut state, 0, &cards("2C"), None).unwrap_err();
    assert_eq!(err.kind(), Some(RejectKind::WrongPhase));
}

#[test]
fn lead_may_not_pass() {
    let mut state = play_state(hands("2C 9H", "3C", "4C", "5C"), 0);
    let err = pass(&mut state, 0).unwrap_err();
    assert_eq!(err.kind(), Some(RejectKind::MustLead));
}

#[test]
fn all_pass_closes_trick_for_the_top_seat() {
    let mut state = play_state(hands("8C 2H", "3C 9H", "4C TH", "5C JH"), 0);
    play(&mut state, 0, &cards("8C"), None).unwrap();
    assert!(pass(&mut state, 1).unwrap().is_empty());
    assert_eq!(state.round.turn, Some(2));
    pass(&mut state, 2).unwrap();
    assert_eq!(state.round.turn, Some(3));
    let events = pass(&mut state, 3).unwrap();
    assert_eq!(events, vec![GameEvent::TrickWon { winner: 0 }]);
    assert!(state.round.trick.is_empty());
    assert_eq!(state.round.passed, [false; 4]);
    assert_eq!(state.round.lead, Some(0));
    assert_eq!(state.round.turn, Some(0));
    assert_eq!(state.round.stacks[0].cards, cards("8C"));
}

#[test]
fn a_play_reopens_passed_seats() {
    let mut state = play_state(hands("8C 2H", "3C 9H", "TC 4H", "5C JH"), 0);
    play(&mut state, 0, &cards("8C"), None).unwrap();
    pass(&mut state, 1).unwrap();
    play(&mut state, 2, &cards("TC"), None).unwrap();
    // Seat 1's pass is forgotten once seat 2 plays.
    assert_eq!(state.round.passed, [false; 4]);
    assert_eq!(state.round.turn, Some(3));
    pass(&mut state, 3).unwrap();
    assert_eq!(state.round.turn, Some(0));
    pass(&mut state, 0).unwrap();
    // Seat 1 gets its second chance before the trick closes.
    assert_eq!(state.round.turn, Some(1));
    let events = pass(&mut state, 1).unwrap();
    assert_eq!(events, vec![GameEvent::TrickWon { winner: 2 }]);
    assert_eq!(state.round.turn, Some(2));
}

#[test]
fn advance_skips_empty_hands() {
    let mut state = play_state(hands("2C 5H", "", "3C 6H", "4C 7H"), 0);
    state.round.out = vec![1];
    play(&mut state, 0, &cards("2C"), None).unwrap();
    assert_eq!(state.round.turn, Some(2));
}

#[test]
fn bomb_interrupt_over_four_of_a_kind() {
    // Scenario: seat 0 leads four kings, seat 2 answers with a straight
    // flush out of turn, seat 3's lower bomb is refused.
    let mut state = play_state(
        hands(
            "KC KD KH KS 4H",
            "3C 3D",
            "9H TH JH QH KH 4S",
            "2C 2D 2H 2S",
        ),
        0,
    );
    play(&mut state, 0, &cards("KC KD KH KS"), None).unwrap();
    assert_eq!(state.round.turn, Some(1));

    let events = play(&mut state, 2, &cards("9H TH JH QH KH"), None).unwrap();
    assert!(events.is_empty());
    // The window reopens after the bomber: seat 3 acts next.
    assert_eq!(state.round.turn, Some(3));
    assert_eq!(state.round.passed, [false; 4]);

    let err = play(&mut state, 3, &cards("2C 2D 2H 2S"), None).unwrap_err();
    assert_eq!(err.kind(), Some(RejectKind::DoesNotBeatCurrent));

    pass(&mut state, 3).unwrap();
    pass(&mut state, 0).unwrap();
    let events = pass(&mut state, 1).unwrap();
    assert_eq!(events, vec![GameEvent::TrickWon { winner: 2 }]);
    assert_eq!(state.round.turn, Some(2));
    // Four kings (40) plus the ten and king of hearts (20).
    assert_eq!(state.round.stacks[2].points, 60);
}

#[test]
fn out_of_turn_bomb_needs_an_open_trick() {
    let mut state = play_state(hands("3C", "4C", "2C 2D 2H 2S", "5C"), 0);
    let err = play(&mut state, 2, &cards("2C 2D 2H 2S"), None).unwrap_err();
    assert_eq!(err.kind(), Some(RejectKind::NotYourTurn));
}

#[test]
fn in_turn_bomb_lead_is_allowed() {
    let mut state = play_state(hands("2C 2D 2H 2S 3C", "4C", "5C", "6C"), 0);
    play(&mut state, 0, &cards("2C 2D 2H 2S"), None).unwrap();
    assert_eq!(state.round.turn, Some(1));
}

#[test]
fn third_finisher_on_a_normal_play_ends_the_round() {
    // Seats 1 and 2 are already out; seat 0's last card makes three.
    // Seat 3 still holds a bomb but never gets to use it.
    let mut state = play_state(hands("5C", "", "", "2C 2D 2H 2S"), 0);
    state.round.out = vec![1, 2];
    state.round.stacks[1].points = 30;
    state.round.stacks[3].points = 10;

    let events = play(&mut state, 0, &cards("5C"), None).unwrap();

    assert_eq!(state.phase, Phase::RoundEnded);
    assert_eq!(
        events,
        vec![
            GameEvent::SeatFinished { seat: 0 },
            GameEvent::TrickWon { winner: 0 },
            GameEvent::RoundEnded {
                team_deltas: [5, 40],
                finish_order: vec![1, 2, 0, 3],
            },
        ]
    );
    // Tailender resolution ran: the surrendered bomb lands with the
    // opposing team, the tailender's stack points with the first
    // finisher.
    assert_eq!(state.round.out, vec![1, 2, 0, 3]);
    assert!(state.round.hands[3].is_empty());
    assert_eq!(state.round.stacks[0].cards, cards("5C 2C 2D 2H 2S"));
    assert_eq!(state.round.stacks[0].points, 5);
    assert_eq!(state.round.stacks[1].points, 40);
    assert_eq!(state.round.stacks[3].points, 0);
    assert_eq!(state.scores, [5, 40]);
}

#[test]
fn third_finisher_beating_mid_trick_ends_the_round() {
    let mut state = play_state(hands("KC", "", "", "4C 2C 2D 2H"), 3);
    state.round.out = vec![1, 2];
    play(&mut state, 3, &cards("4C"), None).unwrap();
    assert_eq!(state.round.turn, Some(0));

    let events = play(&mut state, 0, &cards("KC"), None).unwrap();

    assert_eq!(state.phase, Phase::RoundEnded);
    assert!(events.contains(&GameEvent::SeatFinished { seat: 0 }));
    // The contested trick closes for the finisher before the transfer.
    assert!(events.contains(&GameEvent::TrickWon { winner: 0 }));
    assert_eq!(state.round.out, vec![1, 2, 0, 3]);
    assert_eq!(state.round.stacks[0].cards, cards("4C KC 2C 2D 2H"));
    assert_eq!(state.round.stacks[0].points, 10);
    assert_eq!(state.scores, [10, 0]);
}

#[test]
fn out_of_turn_malformed_play_is_a_turn_failure() {
    let mut state = play_state(hands("2C 9H", "3C 4C", "5H", "6H"), 0);
    let err = play(&mut state, 1, &cards("3C 4C"), None).unwrap_err();
    assert_eq!(err.kind(), Some(RejectKind::NotYourTurn));
}

#[test]
fn lone_survivor_play_wins_and_round_ends() {
    let mut state = play_state(hands("2C 9H", "", "", ""), 0);
    state.round.out = vec![1, 2, 3];
    let events = play(&mut state, 0, &cards("2C"), None).unwrap();
    assert!(events.contains(&GameEvent::TrickWon { winner: 0 }));
    assert!(matches!(
        events.last(),
        Some(GameEvent::RoundEnded { .. })
    ));
    assert_eq!(state.phase, Phase::RoundEnded);
}

#[test]
fn seat_finishing_emits_event() {
    let mut state = play_state(hands("2C", "3C 9H", "4C 9D", "5C 9C"), 0);
    let events = play(&mut state, 0, &cards("2C"), None).unwrap();
    assert_eq!(events, vec![GameEvent::SeatFinished { seat: 0 }]);
    assert_eq!(state.round.out, vec![0]);
    assert_eq!(state.round.turn, Some(1));
}

#[test]
fn fatal_invariant_halts_the_engine() {
    let mut state = play_state(hands("2C", "3C", "4C", "5C"), 0);
    state.round.turn = None; // corrupted mid-play state
    let err = apply(
        &mut state,
        Intent::Play { seat: 0, cards: cards("2C"), wish_rank: None },
    )
    .unwrap_err();
    assert!(err.is_fatal());
    assert!(state.halted);
    let err = apply(&mut state, Intent::Pass { seat: 0 }).unwrap_err();
    assert!(matches!(err, DomainError::Invariant(_)));
}
