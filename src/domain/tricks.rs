//! Trick play: leads, beats, passes, bomb interrupts, and the
//! special-card effects that ride on them.
//!
//! Every operation validates fully before touching state, so a rejected
//! intent leaves the round untouched.

use tracing::debug;

use super::cards_logic::{hand_contains_all, hand_has_rank, points_of, remove_cards};
use super::cards_types::{Card, Rank};
use super::combination::{beats, classify, Combination, SingleValue};
use super::engine::GameEvent;
use super::scoring::{self, RoundEndKind};
use super::state::{
    is_opponent, next_seat, partner, require_turn, team_of, DragonGift, GameState, Phase,
    PlayRecord, Seat, TrickStack, Wish,
};
use crate::errors::domain::{DomainError, RejectKind};

fn reject(kind: RejectKind, detail: &str) -> DomainError {
    DomainError::rejected(kind, detail)
}

/// Play a card set for `seat`. `wish_rank` is required with a single
/// Mah Jong and forbidden otherwise.
pub fn play(
    state: &mut GameState,
    seat: Seat,
    cards: &[Card],
    wish_rank: Option<Rank>,
) -> Result<Vec<GameEvent>, DomainError> {
    guard_play_phase(state)?;
    if cards.is_empty() {
        return Err(reject(RejectKind::InvalidCombination, "empty play"));
    }
    if !hand_contains_all(state.round.hand(seat), cards) {
        return Err(reject(
            RejectKind::CardsNotInHand,
            "played cards are not all in hand",
        ));
    }

    // The Dog rides its own path: sole lead card, no combination.
    if cards.iter().any(|c| *c == Card::Dog) {
        if cards.len() != 1 {
            return Err(reject(
                RejectKind::InvalidCombination,
                "the Dog must be led alone",
            ));
        }
        if wish_rank.is_some() {
            return Err(reject(
                RejectKind::InvalidCombination,
                "only a Mah Jong single names a wish",
            ));
        }
        return play_dog(state, seat);
    }

    // Turn guard before combination validity. Out of turn, only a set
    // that already reads as a bomb may interrupt, and never while a Dog
    // transfer is pending.
    let turn = require_turn(state, "play")?;
    if seat != turn {
        if !classify(cards).is_ok_and(|c| c.is_bomb()) {
            return Err(reject(RejectKind::NotYourTurn, "not this seat's turn"));
        }
        if state.round.dog_priority.is_some() {
            return Err(reject(
                RejectKind::BombForbiddenDogInTrick,
                "no bombs while the Dog's lead transfer is pending",
            ));
        }
        if state.round.trick.is_empty() {
            return Err(reject(
                RejectKind::NotYourTurn,
                "an out-of-turn bomb needs an open trick",
            ));
        }
    }

    let mut combo = classify(cards)?;
    let is_bomb = combo.is_bomb();

    // The Mah Jong holder's first play must include it.
    if !state.round.first_card_played[seat as usize]
        && state.round.hand(seat).contains(&Card::MahJong)
        && !cards.contains(&Card::MahJong)
    {
        return Err(reject(
            RejectKind::MahJongMustBePlayedFirst,
            "the Mah Jong holder's first play must include it",
        ));
    }

    // Bind the Phoenix single against the current top.
    let lone_phoenix = cards.len() == 1 && cards[0] == Card::Phoenix;
    if lone_phoenix {
        if let Some(top) = state.round.trick_top() {
            if let Combination::Single { value } = top.combo {
                combo = Combination::Single {
                    value: SingleValue::phoenix_over(value),
                };
            }
        }
    }

    // Beat-the-top guard.
    if let Some(top) = state.round.trick_top() {
        if is_bomb {
            if top.combo.is_bomb() && !beats(&combo, &top.combo) {
                return Err(reject(
                    RejectKind::DoesNotBeatCurrent,
                    "bomb does not outrank the current bomb",
                ));
            }
        } else if !beats(&combo, &top.combo) {
            return Err(reject(
                RejectKind::DoesNotBeatCurrent,
                "play does not beat the current top",
            ));
        }
    }

    // Wish obligation on a lead: a seat holding the wished rank must
    // include it.
    if let Some(wish) = state.round.wish {
        if wish.active
            && state.round.trick.is_empty()
            && hand_has_rank(state.round.hand(seat), wish.rank)
            && !cards.iter().any(|c| c.rank() == Some(wish.rank))
        {
            return Err(reject(
                RejectKind::WishUnfulfilled,
                "the lead must include the wished rank",
            ));
        }
    }

    // Wish naming: exactly with a single Mah Jong.
    let lone_mah_jong = cards.len() == 1 && cards[0] == Card::MahJong;
    if lone_mah_jong && wish_rank.is_none() {
        return Err(reject(
            RejectKind::InvalidCombination,
            "a Mah Jong single must name a wish",
        ));
    }
    if !lone_mah_jong && wish_rank.is_some() {
        return Err(reject(
            RejectKind::InvalidCombination,
            "only a Mah Jong single names a wish",
        ));
    }

    apply_play(state, seat, cards, combo, wish_rank)
}

/// All guards passed; mutate the round.
fn apply_play(
    state: &mut GameState,
    seat: Seat,
    cards: &[Card],
    combo: Combination,
    wish_rank: Option<Rank>,
) -> Result<Vec<GameEvent>, DomainError> {
    let mut events = Vec::new();
    debug!(seat, count = cards.len(), "play accepted");

    remove_cards(&mut state.round.hands[seat as usize], cards);
    state.round.first_card_played[seat as usize] = true;
    state.round.passed = [false; 4];
    if state.round.dog_priority == Some(seat) {
        state.round.dog_priority = None;
    }
    if state.round.trick.is_empty() {
        state.round.lead = Some(seat);
    }
    state.round.trick.push(PlayRecord {
        seat,
        cards: cards.to_vec(),
        combo,
    });

    // Wish lifecycle: a Mah Jong single names one; any play containing
    // the wished rank satisfies it.
    if let Some(rank) = wish_rank {
        state.round.wish = Some(Wish { rank, active: true });
        events.push(GameEvent::WishSet { rank });
    } else if let Some(wish) = state.round.wish {
        if wish.active && cards.iter().any(|c| c.rank() == Some(wish.rank)) {
            state.round.wish = Some(Wish {
                rank: wish.rank,
                active: false,
            });
            events.push(GameEvent::WishCleared);
        }
    }

    if state.round.hand(seat).is_empty() {
        state.round.out.push(seat);
        events.push(GameEvent::SeatFinished { seat });
        if double_victory(state) {
            scoring::resolve_round_end(state, RoundEndKind::DoubleVictory, &mut events)?;
            return Ok(events);
        }
    }

    // A third finisher leaves a lone tailender: the trick closes for the
    // finisher (its play is the top) and the round resolves.
    if state.round.seats_with_cards().len() <= 1 {
        return close_trick(state, events);
    }

    // Advance: next seat holding cards after the actor.
    match next_seat_with_cards(state, seat) {
        Some(next) => {
            state.round.turn = Some(next);
            Ok(events)
        }
        None => close_trick(state, events),
    }
}

pub fn pass(state: &mut GameState, seat: Seat) -> Result<Vec<GameEvent>, DomainError> {
    guard_play_phase(state)?;
    let turn = require_turn(state, "pass")?;
    if seat != turn {
        return Err(reject(RejectKind::NotYourTurn, "not this seat's turn"));
    }
    if state.round.trick.is_empty() {
        return Err(reject(RejectKind::MustLead, "the priority seat must play"));
    }
    if wish_blocks_pass(state, seat) {
        return Err(reject(
            RejectKind::WishUnfulfilled,
            "holding the wished rank that could beat the trick",
        ));
    }

    debug!(seat, "pass accepted");
    state.round.passed[seat as usize] = true;

    // Scan onward, skipping out, empty-handed, and passed seats. When
    // the scan reaches the owner of the top play the trick closes.
    let top_seat = state
        .round
        .trick_top()
        .map(|p| p.seat)
        .ok_or_else(|| DomainError::invariant("pass on an empty trick"))?;
    let mut cur = seat;
    loop {
        cur = next_seat(cur);
        if cur == top_seat {
            return close_trick(state, Vec::new());
        }
        let idx = cur as usize;
        if state.round.hands[idx].is_empty() || state.round.passed[idx] {
            continue;
        }
        state.round.turn = Some(cur);
        return Ok(Vec::new());
    }
}

/// Resolve a pending Dragon gift. Only the giver may choose, and only an
/// opponent may receive.
pub fn select_dragon_recipient(
    state: &mut GameState,
    seat: Seat,
    opponent: Seat,
) -> Result<Vec<GameEvent>, DomainError> {
    if state.phase != Phase::Play {
        return Err(reject(RejectKind::WrongPhase, "no trick play in progress"));
    }
    let giver = match &state.round.dragon_pending {
        Some(gift) => gift.giver,
        None => {
            return Err(reject(
                RejectKind::WrongPhase,
                "no Dragon gift is pending",
            ))
        }
    };
    if seat != giver {
        return Err(reject(
            RejectKind::NotYourTurn,
            "only the Dragon player chooses the recipient",
        ));
    }
    if opponent as usize >= 4 || !is_opponent(seat, opponent) {
        return Err(reject(
            RejectKind::DragonRecipientMustBeOpponent,
            "the Dragon's trick goes to an opponent",
        ));
    }

    let gift = match state.round.dragon_pending.take() {
        Some(gift) => gift,
        None => return Err(DomainError::invariant("dragon gift vanished")),
    };
    debug!(giver, opponent, points = gift.points, "dragon gift resolved");
    let stack: &mut TrickStack = &mut state.round.stacks[opponent as usize];
    stack.points += gift.points;
    stack.cards.extend(gift.cards);

    let mut events = vec![GameEvent::TrickWon { winner: giver }];
    // The gifted trick's lead still belongs to the Dragon player.
    begin_next_trick_or_end(state, giver, &mut events)?;
    Ok(events)
}

/// Pure query: whether `seat` could pass right now.
pub fn may_pass(state: &GameState, seat: Seat) -> bool {
    state.phase == Phase::Play
        && state.round.dragon_pending.is_none()
        && state.round.turn == Some(seat)
        && !state.round.trick.is_empty()
        && !wish_blocks_pass(state, seat)
}

fn guard_play_phase(state: &GameState) -> Result<(), DomainError> {
    if state.phase != Phase::Play {
        return Err(reject(RejectKind::WrongPhase, "no trick play in progress"));
    }
    if state.round.dragon_pending.is_some() {
        return Err(reject(
            RejectKind::DragonMustChooseOpponent,
            "play is blocked until the Dragon's trick is gifted",
        ));
    }
    Ok(())
}

/// Minimum wish enforcement on a pass: the seat holds the wished rank
/// and a single of it would beat the trick's top single.
fn wish_blocks_pass(state: &GameState, seat: Seat) -> bool {
    let Some(wish) = state.round.wish else {
        return false;
    };
    if !wish.active || !hand_has_rank(state.round.hand(seat), wish.rank) {
        return false;
    }
    match state.round.trick_top() {
        Some(top) => match top.combo {
            Combination::Single { value } => SingleValue::of_rank(wish.rank) > value,
            _ => false,
        },
        None => false,
    }
}

/// Dog lead: discarded, lead transfers to the partner or the next seat
/// holding cards after them.
fn play_dog(state: &mut GameState, seat: Seat) -> Result<Vec<GameEvent>, DomainError> {
    let turn = require_turn(state, "dog lead")?;
    if seat != turn {
        return Err(reject(RejectKind::NotYourTurn, "not this seat's turn"));
    }
    if !state.round.trick.is_empty() {
        return Err(reject(
            RejectKind::InvalidCombination,
            "the Dog must open a trick",
        ));
    }
    if !state.round.first_card_played[seat as usize]
        && state.round.hand(seat).contains(&Card::MahJong)
    {
        return Err(reject(
            RejectKind::MahJongMustBePlayedFirst,
            "the Mah Jong holder's first play must include it",
        ));
    }
    if let Some(wish) = state.round.wish {
        if wish.active && hand_has_rank(state.round.hand(seat), wish.rank) {
            return Err(reject(
                RejectKind::WishUnfulfilled,
                "the lead must include the wished rank",
            ));
        }
    }

    let mut events = Vec::new();
    debug!(seat, "dog led");
    remove_cards(&mut state.round.hands[seat as usize], &[Card::Dog]);
    state.round.first_card_played[seat as usize] = true;
    // The Dog is worth nothing and wins nothing; it is booked to its
    // player's stack so the 56-card census stays whole.
    state.round.stacks[seat as usize].cards.push(Card::Dog);
    state.round.passed = [false; 4];
    state.round.dog_priority = None;

    if state.round.hand(seat).is_empty() {
        state.round.out.push(seat);
        events.push(GameEvent::SeatFinished { seat });
        if double_victory(state) {
            scoring::resolve_round_end(state, RoundEndKind::DoubleVictory, &mut events)?;
            return Ok(events);
        }
    }
    if state.round.seats_with_cards().len() <= 1 {
        scoring::resolve_round_end(state, RoundEndKind::Normal, &mut events)?;
        return Ok(events);
    }

    let p = partner(seat);
    let recipient = if !state.round.hands[p as usize].is_empty() {
        p
    } else {
        match next_seat_with_cards(state, p) {
            Some(s) => s,
            None => return Err(DomainError::invariant("no seat can receive the Dog's lead")),
        }
    };
    state.round.dog_priority = Some(recipient);
    state.round.lead = Some(recipient);
    state.round.turn = Some(recipient);
    Ok(events)
}

/// The trick is over; the top play wins it.
fn close_trick(
    state: &mut GameState,
    mut events: Vec<GameEvent>,
) -> Result<Vec<GameEvent>, DomainError> {
    let (winner, dragon_single) = match state.round.trick_top() {
        Some(top) => (
            top.seat,
            top.cards.len() == 1 && top.cards[0] == Card::Dragon,
        ),
        None => return Err(DomainError::invariant("closing an empty trick")),
    };
    let mut trick_cards: Vec<Card> = Vec::new();
    for play in state.round.trick.drain(..) {
        trick_cards.extend(play.cards);
    }
    let points = points_of(&trick_cards);
    state.round.passed = [false; 4];

    if dragon_single {
        // The Dragon won its own trick: stash it and block play until
        // the giver names an opponent.
        state.round.dragon_pending = Some(DragonGift {
            giver: winner,
            cards: trick_cards,
            points,
        });
        state.round.lead = Some(winner);
        state.round.turn = None;
        events.push(GameEvent::DragonGiftPending { giver: winner });
        return Ok(events);
    }

    let stack = &mut state.round.stacks[winner as usize];
    stack.points += points;
    stack.cards.extend(trick_cards);
    events.push(GameEvent::TrickWon { winner });
    debug!(winner, points, "trick won");

    begin_next_trick_or_end(state, winner, &mut events)?;
    Ok(events)
}

/// Start the next trick with the winner leading, or end the round when
/// at most one seat still holds cards.
fn begin_next_trick_or_end(
    state: &mut GameState,
    winner: Seat,
    events: &mut Vec<GameEvent>,
) -> Result<(), DomainError> {
    if state.round.seats_with_cards().len() <= 1 {
        return scoring::resolve_round_end(state, RoundEndKind::Normal, events);
    }
    // The lead is the winner's; a winner who is out hands it onward.
    let lead = if !state.round.hands[winner as usize].is_empty() {
        winner
    } else {
        match next_seat_with_cards(state, winner) {
            Some(s) => s,
            None => return Err(DomainError::invariant("no seat can lead the next trick")),
        }
    };
    state.round.lead = Some(lead);
    state.round.turn = Some(lead);
    Ok(())
}

/// First seat after `from` (exclusive) still holding cards.
fn next_seat_with_cards(state: &GameState, from: Seat) -> Option<Seat> {
    let mut cur = from;
    for _ in 0..3 {
        cur = next_seat(cur);
        if !state.round.hands[cur as usize].is_empty() {
            return Some(cur);
        }
    }
    None
}

/// First two finishers on the same team.
fn double_victory(state: &GameState) -> bool {
    state.round.out.len() == 2 && team_of(state.round.out[0]) == team_of(state.round.out[1])
}
