//! The three-card exchange: per-seat assignment and the atomic swap.

use tracing::{debug, info};

use super::cards_logic::hand_contains_all;
use super::cards_types::Card;
use super::engine::GameEvent;
use super::state::{seat_offset, GameState, Phase, Seat, SEATS};
use crate::errors::domain::{DomainError, RejectKind};

/// Submit a seat's exchange triple: one card each for the next, the
/// opposite, and the previous seat. The swap happens once all four
/// seats have submitted.
pub fn submit_exchange(
    state: &mut GameState,
    seat: Seat,
    cards: [Card; 3],
) -> Result<Vec<GameEvent>, DomainError> {
    if state.phase != Phase::Exchange {
        return Err(DomainError::rejected(
            RejectKind::WrongPhase,
            "no exchange in progress",
        ));
    }
    if state.round.exchange[seat as usize].is_some() {
        return Err(DomainError::rejected(
            RejectKind::ExchangeBad,
            "exchange already submitted",
        ));
    }
    // hand_contains_all also refuses the same card listed twice.
    if !hand_contains_all(state.round.hand(seat), &cards) {
        return Err(DomainError::rejected(
            RejectKind::ExchangeBad,
            "exchange cards must be three distinct cards from hand",
        ));
    }

    debug!(seat, "exchange submitted");
    state.round.exchange[seat as usize] = Some(cards);

    if state.round.exchange.iter().all(|e| e.is_some()) {
        perform_swap(state)?;
    }
    Ok(Vec::new())
}

/// Atomic swap: remove every outgoing card first, then deliver. The
/// Mah Jong may change hands; its holder leads the first trick.
fn perform_swap(state: &mut GameState) -> Result<(), DomainError> {
    let mut triples = [[Card::Dog; 3]; SEATS];
    for (seat, slot) in state.round.exchange.iter().enumerate() {
        triples[seat] =
            slot.ok_or_else(|| DomainError::invariant("swap before all seats submitted"))?;
    }

    for (seat, triple) in triples.iter().enumerate() {
        let hand = &mut state.round.hands[seat];
        for card in triple {
            if let Some(pos) = hand.iter().position(|h| h == card) {
                hand.remove(pos);
            } else {
                return Err(DomainError::invariant("exchange card left the hand early"));
            }
        }
    }
    for (seat, triple) in triples.iter().enumerate() {
        for (i, card) in triple.iter().enumerate() {
            let to = seat_offset(seat as Seat, 1 + i as i8);
            state.round.hands[to as usize].push(*card);
        }
    }
    for hand in state.round.hands.iter_mut() {
        hand.sort();
    }
    state.round.exchange = [None; SEATS];

    let holder = (0..SEATS as Seat)
        .find(|&s| state.round.hands[s as usize].contains(&Card::MahJong))
        .ok_or_else(|| DomainError::invariant("Mah Jong missing after exchange"))?;
    state.round.lead = Some(holder);
    state.round.turn = Some(holder);
    state.phase = Phase::Play;
    info!(holder, "exchange complete, play begins");
    Ok(())
}
