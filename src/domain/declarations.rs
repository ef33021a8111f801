//! Declaration windows: Grand Tichu before the hidden six, Tichu before
//! the seat's first card. Both are terminal decisions.

use tracing::info;

use super::engine::GameEvent;
use super::state::{GameState, Phase, Seat};
use crate::errors::domain::{DomainError, RejectKind};

/// Declare Grand Tichu. Reveals the seat's hidden six as a side effect.
pub fn declare_grand_tichu(state: &mut GameState, seat: Seat) -> Result<Vec<GameEvent>, DomainError> {
    guard_window(state, seat)?;
    info!(seat, "grand tichu declared");
    state.round.grand_tichu[seat as usize] = true;
    reveal(state, seat);
    Ok(Vec::new())
}

/// Reveal the hidden six without declaring.
pub fn reveal_hidden(state: &mut GameState, seat: Seat) -> Result<Vec<GameEvent>, DomainError> {
    guard_window(state, seat)?;
    reveal(state, seat);
    Ok(Vec::new())
}

/// Declare Tichu: play phase, before this seat's first card, and not on
/// top of a Grand Tichu.
pub fn declare_tichu(state: &mut GameState, seat: Seat) -> Result<Vec<GameEvent>, DomainError> {
    if state.phase != Phase::Play {
        return Err(DomainError::rejected(
            RejectKind::TichuOutOfWindow,
            "Tichu is declared during play",
        ));
    }
    let idx = seat as usize;
    if state.round.first_card_played[idx] {
        return Err(DomainError::rejected(
            RejectKind::TichuOutOfWindow,
            "first card already played",
        ));
    }
    if state.round.tichu[idx] || state.round.grand_tichu[idx] {
        return Err(DomainError::rejected(
            RejectKind::TichuOutOfWindow,
            "a declaration already stands",
        ));
    }
    info!(seat, "tichu declared");
    state.round.tichu[idx] = true;
    Ok(Vec::new())
}

fn guard_window(state: &GameState, seat: Seat) -> Result<(), DomainError> {
    if state.phase != Phase::GrandTichuWindow {
        return Err(DomainError::rejected(
            RejectKind::GrandTichuOutOfWindow,
            "no Grand Tichu window open",
        ));
    }
    if state.round.revealed[seat as usize] {
        return Err(DomainError::rejected(
            RejectKind::GrandTichuOutOfWindow,
            "hidden six already revealed",
        ));
    }
    Ok(())
}

fn reveal(state: &mut GameState, seat: Seat) {
    let idx = seat as usize;
    let hidden: Vec<_> = state.round.hidden[idx].drain(..).collect();
    state.round.hands[idx].extend(hidden);
    state.round.hands[idx].sort();
    state.round.revealed[idx] = true;
    if state.round.revealed.iter().all(|&r| r) {
        state.phase = Phase::Exchange;
        info!("all seats revealed, exchange begins");
    }
}
