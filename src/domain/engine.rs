//! Intent dispatch: the single entry point embedders call.
//!
//! `apply` validates the intent against the current state, mutates on
//! acceptance, and returns the domain events the transition produced.
//! A rejected intent returns an error and changes nothing.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::cards_types::{Card, Rank};
use super::dealing::deal_round;
use super::seed_derivation::derive_deal_seed;
use super::state::{GameState, Phase, RoundState, Seat, Team, SEATS};
use super::{declarations, exchange, tricks};
use crate::errors::domain::{DomainError, RejectKind};

/// Everything a session can ask of the engine. Seat intents carry the
/// originating seat; `BeginRound` is administrative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", content = "data")]
pub enum Intent {
    BeginRound,
    DeclareGrandTichu { seat: Seat },
    RevealHidden { seat: Seat },
    SubmitExchange { seat: Seat, cards: [Card; 3] },
    DeclareTichu { seat: Seat },
    Play { seat: Seat, cards: Vec<Card>, wish_rank: Option<Rank> },
    Pass { seat: Seat },
    SelectDragonRecipient { seat: Seat, opponent: Seat },
}

/// Domain events emitted by accepted intents. Embedders broadcast these
/// alongside refreshed per-seat views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum GameEvent {
    WishSet { rank: Rank },
    WishCleared,
    TrickWon { winner: Seat },
    DragonGiftPending { giver: Seat },
    SeatFinished { seat: Seat },
    RoundEnded { team_deltas: [i16; 2], finish_order: Vec<Seat> },
    MatchEnded { winner: Team },
}

/// Apply one intent. Accepted intents mutate `state` and return events;
/// rejected intents leave it untouched. After a fatal invariant the
/// engine refuses everything.
pub fn apply(state: &mut GameState, intent: Intent) -> Result<Vec<GameEvent>, DomainError> {
    if state.halted {
        return Err(DomainError::invariant(
            "engine halted after an internal inconsistency",
        ));
    }
    let result = dispatch(state, intent);
    if let Err(e) = &result {
        if e.is_fatal() {
            state.halted = true;
        }
    }
    result
}

fn dispatch(state: &mut GameState, intent: Intent) -> Result<Vec<GameEvent>, DomainError> {
    match intent {
        Intent::BeginRound => begin_round(state),
        Intent::DeclareGrandTichu { seat } => {
            require_seat(seat)?;
            declarations::declare_grand_tichu(state, seat)
        }
        Intent::RevealHidden { seat } => {
            require_seat(seat)?;
            declarations::reveal_hidden(state, seat)
        }
        Intent::SubmitExchange { seat, cards } => {
            require_seat(seat)?;
            exchange::submit_exchange(state, seat, cards)
        }
        Intent::DeclareTichu { seat } => {
            require_seat(seat)?;
            declarations::declare_tichu(state, seat)
        }
        Intent::Play { seat, cards, wish_rank } => {
            require_seat(seat)?;
            tricks::play(state, seat, &cards, wish_rank)
        }
        Intent::Pass { seat } => {
            require_seat(seat)?;
            tricks::pass(state, seat)
        }
        Intent::SelectDragonRecipient { seat, opponent } => {
            require_seat(seat)?;
            tricks::select_dragon_recipient(state, seat, opponent)
        }
    }
}

/// Deal the next round: derive the round's shuffle seed, deal eight
/// visible and six hidden cards per seat, open the Grand Tichu window.
pub fn begin_round(state: &mut GameState) -> Result<Vec<GameEvent>, DomainError> {
    match state.phase {
        Phase::Init | Phase::RoundEnded => {}
        _ => {
            return Err(DomainError::rejected(
                RejectKind::WrongPhase,
                "a round is already in progress",
            ))
        }
    }
    state.round_no += 1;
    let seed = derive_deal_seed(&state.seed, state.round_no);
    let deal = deal_round(seed);
    let mut round = RoundState::empty();
    round.hands = deal.visible;
    round.hidden = deal.hidden;
    state.round = round;
    state.phase = Phase::GrandTichuWindow;
    info!(round_no = state.round_no, "round dealt");
    Ok(Vec::new())
}

fn require_seat(seat: Seat) -> Result<(), DomainError> {
    if (seat as usize) < SEATS {
        Ok(())
    } else {
        Err(DomainError::rejected(
            RejectKind::NoSuchSeat,
            format!("seat {seat} is not at the table"),
        ))
    }
}
