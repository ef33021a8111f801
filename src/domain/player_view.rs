//! Per-seat views: what one seat may see of the game.
//!
//! A view carries the viewer's own hand and only card counts for the
//! other seats. The current trick, the active wish, a pending Dragon
//! gift, and all score totals are public.

use serde::{Deserialize, Serialize};

use super::cards_types::Card;
use super::state::{
    DragonGift, GameState, Phase, PlayRecord, RoundOutcome, Seat, Team, Wish, SEATS,
};
use super::tricks;

/// Information visible to one seat at a decision point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatView {
    pub seat: Seat,
    pub phase: Phase,
    pub round_no: u8,
    /// The viewer's own cards.
    pub hand: Vec<Card>,
    /// Unrevealed cards still face-down in front of the viewer.
    pub hidden_count: u8,
    /// Card counts for every seat, the viewer included.
    pub hand_counts: [u8; SEATS],
    pub revealed: [bool; SEATS],
    pub grand_tichu: [bool; SEATS],
    pub tichu: [bool; SEATS],
    pub exchange_submitted: [bool; SEATS],
    pub trick: Vec<PlayRecord>,
    pub lead: Option<Seat>,
    pub turn: Option<Seat>,
    pub wish: Option<Wish>,
    pub dragon_pending: Option<DragonGift>,
    pub dog_priority: Option<Seat>,
    pub finish_order: Vec<Seat>,
    pub stack_points: [i16; SEATS],
    pub scores: [i16; 2],
    pub winner: Option<Team>,
    pub last_round: Option<RoundOutcome>,
    /// Whether the viewer could legally pass right now.
    pub may_pass: bool,
}

/// Build the view for one seat.
pub fn view_for(state: &GameState, seat: Seat) -> SeatView {
    let idx = seat as usize;
    let mut hand_counts = [0u8; SEATS];
    let mut stack_points = [0i16; SEATS];
    for s in 0..SEATS {
        // Counts include unrevealed cards so every seat shows fourteen
        // before the window closes.
        hand_counts[s] = (state.round.hands[s].len() + state.round.hidden[s].len()) as u8;
        stack_points[s] = state.round.stacks[s].points;
    }
    let exchange_submitted = [
        state.round.exchange[0].is_some(),
        state.round.exchange[1].is_some(),
        state.round.exchange[2].is_some(),
        state.round.exchange[3].is_some(),
    ];

    SeatView {
        seat,
        phase: state.phase,
        round_no: state.round_no,
        hand: state.round.hands[idx].clone(),
        hidden_count: state.round.hidden[idx].len() as u8,
        hand_counts,
        revealed: state.round.revealed,
        grand_tichu: state.round.grand_tichu,
        tichu: state.round.tichu,
        exchange_submitted,
        trick: state.round.trick.clone(),
        lead: state.round.lead,
        turn: state.round.turn,
        wish: state.round.wish,
        dragon_pending: state.round.dragon_pending.clone(),
        dog_priority: state.round.dog_priority,
        finish_order: state.round.out.clone(),
        stack_points,
        scores: state.scores,
        winner: state.winner,
        last_round: state.last_round.clone(),
        may_pass: tricks::may_pass(state, seat),
    }
}

/// Views for all four seats, in seat order.
pub fn views(state: &GameState) -> [SeatView; SEATS] {
    [
        view_for(state, 0),
        view_for(state, 1),
        view_for(state, 2),
        view_for(state, 3),
    ]
}
