//! Round-end resolution and match accumulation.

use tracing::info;

use super::cards_logic::points_of;
use super::cards_types::Card;
use super::engine::GameEvent;
use super::state::{
    next_seat, team_of, GameState, Phase, RoundOutcome, Seat, SEATS, WINNING_SCORE,
};
use crate::errors::domain::DomainError;

/// How the round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEndKind {
    /// Three seats out (or all four on the final trick).
    Normal,
    /// The first two finishers were partners; card points are void.
    DoubleVictory,
}

/// Score the finished round, fold the team deltas into the match
/// totals, and move to `RoundEnded` or `MatchEnded`.
pub fn resolve_round_end(
    state: &mut GameState,
    kind: RoundEndKind,
    events: &mut Vec<GameEvent>,
) -> Result<(), DomainError> {
    let mut deltas: [i16; 2] = [0, 0];

    match kind {
        RoundEndKind::DoubleVictory => {
            let first = *state
                .round
                .out
                .first()
                .ok_or_else(|| DomainError::invariant("double victory with no finisher"))?;
            deltas[team_of(first) as usize] += 200;
        }
        RoundEndKind::Normal => {
            resolve_tailender(state)?;
            for seat in 0..SEATS {
                deltas[team_of(seat as Seat) as usize] += state.round.stacks[seat].points;
            }
        }
    }

    // Declarations resolve against the first finisher.
    let first = *state
        .round
        .out
        .first()
        .ok_or_else(|| DomainError::invariant("round ended with no finisher"))?;
    for seat in 0..SEATS as Seat {
        let team = team_of(seat) as usize;
        if state.round.grand_tichu[seat as usize] {
            deltas[team] += if seat == first { 200 } else { -200 };
        }
        if state.round.tichu[seat as usize] {
            deltas[team] += if seat == first { 100 } else { -100 };
        }
    }

    state.scores[0] += deltas[0];
    state.scores[1] += deltas[1];
    let finish_order = state.round.out.clone();
    state.last_round = Some(RoundOutcome {
        team_deltas: deltas,
        finish_order: finish_order.clone(),
    });
    events.push(GameEvent::RoundEnded {
        team_deltas: deltas,
        finish_order,
    });
    info!(
        deltas_a = deltas[0],
        deltas_b = deltas[1],
        total_a = state.scores[0],
        total_b = state.scores[1],
        "round scored"
    );

    // A tie at or above 1000 keeps the match going until a strict lead.
    let [a, b] = state.scores;
    if (a >= WINNING_SCORE || b >= WINNING_SCORE) && a != b {
        let winner = if a > b { 0 } else { 1 };
        state.winner = Some(winner);
        state.phase = Phase::MatchEnded;
        events.push(GameEvent::MatchEnded { winner });
        info!(winner, "match ended");
    } else {
        state.phase = Phase::RoundEnded;
    }
    Ok(())
}

/// Tailender step, when one seat is left holding cards: its hand goes to
/// the opposing team, its trick points to the first finisher.
fn resolve_tailender(state: &mut GameState) -> Result<(), DomainError> {
    let holders = state.round.seats_with_cards();
    let tail = match holders.as_slice() {
        [] => return Ok(()), // nothing left to transfer
        [tail] => *tail,
        _ => return Err(DomainError::invariant("round ended with two seats holding cards")),
    };

    state.round.out.push(tail);

    // Remaining hand cards go to the opposing team's stack.
    let receiver = next_seat(tail);
    let cards: Vec<Card> = state.round.hands[tail as usize].drain(..).collect();
    let hand_points = points_of(&cards);
    let stack = &mut state.round.stacks[receiver as usize];
    stack.points += hand_points;
    stack.cards.extend(cards);

    // Trick-stack points transfer to the first finisher; the cards stay.
    let first = *state
        .round
        .out
        .first()
        .ok_or_else(|| DomainError::invariant("tailender with no first finisher"))?;
    let tail_points = state.round.stacks[tail as usize].points;
    state.round.stacks[tail as usize].points = 0;
    state.round.stacks[first as usize].points += tail_points;
    info!(tail, first, tail_points, hand_points, "tailender resolved");
    Ok(())
}
