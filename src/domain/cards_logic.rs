//! Card points and hand multiset helpers.

use super::cards_types::{Card, Rank};

/// Card-point value: fives 5, tens and kings 10, Dragon +25, Phoenix −25.
pub fn card_points(card: Card) -> i16 {
    match card {
        Card::Standard { rank: Rank::Five, .. } => 5,
        Card::Standard { rank: Rank::Ten, .. } | Card::Standard { rank: Rank::King, .. } => 10,
        Card::Dragon => 25,
        Card::Phoenix => -25,
        _ => 0,
    }
}

pub fn points_of(cards: &[Card]) -> i16 {
    cards.iter().copied().map(card_points).sum()
}

/// Multiset containment: every requested card is present in the hand and
/// no card is requested twice.
pub fn hand_contains_all(hand: &[Card], cards: &[Card]) -> bool {
    for (i, c) in cards.iter().enumerate() {
        if cards[..i].contains(c) || !hand.contains(c) {
            return false;
        }
    }
    true
}

pub fn hand_has_rank(hand: &[Card], rank: Rank) -> bool {
    hand.iter().any(|c| c.rank() == Some(rank))
}

/// Remove each card once. Callers must have checked containment first.
pub fn remove_cards(hand: &mut Vec<Card>, cards: &[Card]) {
    for c in cards {
        if let Some(pos) = hand.iter().position(|h| h == c) {
            hand.remove(pos);
        }
    }
}
