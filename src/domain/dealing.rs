//! Deterministic deck construction and the two-phase deal.

use super::cards_types::{Card, Rank, Suit};
use super::state::SEATS;

pub const DECK_SIZE: usize = 56;
/// Cards dealt face-up per seat before the Grand Tichu window closes.
pub const VISIBLE_DEAL: usize = 8;
/// Cards dealt face-down per seat, revealed when the window closes.
pub const HIDDEN_DEAL: usize = 6;

/// The canonical 56-card deck: one of each standard card plus the four
/// specials.
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for suit in Suit::ALL {
        for rank in Rank::ALL {
            deck.push(Card::Standard { suit, rank });
        }
    }
    deck.extend([Card::MahJong, Card::Dog, Card::Phoenix, Card::Dragon]);
    deck
}

/// Deterministic RNG for shuffling.
///
/// SplitMix64: well-distributed, fast, and reproducible given a seed.
struct DealRng {
    state: u64,
}

impl DealRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E3779B97F4A7C15);
        let mut z = self.state;
        z ^= z >> 30;
        z = z.wrapping_mul(0xBF58476D1CE4E5B9);
        z ^= z >> 27;
        z = z.wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }

    fn next_range(&mut self, max: usize) -> usize {
        let m = max as u64;
        // Rejection sampling over the largest multiple of m avoids
        // modulo bias.
        let limit = u64::MAX - (u64::MAX % m);
        loop {
            let x = self.next();
            if x < limit {
                return (x % m) as usize;
            }
        }
    }
}

/// Fisher-Yates shuffle using the deterministic RNG.
fn shuffle_with_seed(deck: &mut [Card], seed: u64) {
    let mut rng = DealRng::new(seed);
    for i in (1..deck.len()).rev() {
        let j = rng.next_range(i + 1);
        deck.swap(i, j);
    }
}

/// One dealt round: eight visible and six hidden cards per seat.
#[derive(Debug, Clone)]
pub struct Deal {
    pub visible: [Vec<Card>; SEATS],
    pub hidden: [Vec<Card>; SEATS],
}

/// Deal a round deterministically: shuffle, then eight cards to each
/// seat round-robin, then six more round-robin. Hands come out sorted
/// for stable display.
pub fn deal_round(seed: u64) -> Deal {
    let mut deck = full_deck();
    shuffle_with_seed(&mut deck, seed);

    let mut visible: [Vec<Card>; SEATS] = Default::default();
    let mut hidden: [Vec<Card>; SEATS] = Default::default();
    for (i, card) in deck.into_iter().enumerate() {
        let seat = i % SEATS;
        if i < SEATS * VISIBLE_DEAL {
            visible[seat].push(card);
        } else {
            hidden[seat].push(card);
        }
    }
    for hand in visible.iter_mut().chain(hidden.iter_mut()) {
        hand.sort();
    }
    Deal { visible, hidden }
}
