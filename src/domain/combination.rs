//! Combination classification and the Tichu partial order.
//!
//! A played card set classifies into exactly one [`Combination`]; bombs
//! win over non-bomb readings of the same cards. Comparison is a total
//! order only inside each comparable class: same tag and, for
//! length-parameterised tags, same length. Bombs dominate all
//! non-bombs; everything else is incomparable.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::cards_types::{Card, Rank};
use crate::errors::domain::{DomainError, RejectKind};

/// Trick value of a single card, in half-rank units so the Phoenix can
/// bind between two ranks. Mah Jong = 2, rank r = 2·r, Dragon = 32.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct SingleValue(pub u8);

impl SingleValue {
    pub const MAH_JONG: SingleValue = SingleValue(2);
    /// Phoenix led fresh: half a step above the Mah Jong.
    pub const PHOENIX_LEAD: SingleValue = SingleValue(3);
    /// Phoenix never reaches the Dragon.
    pub const PHOENIX_CAP: SingleValue = SingleValue(31);
    pub const DRAGON: SingleValue = SingleValue(32);

    pub fn of_rank(rank: Rank) -> SingleValue {
        SingleValue(rank.value() * 2)
    }

    /// Natural value of a card led as a single. The Dog has none.
    pub fn of_card(card: Card) -> Option<SingleValue> {
        match card {
            Card::Standard { rank, .. } => Some(Self::of_rank(rank)),
            Card::MahJong => Some(Self::MAH_JONG),
            Card::Phoenix => Some(Self::PHOENIX_LEAD),
            Card::Dragon => Some(Self::DRAGON),
            Card::Dog => None,
        }
    }

    /// Value the Phoenix binds to when played onto a single of value `top`.
    pub fn phoenix_over(top: SingleValue) -> SingleValue {
        SingleValue((top.0 + 1).min(Self::PHOENIX_CAP.0))
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Bomb {
    FourOfAKind { rank: Rank },
    /// `top` is a rank value 6..=14.
    StraightFlush { length: u8, top: u8 },
}

/// A classified play. Singles carry the value bound at placement time,
/// so later comparisons need no trick context.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Combination {
    Single { value: SingleValue },
    Pair { rank: Rank },
    Triple { rank: Rank },
    /// `count` consecutive pairs; `top` is the highest paired rank.
    PairSequence { count: u8, top: Rank },
    /// Order is decided by the triple alone.
    FullHouse { triple: Rank },
    /// `top` is a straight value over {1 (Mah Jong), 2..=14}.
    Straight { length: u8, top: u8 },
    Bomb(Bomb),
}

impl Combination {
    pub fn is_bomb(&self) -> bool {
        matches!(self, Combination::Bomb(_))
    }
}

fn invalid(detail: &str) -> DomainError {
    DomainError::rejected(RejectKind::InvalidCombination, detail)
}

/// Classify an unordered card set into its strongest combination.
///
/// The Dog forms no combination; the trick engine handles its lone-lead
/// path before calling here.
pub fn classify(cards: &[Card]) -> Result<Combination, DomainError> {
    if cards.iter().any(|c| *c == Card::Dog) {
        return Err(invalid("the Dog must be led alone"));
    }
    match cards.len() {
        0 => Err(invalid("empty play")),
        1 => {
            let value = SingleValue::of_card(cards[0])
                .ok_or_else(|| invalid("the Dog must be led alone"))?;
            Ok(Combination::Single { value })
        }
        2 => try_pair(cards),
        3 => try_triple(cards),
        4 => {
            if let Some(bomb) = try_four_of_a_kind(cards) {
                return Ok(bomb);
            }
            try_pair_sequence(cards)
        }
        5 => {
            if let Some(bomb) = try_straight_flush(cards) {
                return Ok(bomb);
            }
            // A five-card set is a full house or a straight, never both.
            match try_full_house(cards) {
                Ok(combo) => Ok(combo),
                Err(_) => try_straight(cards),
            }
        }
        n => {
            if let Some(bomb) = try_straight_flush(cards) {
                return Ok(bomb);
            }
            if n % 2 == 0 {
                // Duplicated ranks read as consecutive pairs, distinct
                // values as a straight; the two cannot overlap.
                match try_pair_sequence(cards) {
                    Ok(combo) => Ok(combo),
                    Err(_) => try_straight(cards),
                }
            } else {
                try_straight(cards)
            }
        }
    }
}

fn try_pair(cards: &[Card]) -> Result<Combination, DomainError> {
    let ranks: Vec<Rank> = cards.iter().filter_map(|c| c.rank()).collect();
    let phoenix = cards.iter().any(|c| *c == Card::Phoenix);
    match (ranks.as_slice(), phoenix) {
        ([a, b], false) if a == b => Ok(Combination::Pair { rank: *a }),
        ([a], true) => Ok(Combination::Pair { rank: *a }),
        _ => Err(invalid(
            "a pair is two cards of one rank, or one card plus the Phoenix",
        )),
    }
}

fn try_triple(cards: &[Card]) -> Result<Combination, DomainError> {
    let ranks: Vec<Rank> = cards.iter().filter_map(|c| c.rank()).collect();
    let phoenix = cards.iter().any(|c| *c == Card::Phoenix);
    match (ranks.as_slice(), phoenix) {
        ([a, b, c], false) if a == b && b == c => Ok(Combination::Triple { rank: *a }),
        ([a, b], true) if a == b => Ok(Combination::Triple { rank: *a }),
        _ => Err(invalid(
            "a triple is three cards of one rank, or two plus the Phoenix",
        )),
    }
}

fn try_four_of_a_kind(cards: &[Card]) -> Option<Combination> {
    let first = cards.first()?.rank()?;
    if cards.len() == 4 && cards.iter().all(|c| c.rank() == Some(first)) {
        return Some(Combination::Bomb(Bomb::FourOfAKind { rank: first }));
    }
    None
}

fn try_straight_flush(cards: &[Card]) -> Option<Combination> {
    if cards.len() < 5 {
        return None;
    }
    let suit = cards.first()?.suit()?;
    if !cards.iter().all(|c| c.suit() == Some(suit)) {
        return None;
    }
    let mut values: Vec<u8> = cards.iter().filter_map(|c| c.rank()).map(Rank::value).collect();
    values.sort_unstable();
    let consecutive = values.windows(2).all(|w| w[1] == w[0] + 1);
    if !consecutive {
        return None;
    }
    Some(Combination::Bomb(Bomb::StraightFlush {
        length: values.len() as u8,
        top: values[values.len() - 1],
    }))
}

fn try_full_house(cards: &[Card]) -> Result<Combination, DomainError> {
    let mut phoenix = false;
    let mut counts: [u8; 15] = [0; 15];
    for &c in cards {
        match c {
            Card::Phoenix => phoenix = true,
            Card::Standard { rank, .. } => counts[rank.value() as usize] += 1,
            _ => {
                return Err(invalid(
                    "a full house holds standard cards and at most the Phoenix",
                ))
            }
        }
    }
    // Groups sorted by rank ascending; at most two distinct ranks fit in
    // five cards.
    let groups: Vec<(u8, u8)> = (2..=14u8)
        .filter(|&v| counts[v as usize] > 0)
        .map(|v| (v, counts[v as usize]))
        .collect();
    let triple_value = match (groups.as_slice(), phoenix) {
        ([(a, 3), (_, 2)], false) | ([(_, 2), (a, 3)], false) => *a,
        ([(a, 3), (_, 1)], true) | ([(_, 1), (a, 3)], true) => *a,
        // Phoenix completes the higher of two pairs into the triple.
        ([(_, 2), (b, 2)], true) => *b,
        _ => {
            return Err(invalid(
                "a full house is a triple and a pair, with the Phoenix completing either",
            ))
        }
    };
    let triple = Rank::from_value(triple_value)
        .ok_or_else(|| DomainError::invariant("full house rank out of range"))?;
    Ok(Combination::FullHouse { triple })
}

fn try_pair_sequence(cards: &[Card]) -> Result<Combination, DomainError> {
    if cards.len() < 4 || cards.len() % 2 != 0 {
        return Err(invalid("consecutive pairs need an even count of four or more"));
    }
    let mut phoenix = false;
    let mut counts: [u8; 15] = [0; 15];
    for &c in cards {
        match c {
            Card::Phoenix => phoenix = true,
            Card::Standard { rank, .. } => counts[rank.value() as usize] += 1,
            _ => {
                return Err(invalid(
                    "consecutive pairs hold standard cards and at most the Phoenix",
                ))
            }
        }
    }
    let used: Vec<u8> = (2..=14u8).filter(|&v| counts[v as usize] > 0).collect();
    if used.windows(2).any(|w| w[1] != w[0] + 1) {
        return Err(invalid("pairs must be consecutive ranks"));
    }
    let mut singles = 0u8;
    for &v in &used {
        match counts[v as usize] {
            2 => {}
            1 => singles += 1,
            _ => return Err(invalid("no rank may appear three times in consecutive pairs")),
        }
    }
    let complete = if phoenix { singles == 1 } else { singles == 0 };
    if !complete {
        return Err(invalid("the Phoenix may complete exactly one pair"));
    }
    let top_value = used[used.len() - 1];
    let top = Rank::from_value(top_value)
        .ok_or_else(|| DomainError::invariant("pair sequence rank out of range"))?;
    Ok(Combination::PairSequence {
        count: used.len() as u8,
        top,
    })
}

fn try_straight(cards: &[Card]) -> Result<Combination, DomainError> {
    let mut phoenix = false;
    let mut values: Vec<u8> = Vec::with_capacity(cards.len());
    for &c in cards {
        match c {
            Card::Standard { rank, .. } => values.push(rank.value()),
            Card::MahJong => values.push(1),
            Card::Phoenix => phoenix = true,
            _ => return Err(invalid("the Dragon never joins a straight")),
        }
    }
    values.sort_unstable();
    if values.windows(2).any(|w| w[0] == w[1]) {
        return Err(invalid("a straight may not repeat a value"));
    }
    let min = values[0];
    let max = values[values.len() - 1];
    let gaps = (max - min + 1) as usize - values.len();
    let (length, top) = if !phoenix {
        if gaps != 0 {
            return Err(invalid("straight values must be consecutive"));
        }
        (values.len(), max)
    } else {
        match gaps {
            // No gap: the Phoenix extends the top, or the bottom when the
            // Ace is already in place. It never stands above the Ace or
            // below the Two.
            0 if max < 14 => (values.len() + 1, max + 1),
            0 if min > 2 => (values.len() + 1, max),
            0 => return Err(invalid("the Phoenix cannot sit above the Ace")),
            1 => (values.len() + 1, max),
            _ => return Err(invalid("the Phoenix fills at most one missing value")),
        }
    };
    if length < 5 {
        return Err(invalid("a straight needs at least five cards"));
    }
    Ok(Combination::Straight {
        length: length as u8,
        top,
    })
}

/// Partial order over combinations. `None` means incomparable.
pub fn compare(a: &Combination, b: &Combination) -> Option<Ordering> {
    use Combination::*;
    match (a, b) {
        (Bomb(x), Bomb(y)) => Some(compare_bombs(x, y)),
        (Bomb(_), _) => Some(Ordering::Greater),
        (_, Bomb(_)) => Some(Ordering::Less),
        (Single { value: va }, Single { value: vb }) => Some(va.cmp(vb)),
        (Pair { rank: ra }, Pair { rank: rb }) => Some(ra.cmp(rb)),
        (Triple { rank: ra }, Triple { rank: rb }) => Some(ra.cmp(rb)),
        (FullHouse { triple: ta }, FullHouse { triple: tb }) => Some(ta.cmp(tb)),
        (PairSequence { count: ca, top: ta }, PairSequence { count: cb, top: tb }) => {
            (ca == cb).then(|| ta.cmp(tb))
        }
        (Straight { length: la, top: ta }, Straight { length: lb, top: tb }) => {
            (la == lb).then(|| ta.cmp(tb))
        }
        _ => None,
    }
}

fn compare_bombs(a: &Bomb, b: &Bomb) -> Ordering {
    match (a, b) {
        (Bomb::FourOfAKind { rank: ra }, Bomb::FourOfAKind { rank: rb }) => ra.cmp(rb),
        (Bomb::StraightFlush { .. }, Bomb::FourOfAKind { .. }) => Ordering::Greater,
        (Bomb::FourOfAKind { .. }, Bomb::StraightFlush { .. }) => Ordering::Less,
        (
            Bomb::StraightFlush { length: la, top: ta },
            Bomb::StraightFlush { length: lb, top: tb },
        ) => (la, ta).cmp(&(lb, tb)),
    }
}

/// True when `challenger` strictly beats `incumbent`.
pub fn beats(challenger: &Combination, incumbent: &Combination) -> bool {
    compare(challenger, incumbent) == Some(Ordering::Greater)
}
