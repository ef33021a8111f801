//! State containers and seat math.
//!
//! All references between runtime tables use `Seat` indices; the match
//! owns the round, and every mutation flows through the intent API.

use serde::{Deserialize, Serialize};

use super::cards_types::{Card, Rank};
use super::combination::Combination;
use crate::errors::domain::DomainError;

pub const SEATS: usize = 4;
pub type Seat = u8; // 0..=3
pub type Team = u8; // 0 = seats {0,2}, 1 = seats {1,3}

/// Match ends at the first round boundary where a team has 1000 or more
/// with a strict lead.
pub const WINNING_SCORE: i16 = 1000;

/// Session phases for a match.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum Phase {
    /// Match created, nothing dealt yet.
    Init,
    /// Cards dealt; each seat may declare Grand Tichu until it reveals
    /// its hidden six.
    GrandTichuWindow,
    /// Every seat has revealed; seats assign their three exchange cards.
    Exchange,
    /// Trick play.
    Play,
    /// Round scored; awaiting the next deal.
    RoundEnded,
    /// A team crossed 1000 with a strict lead.
    MatchEnded,
}

/// One play within the current trick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayRecord {
    pub seat: Seat,
    pub cards: Vec<Card>,
    pub combo: Combination,
}

/// Persistent constraint named with a single Mah Jong.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Wish {
    pub rank: Rank,
    /// Stays true until a play containing the wished rank is accepted.
    pub active: bool,
}

/// A Dragon-won trick awaiting its recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragonGift {
    pub giver: Seat,
    pub cards: Vec<Card>,
    pub points: i16,
}

/// Cards a seat has won this round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrickStack {
    pub cards: Vec<Card>,
    pub points: i16,
}

/// Outcome of the most recently scored round, kept for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub team_deltas: [i16; 2],
    pub finish_order: Vec<Seat>,
}

/// Per-deal state. Created at deal, destroyed when the round's deltas
/// fold into the match totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub hands: [Vec<Card>; SEATS],
    /// The six face-down cards per seat, empty once revealed.
    pub hidden: [Vec<Card>; SEATS],
    pub revealed: [bool; SEATS],
    pub grand_tichu: [bool; SEATS],
    pub tichu: [bool; SEATS],
    pub first_card_played: [bool; SEATS],
    /// Exchange workspace: three cards for next, across, previous.
    pub exchange: [Option<[Card; 3]>; SEATS],
    /// Seat that led the current trick.
    pub lead: Option<Seat>,
    /// Seat expected to act; None while a Dragon gift blocks play.
    pub turn: Option<Seat>,
    pub passed: [bool; SEATS],
    /// Finish order so far; prefix-stable within a round.
    pub out: Vec<Seat>,
    pub trick: Vec<PlayRecord>,
    pub wish: Option<Wish>,
    pub dragon_pending: Option<DragonGift>,
    /// Seat that must lead after a Dog and may not pass.
    pub dog_priority: Option<Seat>,
    pub stacks: [TrickStack; SEATS],
}

impl RoundState {
    pub fn empty() -> Self {
        Self {
            hands: Default::default(),
            hidden: Default::default(),
            revealed: [false; SEATS],
            grand_tichu: [false; SEATS],
            tichu: [false; SEATS],
            first_card_played: [false; SEATS],
            exchange: [None; SEATS],
            lead: None,
            turn: None,
            passed: [false; SEATS],
            out: Vec::new(),
            trick: Vec::new(),
            wish: None,
            dragon_pending: None,
            dog_priority: None,
            stacks: Default::default(),
        }
    }

    pub fn hand(&self, seat: Seat) -> &[Card] {
        &self.hands[seat as usize]
    }

    pub fn is_out(&self, seat: Seat) -> bool {
        self.out.contains(&seat)
    }

    /// Seats still holding cards, in seat order.
    pub fn seats_with_cards(&self) -> Vec<Seat> {
        (0..SEATS as Seat)
            .filter(|&s| !self.hands[s as usize].is_empty())
            .collect()
    }

    /// Current highest play of the trick. Every accepted play beats its
    /// predecessor, so the last record is the top.
    pub fn trick_top(&self) -> Option<&PlayRecord> {
        self.trick.last()
    }

    /// Every card the round still tracks: hands, hidden, trick, pending
    /// gift, stacks. Used by conservation checks.
    pub fn card_census(&self) -> Vec<Card> {
        let mut all = Vec::with_capacity(super::dealing::DECK_SIZE);
        for seat in 0..SEATS {
            all.extend(&self.hands[seat]);
            all.extend(&self.hidden[seat]);
            all.extend(&self.stacks[seat].cards);
        }
        for play in &self.trick {
            all.extend(&play.cards);
        }
        if let Some(gift) = &self.dragon_pending {
            all.extend(&gift.cards);
        }
        all
    }
}

/// Entire match container, sufficient for all pure operations and fully
/// serializable for bit-for-bit restart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: Phase,
    /// Rounds dealt so far; 1-based once the first deal happens.
    pub round_no: u8,
    /// Match seed; each round derives its own deal seed from it.
    pub seed: [u8; 32],
    /// Accumulated team scores.
    pub scores: [i16; 2],
    pub winner: Option<Team>,
    pub last_round: Option<RoundOutcome>,
    /// Set after a fatal invariant; the engine then refuses intents.
    pub halted: bool,
    pub round: RoundState,
}

impl GameState {
    pub fn new(seed: [u8; 32]) -> Self {
        Self {
            phase: Phase::Init,
            round_no: 0,
            seed,
            scores: [0, 0],
            winner: None,
            last_round: None,
            halted: false,
            round: RoundState::empty(),
        }
    }

    /// Production constructor: seed drawn from the OS source.
    pub fn with_random_seed() -> Self {
        Self::new(rand::random())
    }
}

/// Seat math (4 fixed seats, clockwise positive).
#[inline]
pub fn seat_offset(seat: Seat, delta: i8) -> Seat {
    let seat_i = seat as i16;
    let delta_i = delta as i16;
    ((seat_i + delta_i).rem_euclid(SEATS as i16)) as Seat
}

#[inline]
pub fn next_seat(seat: Seat) -> Seat {
    seat_offset(seat, 1)
}

/// Partners sit opposite: 0↔2, 1↔3.
#[inline]
pub fn partner(seat: Seat) -> Seat {
    seat_offset(seat, 2)
}

#[inline]
pub fn team_of(seat: Seat) -> Team {
    seat % 2
}

#[inline]
pub fn is_opponent(a: Seat, b: Seat) -> bool {
    team_of(a) != team_of(b)
}

pub fn require_turn(state: &GameState, ctx: &'static str) -> Result<Seat, DomainError> {
    state
        .round
        .turn
        .ok_or_else(|| DomainError::invariant(format!("turn must be set ({ctx})")))
}

pub fn require_lead(state: &GameState, ctx: &'static str) -> Result<Seat, DomainError> {
    state
        .round
        .lead
        .ok_or_else(|| DomainError::invariant(format!("lead must be set ({ctx})")))
}
