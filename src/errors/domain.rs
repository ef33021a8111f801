//! Domain-level error type for the rule engine.
//!
//! Every fallible operation returns `Result<_, DomainError>`. A
//! `Rejected` error means the intent was refused and state is unchanged;
//! an `Invariant` error means the engine detected an internal
//! inconsistency and the session should be halted.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Rejection kinds. Each variant names one guard an intent can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum RejectKind {
    /// Intent not valid in the current phase.
    WrongPhase,
    /// Turn guard failed for a non-bomb play or a pass.
    NotYourTurn,
    /// Seat index outside 0..=3.
    NoSuchSeat,
    /// Played cards are not a sub-multiset of the seat's hand.
    CardsNotInHand,
    /// Malformed card token.
    ParseCard,
    /// The card set forms no combination; detail carries the subreason.
    InvalidCombination,
    /// Comparable but not strictly greater, or incomparable with the top.
    DoesNotBeatCurrent,
    /// Bomb attempted during the Dog's lead-transfer window.
    BombForbiddenDogInTrick,
    /// The priority seat attempted to pass.
    MustLead,
    /// The seat holds the wished rank and tried to dodge the wish.
    WishUnfulfilled,
    /// The Mah Jong holder's first play must include it.
    MahJongMustBePlayedFirst,
    /// Play is blocked until the Dragon's trick is gifted.
    DragonMustChooseOpponent,
    /// The Dragon's trick may only be gifted to an opponent.
    DragonRecipientMustBeOpponent,
    /// Bad exchange submission: duplicates, foreign card, or resubmission.
    ExchangeBad,
    /// Grand Tichu declared or hidden six revealed outside the window.
    GrandTichuOutOfWindow,
    /// Tichu declared outside the window.
    TichuOutOfWindow,
}

impl RejectKind {
    /// Canonical SCREAMING_SNAKE_CASE code, stable for embedders.
    pub fn code(self) -> &'static str {
        match self {
            RejectKind::WrongPhase => "WRONG_PHASE",
            RejectKind::NotYourTurn => "NOT_YOUR_TURN",
            RejectKind::NoSuchSeat => "NO_SUCH_SEAT",
            RejectKind::CardsNotInHand => "CARDS_NOT_IN_HAND",
            RejectKind::ParseCard => "PARSE_CARD",
            RejectKind::InvalidCombination => "INVALID_COMBINATION",
            RejectKind::DoesNotBeatCurrent => "DOES_NOT_BEAT_CURRENT",
            RejectKind::BombForbiddenDogInTrick => "BOMB_FORBIDDEN_DOG_IN_TRICK",
            RejectKind::MustLead => "MUST_LEAD",
            RejectKind::WishUnfulfilled => "WISH_UNFULFILLED",
            RejectKind::MahJongMustBePlayedFirst => "MAH_JONG_MUST_BE_PLAYED_FIRST",
            RejectKind::DragonMustChooseOpponent => "DRAGON_MUST_CHOOSE_OPPONENT",
            RejectKind::DragonRecipientMustBeOpponent => "DRAGON_RECIPIENT_MUST_BE_OPPONENT",
            RejectKind::ExchangeBad => "EXCHANGE_BAD",
            RejectKind::GrandTichuOutOfWindow => "GRAND_TICHU_OUT_OF_WINDOW",
            RejectKind::TichuOutOfWindow => "TICHU_OUT_OF_WINDOW",
        }
    }
}

/// Central domain error type.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Intent refused; no state was mutated.
    Rejected(RejectKind, String),
    /// Internal inconsistency; the engine refuses further intents.
    Invariant(String),
}

impl DomainError {
    pub fn rejected(kind: RejectKind, detail: impl Into<String>) -> Self {
        Self::Rejected(kind, detail.into())
    }

    pub fn invariant(detail: impl Into<String>) -> Self {
        Self::Invariant(detail.into())
    }

    /// Rejection kind, if this is an ordinary rejection.
    pub fn kind(&self) -> Option<RejectKind> {
        match self {
            DomainError::Rejected(kind, _) => Some(*kind),
            DomainError::Invariant(_) => None,
        }
    }

    /// True for errors after which the session must halt.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DomainError::Invariant(_))
    }
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Rejected(kind, d) => write!(f, "rejected {}: {d}", kind.code()),
            DomainError::Invariant(d) => write!(f, "engine invariant violated: {d}"),
        }
    }
}

impl Error for DomainError {}
