//! Card parsing and display for compact tokens (e.g. "AS", "2C", "PH").

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use super::cards_types::{Card, Rank, Suit};
use crate::errors::domain::{DomainError, RejectKind};

fn parse_error(s: &str) -> DomainError {
    DomainError::rejected(RejectKind::ParseCard, format!("parse card: {s}"))
}

impl FromStr for Card {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MA" => return Ok(Card::MahJong),
            "DO" => return Ok(Card::Dog),
            "PH" => return Ok(Card::Phoenix),
            "DR" => return Ok(Card::Dragon),
            _ => {}
        }
        if s.len() != 2 {
            return Err(parse_error(s));
        }
        let mut chars = s.chars();
        let rank_ch = chars.next().ok_or_else(|| parse_error(s))?;
        let suit_ch = chars.next().ok_or_else(|| parse_error(s))?;
        let rank = match rank_ch {
            '2' => Rank::Two,
            '3' => Rank::Three,
            '4' => Rank::Four,
            '5' => Rank::Five,
            '6' => Rank::Six,
            '7' => Rank::Seven,
            '8' => Rank::Eight,
            '9' => Rank::Nine,
            'T' => Rank::Ten,
            'J' => Rank::Jack,
            'Q' => Rank::Queen,
            'K' => Rank::King,
            'A' => Rank::Ace,
            _ => return Err(parse_error(s)),
        };
        let suit = match suit_ch {
            'C' => Suit::Clubs,
            'D' => Suit::Diamonds,
            'H' => Suit::Hearts,
            'S' => Suit::Spades,
            _ => return Err(parse_error(s)),
        };
        Ok(Card::Standard { suit, rank })
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Card::MahJong => write!(f, "MA"),
            Card::Dog => write!(f, "DO"),
            Card::Phoenix => write!(f, "PH"),
            Card::Dragon => write!(f, "DR"),
            Card::Standard { suit, rank } => {
                let rank_ch = match rank {
                    Rank::Two => '2',
                    Rank::Three => '3',
                    Rank::Four => '4',
                    Rank::Five => '5',
                    Rank::Six => '6',
                    Rank::Seven => '7',
                    Rank::Eight => '8',
                    Rank::Nine => '9',
                    Rank::Ten => 'T',
                    Rank::Jack => 'J',
                    Rank::Queen => 'Q',
                    Rank::King => 'K',
                    Rank::Ace => 'A',
                };
                let suit_ch = match suit {
                    Suit::Clubs => 'C',
                    Suit::Diamonds => 'D',
                    Suit::Hearts => 'H',
                    Suit::Spades => 'S',
                };
                write!(f, "{rank_ch}{suit_ch}")
            }
        }
    }
}

/// Parse a slice of card tokens. Fails on the first invalid token.
pub fn try_parse_cards<I, S>(tokens: I) -> Result<Vec<Card>, DomainError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|s| s.as_ref().parse::<Card>())
        .collect()
}
