//! Card parsing from short tokens (e.g., "12O", "3C", "1E", "7B")

use std::fmt;
use std::str::FromStr;

use super::cards_types::{Card, Rank, Suit};
use crate::errors::domain::DomainError;

impl Suit {
    pub const fn letter(self) -> char {
        match self {
            Suit::Oros => 'O',
            Suit::Copas => 'C',
            Suit::Espadas => 'E',
            Suit::Bastos => 'B',
        }
    }

    pub fn from_letter(ch: char) -> Option<Suit> {
        Suit::ALL.into_iter().find(|s| s.letter() == ch)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.number(), self.suit.letter())
    }
}

impl FromStr for Card {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let suit_ch = s
            .chars()
            .last()
            .ok_or_else(|| DomainError::parse_card(s))?;
        let suit = Suit::from_letter(suit_ch.to_ascii_uppercase())
            .ok_or_else(|| DomainError::parse_card(s))?;
        let number: u8 = s[..s.len() - suit_ch.len_utf8()]
            .parse()
            .map_err(|_| DomainError::parse_card(s))?;
        let rank = Rank::from_number(number).ok_or_else(|| DomainError::parse_card(s))?;
        Ok(Card { suit, rank })
    }
}

/// Non-panicking helper to parse card tokens into Card instances.
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

/// Parse a whitespace-separated hand, e.g. `"12O 12C 3E 1B"`.
pub fn parse_hand(hand: &str) -> Result<Vec<Card>, DomainError> {
    try_parse_cards(hand.split_whitespace())
}
