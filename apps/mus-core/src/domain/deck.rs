//! The 40-card draw pile.

use rand::Rng;
use tracing::trace;

use crate::domain::cards_types::{full_deck, Card};
use crate::errors::domain::DomainError;

/// Mutable draw pile. Cards are dealt from the end of the vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// A complete, unshuffled deck in canonical order.
    pub fn new() -> Self {
        Self { cards: full_deck() }
    }

    /// Put all 40 cards back in canonical order.
    pub fn reset(&mut self) {
        self.cards = full_deck();
    }

    /// Fisher-Yates shuffle.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for i in (1..self.cards.len()).rev() {
            let j = rng.random_range(0..=i);
            self.cards.swap(i, j);
        }
        trace!(cards = self.cards.len(), "deck shuffled");
    }

    /// Remove and return `n` cards.
    pub fn deal(&mut self, n: usize) -> Result<Vec<Card>, DomainError> {
        if n > self.cards.len() {
            return Err(DomainError::insufficient_cards(n, self.cards.len()));
        }
        let at = self.cards.len() - n;
        let mut dealt = self.cards.split_off(at);
        dealt.reverse();
        Ok(dealt)
    }

    /// Append cards back to the pile (before a reshuffle).
    pub fn return_cards(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.cards.extend(cards);
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}
