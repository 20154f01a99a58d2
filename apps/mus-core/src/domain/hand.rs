//! Derived views over a 4-card hand.

use std::collections::BTreeMap;

use crate::domain::Card;

/// Comparison values sorted high to low (Grande view).
pub fn grande_values(hand: &[Card]) -> Vec<u8> {
    let mut values: Vec<u8> = hand.iter().map(|c| c.comparison_value()).collect();
    values.sort_unstable_by(|a, b| b.cmp(a));
    values
}

/// Comparison values sorted low to high (Chica view).
pub fn chica_values(hand: &[Card]) -> Vec<u8> {
    let mut values: Vec<u8> = hand.iter().map(|c| c.comparison_value()).collect();
    values.sort_unstable();
    values
}

/// Count of cards per comparison value (3 counts as Rey, 2 as As).
pub fn rank_groups(hand: &[Card]) -> BTreeMap<u8, u8> {
    let mut groups = BTreeMap::new();
    for card in hand {
        *groups.entry(card.comparison_value()).or_insert(0) += 1;
    }
    groups
}

/// True when the card shares its normalized rank with another card in the hand.
pub fn is_paired(hand: &[Card], card: Card) -> bool {
    let value = card.comparison_value();
    hand.iter().filter(|c| c.comparison_value() == value).count() >= 2
}

/// Sum of point values used by Juego and Punto.
pub fn puntos(hand: &[Card]) -> u8 {
    hand.iter().map(|c| c.point_value()).sum()
}

pub fn tiene_juego(hand: &[Card]) -> bool {
    puntos(hand) >= 31
}
