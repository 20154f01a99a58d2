//! Hand-reading helpers exposed to bot authors and tooling.

use crate::domain::evaluator::{classify_pares, ParesKind};
use crate::domain::strength::lance_strength;
use crate::domain::{hand, Card, Lance};

pub fn tiene_pares(hand: &[Card]) -> bool {
    classify_pares(hand).is_some()
}

pub fn tiene_juego(cards: &[Card]) -> bool {
    hand::tiene_juego(cards)
}

pub fn tipo_pares(hand: &[Card]) -> Option<ParesKind> {
    classify_pares(hand).map(|p| p.kind)
}

pub fn puntos(cards: &[Card]) -> u8 {
    hand::puntos(cards)
}

/// 0–100 strength of `hand` in `lance`.
pub fn evaluar_lance(hand: &[Card], lance: Lance) -> u8 {
    lance_strength(hand, lance)
}
