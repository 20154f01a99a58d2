//! Heuristic 0–100 strength scores per lance.
//!
//! Scores are deliberately non-linear: the top card dominates Grande and
//! the lowest dominates Chica, a pair of aces scores near the floor, and a
//! 31 scores 100. Pares scores are tiered on the engine's own
//! classification so that duples > medias > pareja > none always holds.

use crate::domain::evaluator::{classify_pares, ParesKind};
use crate::domain::hand::{puntos, tiene_juego};
use crate::domain::rules::JUEGO_ORDER;
use crate::domain::state::Lance;
use crate::domain::Card;

/// Table strength of each juego value, aligned with `JUEGO_ORDER`.
const JUEGO_STRENGTH: [u8; 8] = [100, 85, 70, 55, 45, 35, 25, 15];

fn clamp_score(raw: f64) -> u8 {
    raw.round().clamp(0.0, 100.0) as u8
}

/// Orden values (1..=8) sorted high to low.
fn ordenes_desc(hand: &[Card]) -> [u8; 4] {
    let mut o = [1u8; 4];
    for (slot, card) in o.iter_mut().zip(hand) {
        *slot = card.orden();
    }
    o.sort_unstable_by(|a, b| b.cmp(a));
    o
}

pub fn grande_strength(hand: &[Card]) -> u8 {
    let [first, second, third, fourth] = ordenes_desc(hand);
    let base: i32 = match first {
        8 => {
            70 + match second {
                8 => 20,
                7 => 12,
                6 => 8,
                5 => 5,
                _ => second as i32,
            }
        }
        7 => {
            50 + match second {
                7 => 15,
                6 => 10,
                _ => second as i32,
            }
        }
        6 => 35 + second as i32,
        _ => first as i32 * 4 + second as i32 * 2,
    };
    clamp_score(base as f64 + (third + fourth) as f64 * 0.625)
}

pub fn chica_strength(hand: &[Card]) -> u8 {
    let mut o = ordenes_desc(hand);
    o.reverse();
    let [lowest, second, third, fourth] = o;
    let base: i32 = match lowest {
        1 => {
            70 + match second {
                1 => 30,
                2 => 15,
                3 => 10,
                4 => 5,
                _ => -(second as i32 - 4) * 3,
            }
        }
        2 => {
            45 + match second {
                2 => 15,
                3 => 8,
                _ => -(second as i32 - 3) * 2,
            }
        }
        _ => 30 - (lowest as i32 - 1) * 5,
    };
    clamp_score(base as f64 - (third + fourth - 2) as f64 * 0.625)
}

/// Score of a single pair by its rank on the orden scale.
fn pareja_strength(orden: u8) -> u8 {
    match orden {
        1 => 8, // aces: a trap hand
        2 => 15,
        3 => 20,
        4 => 25,
        5 => 30,
        6 => 35,
        7 => 38,
        _ => 42,
    }
}

pub fn pares_strength(hand: &[Card]) -> u8 {
    let Some(pares) = classify_pares(hand) else {
        return 0;
    };
    let orden = |idx: usize| {
        pares
            .values
            .get(idx)
            .copied()
            .map(crate::domain::cards_types::orden_for_value)
            .unwrap_or(1)
    };
    match pares.kind {
        ParesKind::Pareja => pareja_strength(orden(0)),
        ParesKind::Medias => 50 + orden(0) * 4,
        ParesKind::Duples => {
            let hi = (orden(0) - 1) as f64;
            let lo = (orden(1) - 1) as f64;
            clamp_score(86.0 + 14.0 * (hi * 8.0 + lo) / 63.0)
        }
    }
}

pub fn juego_strength(hand: &[Card]) -> u8 {
    let pts = puntos(hand);
    JUEGO_ORDER
        .iter()
        .position(|&p| p == pts)
        .map(|idx| JUEGO_STRENGTH[idx])
        .unwrap_or(0)
}

pub fn punto_strength(hand: &[Card]) -> u8 {
    let pts = puntos(hand);
    if pts >= 31 {
        return 0;
    }
    clamp_score((pts as f64 - 4.0) / 26.0 * 100.0)
}

pub fn lance_strength(hand: &[Card], lance: Lance) -> u8 {
    match lance {
        Lance::Grande => grande_strength(hand),
        Lance::Chica => chica_strength(hand),
        Lance::Pares => pares_strength(hand),
        Lance::Juego => juego_strength(hand),
        Lance::Punto => punto_strength(hand),
    }
}

/// Whole-hand score used for the mus/cut decision and discard sizing.
/// Pares and juego weigh the most.
pub fn general_strength(hand: &[Card]) -> u8 {
    let grande = grande_strength(hand) as f64;
    let chica = chica_strength(hand) as f64;
    let pares = pares_strength(hand) as f64;
    let juego = tiene_juego(hand);
    let juego_o_punto = if juego {
        juego_strength(hand)
    } else {
        punto_strength(hand)
    } as f64;

    let mut score = grande * 0.15 + chica * 0.15 + pares * 0.40 + juego_o_punto * 0.30;
    if juego {
        score += 8.0;
    }
    if pares > 0.0 {
        score += 5.0;
    }
    clamp_score(score)
}
