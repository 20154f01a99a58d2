//! Hand evaluator: lance-specific classification and comparison.
//!
//! These are the rules the engine scores with. The bots read the same
//! classifications (see [`crate::domain::strength`]), so both sides agree on
//! which hand is best.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::domain::hand::{chica_values, grande_values, puntos, rank_groups};
use crate::domain::rules::JUEGO_ORDER;
use crate::domain::state::{seats_from_mano, Lance, PlayerId};
use crate::domain::Card;

/// Grande: higher cards win, compared position by position.
pub fn compare_grande(a: &[Card], b: &[Card]) -> Ordering {
    grande_values(a).cmp(&grande_values(b))
}

/// Chica: lower cards win. `Greater` means `a` is the better chica.
pub fn compare_chica(a: &[Card], b: &[Card]) -> Ordering {
    chica_values(b).cmp(&chica_values(a))
}

/// Pares tiers, weakest first.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParesKind {
    /// One pair.
    Pareja,
    /// Three of a kind.
    Medias,
    /// Four of a kind, or two distinct pairs.
    Duples,
}

impl ParesKind {
    /// Piedras a player's pares are worth when the lance is scored.
    pub const fn puntos(self) -> u8 {
        match self {
            ParesKind::Pareja => 1,
            ParesKind::Medias => 2,
            ParesKind::Duples => 3,
        }
    }
}

/// Classified pares of a hand. `values` are comparison values, highest
/// first: `[v]` for pareja and medias, `[hi, lo]` for duples (`[v, v]` when
/// all four cards match).
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Pares {
    pub kind: ParesKind,
    pub values: Vec<u8>,
}

impl Pares {
    pub const fn puntos(&self) -> u8 {
        self.kind.puntos()
    }
}

impl Ord for Pares {
    fn cmp(&self, other: &Self) -> Ordering {
        self.kind
            .cmp(&other.kind)
            .then_with(|| self.values.cmp(&other.values))
    }
}

impl PartialOrd for Pares {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Classify the pares of a hand; `None` when no two cards share a rank.
pub fn classify_pares(hand: &[Card]) -> Option<Pares> {
    let groups = rank_groups(hand);
    let mut pairs: Vec<(u8, u8)> = groups
        .into_iter()
        .filter(|&(_, n)| n >= 2)
        .collect();
    if pairs.is_empty() {
        return None;
    }
    // Highest rank first.
    pairs.sort_unstable_by(|a, b| b.0.cmp(&a.0));

    if let Some(&(v, _)) = pairs.iter().find(|&&(_, n)| n >= 4) {
        return Some(Pares {
            kind: ParesKind::Duples,
            values: vec![v, v],
        });
    }
    if let Some(&(v, _)) = pairs.iter().find(|&&(_, n)| n == 3) {
        return Some(Pares {
            kind: ParesKind::Medias,
            values: vec![v],
        });
    }
    if pairs.len() >= 2 {
        return Some(Pares {
            kind: ParesKind::Duples,
            values: vec![pairs[0].0, pairs[1].0],
        });
    }
    Some(Pares {
        kind: ParesKind::Pareja,
        values: vec![pairs[0].0],
    })
}

/// Pares comparison where having any pares beats having none.
pub fn compare_pares(a: &[Card], b: &[Card]) -> Ordering {
    classify_pares(a).cmp(&classify_pares(b))
}

/// Position in the juego hierarchy (higher is better); `None` without juego.
pub fn juego_rank(puntos: u8) -> Option<u8> {
    JUEGO_ORDER
        .iter()
        .position(|&p| p == puntos)
        .map(|idx| (JUEGO_ORDER.len() - idx) as u8)
}

/// Juego comparison: 31 > 32 > 40 > 37 > … > 33 > no juego.
pub fn compare_juego(a: &[Card], b: &[Card]) -> Ordering {
    juego_rank(puntos(a)).cmp(&juego_rank(puntos(b)))
}

/// Punto comparison: plain sum, higher wins.
pub fn compare_punto(a: &[Card], b: &[Card]) -> Ordering {
    puntos(a).cmp(&puntos(b))
}

/// Comparator for a lance. `Greater` means the first hand wins.
pub fn compare_for(lance: Lance, a: &[Card], b: &[Card]) -> Ordering {
    match lance {
        Lance::Grande => compare_grande(a, b),
        Lance::Chica => compare_chica(a, b),
        Lance::Pares => compare_pares(a, b),
        Lance::Juego => compare_juego(a, b),
        Lance::Punto => compare_punto(a, b),
    }
}

/// Whether a hand takes part in the lance at all.
pub fn participates(lance: Lance, hand: &[Card]) -> bool {
    match lance {
        Lance::Pares => classify_pares(hand).is_some(),
        Lance::Juego => juego_rank(puntos(hand)).is_some(),
        _ => true,
    }
}

/// Best seat for a lance. Seats are scanned from mano and only a strictly
/// better hand takes the lead, so ties go to the seat closest to mano.
/// Returns `None` when no seat participates.
pub fn best_seat(lance: Lance, hands: &[Vec<Card>], mano: PlayerId) -> Option<PlayerId> {
    let mut best: Option<PlayerId> = None;
    for seat in seats_from_mano(mano) {
        let Some(hand) = hands.get(seat as usize) else {
            continue;
        };
        if !participates(lance, hand) {
            continue;
        }
        best = match best {
            None => Some(seat),
            Some(current) => {
                if compare_for(lance, hand, &hands[current as usize]) == Ordering::Greater {
                    Some(seat)
                } else {
                    Some(current)
                }
            }
        };
    }
    best
}
