//! Lance scoring: who wins a lance and how many piedras it is worth.

use crate::domain::evaluator::{best_seat, classify_pares};
use crate::domain::hand::puntos;
use crate::domain::state::{Lance, PlayerId, Team};
use crate::domain::Card;

/// Outcome of scoring one lance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanceOutcome {
    pub seat: PlayerId,
    pub team: Team,
    pub puntos: u8,
}

/// Piedras a lance is worth on its own, independent of any bet.
///
/// Grande, Chica and Punto: 1. Juego: 3 when the winning hand is exactly 31,
/// otherwise 2. Pares: the pares values of both players of the winning team.
pub fn base_value(lance: Lance, hands: &[Vec<Card>], winner: PlayerId) -> u8 {
    match lance {
        Lance::Grande | Lance::Chica | Lance::Punto => 1,
        Lance::Juego => match hands.get(winner as usize).map(|h| puntos(h)) {
            Some(31) => 3,
            _ => 2,
        },
        Lance::Pares => team_pares_points(hands, Team::of(winner)),
    }
}

/// Sum of pares points held by the two players of `team`.
pub fn team_pares_points(hands: &[Vec<Card>], team: Team) -> u8 {
    team.seats()
        .iter()
        .filter_map(|&seat| hands.get(seat as usize))
        .filter_map(|hand| classify_pares(hand))
        .map(|p| p.puntos())
        .sum()
}

/// Score a lance nobody bet on.
pub fn score_all_pass(lance: Lance, hands: &[Vec<Card>], mano: PlayerId) -> Option<LanceOutcome> {
    let seat = best_seat(lance, hands, mano)?;
    Some(LanceOutcome {
        seat,
        team: Team::of(seat),
        puntos: base_value(lance, hands, seat),
    })
}

/// Score an accepted bet of `apuesta`.
///
/// Grande and Chica pay the stake. Pares, Juego and Punto pay the stake plus
/// the lance's own value for the winning team.
pub fn score_accepted(
    lance: Lance,
    hands: &[Vec<Card>],
    mano: PlayerId,
    apuesta: u8,
) -> Option<LanceOutcome> {
    let seat = best_seat(lance, hands, mano)?;
    let extra = match lance {
        Lance::Grande | Lance::Chica => 0,
        Lance::Pares | Lance::Juego | Lance::Punto => base_value(lance, hands, seat),
    };
    Some(LanceOutcome {
        seat,
        team: Team::of(seat),
        puntos: apuesta.saturating_add(extra),
    })
}
