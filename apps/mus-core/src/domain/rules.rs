//! Fixed table rules for four-player Mus.

use crate::domain::state::Lance;

pub const PLAYERS: usize = 4;
pub const HAND_SIZE: usize = 4;
pub const DECK_SIZE: usize = 40;

/// Piedras needed to win the game.
pub const PIEDRAS_PARA_GANAR: u8 = 40;

/// First raise amount when the caller does not give one.
pub const ENVIDO_POR_DEFECTO: u8 = 2;

/// Piedra awarded to the betting team when the bet is refused.
pub const DEJE: u8 = 1;

/// Lances in play order. Juego is replaced by Punto when nobody has juego.
pub const LANCE_ORDER: [Lance; 4] = [Lance::Grande, Lance::Chica, Lance::Pares, Lance::Juego];

/// Juego hierarchy from best to worst. 31 beats everything, then 32, then 40.
pub const JUEGO_ORDER: [u8; 8] = [31, 32, 40, 37, 36, 35, 34, 33];

/// Lance after `lance`, or `None` when the round's lances are exhausted.
pub fn next_lance(lance: Lance) -> Option<Lance> {
    match lance {
        Lance::Grande => Some(Lance::Chica),
        Lance::Chica => Some(Lance::Pares),
        Lance::Pares => Some(Lance::Juego),
        Lance::Juego | Lance::Punto => None,
    }
}
