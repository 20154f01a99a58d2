//! Envite actions and the per-lance betting sub-machine.
//!
//! Normal turn: starting at mano, each seat may `Paso`, `Envido n` or
//! `Ordago`. A bet hands control to the opposing team through an explicit
//! responder queue in mano order, rebuilt on every bet or counter-raise.
//! The first bet of a lance skips opposing seats that already passed in
//! turn; a counter-raise queues both seats. Only the queue front may act.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::rules::PLAYERS;
use crate::domain::state::{
    distance_from_mano, nth_from, EnviteState, Lance, PlayerId, Team,
};
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnviteAction {
    Paso,
    Envido,
    Ordago,
    Quiero,
    NoQuiero,
}

impl EnviteAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            EnviteAction::Paso => "paso",
            EnviteAction::Envido => "envido",
            EnviteAction::Ordago => "ordago",
            EnviteAction::Quiero => "quiero",
            EnviteAction::NoQuiero => "no_quiero",
        }
    }

    pub const fn is_bet(self) -> bool {
        matches!(self, EnviteAction::Envido | EnviteAction::Ordago)
    }
}

impl fmt::Display for EnviteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnviteAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paso" => Ok(EnviteAction::Paso),
            "envido" => Ok(EnviteAction::Envido),
            "ordago" | "órdago" => Ok(EnviteAction::Ordago),
            "quiero" => Ok(EnviteAction::Quiero),
            "no_quiero" | "no quiero" => Ok(EnviteAction::NoQuiero),
            other => Err(DomainError::invalid_action(format!(
                "accion desconocida: {other}"
            ))),
        }
    }
}

impl EnviteState {
    pub fn new(lance: Lance) -> Self {
        Self {
            lance,
            apuesta: 0,
            equipo_apostador: None,
            ultima_accion: None,
            respuestas: [None; PLAYERS],
            pasaron: Vec::new(),
            turno_index: 0,
            esperando_respuesta: false,
            equipo_debe_responder: None,
            responders: VecDeque::new(),
        }
    }

    /// Seat that holds the turn, or `None` once everybody has spoken.
    pub fn expected_actor(&self, mano: PlayerId) -> Option<PlayerId> {
        if self.esperando_respuesta {
            self.responders.front().copied()
        } else if self.turno_index < PLAYERS as u8 {
            Some(nth_from(mano, self.turno_index))
        } else {
            None
        }
    }

    /// Check that `player` may act now.
    pub fn require_actor(&self, mano: PlayerId, player: PlayerId) -> Result<(), DomainError> {
        let expected = self
            .expected_actor(mano)
            .ok_or_else(|| DomainError::invalid_action("el lance ya no admite acciones"))?;
        if expected != player {
            return Err(DomainError::out_of_turn(expected, player));
        }
        Ok(())
    }

    /// Record an `Envido n` (first raise sets the stake, later ones add to it)
    /// and hand the response to the other team. Returns the new stake.
    pub fn envido(&mut self, player: PlayerId, mano: PlayerId, amount: u8, cap: u8) -> u8 {
        self.apuesta = if self.apuesta == 0 {
            amount
        } else {
            self.apuesta.saturating_add(amount)
        }
        .min(cap);
        self.register_bet(player, mano, EnviteAction::Envido);
        self.apuesta
    }

    /// Record an órdago: the stake becomes the whole game.
    pub fn ordago(&mut self, player: PlayerId, mano: PlayerId, cap: u8) -> u8 {
        self.apuesta = cap;
        self.register_bet(player, mano, EnviteAction::Ordago);
        self.apuesta
    }

    fn register_bet(&mut self, player: PlayerId, mano: PlayerId, action: EnviteAction) {
        let team = Team::of(player);
        let counter_raise = self.equipo_apostador.is_some();
        self.equipo_apostador = Some(team);
        self.ultima_accion = Some(action);
        self.respuestas[player as usize] = Some(action);
        self.pasaron.clear();
        self.esperando_respuesta = true;
        self.equipo_debe_responder = Some(team.opponent());
        self.rebuild_responders(mano, counter_raise);
    }

    /// Seats of the team owing a response, closest to mano first. On the
    /// opening bet a seat that already passed in turn is left out, unless
    /// that would leave nobody to answer.
    fn rebuild_responders(&mut self, mano: PlayerId, counter_raise: bool) {
        self.responders.clear();
        let Some(team) = self.equipo_debe_responder else {
            return;
        };
        let mut seats = team.seats().to_vec();
        seats.sort_by_key(|&s| distance_from_mano(mano, s));
        if !counter_raise {
            let unspoken: Vec<PlayerId> = seats
                .iter()
                .copied()
                .filter(|&s| self.respuestas[s as usize] != Some(EnviteAction::Paso))
                .collect();
            if !unspoken.is_empty() {
                seats = unspoken;
            }
        }
        self.responders.extend(seats);
    }

    /// A pass in normal turn. Returns true when all four seats have spoken.
    pub fn pass_in_turn(&mut self, player: PlayerId) -> bool {
        self.respuestas[player as usize] = Some(EnviteAction::Paso);
        self.pasaron.push(player);
        self.turno_index += 1;
        self.turno_index >= PLAYERS as u8
    }

    /// A responder passes: the obligation moves to the next teammate in the
    /// queue. Returns that teammate, or `None` when the pass must count as
    /// a refusal.
    pub fn pass_as_responder(&mut self, player: PlayerId) -> Option<PlayerId> {
        self.respuestas[player as usize] = Some(EnviteAction::Paso);
        self.pasaron.push(player);
        self.responders.pop_front();
        self.responders.front().copied()
    }

    /// Close the pending bet with an answer.
    pub fn answer(&mut self, player: PlayerId, action: EnviteAction) {
        self.respuestas[player as usize] = Some(action);
        self.esperando_respuesta = false;
        self.responders.clear();
    }

    /// True when the last bet on the table is an órdago.
    pub fn is_ordago(&self) -> bool {
        self.ultima_accion == Some(EnviteAction::Ordago)
    }
}
