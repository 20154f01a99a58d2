//! Public snapshot API for observing game state without exposing internals.

use serde::{Deserialize, Serialize};

use crate::domain::rules::PLAYERS;
use crate::domain::state::{
    EnviteState, GameState, Lance, LanceRecord, Phase, PlayerId, Team, TeamPoints,
};
use crate::domain::Card;

/// Pares/juego announcements known so far this round.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaraciones {
    pub pares: Option<Vec<PlayerId>>,
    pub juego: Option<Vec<PlayerId>>,
}

/// Serializable view of the whole game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub round_no: u32,
    pub phase: Phase,
    pub lance: Option<Lance>,
    pub mano: PlayerId,
    pub postre: PlayerId,
    /// Seat expected to act next.
    pub turn: Option<PlayerId>,
    pub hands: [Vec<Card>; PLAYERS],
    pub piedras: TeamPoints,
    pub piedras_para_ganar: u8,
    pub puntos_pendientes: TeamPoints,
    pub envite: Option<EnviteState>,
    pub ordago_activo: bool,
    pub mus_rounds: u8,
    pub descartes: [Option<u8>; PLAYERS],
    pub declaraciones: Declaraciones,
    pub historial: Vec<LanceRecord>,
    pub winner: Option<Team>,
}

impl GameSnapshot {
    pub fn hand(&self, seat: PlayerId) -> &[Card] {
        self.hands
            .get(seat as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Stake on the table for the current lance (0 when nobody has bet).
    pub fn apuesta(&self) -> u8 {
        self.envite.as_ref().map_or(0, |e| e.apuesta)
    }

    /// True while a bet is pending and `seat` is on the team that owes the answer.
    pub fn must_respond(&self, seat: PlayerId) -> bool {
        self.envite.as_ref().is_some_and(|e| {
            e.esperando_respuesta && e.equipo_debe_responder == Some(Team::of(seat))
        })
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }
}

/// Produce a snapshot of the current game state.
pub fn snapshot(state: &GameState, piedras_para_ganar: u8) -> GameSnapshot {
    GameSnapshot {
        round_no: state.round_no,
        phase: state.phase,
        lance: state.lance,
        mano: state.mano,
        postre: state.postre(),
        turn: state.current_turn(),
        hands: state.hands.clone(),
        piedras: state.piedras,
        piedras_para_ganar,
        puntos_pendientes: state.puntos_pendientes,
        envite: state.envite.clone(),
        ordago_activo: state.ordago_activo,
        mus_rounds: state.mus_rounds,
        descartes: state.descartes,
        declaraciones: Declaraciones {
            pares: state.declaraciones_pares.clone(),
            juego: state.declaraciones_juego.clone(),
        },
        historial: state.historial.clone(),
        winner: state.winner,
    }
}
