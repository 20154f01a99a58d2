use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::envite::EnviteAction;
use crate::domain::rules::PLAYERS;
use crate::domain::Card;

pub type PlayerId = u8; // 0..=3
pub type Seat = u8; // 0..=3, positional alias for PlayerId

/// The two fixed partnerships. Partners sit opposite: seats 0 and 2 form
/// `Equipo1`, seats 1 and 3 form `Equipo2`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Equipo1,
    Equipo2,
}

impl Team {
    pub const fn of(player: PlayerId) -> Team {
        if player % 2 == 0 {
            Team::Equipo1
        } else {
            Team::Equipo2
        }
    }

    pub const fn opponent(self) -> Team {
        match self {
            Team::Equipo1 => Team::Equipo2,
            Team::Equipo2 => Team::Equipo1,
        }
    }

    /// Both seats of this team, lowest first.
    pub const fn seats(self) -> [PlayerId; 2] {
        match self {
            Team::Equipo1 => [0, 2],
            Team::Equipo2 => [1, 3],
        }
    }

    const fn index(self) -> usize {
        match self {
            Team::Equipo1 => 0,
            Team::Equipo2 => 1,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Equipo1 => f.write_str("equipo1"),
            Team::Equipo2 => f.write_str("equipo2"),
        }
    }
}

/// Overall game progression phases.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Engine created but no game started.
    Init,
    /// Players declare mus or cut, in turn from mano.
    Mus,
    /// Everyone asked for mus: each player exchanges 0–4 cards.
    Descarte,
    /// Betting on the current lance.
    Envite,
    /// Transient: a lance is being scored.
    Resolucion,
    /// A team reached the winning score or an órdago was accepted.
    GameOver,
}

/// The betting rounds of a hand.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lance {
    Grande,
    Chica,
    Pares,
    Juego,
    Punto,
}

impl fmt::Display for Lance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Lance::Grande => "grande",
            Lance::Chica => "chica",
            Lance::Pares => "pares",
            Lance::Juego => "juego",
            Lance::Punto => "punto",
        };
        f.write_str(s)
    }
}

/// Per-team counter (piedras, pending points).
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamPoints {
    pub equipo1: u8,
    pub equipo2: u8,
}

impl TeamPoints {
    pub fn get(&self, team: Team) -> u8 {
        [self.equipo1, self.equipo2][team.index()]
    }

    pub fn set(&mut self, team: Team, value: u8) {
        match team {
            Team::Equipo1 => self.equipo1 = value,
            Team::Equipo2 => self.equipo2 = value,
        }
    }

    pub fn add(&mut self, team: Team, value: u8) {
        self.set(team, self.get(team).saturating_add(value));
    }
}

/// Envite state for one lance attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnviteState {
    pub lance: Lance,
    /// Cumulative stake; only grows within a lance.
    pub apuesta: u8,
    /// Team that placed the last raise.
    pub equipo_apostador: Option<Team>,
    pub ultima_accion: Option<EnviteAction>,
    /// Last recorded action per seat.
    pub respuestas: [Option<EnviteAction>; PLAYERS],
    /// Players who passed, in order.
    pub pasaron: Vec<PlayerId>,
    /// Normal-turn pointer relative to mano (0..=4).
    pub turno_index: u8,
    pub esperando_respuesta: bool,
    pub equipo_debe_responder: Option<Team>,
    /// Players still entitled to answer the pending bet; front acts next.
    pub responders: VecDeque<PlayerId>,
}

/// Record of one resolved lance, in resolution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanceRecord {
    pub lance: Lance,
    pub respuestas: [Option<EnviteAction>; PLAYERS],
    pub apuesta_final: u8,
    pub ganador: Option<Team>,
    pub puntos: u8,
    pub razon: Resolution,
}

/// How a lance was settled.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Everyone passed; base value.
    Paso,
    /// Bet accepted.
    Quiero,
    /// Bet refused; the bettor takes the deje.
    NoQuiero,
    /// Órdago accepted; the game ends.
    Ordago,
}

/// Entire game/round container owned by the engine.
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: Phase,
    /// Lance being bet, if any.
    pub lance: Option<Lance>,
    /// 1-based round counter; 0 before the first deal.
    pub round_no: u32,
    pub hands: [Vec<Card>; PLAYERS],
    pub piedras: TeamPoints,
    /// Points won this round, credited at round end.
    pub puntos_pendientes: TeamPoints,
    /// Seat with first-and-tiebreak priority for the round.
    pub mano: PlayerId,
    /// Mus declarations made in the current pass.
    pub mus_turn: u8,
    /// Discards made in the current pass.
    pub descarte_turn: u8,
    /// Cards exchanged per seat in the last discard pass.
    pub descartes: [Option<u8>; PLAYERS],
    /// Mus → Descarte loops completed this round.
    pub mus_rounds: u8,
    pub envite: Option<EnviteState>,
    pub ordago_activo: bool,
    /// Lances resolved so far this round.
    pub historial: Vec<LanceRecord>,
    /// Seats that declared pares this round; `None` until the Pares lance opens.
    pub declaraciones_pares: Option<Vec<PlayerId>>,
    /// Seats that declared juego this round; `None` until announced.
    pub declaraciones_juego: Option<Vec<PlayerId>>,
    pub winner: Option<Team>,
}

impl GameState {
    pub fn new(mano: PlayerId) -> Self {
        Self {
            phase: Phase::Init,
            lance: None,
            round_no: 0,
            hands: Default::default(),
            piedras: TeamPoints::default(),
            puntos_pendientes: TeamPoints::default(),
            mano,
            mus_turn: 0,
            descarte_turn: 0,
            descartes: [None; PLAYERS],
            mus_rounds: 0,
            envite: None,
            ordago_activo: false,
            historial: Vec::new(),
            declaraciones_pares: None,
            declaraciones_juego: None,
            winner: None,
        }
    }

    /// Player expected to act next, if anyone.
    pub fn current_turn(&self) -> Option<PlayerId> {
        match self.phase {
            Phase::Mus if self.mus_turn < 4 => Some(nth_from(self.mano, self.mus_turn)),
            Phase::Descarte if self.descarte_turn < 4 => {
                Some(nth_from(self.mano, self.descarte_turn))
            }
            Phase::Envite => self
                .envite
                .as_ref()
                .and_then(|e| e.expected_actor(self.mano)),
            _ => None,
        }
    }

    pub fn postre(&self) -> PlayerId {
        postre_for(self.mano)
    }
}

/// Seat / turn math helpers (4 fixed seats: 0..=3).
///
/// Turn order is antihorario: seat 0 (player) → 1 (rival2) → 2 (partner)
/// → 3 (rival1) → 0. Positive deltas move in turn order.
#[inline]
pub fn seat_offset(seat: PlayerId, delta: i8) -> PlayerId {
    let seat_i = seat as i16;
    let delta_i = delta as i16;
    ((seat_i + delta_i).rem_euclid(4)) as PlayerId
}

/// Returns the next player in turn order (0 → 1 → 2 → 3 → 0).
#[inline]
pub fn next_player(p: PlayerId) -> PlayerId {
    seat_offset(p, 1)
}

/// Returns the seat `n` steps in turn order from `start`.
#[inline]
pub fn nth_from(start: PlayerId, n: u8) -> PlayerId {
    seat_offset(start, n as i8)
}

/// Seat that speaks last in a round: the one just before mano.
#[inline]
pub fn postre_for(mano: PlayerId) -> PlayerId {
    seat_offset(mano, -1)
}

/// All four seats starting at mano.
pub fn seats_from_mano(mano: PlayerId) -> [PlayerId; PLAYERS] {
    [
        nth_from(mano, 0),
        nth_from(mano, 1),
        nth_from(mano, 2),
        nth_from(mano, 3),
    ]
}

/// Distance from mano in turn order (0 for mano itself).
#[inline]
pub fn distance_from_mano(mano: PlayerId, seat: PlayerId) -> u8 {
    (seat as i16 - mano as i16).rem_euclid(4) as u8
}

/// Display name of a seat.
pub fn seat_name(seat: PlayerId) -> &'static str {
    match seat {
        0 => "player",
        1 => "rival2",
        2 => "partner",
        3 => "rival1",
        _ => "unknown",
    }
}
