//! Public game context handed to the decision engine.
//!
//! Every field defaults to a neutral value, so a bot can be consulted with
//! `EnviteContext::default()` and only the signals that are known filled in.
//! [`EnviteContext::for_seat`] derives all of them from an engine snapshot.

use serde::{Deserialize, Serialize};

use crate::domain::rules::{PIEDRAS_PARA_GANAR, PLAYERS};
use crate::domain::snapshot::GameSnapshot;
use crate::domain::state::{distance_from_mano, seat_offset, LanceRecord};
use crate::domain::{EnviteAction, PlayerId, Team};

/// Seat position relative to mano for the current round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Posicion {
    #[default]
    Mano,
    Segundo,
    Tercero,
    Postre,
}

impl Posicion {
    pub fn from_distance(distance: u8) -> Self {
        match distance {
            0 => Posicion::Mano,
            1 => Posicion::Segundo,
            2 => Posicion::Tercero,
            _ => Posicion::Postre,
        }
    }

    pub fn is_mano(self) -> bool {
        self == Posicion::Mano
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnviteContext {
    pub marcador_propio: u8,
    pub marcador_rival: u8,
    pub piedras_para_ganar: u8,
    pub ordago_activo: bool,
    pub posicion: Posicion,
    /// Partner already bet in this lance.
    pub pareja_ya_envido: bool,
    /// Partner already passed in this lance.
    pub pareja_paso: bool,
    /// Per seat: `Some(true)` declared pares, `Some(false)` declared none.
    pub declaraciones_pares: [Option<bool>; PLAYERS],
    pub declaraciones_juego: [Option<bool>; PLAYERS],
    pub equipo_rival: Vec<PlayerId>,
    /// Piedras left before either team can win.
    pub piedras_restantes: u8,
    /// Stake the rivals have put on the table in this lance.
    pub apuesta_rival: u8,
    pub historial_lances: Vec<LanceRecord>,
}

impl Default for EnviteContext {
    fn default() -> Self {
        Self {
            marcador_propio: 0,
            marcador_rival: 0,
            piedras_para_ganar: PIEDRAS_PARA_GANAR,
            ordago_activo: false,
            posicion: Posicion::Mano,
            pareja_ya_envido: false,
            pareja_paso: false,
            declaraciones_pares: [None; PLAYERS],
            declaraciones_juego: [None; PLAYERS],
            equipo_rival: Vec::new(),
            piedras_restantes: PIEDRAS_PARA_GANAR,
            apuesta_rival: 0,
            historial_lances: Vec::new(),
        }
    }
}

impl EnviteContext {
    /// Everything `seat` can legitimately know from the table.
    pub fn for_seat(snapshot: &GameSnapshot, seat: PlayerId) -> Self {
        let team = Team::of(seat);
        let rival = team.opponent();
        let propio = snapshot.piedras.get(team);
        let contrario = snapshot.piedras.get(rival);
        let para_ganar = snapshot.piedras_para_ganar;

        let partner = seat_offset(seat, 2);
        let partner_action = snapshot
            .envite
            .as_ref()
            .and_then(|e| e.respuestas[partner as usize]);

        let apuesta_rival = snapshot
            .envite
            .as_ref()
            .filter(|e| e.esperando_respuesta && e.equipo_apostador == Some(rival))
            .map_or(0, |e| e.apuesta);

        Self {
            marcador_propio: propio,
            marcador_rival: contrario,
            piedras_para_ganar: para_ganar,
            ordago_activo: snapshot.ordago_activo,
            posicion: Posicion::from_distance(distance_from_mano(snapshot.mano, seat)),
            pareja_ya_envido: partner_action.is_some_and(EnviteAction::is_bet),
            pareja_paso: partner_action == Some(EnviteAction::Paso),
            declaraciones_pares: declared(snapshot.declaraciones.pares.as_deref()),
            declaraciones_juego: declared(snapshot.declaraciones.juego.as_deref()),
            equipo_rival: rival.seats().to_vec(),
            piedras_restantes: para_ganar.saturating_sub(propio.max(contrario)),
            apuesta_rival,
            historial_lances: snapshot.historial.clone(),
        }
    }

    pub fn es_mano(&self) -> bool {
        self.posicion.is_mano()
    }
}

fn declared(holders: Option<&[PlayerId]>) -> [Option<bool>; PLAYERS] {
    let mut out = [None; PLAYERS];
    if let Some(holders) = holders {
        for (seat, slot) in out.iter_mut().enumerate() {
            *slot = Some(holders.contains(&(seat as PlayerId)));
        }
    }
    out
}
