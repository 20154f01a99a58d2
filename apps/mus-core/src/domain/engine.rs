//! The Mus protocol engine: the phase state machine for mus, descarte and
//! envite, lance resolution and the round/game lifecycle.
//!
//! Every public entry point runs to completion, emits its events and returns
//! `true`, or rejects the action with an `Error` event and returns `false`.
//! Nothing is mutated before an action has been fully validated.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::domain::deck::Deck;
use crate::domain::envite::EnviteAction;
use crate::domain::evaluator::classify_pares;
use crate::domain::events::{EventListener, GameEvent, JuegoDeclaracion, ParesDeclaracion};
use crate::domain::hand::{puntos, tiene_juego};
use crate::domain::rules::{next_lance, DEJE, HAND_SIZE, PLAYERS};
use crate::domain::scoring::{score_accepted, score_all_pass};
use crate::domain::snapshot::{snapshot, GameSnapshot};
use crate::domain::state::{
    nth_from, next_player, seats_from_mano, EnviteState, GameState, Lance, LanceRecord, Phase,
    PlayerId, Resolution, Team, TeamPoints,
};
use crate::domain::Card;
use crate::errors::domain::{DomainError, ValidationKind};

pub struct MusEngine {
    config: EngineConfig,
    state: GameState,
    deck: Deck,
    discard_pile: Vec<Card>,
    rng: ChaCha8Rng,
    listeners: Vec<Box<dyn EventListener>>,
}

impl MusEngine {
    pub fn new(config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        Self {
            state: GameState::new(config.first_mano),
            config,
            deck: Deck::new(),
            discard_pile: Vec::new(),
            rng,
            listeners: Vec::new(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(EngineConfig::with_seed(seed))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register an observer for every event emitted from now on.
    pub fn subscribe(&mut self, listener: impl EventListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    // ---- collaborator entry points -------------------------------------

    /// Reset scores and deal the first round.
    pub fn start_game(&mut self) -> bool {
        let result = self.try_start_game();
        self.settle(result)
    }

    /// `wants_mus == false` cuts and starts the lances.
    pub fn handle_mus(&mut self, player: PlayerId, wants_mus: bool) -> bool {
        let result = self.try_mus(player, wants_mus);
        self.settle(result)
    }

    /// Exchange the cards at `card_indices` (0–4 distinct positions).
    pub fn handle_descarte(&mut self, player: PlayerId, card_indices: &[usize]) -> bool {
        let result = self.try_descarte(player, card_indices);
        self.settle(result)
    }

    /// Betting action. `amount` only matters for `Envido`; `None` uses the
    /// configured default raise.
    pub fn handle_envite(
        &mut self,
        player: PlayerId,
        action: EnviteAction,
        amount: Option<u8>,
    ) -> bool {
        let result = self.try_envite(player, action, amount);
        self.settle(result)
    }

    /// Same as [`handle_envite`](Self::handle_envite) with the action given
    /// as a token (`"paso"`, `"envido"`, `"ordago"`, `"quiero"`, `"no_quiero"`).
    pub fn handle_envite_token(&mut self, player: PlayerId, action: &str, amount: Option<u8>) -> bool {
        let result = action
            .parse::<EnviteAction>()
            .and_then(|action| self.try_envite(player, action, amount));
        self.settle(result)
    }

    pub fn get_state(&self) -> GameSnapshot {
        snapshot(&self.state, self.config.piedras_para_ganar)
    }

    pub fn player_hand(&self, player: PlayerId) -> Option<&[Card]> {
        self.state.hands.get(player as usize).map(Vec::as_slice)
    }

    pub fn is_player_turn(&self, player: PlayerId) -> bool {
        self.current_turn_player() == Some(player)
    }

    pub fn current_turn_player(&self) -> Option<PlayerId> {
        self.state.current_turn()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn piedras(&self) -> TeamPoints {
        self.state.piedras
    }

    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }

    pub fn discard_pile(&self) -> &[Card] {
        &self.discard_pile
    }

    // ---- internals ------------------------------------------------------

    fn settle(&mut self, result: Result<(), DomainError>) -> bool {
        match result {
            Ok(()) => true,
            Err(err) => {
                let (expected, received) = err.actors();
                warn!(error = %err, phase = ?self.state.phase, "action rejected");
                self.emit(GameEvent::Error {
                    mensaje: err.to_string(),
                    expected,
                    received,
                });
                false
            }
        }
    }

    fn emit(&mut self, event: GameEvent) {
        debug!(event = event.name(), lance = ?self.state.lance, "game event");
        for listener in self.listeners.iter_mut() {
            listener.on_event(&event);
        }
    }

    fn require_player(player: PlayerId) -> Result<(), DomainError> {
        if (player as usize) < PLAYERS {
            Ok(())
        } else {
            Err(DomainError::validation(
                ValidationKind::UnknownPlayer,
                format!("jugador {player}"),
            ))
        }
    }

    fn require_phase(&self, expected: Phase) -> Result<(), DomainError> {
        if self.state.phase == expected {
            Ok(())
        } else {
            Err(DomainError::wrong_phase(expected, self.state.phase))
        }
    }

    fn require_turn(&self, player: PlayerId) -> Result<(), DomainError> {
        match self.state.current_turn() {
            Some(expected) if expected == player => Ok(()),
            Some(expected) => Err(DomainError::out_of_turn(expected, player)),
            None => Err(DomainError::invalid_action("nadie tiene el turno")),
        }
    }

    fn emit_turn(&mut self, player: PlayerId) {
        let esperando_respuesta = self
            .state
            .envite
            .as_ref()
            .is_some_and(|e| e.esperando_respuesta);
        self.emit(GameEvent::TurnChanged {
            player,
            fase: self.state.phase,
            lance: self.state.lance,
            esperando_respuesta,
        });
    }

    // ---- game / round lifecycle ----------------------------------------

    fn try_start_game(&mut self) -> Result<(), DomainError> {
        self.state = GameState::new(self.config.first_mano);
        info!(mano = self.state.mano, seed = ?self.config.seed, "game started");
        self.emit(GameEvent::GameStarted {
            piedras: self.state.piedras,
        });
        self.start_round()
    }

    fn start_round(&mut self) -> Result<(), DomainError> {
        let state = &mut self.state;
        state.round_no += 1;
        state.lance = None;
        state.envite = None;
        state.ordago_activo = false;
        state.puntos_pendientes = TeamPoints::default();
        state.historial.clear();
        state.declaraciones_pares = None;
        state.declaraciones_juego = None;
        state.mus_rounds = 0;
        state.descartes = [None; PLAYERS];

        let (round_no, mano, postre) = (state.round_no, state.mano, state.postre());
        info!(round_no, mano, "round started");
        self.emit(GameEvent::RoundStarted {
            round_no,
            mano,
            postre,
        });

        self.deal()?;
        self.emit(GameEvent::CardsDealt {
            hands: self.state.hands.clone(),
        });
        self.start_mus_phase();
        Ok(())
    }

    /// Fresh shuffled deck; one card at a time to each seat starting at mano.
    fn deal(&mut self) -> Result<(), DomainError> {
        self.deck.reset();
        self.deck.shuffle(&mut self.rng);
        self.discard_pile.clear();
        for hand in self.state.hands.iter_mut() {
            hand.clear();
        }
        let order = seats_from_mano(self.state.mano);
        for _ in 0..HAND_SIZE {
            for &seat in &order {
                let card = self.deck.deal(1)?;
                self.state.hands[seat as usize].extend(card);
            }
        }
        Ok(())
    }

    fn finish_round(&mut self) {
        let cap = self.config.piedras_para_ganar;
        let mut winner = None;
        for record in &self.state.historial {
            let Some(team) = record.ganador else {
                continue;
            };
            let total = self.state.piedras.get(team).saturating_add(record.puntos);
            self.state.piedras.set(team, total.min(cap));
            if total >= cap {
                winner = Some(team);
                break;
            }
        }

        info!(
            round_no = self.state.round_no,
            equipo1 = self.state.piedras.equipo1,
            equipo2 = self.state.piedras.equipo2,
            "round finished"
        );
        self.emit(GameEvent::RoundFinished {
            puntos_pendientes: self.state.puntos_pendientes,
            piedras: self.state.piedras,
        });

        if let Some(team) = winner {
            self.end_game(team, false);
            return;
        }

        self.state.mano = next_player(self.state.mano);
        if let Err(err) = self.start_round() {
            warn!(error = %err, "could not deal next round");
        }
    }

    fn end_game(&mut self, ganador: Team, ordago: bool) {
        self.state.phase = Phase::GameOver;
        self.state.lance = None;
        self.state.envite = None;
        self.state.winner = Some(ganador);
        info!(%ganador, ordago, "game over");
        self.emit(GameEvent::GameOver {
            ganador,
            piedras: self.state.piedras,
            ordago,
        });
    }

    // ---- mus -------------------------------------------------------------

    fn start_mus_phase(&mut self) {
        self.state.phase = Phase::Mus;
        self.state.lance = None;
        self.state.mus_turn = 0;
        let mano = self.state.mano;
        self.emit(GameEvent::PhaseChanged {
            fase: Phase::Mus,
            lance: None,
        });
        self.emit(GameEvent::MusPhaseStarted { mano });
        self.emit_turn(mano);
    }

    fn try_mus(&mut self, player: PlayerId, wants_mus: bool) -> Result<(), DomainError> {
        Self::require_player(player)?;
        self.require_phase(Phase::Mus)?;
        self.require_turn(player)?;

        self.emit(GameEvent::MusResponse { player, wants_mus });
        if !wants_mus {
            self.emit(GameEvent::MusCortado { player });
            self.start_lances();
            return Ok(());
        }

        self.state.mus_turn += 1;
        if self.state.mus_turn as usize >= PLAYERS {
            self.state.mus_rounds = self.state.mus_rounds.saturating_add(1);
            self.start_descarte_phase();
        } else {
            let next = nth_from(self.state.mano, self.state.mus_turn);
            self.emit_turn(next);
        }
        Ok(())
    }

    // ---- descarte ----------------------------------------------------------

    fn start_descarte_phase(&mut self) {
        self.state.phase = Phase::Descarte;
        self.state.descarte_turn = 0;
        self.state.descartes = [None; PLAYERS];
        let mano = self.state.mano;
        self.emit(GameEvent::PhaseChanged {
            fase: Phase::Descarte,
            lance: None,
        });
        self.emit(GameEvent::DescartePhaseStarted { mano });
        self.emit_turn(mano);
    }

    fn validate_discard(&self, player: PlayerId, indices: &[usize]) -> Result<(), DomainError> {
        let hand_len = self.state.hands[player as usize].len();
        if indices.len() > hand_len {
            return Err(DomainError::validation(
                ValidationKind::TooManyDiscards,
                format!("{} cartas", indices.len()),
            ));
        }
        let mut seen = [false; HAND_SIZE];
        for &idx in indices {
            if idx >= hand_len || idx >= HAND_SIZE {
                return Err(DomainError::validation(
                    ValidationKind::CardIndex,
                    format!("indice {idx}"),
                ));
            }
            if seen[idx] {
                return Err(DomainError::validation(
                    ValidationKind::DuplicateCardIndex,
                    format!("indice {idx}"),
                ));
            }
            seen[idx] = true;
        }
        Ok(())
    }

    fn try_descarte(&mut self, player: PlayerId, indices: &[usize]) -> Result<(), DomainError> {
        Self::require_player(player)?;
        self.require_phase(Phase::Descarte)?;
        self.require_turn(player)?;
        self.validate_discard(player, indices)?;

        let count = indices.len();
        if self.deck.remaining() < count {
            let returned = self.discard_pile.len();
            self.deck.return_cards(self.discard_pile.drain(..));
            self.deck.shuffle(&mut self.rng);
            warn!(returned, "draw pile exhausted, reshuffling discards");
            self.emit(GameEvent::DeckReshuffled { returned });
        }
        let drawn = self.deck.deal(count)?;

        let mut sorted = indices.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        let hand = &mut self.state.hands[player as usize];
        for idx in sorted {
            let card = hand.remove(idx);
            self.discard_pile.push(card);
        }
        hand.extend(drawn);

        let count = count as u8;
        self.state.descartes[player as usize] = Some(count);
        self.emit(GameEvent::CardsDiscarded { player, count });

        self.state.descarte_turn += 1;
        if self.state.descarte_turn as usize >= PLAYERS {
            self.finish_descarte();
        } else {
            let next = nth_from(self.state.mano, self.state.descarte_turn);
            self.emit_turn(next);
        }
        Ok(())
    }

    fn finish_descarte(&mut self) {
        self.emit(GameEvent::DescarteFinished {
            descartes: self.state.descartes,
        });
        self.emit(GameEvent::CardsDealt {
            hands: self.state.hands.clone(),
        });
        self.start_mus_phase();
    }

    // ---- lances ------------------------------------------------------------

    fn start_lances(&mut self) {
        let mano = self.state.mano;
        debug!(mano, mus_rounds = self.state.mus_rounds, "mus cut, lances start");
        self.emit(GameEvent::LancesStarted { mano });
        self.start_envite(Lance::Grande);
    }

    fn start_envite(&mut self, lance: Lance) {
        let mut lance = lance;
        match lance {
            Lance::Pares => {
                if !self.announce_pares() {
                    self.emit(GameEvent::LanceSkipped {
                        lance: Lance::Pares,
                        razon: "nadie tiene pares".to_string(),
                    });
                    self.state.lance = Some(Lance::Pares);
                    self.advance_lance();
                    return;
                }
            }
            Lance::Juego => {
                if !self.announce_juego() {
                    lance = Lance::Punto;
                }
            }
            _ => {}
        }

        let mano = self.state.mano;
        self.state.phase = Phase::Envite;
        self.state.lance = Some(lance);
        self.state.envite = Some(EnviteState::new(lance));
        self.emit(GameEvent::PhaseChanged {
            fase: Phase::Envite,
            lance: Some(lance),
        });
        self.emit(GameEvent::EnviteStarted { lance, mano });
        self.emit_turn(mano);
    }

    /// Publish who holds pares. Returns whether anyone does.
    fn announce_pares(&mut self) -> bool {
        let jugadores: Vec<ParesDeclaracion> = seats_from_mano(self.state.mano)
            .into_iter()
            .filter_map(|player| {
                classify_pares(&self.state.hands[player as usize])
                    .map(|pares| ParesDeclaracion { player, pares })
            })
            .collect();
        let hay_pares = !jugadores.is_empty();
        self.state.declaraciones_pares = Some(jugadores.iter().map(|d| d.player).collect());
        self.emit(GameEvent::ParesDetectados {
            hay_pares,
            jugadores,
        });
        hay_pares
    }

    /// Publish who holds juego. Returns whether anyone does.
    fn announce_juego(&mut self) -> bool {
        let jugadores: Vec<JuegoDeclaracion> = seats_from_mano(self.state.mano)
            .into_iter()
            .filter(|&player| tiene_juego(&self.state.hands[player as usize]))
            .map(|player| JuegoDeclaracion {
                player,
                valor: puntos(&self.state.hands[player as usize]),
            })
            .collect();
        let hay_juego = !jugadores.is_empty();
        self.state.declaraciones_juego = Some(jugadores.iter().map(|d| d.player).collect());
        self.emit(GameEvent::JuegoDetectado {
            hay_juego,
            lance_resultante: if hay_juego { Lance::Juego } else { Lance::Punto },
            jugadores,
        });
        hay_juego
    }

    fn advance_lance(&mut self) {
        match self.state.lance.and_then(next_lance) {
            Some(lance) => self.start_envite(lance),
            None => self.finish_round(),
        }
    }

    fn try_envite(
        &mut self,
        player: PlayerId,
        action: EnviteAction,
        amount: Option<u8>,
    ) -> Result<(), DomainError> {
        Self::require_player(player)?;
        self.require_phase(Phase::Envite)?;
        let mano = self.state.mano;
        let cap = self.config.piedras_para_ganar;
        let default_amount = self.config.envido_por_defecto;

        let envite = self
            .state
            .envite
            .as_mut()
            .ok_or_else(|| DomainError::invalid_action("no hay envite en curso"))?;
        envite.require_actor(mano, player)?;

        let responding = envite.esperando_respuesta;
        match action {
            EnviteAction::Quiero | EnviteAction::NoQuiero if !responding => {
                return Err(DomainError::invalid_action(format!(
                    "{action} sin apuesta pendiente"
                )));
            }
            EnviteAction::Envido | EnviteAction::Ordago if envite.is_ordago() => {
                return Err(DomainError::invalid_action(
                    "no se puede subir un ordago",
                ));
            }
            EnviteAction::Envido if amount == Some(0) => {
                return Err(DomainError::validation(
                    ValidationKind::InvalidAmount,
                    "el envido debe ser mayor que cero",
                ));
            }
            _ => {}
        }

        match action {
            EnviteAction::Paso if responding => {
                let next = envite.pass_as_responder(player);
                self.emit(GameEvent::EnviteAction {
                    player,
                    action,
                    apuesta: None,
                });
                match next {
                    Some(next) => self.emit_turn(next),
                    None => self.resolve_current(Resolution::NoQuiero),
                }
            }
            EnviteAction::Paso => {
                let all_spoke = envite.pass_in_turn(player);
                let next = envite.expected_actor(mano);
                self.emit(GameEvent::EnviteAction {
                    player,
                    action,
                    apuesta: None,
                });
                match next {
                    Some(next) if !all_spoke => self.emit_turn(next),
                    _ => self.resolve_current(Resolution::Paso),
                }
            }
            EnviteAction::Envido => {
                let apuesta = envite.envido(player, mano, amount.unwrap_or(default_amount), cap);
                let next = envite.expected_actor(mano);
                self.emit(GameEvent::EnviteAction {
                    player,
                    action,
                    apuesta: Some(apuesta),
                });
                if let Some(next) = next {
                    self.emit_turn(next);
                }
            }
            EnviteAction::Ordago => {
                let apuesta = envite.ordago(player, mano, cap);
                let next = envite.expected_actor(mano);
                self.state.ordago_activo = true;
                info!(player, lance = ?self.state.lance, "ordago");
                self.emit(GameEvent::EnviteAction {
                    player,
                    action,
                    apuesta: Some(apuesta),
                });
                if let Some(next) = next {
                    self.emit_turn(next);
                }
            }
            EnviteAction::Quiero => {
                envite.answer(player, action);
                let apuesta = envite.apuesta;
                let ordago = envite.is_ordago();
                self.emit(GameEvent::EnviteAction {
                    player,
                    action,
                    apuesta: Some(apuesta),
                });
                self.resolve_current(if ordago {
                    Resolution::Ordago
                } else {
                    Resolution::Quiero
                });
            }
            EnviteAction::NoQuiero => {
                envite.answer(player, action);
                self.emit(GameEvent::EnviteAction {
                    player,
                    action,
                    apuesta: None,
                });
                self.resolve_current(Resolution::NoQuiero);
            }
        }
        Ok(())
    }

    /// Score the lance being bet, record it and move on.
    fn resolve_current(&mut self, razon: Resolution) {
        let Some(envite) = self.state.envite.take() else {
            return;
        };
        self.state.phase = Phase::Resolucion;
        let lance = envite.lance;
        let mano = self.state.mano;
        let hands = &self.state.hands;

        let (ganador, puntos) = match razon {
            Resolution::Paso => score_all_pass(lance, hands, mano)
                .map_or((None, 0), |o| (Some(o.team), o.puntos)),
            Resolution::Quiero | Resolution::Ordago => {
                score_accepted(lance, hands, mano, envite.apuesta)
                    .map_or((None, 0), |o| (Some(o.team), o.puntos))
            }
            Resolution::NoQuiero => (envite.equipo_apostador, DEJE),
        };

        if let Some(team) = ganador {
            self.state.puntos_pendientes.add(team, puntos);
        }
        self.state.historial.push(LanceRecord {
            lance,
            respuestas: envite.respuestas,
            apuesta_final: envite.apuesta,
            ganador,
            puntos,
            razon,
        });
        self.state.ordago_activo = false;
        debug!(%lance, ?ganador, puntos, ?razon, "lance resolved");
        self.emit(GameEvent::LanceResolved {
            lance,
            ganador,
            puntos,
            razon,
        });

        if razon == Resolution::Ordago {
            if let Some(team) = ganador {
                self.state.piedras.set(team, self.config.piedras_para_ganar);
                self.end_game(team, true);
                return;
            }
        }
        self.state.lance = Some(lance);
        self.advance_lance();
    }
}

impl Default for MusEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl std::fmt::Debug for MusEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MusEngine")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("deck_remaining", &self.deck.remaining())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
impl MusEngine {
    /// Replace the hands in play (test setup). Cards are not reconciled with
    /// the deck, so deck-size checks do not hold afterwards.
    pub(crate) fn set_hands(&mut self, hands: [Vec<Card>; PLAYERS]) {
        self.state.hands = hands;
    }

    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}
