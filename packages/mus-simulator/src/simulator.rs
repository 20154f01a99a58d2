//! Bot-vs-bot game runner.
//!
//! Games are driven exclusively through the engine's public API: read
//! `get_state()`, ask the seat holding the turn for a decision, hand it to
//! the matching `handle_*` call. Anything the engine rejects is a bot bug
//! and aborts the game.

use mus_core::ai::{AiError, EnviteContext, MusAi};
use mus_core::domain::{EventRecorder, GameEvent, GameSnapshot, Lance, Resolution};
use mus_core::{EngineConfig, MusEngine, Phase, PlayerId, Team};
use thiserror::Error;
use tracing::{debug, info};

const PLAYERS: usize = 4;

/// Hard stop for runaway games; a normal game takes a few hundred actions.
const MAX_ACTIONS: u32 = 200_000;

#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("engine refused to start the game")]
    StartFailed,
    #[error("seat {seat}: {source}")]
    Ai {
        seat: PlayerId,
        #[source]
        source: AiError,
    },
    #[error("engine rejected seat {seat} in {phase:?}: {reason}")]
    Rejected {
        seat: PlayerId,
        phase: Phase,
        reason: String,
    },
    #[error("no seat holds the turn in {0:?}")]
    NoTurn(Phase),
    #[error("game did not finish after {0} actions")]
    Stalled(u32),
}

/// One resolved lance, as seen from the event stream.
#[derive(Debug, Clone)]
pub struct LanceOutcome {
    pub lance: Lance,
    pub ganador: Option<Team>,
    pub puntos: u8,
    pub razon: Resolution,
}

/// Per-round digest.
#[derive(Debug, Clone, Default)]
pub struct RoundSummary {
    pub round_no: u32,
    pub mano: PlayerId,
    pub mus_rounds: u8,
    pub lances: Vec<LanceOutcome>,
    pub skipped: Vec<Lance>,
    /// Piedras after the round, `[equipo1, equipo2]`.
    pub piedras: [u8; 2],
}

/// Result of simulating a complete game.
#[derive(Debug, Clone)]
pub struct GameResult {
    pub winner: Team,
    /// Final piedras, `[equipo1, equipo2]`.
    pub piedras: [u8; 2],
    pub ended_by_ordago: bool,
    pub rounds: Vec<RoundSummary>,
    /// Accepted actions per seat.
    pub actions: [u32; PLAYERS],
    pub cuts: [u32; PLAYERS],
    pub bets: [u32; PLAYERS],
    pub ordagos: [u32; PLAYERS],
}

/// In-memory game simulator.
pub struct Simulator {
    engine: MusEngine,
    recorder: EventRecorder,
}

impl Simulator {
    pub fn new(seed: u64) -> Self {
        let mut engine = MusEngine::new(EngineConfig::with_seed(seed));
        let recorder = EventRecorder::new();
        engine.subscribe(recorder.clone());
        Self { engine, recorder }
    }

    /// Play one game to the end with `ais[seat]` deciding for each seat.
    pub fn simulate_game(mut self, ais: &[Box<dyn MusAi>; 4]) -> Result<GameResult, SimulatorError> {
        if !self.engine.start_game() {
            return Err(SimulatorError::StartFailed);
        }

        let mut actions = 0;
        loop {
            let state = self.engine.get_state();
            if state.is_game_over() {
                break;
            }
            actions += 1;
            if actions > MAX_ACTIONS {
                return Err(SimulatorError::Stalled(MAX_ACTIONS));
            }
            self.step(&state, ais)?;
        }

        let result = summarize(&self.recorder.take());
        info!(
            winner = %result.winner,
            equipo1 = result.piedras[0],
            equipo2 = result.piedras[1],
            rounds = result.rounds.len(),
            "game finished"
        );
        Ok(result)
    }

    fn step(&mut self, state: &GameSnapshot, ais: &[Box<dyn MusAi>; 4]) -> Result<(), SimulatorError> {
        let seat = state.turn.ok_or(SimulatorError::NoTurn(state.phase))?;
        let ai = &ais[seat as usize];
        let hand = state.hand(seat);
        let ai_err = |source| SimulatorError::Ai { seat, source };

        let accepted = match state.phase {
            Phase::Mus => {
                let wants_mus = ai.decide_mus(hand).map_err(ai_err)?;
                self.engine.handle_mus(seat, wants_mus)
            }
            Phase::Descarte => {
                let picks = ai.select_discard(hand).map_err(ai_err)?;
                self.engine.handle_descarte(seat, &picks)
            }
            Phase::Envite => {
                let lance = state.lance.ok_or(SimulatorError::NoTurn(state.phase))?;
                let current_bet = if state.must_respond(seat) {
                    state.apuesta()
                } else {
                    0
                };
                let ctx = EnviteContext::for_seat(state, seat);
                let decision = ai
                    .decide_envite(hand, lance, current_bet, &ctx)
                    .map_err(ai_err)?;
                debug!(seat, %lance, action = %decision.action, amount = decision.amount, "bot envite");
                self.engine
                    .handle_envite(seat, decision.action, decision.engine_amount())
            }
            other => return Err(SimulatorError::NoTurn(other)),
        };

        if accepted {
            Ok(())
        } else {
            Err(SimulatorError::Rejected {
                seat,
                phase: state.phase,
                reason: self.last_error(),
            })
        }
    }

    fn last_error(&self) -> String {
        self.recorder
            .events()
            .into_iter()
            .rev()
            .find_map(|event| match event {
                GameEvent::Error { mensaje, .. } => Some(mensaje),
                _ => None,
            })
            .unwrap_or_default()
    }
}

/// Fold the event stream of one game into a result.
fn summarize(events: &[GameEvent]) -> GameResult {
    let mut result = GameResult {
        winner: Team::Equipo1,
        piedras: [0; 2],
        ended_by_ordago: false,
        rounds: Vec::new(),
        actions: [0; PLAYERS],
        cuts: [0; PLAYERS],
        bets: [0; PLAYERS],
        ordagos: [0; PLAYERS],
    };

    for event in events {
        match event {
            GameEvent::RoundStarted { round_no, mano, .. } => result.rounds.push(RoundSummary {
                round_no: *round_no,
                mano: *mano,
                ..RoundSummary::default()
            }),
            GameEvent::DescartePhaseStarted { .. } => {
                if let Some(round) = result.rounds.last_mut() {
                    round.mus_rounds = round.mus_rounds.saturating_add(1);
                }
            }
            GameEvent::MusResponse { player, wants_mus } => {
                result.actions[*player as usize] += 1;
                if !wants_mus {
                    result.cuts[*player as usize] += 1;
                }
            }
            GameEvent::CardsDiscarded { player, .. } => result.actions[*player as usize] += 1,
            GameEvent::EnviteAction { player, action, .. } => {
                result.actions[*player as usize] += 1;
                if action.is_bet() {
                    result.bets[*player as usize] += 1;
                }
                if *action == mus_core::EnviteAction::Ordago {
                    result.ordagos[*player as usize] += 1;
                }
            }
            GameEvent::LanceResolved {
                lance,
                ganador,
                puntos,
                razon,
            } => {
                if let Some(round) = result.rounds.last_mut() {
                    round.lances.push(LanceOutcome {
                        lance: *lance,
                        ganador: *ganador,
                        puntos: *puntos,
                        razon: *razon,
                    });
                }
            }
            GameEvent::LanceSkipped { lance, .. } => {
                if let Some(round) = result.rounds.last_mut() {
                    round.skipped.push(*lance);
                }
            }
            GameEvent::RoundFinished { piedras, .. } => {
                if let Some(round) = result.rounds.last_mut() {
                    round.piedras = [piedras.equipo1, piedras.equipo2];
                }
            }
            GameEvent::GameOver {
                ganador,
                piedras,
                ordago,
            } => {
                result.winner = *ganador;
                result.piedras = [piedras.equipo1, piedras.equipo2];
                result.ended_by_ordago = *ordago;
                if let Some(round) = result.rounds.last_mut() {
                    round.piedras = result.piedras;
                }
            }
            _ => {}
        }
    }
    result
}
