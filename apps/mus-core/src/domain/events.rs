//! Engine → collaborator events and the observer interface that carries them.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::domain::envite::EnviteAction;
use crate::domain::evaluator::Pares;
use crate::domain::rules::PLAYERS;
use crate::domain::state::{Lance, Phase, PlayerId, Resolution, Team, TeamPoints};
use crate::domain::Card;

/// A seat holding pares, as announced when the Pares lance opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParesDeclaracion {
    pub player: PlayerId,
    pub pares: Pares,
}

/// A seat holding juego, as announced when the Juego lance opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JuegoDeclaracion {
    pub player: PlayerId,
    pub valor: u8,
}

/// Everything the engine reports. Serialized with a `type` tag in camelCase
/// so collaborators can dispatch on event names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    GameStarted {
        piedras: TeamPoints,
    },
    RoundStarted {
        round_no: u32,
        mano: PlayerId,
        postre: PlayerId,
    },
    CardsDealt {
        hands: [Vec<Card>; PLAYERS],
    },
    PhaseChanged {
        fase: Phase,
        lance: Option<Lance>,
    },
    MusPhaseStarted {
        mano: PlayerId,
    },
    MusResponse {
        player: PlayerId,
        wants_mus: bool,
    },
    MusCortado {
        player: PlayerId,
    },
    DescartePhaseStarted {
        mano: PlayerId,
    },
    CardsDiscarded {
        player: PlayerId,
        count: u8,
    },
    DeckReshuffled {
        returned: usize,
    },
    DescarteFinished {
        descartes: [Option<u8>; PLAYERS],
    },
    LancesStarted {
        mano: PlayerId,
    },
    EnviteStarted {
        lance: Lance,
        mano: PlayerId,
    },
    EnviteAction {
        player: PlayerId,
        action: EnviteAction,
        apuesta: Option<u8>,
    },
    LanceResolved {
        lance: Lance,
        ganador: Option<Team>,
        puntos: u8,
        razon: Resolution,
    },
    LanceSkipped {
        lance: Lance,
        razon: String,
    },
    ParesDetectados {
        hay_pares: bool,
        jugadores: Vec<ParesDeclaracion>,
    },
    JuegoDetectado {
        hay_juego: bool,
        lance_resultante: Lance,
        jugadores: Vec<JuegoDeclaracion>,
    },
    RoundFinished {
        puntos_pendientes: TeamPoints,
        piedras: TeamPoints,
    },
    GameOver {
        ganador: Team,
        piedras: TeamPoints,
        ordago: bool,
    },
    TurnChanged {
        player: PlayerId,
        fase: Phase,
        lance: Option<Lance>,
        esperando_respuesta: bool,
    },
    Error {
        mensaje: String,
        expected: Option<PlayerId>,
        received: Option<PlayerId>,
    },
}

impl GameEvent {
    /// Event name as exposed to collaborators.
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::GameStarted { .. } => "gameStarted",
            GameEvent::RoundStarted { .. } => "roundStarted",
            GameEvent::CardsDealt { .. } => "cardsDealt",
            GameEvent::PhaseChanged { .. } => "phaseChanged",
            GameEvent::MusPhaseStarted { .. } => "musPhaseStarted",
            GameEvent::MusResponse { .. } => "musResponse",
            GameEvent::MusCortado { .. } => "musCortado",
            GameEvent::DescartePhaseStarted { .. } => "descartePhaseStarted",
            GameEvent::CardsDiscarded { .. } => "cardsDiscarded",
            GameEvent::DeckReshuffled { .. } => "deckReshuffled",
            GameEvent::DescarteFinished { .. } => "descarteFinished",
            GameEvent::LancesStarted { .. } => "lancesStarted",
            GameEvent::EnviteStarted { .. } => "enviteStarted",
            GameEvent::EnviteAction { .. } => "enviteAction",
            GameEvent::LanceResolved { .. } => "lanceResolved",
            GameEvent::LanceSkipped { .. } => "lanceSkipped",
            GameEvent::ParesDetectados { .. } => "paresDetectados",
            GameEvent::JuegoDetectado { .. } => "juegoDetectado",
            GameEvent::RoundFinished { .. } => "roundFinished",
            GameEvent::GameOver { .. } => "gameOver",
            GameEvent::TurnChanged { .. } => "turnChanged",
            GameEvent::Error { .. } => "error",
        }
    }
}

/// Observer for engine events.
pub trait EventListener {
    fn on_event(&mut self, event: &GameEvent);
}

impl<F> EventListener for F
where
    F: FnMut(&GameEvent),
{
    fn on_event(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// Listener that keeps every event it sees. Clones share the same buffer,
/// so one clone can be subscribed while another is read.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Rc<RefCell<Vec<GameEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the recorded events.
    pub fn events(&self) -> Vec<GameEvent> {
        self.events.borrow().clone()
    }

    /// Drain the recorded events.
    pub fn take(&self) -> Vec<GameEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.borrow().iter().map(GameEvent::name).collect()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl EventListener for EventRecorder {
    fn on_event(&mut self, event: &GameEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
