//! Domain-level error type shared by the engine, the evaluator and the bots.
//!
//! Every rejected engine action maps onto one of these variants. The engine
//! never lets them escape as panics: the public `handle_*` entry points turn
//! an `Err` into an `Error` event and return `false`.

use thiserror::Error;

use crate::domain::state::{Phase, PlayerId};

/// Input validation kinds (extend as needed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    UnknownPlayer,
    CardIndex,
    DuplicateCardIndex,
    TooManyDiscards,
    InvalidAmount,
    InvalidHand,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Caller addressed the wrong player or team.
    #[error("no es tu turno: turno de {expected}, recibido {received}")]
    OutOfTurn {
        expected: PlayerId,
        received: PlayerId,
    },
    /// Action sent outside the phase that accepts it.
    #[error("fase incorrecta: se esperaba {expected:?}, fase actual {actual:?}")]
    WrongPhase { expected: Phase, actual: Phase },
    /// Deck underflow.
    #[error("cartas insuficientes: pedidas {requested}, quedan {remaining}")]
    InsufficientCards { requested: usize, remaining: usize },
    /// Unrecognised or currently illegal envite action.
    #[error("accion no valida: {0}")]
    InvalidAction(String),
    /// Card token could not be parsed.
    #[error("carta no valida: {0}")]
    ParseCard(String),
    /// Input validation or business rule violation
    #[error("validacion {0:?}: {1}")]
    Validation(ValidationKind, String),
}

impl DomainError {
    pub fn out_of_turn(expected: PlayerId, received: PlayerId) -> Self {
        Self::OutOfTurn { expected, received }
    }
    pub fn wrong_phase(expected: Phase, actual: Phase) -> Self {
        Self::WrongPhase { expected, actual }
    }
    pub fn insufficient_cards(requested: usize, remaining: usize) -> Self {
        Self::InsufficientCards {
            requested,
            remaining,
        }
    }
    pub fn invalid_action(detail: impl Into<String>) -> Self {
        Self::InvalidAction(detail.into())
    }
    pub fn parse_card(token: impl Into<String>) -> Self {
        Self::ParseCard(token.into())
    }
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }

    /// Expected vs. received actor, when the error is about turn ownership.
    pub fn actors(&self) -> (Option<PlayerId>, Option<PlayerId>) {
        match self {
            Self::OutOfTurn { expected, received } => (Some(*expected), Some(*received)),
            _ => (None, None),
        }
    }
}
