//! Decision-engine trait definition.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::context::EnviteContext;
use crate::domain::{Card, EnviteAction, Lance};

/// Errors that can occur during AI decision-making.
#[derive(Debug, Error)]
pub enum AiError {
    /// AI encountered an internal error
    #[error("AI internal error: {0}")]
    Internal(String),
    /// AI was asked to decide on input it cannot handle
    #[error("AI invalid decision: {0}")]
    InvalidDecision(String),
}

/// A betting decision. `amount` is the raise for `Envido`, the stake being
/// accepted for `Quiero`, the whole remaining game for `Ordago`, and 0 otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnviteDecision {
    pub action: EnviteAction,
    pub amount: u8,
}

impl EnviteDecision {
    pub const fn paso() -> Self {
        Self {
            action: EnviteAction::Paso,
            amount: 0,
        }
    }

    pub const fn envido(amount: u8) -> Self {
        Self {
            action: EnviteAction::Envido,
            amount,
        }
    }

    pub const fn ordago(amount: u8) -> Self {
        Self {
            action: EnviteAction::Ordago,
            amount,
        }
    }

    pub const fn quiero(amount: u8) -> Self {
        Self {
            action: EnviteAction::Quiero,
            amount,
        }
    }

    pub const fn no_quiero() -> Self {
        Self {
            action: EnviteAction::NoQuiero,
            amount: 0,
        }
    }

    /// Amount to hand to the engine: only an envido carries one.
    pub fn engine_amount(&self) -> Option<u8> {
        match self.action {
            EnviteAction::Envido => Some(self.amount.max(1)),
            _ => None,
        }
    }
}

/// Trait for Mus bots.
///
/// Implementations only see their own hand plus the public context, and
/// must answer with a decision the engine accepts for the seat's position:
/// `Quiero`/`NoQuiero` only while a bet is pending, no raise on an órdago.
pub trait MusAi: Send + Sync {
    /// `true` asks for mus, `false` cuts.
    fn decide_mus(&self, hand: &[Card]) -> Result<bool, AiError>;

    /// Positions (0..4) of the cards to exchange.
    fn select_discard(&self, hand: &[Card]) -> Result<Vec<usize>, AiError>;

    /// Betting action for `lance` facing `current_bet` (0 when nobody has bet).
    fn decide_envite(
        &self,
        hand: &[Card],
        lance: Lance,
        current_bet: u8,
        ctx: &EnviteContext,
    ) -> Result<EnviteDecision, AiError>;
}
