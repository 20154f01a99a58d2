//! Random AI player - makes random legal moves.
//!
//! [`RandomPlayer`] is the baseline bot for the simulator and for engine
//! fuzzing. It never cares about its cards, but it never answers with
//! something the engine would reject either.

use std::sync::Mutex;

use rand::prelude::*;

use crate::ai::context::EnviteContext;
use crate::ai::trait_def::{AiError, EnviteDecision, MusAi};
use crate::domain::{Card, Lance};

/// AI that chooses uniformly among legal moves.
///
/// Seeded construction replays the same choices, which the simulator relies
/// on for reproducible runs.
pub struct RandomPlayer {
    /// `MusAi` methods take `&self`; the RNG needs interior mutability.
    rng: Mutex<StdRng>,
}

impl RandomPlayer {
    pub const NAME: &'static str = "RandomPlayer";
    pub const VERSION: &'static str = "1.0.0";

    pub const fn name() -> &'static str {
        Self::NAME
    }

    pub const fn version() -> &'static str {
        Self::VERSION
    }

    /// `Some(seed)` for reproducible play, `None` for OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = if let Some(s) = seed {
            StdRng::seed_from_u64(s)
        } else {
            StdRng::from_os_rng()
        };
        Self {
            rng: Mutex::new(rng),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> Result<T, AiError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|e| AiError::Internal(format!("RNG lock poisoned: {e}")))?;
        Ok(f(&mut rng))
    }
}

impl MusAi for RandomPlayer {
    fn decide_mus(&self, _hand: &[Card]) -> Result<bool, AiError> {
        self.with_rng(|rng| rng.random_bool(0.5))
    }

    fn select_discard(&self, hand: &[Card]) -> Result<Vec<usize>, AiError> {
        if hand.is_empty() {
            return Err(AiError::InvalidDecision("empty hand".into()));
        }
        self.with_rng(|rng| {
            let count = rng.random_range(0..=hand.len().min(3));
            let mut picks = rand::seq::index::sample(rng, hand.len(), count).into_vec();
            picks.sort_unstable();
            picks
        })
    }

    fn decide_envite(
        &self,
        _hand: &[Card],
        _lance: Lance,
        current_bet: u8,
        ctx: &EnviteContext,
    ) -> Result<EnviteDecision, AiError> {
        self.with_rng(|rng| {
            if ctx.ordago_activo {
                return if rng.random_bool(0.5) {
                    EnviteDecision::quiero(ctx.piedras_restantes)
                } else {
                    EnviteDecision::no_quiero()
                };
            }
            let roll = rng.random_range(0..100u8);
            if current_bet == 0 {
                match roll {
                    0..60 => EnviteDecision::paso(),
                    60..97 => EnviteDecision::envido(rng.random_range(1..=3)),
                    _ => EnviteDecision::ordago(ctx.piedras_restantes),
                }
            } else {
                match roll {
                    0..45 => EnviteDecision::quiero(current_bet),
                    45..85 => EnviteDecision::no_quiero(),
                    85..98 => EnviteDecision::envido(rng.random_range(1..=2)),
                    _ => EnviteDecision::ordago(ctx.piedras_restantes),
                }
            }
        })
    }
}
