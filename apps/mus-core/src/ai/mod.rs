//! Bots - automated Mus decisions.
//!
//! This module provides:
//! - The `MusAi` trait and the context a seat may legitimately see
//! - `HeuristicPlayer`, the strength/threshold bot
//! - `RandomPlayer`, a legal-move baseline (seedable for tests)
//! - A static registry and `create_ai` for name-based construction

mod config;
pub mod context;
pub mod helpers;
mod heuristic;
mod random;
pub mod registry;
mod trait_def;

#[cfg(test)]
mod tests_heuristic;

pub use config::AiConfig;
pub use context::{EnviteContext, Posicion};
pub use helpers::{evaluar_lance, puntos, tiene_juego, tiene_pares, tipo_pares};
pub use heuristic::{ordago_thresholds, HeuristicPlayer, OrdagoThresholds};
pub use random::RandomPlayer;
pub use registry::{by_name, registered_ais, AiFactory};
use serde_json::Value as JsonValue;
pub use trait_def::{AiError, EnviteDecision, MusAi};

/// Create a bot from a type string and optional JSON config.
///
/// Accepts `"random"`, `"heuristic"` or any registered name. The config
/// may carry a `seed`. Returns `None` if the type is unrecognized.
pub fn create_ai(ai_type: &str, config: Option<&JsonValue>) -> Option<Box<dyn MusAi>> {
    let seed = AiConfig::from_json(config).seed();
    match ai_type {
        "random" => Some(Box::new(RandomPlayer::new(seed))),
        "heuristic" => Some(Box::new(HeuristicPlayer::new(seed))),
        other => by_name(other).map(|factory| (factory.make)(seed)),
    }
}
