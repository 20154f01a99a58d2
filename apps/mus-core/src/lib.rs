#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

//! Mus: the four-player Spanish betting card game.
//!
//! [`domain`] holds the card model, hand evaluation and the protocol engine;
//! [`ai`] holds the bots that play through the engine's public API.

pub mod ai;
pub mod config;
pub mod domain;
pub mod errors;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use ai::{create_ai, registered_ais, EnviteContext, EnviteDecision, HeuristicPlayer, MusAi};
pub use config::EngineConfig;
pub use domain::{
    Card, EnviteAction, EventListener, EventRecorder, GameEvent, GameSnapshot, Lance, MusEngine,
    Phase, PlayerId, Team,
};
pub use errors::{DomainError, ValidationKind};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
