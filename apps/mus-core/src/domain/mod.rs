//! Domain layer: cards, hand evaluation and the protocol engine.

pub mod cards_parsing;
pub mod cards_serde;
pub mod cards_types;
pub mod deck;
pub mod engine;
pub mod envite;
pub mod evaluator;
pub mod events;
pub mod hand;
pub mod rules;
pub mod scoring;
pub mod snapshot;
pub mod state;
pub mod strength;

#[cfg(test)]
mod tests_engine;
#[cfg(test)]
mod tests_props_evaluator;

// Re-exports for ergonomics
pub use cards_parsing::{parse_hand, try_parse_cards};
pub use cards_types::{full_deck, Card, Rank, Suit};
pub use deck::Deck;
pub use engine::MusEngine;
pub use envite::EnviteAction;
pub use evaluator::{classify_pares, Pares, ParesKind};
pub use events::{EventListener, EventRecorder, GameEvent};
pub use snapshot::GameSnapshot;
pub use state::{Lance, Phase, PlayerId, Resolution, Seat, Team, TeamPoints};
