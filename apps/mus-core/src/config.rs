//! Engine configuration.
//!
//! Parsed from JSON the same way bot configs are: known fields are typed,
//! missing fields take their defaults.
//!
//! ```json
//! {"seed": 42, "piedras_para_ganar": 40, "first_mano": 0}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::rules::{ENVIDO_POR_DEFECTO, PIEDRAS_PARA_GANAR};
use crate::domain::state::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for shuffling. `None` draws from OS entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Score that ends the game; also the stake of an órdago.
    pub piedras_para_ganar: u8,
    /// Raise used when an envido arrives without an amount.
    pub envido_por_defecto: u8,
    /// Mano of the first round.
    pub first_mano: PlayerId,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            piedras_para_ganar: PIEDRAS_PARA_GANAR,
            envido_por_defecto: ENVIDO_POR_DEFECTO,
            first_mano: 0,
        }
    }
}

impl EngineConfig {
    /// Build from optional JSON, falling back to defaults on anything unreadable.
    pub fn from_json(config: Option<&JsonValue>) -> Self {
        let mut parsed = config
            .and_then(|json| serde_json::from_value::<Self>(json.clone()).ok())
            .unwrap_or_default();
        parsed.sanitize();
        parsed
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn first_mano(mut self, seat: PlayerId) -> Self {
        self.first_mano = seat % 4;
        self
    }

    pub fn piedras(mut self, piedras: u8) -> Self {
        self.piedras_para_ganar = piedras;
        self.sanitize();
        self
    }

    fn sanitize(&mut self) {
        if self.piedras_para_ganar == 0 {
            self.piedras_para_ganar = PIEDRAS_PARA_GANAR;
        }
        if self.envido_por_defecto == 0 {
            self.envido_por_defecto = ENVIDO_POR_DEFECTO;
        }
        self.first_mano %= 4;
    }
}
