//! Tunables for an engine session.

use reef_core::CharacterKind;
use serde::Deserialize;

/// Seed used when the configuration does not name one.
pub const DEFAULT_CRAB_SEED: u64 = 0x5eed_f15e;

/// Session configuration, usually read from the `[engine]` table of a TOML file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Wall-clock length of one gravity tick in milliseconds.
    pub tick_millis: u64,
    /// Character that receives control when a level loads.
    pub start_with: CharacterKind,
    /// Whether crabs wander on their own.
    pub crab_wander: bool,
    /// Seed for the crab wander stream.
    pub crab_seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_millis: 500,
            start_with: CharacterKind::BigFish,
            crab_wander: true,
            crab_seed: DEFAULT_CRAB_SEED,
        }
    }
}
