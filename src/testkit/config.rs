//! Canonical test configurations.
//!
//! Single source of truth for engine configs used across tests.

use crate::config::EngineConfig;

/// Engine config that lets every profitable opportunity through the gate.
pub fn eager() -> EngineConfig {
    EngineConfig {
        min_profit_bps: 0,
        ..EngineConfig::default()
    }
}

/// Engine config with the given threshold and cooldown.
pub fn engine(min_profit_bps: i64, cooldown_ms: u64) -> EngineConfig {
    EngineConfig {
        min_profit_bps,
        cooldown_ms,
        ..EngineConfig::default()
    }
}
