use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::strategy::Sizing;
use crate::engine::planner::{LegPriority, DEFAULT_MAX_BATCH_SIZE};

/// Decision pipeline configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Minimum profit in basis points of cost for an opportunity to fire.
    #[serde(default = "default_min_profit_bps")]
    pub min_profit_bps: i64,

    /// Cooldown per (group, strategy) after a plan is emitted.
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,

    /// Exchange batch ceiling.
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,

    /// Which legs survive truncation.
    #[serde(default)]
    pub leg_priority: LegPriority,

    /// Bound on throttle records.
    #[serde(default = "default_max_throttle_entries")]
    pub max_throttle_entries: usize,

    /// Cap on the cost of a single opportunity; unlimited when unset.
    #[serde(default)]
    pub max_cost: Option<Decimal>,
}

fn default_min_profit_bps() -> i64 {
    50
}

fn default_cooldown_ms() -> u64 {
    1_000
}

fn default_max_batch_size() -> usize {
    DEFAULT_MAX_BATCH_SIZE
}

fn default_max_throttle_entries() -> usize {
    10_000
}

impl EngineConfig {
    #[must_use]
    pub const fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    #[must_use]
    pub fn sizing(&self) -> Sizing {
        Sizing {
            max_cost: self.max_cost,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_profit_bps: default_min_profit_bps(),
            cooldown_ms: default_cooldown_ms(),
            max_batch_size: default_max_batch_size(),
            leg_priority: LegPriority::default(),
            max_throttle_entries: default_max_throttle_entries(),
            max_cost: None,
        }
    }
}
