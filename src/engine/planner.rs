//! Order plan builder.
//!
//! Turns an accepted opportunity into an ordered batch of limit orders that
//! fits the exchange batch ceiling.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::domain::{Leg, Opportunity, Order, OrderPlan};

/// Exchange batch ceiling.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 15;

/// Which legs survive when a plan exceeds the batch ceiling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegPriority {
    /// Parent legs first, then children by ascending lower bound.
    #[default]
    ParentFirst,
    /// Legs in the order the evaluator produced them.
    Evaluator,
}

/// Builds order plans.
#[derive(Debug, Clone)]
pub struct Planner {
    max_batch_size: usize,
    priority: LegPriority,
}

impl Planner {
    #[must_use]
    pub fn new(max_batch_size: usize, priority: LegPriority) -> Self {
        Self {
            max_batch_size: max_batch_size.max(1),
            priority,
        }
    }

    #[must_use]
    pub const fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// Build the plan for an opportunity.
    ///
    /// Legs beyond the batch ceiling are dropped and the plan is flagged;
    /// the drop is logged at warn level.
    #[must_use]
    pub fn build(&self, opportunity: &Opportunity) -> OrderPlan {
        let mut legs: Vec<&Leg> = opportunity.legs().iter().collect();
        if self.priority == LegPriority::ParentFirst {
            // Stable: equal roles keep evaluator order.
            legs.sort_by_key(|leg| leg.role());
        }

        let dropped_legs = legs.len().saturating_sub(self.max_batch_size);
        legs.truncate(self.max_batch_size);

        let orders = legs
            .into_iter()
            .map(|leg| Order {
                token_id: leg.token_id().clone(),
                side: leg.side(),
                limit_price: leg.price(),
                size: leg.size(),
            })
            .collect();

        let plan = OrderPlan {
            plan_id: Uuid::new_v4(),
            created_at: Utc::now(),
            strategy: opportunity.strategy(),
            group_id: opportunity.group_id().clone(),
            expected_profit: opportunity.profit(),
            expected_profit_bps: opportunity.profit_bps(),
            orders,
            truncated: dropped_legs > 0,
            dropped_legs,
        };

        if let Some(report) = plan.truncation() {
            warn!(
                plan_id = %plan.plan_id,
                group = %plan.group_id,
                strategy = %plan.strategy,
                kept = plan.len(),
                dropped = dropped_legs,
                error = %report,
                "Plan truncated to batch ceiling"
            );
        }
        plan
    }
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BATCH_SIZE, LegPriority::default())
    }
}
