//! Exchange-ready order plans.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::id::{GroupId, TokenId};
use super::money::{Price, Size};
use super::opportunity::{Side, StrategyTag};
use crate::error::EngineError;

/// One order of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub token_id: TokenId,
    pub side: Side,
    pub limit_price: Price,
    pub size: Size,
}

/// An ordered batch of orders plus the metadata of the opportunity it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlan {
    pub plan_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub strategy: StrategyTag,
    pub group_id: GroupId,
    pub expected_profit: Price,
    pub expected_profit_bps: i64,
    pub orders: Vec<Order>,
    /// Whether legs were dropped to fit the batch ceiling.
    pub truncated: bool,
    pub dropped_legs: usize,
}

impl OrderPlan {
    /// Number of orders in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// The truncation report for operators, if legs were dropped.
    ///
    /// A truncated multi-leg plan may no longer be a true arbitrage.
    #[must_use]
    pub fn truncation(&self) -> Option<EngineError> {
        self.truncated.then(|| EngineError::TruncatedPlan {
            group_id: self.group_id.clone(),
            strategy: self.strategy,
            kept: self.orders.len(),
            dropped: self.dropped_legs,
        })
    }
}
