//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Builders for markets, catalogs and quote events.
//! - [`stream`] - Mock [`QuoteStream`](crate::runtime::QuoteStream) and
//!   [`OrderExecutor`](crate::runtime::OrderExecutor) implementations.
//! - [`config`] - Canonical engine configurations.

pub mod config;
pub mod domain;
pub mod stream;

use parking_lot::Mutex;

use crate::domain::OrderPlan;
use crate::engine::PlanSink;

/// A [`PlanSink`] that keeps every plan it receives.
#[derive(Debug, Default)]
pub struct CollectingSink {
    plans: Mutex<Vec<OrderPlan>>,
}

impl CollectingSink {
    /// Copies of the plans received so far, in submission order.
    pub fn plans(&self) -> Vec<OrderPlan> {
        self.plans.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.plans.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.lock().is_empty()
    }
}

impl PlanSink for CollectingSink {
    fn submit(&self, plan: OrderPlan) {
        self.plans.lock().push(plan);
    }
}
