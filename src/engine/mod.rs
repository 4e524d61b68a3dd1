//! Decision pipeline.
//!
//! [`Engine::on_quote`] runs one market update through the whole pipeline:
//! store the quote, snapshot and evaluate every group that reads the token,
//! gate on profit, throttle per (group, strategy) and hand the resulting
//! order plans to a [`PlanSink`]. Calls for different tokens may run
//! concurrently from any number of threads.
//!
//! - [`book`] - Per-token quote arena
//! - [`gate`] - Minimum profit check
//! - [`throttle`] - Per-key cooldown
//! - [`planner`] - Order plan builder
//! - [`stats`] - Counters

pub mod book;
pub mod gate;
pub mod planner;
pub mod stats;
pub mod throttle;

use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub use book::{Applied, QuoteBook};
pub use planner::{LegPriority, Planner};
pub use stats::{EngineStats, StatsSnapshot};
pub use throttle::{Throttle, ThrottleState};

use crate::config::EngineConfig;
use crate::domain::strategy::{self, Sizing};
use crate::domain::{
    GroupCensus, Market, MarketIndex, OrderPlan, Quote, QuoteEvent, Slot, TokenId,
};
use crate::error::EngineError;

/// Receiver of emitted order plans.
///
/// Called on the hot path; implementations must not block.
pub trait PlanSink: Send + Sync {
    fn submit(&self, plan: OrderPlan);
}

impl PlanSink for mpsc::UnboundedSender<OrderPlan> {
    fn submit(&self, plan: OrderPlan) {
        if let Err(e) = self.send(plan) {
            warn!(plan_id = %e.0.plan_id, "Plan receiver closed, dropping plan");
        }
    }
}

/// Index and quote book that are replaced together on rebuild.
struct Universe {
    index: MarketIndex,
    book: QuoteBook,
}

/// What one market update produced.
#[derive(Debug, Default)]
pub struct UpdateOutcome {
    /// Groups snapshotted and evaluated.
    pub groups_evaluated: usize,
    /// Opportunities found before gating.
    pub opportunities: usize,
    /// Plans handed to the sink.
    pub plans: Vec<OrderPlan>,
    /// Group evaluations abandoned because a newer update landed first.
    pub aborted: Vec<EngineError>,
}

/// The arbitrage decision engine.
pub struct Engine {
    universe: RwLock<Arc<Universe>>,
    sizing: Sizing,
    min_profit_bps: i64,
    throttle: Throttle,
    planner: Planner,
    stats: EngineStats,
    sink: Arc<dyn PlanSink>,
}

impl Engine {
    /// Create an engine over a built index.
    #[must_use]
    pub fn new(index: MarketIndex, config: &EngineConfig, sink: Arc<dyn PlanSink>) -> Self {
        let book = QuoteBook::new(&index);
        Self {
            universe: RwLock::new(Arc::new(Universe { index, book })),
            sizing: config.sizing(),
            min_profit_bps: config.min_profit_bps,
            throttle: Throttle::new(config.cooldown(), config.max_throttle_entries),
            planner: Planner::new(config.max_batch_size, config.leg_priority),
            stats: EngineStats::default(),
            sink,
        }
    }

    /// Process one market update.
    ///
    /// # Errors
    ///
    /// Returns `UnknownMarket` for a token outside the catalog and
    /// `StaleUpdate` for an out-of-order sequence. In both cases nothing is
    /// stored or evaluated.
    pub fn on_quote(&self, event: QuoteEvent, now: Instant) -> Result<UpdateOutcome, EngineError> {
        let (token, quote) = event.into_quote();

        // The read guard spans the store so a concurrent rebuild copies it.
        let guard = self.universe.read();
        let universe = Arc::clone(&guard);
        let stored = universe.book.apply(&universe.index, &token, quote);
        drop(guard);

        let applied = match stored {
            Ok(applied) => applied,
            Err(e) => {
                match &e {
                    EngineError::StaleUpdate { .. } => {
                        self.stats.stale_update();
                        debug!(token = %token, error = %e, "Dropping stale update");
                    }
                    _ => {
                        self.stats.unknown_token();
                        warn!(token = %token, error = %e, "Dropping update");
                    }
                }
                return Err(e);
            }
        };
        self.stats.update_applied();

        let mut outcome = UpdateOutcome::default();
        for &group_idx in applied.groups {
            self.evaluate_group(&universe, group_idx, &token, &applied, now, &mut outcome);
        }
        Ok(outcome)
    }

    fn evaluate_group(
        &self,
        universe: &Universe,
        group_idx: usize,
        token: &TokenId,
        trigger: &Applied<'_>,
        now: Instant,
        outcome: &mut UpdateOutcome,
    ) {
        let group = universe.index.group(group_idx);
        let snapshot = universe.book.snapshot(group.reads());

        let observed = snapshot.sequence(trigger.slot);
        if observed != trigger.sequence {
            self.stats.inconsistent_read();
            let e = EngineError::InconsistentRead {
                group_id: group.id().clone(),
                token_id: token.clone(),
                expected: trigger.sequence,
                observed,
            };
            debug!(error = %e, "Evaluation superseded");
            outcome.aborted.push(e);
            return;
        }
        outcome.groups_evaluated += 1;

        for opportunity in strategy::evaluate(group, &snapshot, &self.sizing) {
            self.stats.opportunity();
            outcome.opportunities += 1;

            if !gate::passes(&opportunity, self.min_profit_bps) {
                self.stats.below_threshold();
                debug!(
                    group = %group.id(),
                    strategy = %opportunity.strategy(),
                    profit_bps = opportunity.profit_bps(),
                    "Below threshold"
                );
                continue;
            }
            if !self.throttle.try_fire(&opportunity.throttle_key(), now) {
                self.stats.throttled();
                debug!(key = %opportunity.throttle_key(), "Throttled");
                continue;
            }

            let plan = self.planner.build(&opportunity);
            self.stats.plan_emitted(plan.truncated);
            info!(
                plan_id = %plan.plan_id,
                group = %plan.group_id,
                strategy = %plan.strategy,
                orders = plan.len(),
                size = opportunity.size(),
                profit = %plan.expected_profit,
                profit_bps = plan.expected_profit_bps,
                "Plan emitted"
            );
            self.sink.submit(plan.clone());
            outcome.plans.push(plan);
        }
    }

    /// Replace the catalog.
    ///
    /// Builds a fresh index, carries over the quotes of every token that is
    /// in both catalogs, and swaps it in atomically. Updates are held off
    /// from the copy until the swap, so none lands only in the old book.
    /// Evaluations already running finish against the old catalog.
    /// Throttle state is kept.
    ///
    /// # Errors
    ///
    /// Returns the build error and leaves the current catalog in place.
    pub fn rebuild(&self, markets: Vec<Market>) -> Result<GroupCensus, EngineError> {
        let index = MarketIndex::build(markets)?;
        let book = QuoteBook::new(&index);

        let mut current = self.universe.write();
        let mut carried = 0usize;
        for slot in (0..current.index.token_count()).map(Slot::new) {
            let token = current.index.token(slot);
            if let Some(quote) = current.book.get(slot) {
                if book.apply(&index, token, quote).is_ok() {
                    carried += 1;
                }
            }
        }

        let census = index.census();
        let (markets, groups) = (index.markets().len(), index.groups().len());
        *current = Arc::new(Universe { index, book });
        drop(current);

        info!(markets, groups, quotes_carried = carried, "Catalog rebuilt");
        Ok(census)
    }

    /// Latest quote stored for a token.
    #[must_use]
    pub fn quote(&self, token: &TokenId) -> Option<Quote> {
        let universe = self.universe.read();
        let slot = universe.index.slot(token)?;
        universe.book.get(slot)
    }

    /// Group counts of the current catalog.
    #[must_use]
    pub fn census(&self) -> GroupCensus {
        self.universe.read().index.census()
    }

    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    #[must_use]
    pub const fn throttle(&self) -> &Throttle {
        &self.throttle
    }
}
