//! Order plan executors.
//!
//! - [`LogExecutor`] - Dry run: logs plans and orders
//! - [`PlanWriter`] - Writes each plan as one JSON line for a downstream submitter

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::domain::OrderPlan;
use crate::error::Result;
use crate::runtime::{ExecutionReport, OrderExecutor};

/// Dry-run executor: logs every order instead of submitting it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogExecutor;

impl LogExecutor {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OrderExecutor for LogExecutor {
    async fn execute(&self, plan: &OrderPlan) -> Result<ExecutionReport> {
        info!(
            plan_id = %plan.plan_id,
            group = %plan.group_id,
            strategy = %plan.strategy,
            orders = plan.len(),
            expected_profit = %plan.expected_profit,
            profit_bps = plan.expected_profit_bps,
            truncated = plan.truncated,
            "Dry-run plan"
        );
        for (position, order) in plan.orders.iter().enumerate() {
            info!(
                plan_id = %plan.plan_id,
                position,
                token = %order.token_id,
                side = %order.side,
                price = %order.limit_price,
                size = order.size,
                "Dry-run order"
            );
        }
        Ok(ExecutionReport {
            plan_id: plan.plan_id,
            submitted: plan.len(),
            dry_run: true,
        })
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Writes every plan as a JSON line to the wrapped async writer.
pub struct PlanWriter {
    out: Mutex<Box<dyn AsyncWrite + Send + Unpin>>,
}

impl PlanWriter {
    pub fn new(out: impl AsyncWrite + Send + Unpin + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
        }
    }

    /// A writer on standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

#[async_trait]
impl OrderExecutor for PlanWriter {
    async fn execute(&self, plan: &OrderPlan) -> Result<ExecutionReport> {
        let mut line = serde_json::to_vec(plan)?;
        line.push(b'\n');
        {
            let mut out = self.out.lock().await;
            out.write_all(&line).await?;
            out.flush().await?;
        }
        debug!(plan_id = %plan.plan_id, orders = plan.len(), "Plan written");
        Ok(ExecutionReport {
            plan_id: plan.plan_id,
            submitted: plan.len(),
            dry_run: false,
        })
    }

    fn name(&self) -> &'static str {
        "plan-writer"
    }
}
