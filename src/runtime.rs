//! Async runtime around the engine.
//!
//! [`run`] pulls quote events from a [`QuoteStream`], feeds them through
//! [`Engine::on_quote`] and drains emitted plans into an [`OrderExecutor`]
//! on a separate task, so execution latency never stalls the update loop.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::domain::{MarketIndex, OrderPlan, QuoteEvent};
use crate::engine::{Engine, StatsSnapshot};
use crate::error::{EngineError, Error, Result};

/// Source of market updates.
#[async_trait]
pub trait QuoteStream: Send {
    /// Receive the next event.
    ///
    /// Returns `None` once the stream is exhausted. An `Err` item is a single
    /// undecodable update; the stream may still yield more.
    async fn next_event(&mut self) -> Option<Result<QuoteEvent>>;

    /// Get the source name for logging.
    fn source_name(&self) -> &'static str;
}

#[async_trait]
impl QuoteStream for Box<dyn QuoteStream> {
    async fn next_event(&mut self) -> Option<Result<QuoteEvent>> {
        (**self).next_event().await
    }

    fn source_name(&self) -> &'static str {
        (**self).source_name()
    }
}

/// Result of submitting one plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionReport {
    pub plan_id: Uuid,
    /// Orders accepted by the venue (or logged, in dry-run).
    pub submitted: usize,
    pub dry_run: bool,
}

/// Consumer of order plans.
#[async_trait]
pub trait OrderExecutor: Send + Sync {
    /// Submit every order of the plan as one batch.
    async fn execute(&self, plan: &OrderPlan) -> Result<ExecutionReport>;

    /// Get the executor name for logging.
    fn name(&self) -> &'static str;
}

/// Counts for one completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Events read from the stream, including undecodable ones.
    pub events: u64,
    /// Events that could not be decoded.
    pub malformed: u64,
    /// Events the engine dropped as stale or unknown.
    pub dropped: u64,
    /// Group evaluations aborted by a newer update.
    pub aborted: u64,
    pub plans_executed: u64,
    pub plans_failed: u64,
    pub stats: StatsSnapshot,
}

#[derive(Debug, Default)]
struct Dispatched {
    executed: u64,
    failed: u64,
}

/// Run the engine over `stream` until it is exhausted.
///
/// # Errors
///
/// Returns an error if the dispatcher task panics. Per-event failures are
/// counted and logged, never propagated.
pub async fn run<S>(
    index: MarketIndex,
    config: &EngineConfig,
    mut stream: S,
    executor: Arc<dyn OrderExecutor>,
) -> Result<RunSummary>
where
    S: QuoteStream,
{
    let (tx, rx) = mpsc::unbounded_channel::<OrderPlan>();
    let dispatcher = tokio::spawn(dispatch(rx, Arc::clone(&executor)));
    let engine = Engine::new(index, config, Arc::new(tx));

    let census = engine.census();
    info!(
        source = stream.source_name(),
        executor = executor.name(),
        binary = census.binary,
        complement = census.complement,
        same_direction = census.same_direction,
        partition = census.partition,
        combination = census.combination,
        "Engine started"
    );

    let mut events = 0u64;
    let mut malformed = 0u64;
    let mut dropped = 0u64;
    let mut aborted = 0u64;

    while let Some(item) = stream.next_event().await {
        events += 1;
        let event = match item {
            Ok(event) => event,
            Err(e) => {
                malformed += 1;
                warn!(source = stream.source_name(), error = %e, "Skipping undecodable event");
                continue;
            }
        };

        match engine.on_quote(event, Instant::now()) {
            Ok(outcome) => {
                aborted += outcome.aborted.len() as u64;
                for e in &outcome.aborted {
                    debug!(error = %e, "Evaluation superseded");
                }
            }
            Err(EngineError::StaleUpdate { .. } | EngineError::UnknownMarket { .. }) => dropped += 1,
            Err(e) => {
                dropped += 1;
                warn!(error = %e, "Update rejected");
            }
        }
    }

    let stats = engine.stats();
    // Dropping the engine drops the only sender and lets the dispatcher finish.
    drop(engine);

    let dispatched = dispatcher.await.map_err(|e| {
        error!(error = %e, "Dispatcher task failed");
        Error::Execution(format!("dispatcher task failed: {e}"))
    })?;

    let summary = RunSummary {
        events,
        malformed,
        dropped,
        aborted,
        plans_executed: dispatched.executed,
        plans_failed: dispatched.failed,
        stats,
    };
    info!(
        events = summary.events,
        malformed = summary.malformed,
        dropped = summary.dropped,
        plans = summary.stats.plans_emitted,
        executed = summary.plans_executed,
        failed = summary.plans_failed,
        "Stream exhausted"
    );
    Ok(summary)
}

async fn dispatch(
    mut rx: mpsc::UnboundedReceiver<OrderPlan>,
    executor: Arc<dyn OrderExecutor>,
) -> Dispatched {
    let mut dispatched = Dispatched::default();
    while let Some(plan) = rx.recv().await {
        match executor.execute(&plan).await {
            Ok(report) => {
                dispatched.executed += 1;
                debug!(
                    plan_id = %report.plan_id,
                    submitted = report.submitted,
                    dry_run = report.dry_run,
                    "Plan executed"
                );
            }
            Err(e) => {
                dispatched.failed += 1;
                error!(
                    plan_id = %plan.plan_id,
                    executor = executor.name(),
                    error = %e,
                    "Plan execution failed"
                );
            }
        }
    }
    dispatched
}
