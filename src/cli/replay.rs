//! Handler for the `replay` command.

use std::sync::Arc;

use tracing::info;

use crate::adapter::{Catalog, LogExecutor, PlanWriter, ReplayStream};
use crate::cli::{output, ReplayArgs};
use crate::config::Config;
use crate::error::Result;
use crate::runtime::{self, OrderExecutor, RunSummary};

/// Replay a quote file through the engine.
pub async fn execute(args: &ReplayArgs) -> Result<RunSummary> {
    let mut config = Config::load(&args.config)?;

    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.format = "json".to_string();
    }
    if let Some(bps) = args.min_profit_bps {
        config.engine.min_profit_bps = bps;
    }
    config.validate()?;

    config.init_logging();

    let index = Catalog::load(&args.catalog)?.into_index()?;
    let stream = ReplayStream::open(&args.quotes).await?;
    let executor: Arc<dyn OrderExecutor> = if args.dry_run {
        info!("Dry-run mode enabled - plans are logged, not written");
        Arc::new(LogExecutor::new())
    } else {
        Arc::new(PlanWriter::stdout())
    };

    let summary = runtime::run(index, &config.engine, stream, executor).await?;

    // Without dry-run, stdout carries the plans.
    if args.dry_run {
        output::section("Replay summary");
        output::key_value("Events", summary.events);
        output::key_value("Malformed", summary.malformed);
        output::key_value("Dropped", summary.dropped);
        output::key_value("Opportunities", summary.stats.opportunities);
        output::key_value("Plans", summary.stats.plans_emitted);
        output::key_value("Truncated", summary.stats.plans_truncated);
        output::key_value("Throttled", summary.stats.throttled);
    }

    Ok(summary)
}
