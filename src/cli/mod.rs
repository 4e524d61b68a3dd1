//! Command-line interface definitions.

pub mod check;
pub mod output;
pub mod replay;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Rangearb - Arbitrage decisions for related range prediction markets.
#[derive(Parser, Debug)]
#[command(name = "rangearb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a recorded quote stream through the engine
    Replay(ReplayArgs),

    /// Validate a market catalog and print its group census
    Check(CheckArgs),
}

/// Arguments for the `replay` subcommand.
#[derive(Parser, Debug)]
pub struct ReplayArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Path to the market catalog (JSON)
    #[arg(long)]
    pub catalog: PathBuf,

    /// Path to the quote stream (JSON lines)
    #[arg(long)]
    pub quotes: PathBuf,

    /// Log plans instead of writing them to stdout
    #[arg(long)]
    pub dry_run: bool,

    /// Override log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,

    /// Override minimum profit threshold in basis points
    #[arg(long)]
    pub min_profit_bps: Option<i64>,
}

/// Arguments for the `check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Path to the market catalog (JSON)
    #[arg(long)]
    pub catalog: PathBuf,

    /// Also validate this configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
