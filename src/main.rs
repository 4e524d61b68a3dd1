use anyhow::Context;
use clap::Parser;
use rangearb::cli::{self, output, Cli, Commands};
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(e) = dispatch(cli).await {
        error!(error = %e, "Fatal error");
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Check(args) => {
            cli::check::execute(&args)
                .with_context(|| format!("catalog check failed for {}", args.catalog.display()))?;
        }
        Commands::Replay(args) => {
            tokio::select! {
                result = cli::replay::execute(&args) => {
                    result.with_context(|| format!("replay of {} failed", args.quotes.display()))?;
                }
                _ = signal::ctrl_c() => {
                    info!("Shutdown signal received");
                }
            }
            info!("rangearb stopped");
        }
    }
    Ok(())
}
