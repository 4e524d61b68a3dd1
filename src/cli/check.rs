//! Handler for the `check` command.

use crate::adapter::Catalog;
use crate::cli::{output, CheckArgs};
use crate::config::Config;
use crate::domain::GroupCensus;
use crate::error::Result;

/// Validate the catalog (and optionally a config file) without streaming.
pub fn execute(args: &CheckArgs) -> Result<GroupCensus> {
    if let Some(path) = &args.config {
        Config::load(path)?;
        output::ok(&format!("Configuration {} is valid", path.display()));
    }

    let index = Catalog::load(&args.catalog)?.into_index()?;
    let census = index.census();

    output::section(&format!("Catalog {}", args.catalog.display()));
    output::key_value("Markets", index.markets().len());
    output::key_value("Tokens", index.token_count());
    output::key_value("Groups", index.groups().len());
    output::key_value("  binary", census.binary);
    output::key_value("  complement", census.complement);
    output::key_value("  same-direction", census.same_direction);
    output::key_value("  partition", census.partition);
    output::key_value("  combination", census.combination);
    println!();
    output::ok("Catalog is valid");

    Ok(census)
}
