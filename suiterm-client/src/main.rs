//! suiterm entry point.

use clap::Parser;
use suiterm_client::cli::{self, Cli};
use suiterm_client::config::ClientConfig;
use suiterm_client::error::CliError;
use suiterm_client::logging::init_logging;
use suiterm_client::{RestClient, WalletStore};
use suiterm_core::sanitize_output;

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    let config = ClientConfig::load(cli.config.as_deref())?;
    init_logging(config.log_format)?;
    let shown = sanitize_output(&format!("{:?}", cli.command));
    tracing::info!(api = %config.api_base_url, command = %shown, "Starting suiterm");

    let client = RestClient::new(&config)?;
    let store = WalletStore::new(client, config.cache.policy());

    let output = cli::run(&store, cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    let stats = store.cache_stats();
    tracing::debug!(
        hits = stats.hits,
        misses = stats.misses,
        joined = stats.joined,
        hit_rate = stats.hit_rate(),
        "Cache usage"
    );
    Ok(())
}
