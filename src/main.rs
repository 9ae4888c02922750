//! Wallet gateway daemon.

use std::path::PathBuf;

use clap::Parser;

use wallet_gateway::config::loader::load_config;
use wallet_gateway::observability;
use wallet_gateway::{GatewayConfig, GatewayConnection};

#[derive(Parser)]
#[command(name = "wallet-gateway")]
#[command(about = "Gateway bridging a local wallet to a remote ledger node", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Remote node WebSocket URL (overrides the config file).
    #[arg(long)]
    node_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    observability::logging::init(&format!(
        "wallet_gateway={},tower_http=warn",
        config.observability.log_level
    ));

    tracing::info!("wallet-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let node_url = cli.node_url.unwrap_or_else(|| config.node.url.clone());
    let connection = GatewayConnection::new(config);
    connection.connect(&node_url).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    connection.close().await;
    tracing::info!("Shutdown complete");
    Ok(())
}
