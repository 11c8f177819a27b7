#![forbid(unsafe_code)]
//! Agrochain API server
//!
//! Owns the process-wide ledger singleton and serves the dashboard API.

use agrochain::api::{run_api_server, Node};
use agrochain::config::load_config;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "agro-server", about = "Agrochain ledger API server")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override the API port from the configuration
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args.config)?;
    let port = args.port.unwrap_or(config.network.api_port);

    // The ledger lives here, at the composition root, and is handed to the
    // API as shared state. No ambient globals.
    let node = Arc::new(Node::new(&config.ledger));

    tracing::info!(
        port,
        difficulty = config.ledger.difficulty,
        "starting agro-server"
    );

    run_api_server(node, port).await
}
