//! Stock quote gateway (v1)
//!
//! Authenticated HTTP front for the Alpha Vantage `GLOBAL_QUOTE` API.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client                         QUOTE GATEWAY
//!     ──────── POST /api/stock ──▶ ┌──────────────────────────────────┐
//!                                  │ http (request id, trace, limits) │
//!                                  │              │                   │
//!                                  │              ▼                   │
//!                                  │ quoting::QuoteGateway            │
//!                                  │   1. auth::CredentialVerifier    │
//!                                  │   2. parse ticker                │
//!                                  │   3. upstream::QuoteProvider ────┼──▶ Alpha Vantage
//!                                  │   4/5. extract price             │
//!     ◀──────── {ticker: price} ── │ http::response (errors → JSON)   │
//!                                  └──────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use quote_gateway::config::load_config;
use quote_gateway::lifecycle::{startup, Shutdown};
use quote_gateway::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "quote-gateway")]
#[command(about = "Authenticated stock price gateway", long_about = None)]
struct Args {
    /// TOML configuration file; defaults and environment are used without it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    init_logging(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        provider = %config.provider.base_url,
        "quote-gateway starting"
    );

    let shutdown = Shutdown::new();
    let _signals = shutdown.trigger_on_signal();

    startup::run(config, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
