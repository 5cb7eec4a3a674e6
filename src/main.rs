//! Ethereum transaction parser (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────┐
//!                 │                      TX PARSER                        │
//!                 │                                                       │
//!   Chain node    │  ┌───────────┐    ┌──────────┐    ┌───────────────┐  │
//!  ◀──────────────┼──│  chain    │◀───│ crawler  │◀───│   scheduler   │  │
//!  eth_blockNumber│  │  client   │    │  (filter)│    │ (fixed tick)  │  │
//!  eth_getBlock.. │  └───────────┘    └────┬─────┘    └───────────────┘  │
//!                 │                        │ save (rebuild)              │
//!                 │                        ▼                             │
//!   API client    │  ┌───────────┐    ┌──────────┐                       │
//!  ───────────────┼─▶│   http    │───▶│  index   │                       │
//!                 │  │  server   │    │  store   │                       │
//!                 │  └───────────┘    └──────────┘                       │
//!                 └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use tx_parser::config::{load_config, validation::validate_config, ConfigError, ParserConfig};
use tx_parser::lifecycle::startup;
use tx_parser::observability::logging;

#[derive(Parser)]
#[command(name = "tx-parser")]
#[command(about = "Index Ethereum transactions for subscribed addresses", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `chain.rpc_url`.
    #[arg(long)]
    rpc_url: Option<String>,

    /// Override `listener.bind_address`.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ParserConfig::default(),
    };
    if let Some(rpc_url) = args.rpc_url {
        config.chain.rpc_url = rpc_url;
    }
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability)?;

    tracing::info!("tx-parser v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        rpc_url = %config.chain.rpc_url,
        interval_ms = config.crawler.interval_ms,
        "Configuration loaded"
    );

    startup::run(config).await?;
    Ok(())
}
