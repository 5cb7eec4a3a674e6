//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems in dependency order
//! - Start the crawl scheduler and the HTTP API
//! - Drain both on shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Nothing after startup is fatal; a failed crawl cycle only delays the index

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::chain::{ChainError, EthereumClient};
use crate::config::ParserConfig;
use crate::crawler::{Crawler, Scheduler};
use crate::http::HttpServer;
use crate::index::{AddressStore, InMemoryStore};
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;
use crate::parser::ParserService;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to build chain client: {0}")]
    Chain(#[from] ChainError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("failed to install metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("HTTP server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Run the service until SIGINT/SIGTERM.
pub async fn run(config: ParserConfig) -> Result<(), StartupError> {
    let shutdown = Shutdown::new();

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    let running = serve(config, listener, &shutdown);
    tokio::pin!(running);

    tokio::select! {
        result = &mut running => return result,
        _ = signals::wait_for_signal() => shutdown.trigger(),
    }

    running.await
}

/// Wire all subsystems onto an already bound listener and run until
/// `shutdown` fires.
pub async fn serve(
    config: ParserConfig,
    listener: TcpListener,
    shutdown: &Shutdown,
) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let store: Arc<dyn AddressStore> = Arc::new(InMemoryStore::new());
    let client = Arc::new(EthereumClient::new(&config.chain)?);

    let scheduler = if config.crawler.enabled {
        let crawler = Arc::new(Crawler::new(client, store.clone()));
        Some(Scheduler::new(crawler, &config.crawler).spawn(shutdown.subscribe()))
    } else {
        tracing::info!("Crawler disabled");
        None
    };

    let server = HttpServer::new(&config, ParserService::new(store));
    server.run(listener, shutdown.subscribe()).await?;

    if let Some(handle) = scheduler {
        if let Err(e) = handle.await {
            tracing::error!(error = %e, "Crawl scheduler task failed");
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
