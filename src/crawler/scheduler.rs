//! Fixed-interval crawl scheduling.
//!
//! Ticks fire on a fixed period regardless of how long a cycle takes. Each
//! cycle runs as its own task; a tick that arrives while the previous cycle
//! is still in flight is skipped, so at most one cycle touches the store at a
//! time.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::config::CrawlerConfig;
use crate::crawler::crawler::{CrawlOutcome, Crawler};
use crate::observability::metrics;

pub struct Scheduler {
    crawler: Arc<Crawler>,
    interval: Duration,
}

impl Scheduler {
    pub fn new(crawler: Arc<Crawler>, config: &CrawlerConfig) -> Self {
        Self {
            crawler,
            interval: Duration::from_millis(config.interval_ms),
        }
    }

    /// Spawn the scheduling loop onto the runtime.
    pub fn spawn(self, shutdown: broadcast::Receiver<()>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    /// Tick until shutdown, then wait for the in-flight cycle to finish.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(interval = ?self.interval, "Crawl scheduler starting");

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut in_flight: Option<JoinHandle<()>> = None;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match in_flight.take() {
                        Some(cycle) if !cycle.is_finished() => {
                            tracing::warn!("Previous crawl cycle still running, skipping tick");
                            metrics::record_skipped_tick();
                            in_flight = Some(cycle);
                        }
                        finished => {
                            // Already complete, so this returns without blocking the tick.
                            if let Some(cycle) = finished {
                                reap(cycle).await;
                            }
                            let crawler = self.crawler.clone();
                            in_flight = Some(tokio::spawn(async move {
                                run_cycle(&crawler).await;
                            }));
                        }
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Crawl scheduler received shutdown signal, exiting loop");
                    break;
                }
            }
        }

        if let Some(cycle) = in_flight {
            reap(cycle).await;
        }
        tracing::info!("Crawl scheduler stopped");
    }
}

/// Wait for a cycle task and log it if it panicked. Returns whether the
/// task ran to completion.
async fn reap(cycle: JoinHandle<()>) -> bool {
    match cycle.await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, "Crawl cycle task failed");
            metrics::record_crawl_panic();
            false
        }
    }
}

/// Run one cycle and report its result. Failures never stop the scheduler.
async fn run_cycle(crawler: &Crawler) {
    let start = Instant::now();
    match crawler.run().await {
        Ok(CrawlOutcome::Indexed { .. }) => metrics::record_crawl("indexed", start),
        Ok(CrawlOutcome::Duplicate { .. }) => metrics::record_crawl("duplicate", start),
        Err(e) => {
            tracing::error!(error = %e, "Error executing crawl cycle");
            metrics::record_crawl("failed", start);
        }
    }
}
