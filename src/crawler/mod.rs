//! Crawl pipeline.
//!
//! # Data Flow
//! ```text
//! scheduler.rs (fixed interval, single-flight)
//!     → crawler.rs run()
//!         → ChainClient::block_number
//!         → compare with store current_block (duplicate → no-op)
//!         → ChainClient::get_block_by_number
//!         → filter by subscribed addresses
//!         → AddressStore::save_transactions
//! ```
//!
//! # Design Decisions
//! - Chain failures abort only the current cycle; the next tick proceeds
//! - A duplicate head is a successful no-op, never a reported failure
//! - No retries or backoff inside a cycle

#[allow(clippy::module_inception)]
pub mod crawler;
pub mod scheduler;

pub use crawler::{CrawlError, CrawlOutcome, Crawler};
pub use scheduler::Scheduler;
