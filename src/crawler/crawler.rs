//! One crawl cycle: head height → block → matches → store.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use crate::chain::{Block, ChainClient, ChainError, Transaction};
use crate::index::{canonical, AddressStore, StoreError};
use crate::observability::metrics;

/// Errors that abort a crawl cycle.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Head height equals the last processed block. Never leaves `run`.
    #[error("block {0} already processed")]
    DuplicateBlock(u64),
}

/// What a successful cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// Block was fetched and the index rebuilt from its matches.
    Indexed { block: u64, matched: usize },
    /// Head had not moved; nothing was written.
    Duplicate { block: u64 },
}

/// Polls the chain head and indexes transactions touching subscribed
/// addresses.
pub struct Crawler {
    client: Arc<dyn ChainClient>,
    store: Arc<dyn AddressStore>,
}

impl Crawler {
    pub fn new(client: Arc<dyn ChainClient>, store: Arc<dyn AddressStore>) -> Self {
        Self { client, store }
    }

    /// Run a single cycle. Must not overlap with itself on the same store;
    /// the scheduler guarantees that.
    pub async fn run(&self) -> Result<CrawlOutcome, CrawlError> {
        let block = match self.latest_block().await {
            Ok(block) => block,
            Err(CrawlError::DuplicateBlock(block)) => {
                tracing::debug!(block, "Duplicate: block already processed");
                return Ok(CrawlOutcome::Duplicate { block });
            }
            Err(e) => return Err(e),
        };

        let number = block.number.0;
        let matched = self.extract_transactions(&block);
        let count = matched.len();

        self.store.save_transactions(number, matched).map_err(|e| {
            tracing::error!(block = number, matched = count, error = %e, "Failed to save transactions");
            e
        })?;

        metrics::record_matched_transactions(count);
        tracing::info!(
            block = number,
            transactions = block.transactions.len(),
            matched = count,
            "Indexed block"
        );
        Ok(CrawlOutcome::Indexed {
            block: number,
            matched: count,
        })
    }

    /// Fetch the head block unless it was already processed.
    async fn latest_block(&self) -> Result<Block, CrawlError> {
        let head = self.client.block_number().await?;

        if head == self.store.current_block() {
            return Err(CrawlError::DuplicateBlock(head));
        }

        Ok(self.client.get_block_by_number(head).await?)
    }

    /// Transactions whose `from` or `to` is subscribed, in block order.
    fn extract_transactions(&self, block: &Block) -> Vec<Transaction> {
        let subscribed: HashSet<String> = self
            .store
            .addresses()
            .iter()
            .map(|address| canonical(address))
            .collect();

        if subscribed.is_empty() {
            return Vec::new();
        }

        block
            .transactions
            .iter()
            .filter(|tx| {
                subscribed.contains(&canonical(&tx.from)) || subscribed.contains(&canonical(&tx.to))
            })
            .cloned()
            .collect()
    }
}
