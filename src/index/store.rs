//! Address index store.
//!
//! Owns the subscribed address set, the last processed block number, and the
//! per-address transaction buckets. All state sits behind one reader/writer
//! lock: queries share it, `add_address` and `save_transactions` take it
//! exclusively.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

use crate::chain::Transaction;
use crate::index::address::{canonical, same_address};
use crate::observability::metrics;

/// Errors returned by store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("address {0} already subscribed")]
    AlreadySubscribed(String),

    #[error("address {0} not subscribed")]
    NotSubscribed(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage seam shared by the crawler (writer) and the query service (reader).
pub trait AddressStore: Send + Sync {
    /// Last block whose matches were saved; 0 before the first save.
    fn current_block(&self) -> u64;

    /// Subscribed addresses in canonical form.
    fn addresses(&self) -> Vec<String>;

    /// Matched transactions for `address`, oldest first.
    fn transactions(&self, address: &str) -> StoreResult<Vec<Transaction>>;

    /// Subscribe `address` with an empty bucket.
    fn add_address(&self, address: &str) -> StoreResult<()>;

    /// Record `block_number` as processed and rebuild every bucket from
    /// `matched`.
    fn save_transactions(&self, block_number: u64, matched: Vec<Transaction>) -> StoreResult<()>;
}

#[derive(Debug, Default)]
struct IndexState {
    current_block: u64,
    /// Canonical address -> bucket. Every subscribed address has a key.
    buckets: BTreeMap<String, Vec<Transaction>>,
}

/// Process-local, volatile store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<IndexState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Every write replaces whole values, so a poisoned lock still guards
    // consistent state.
    fn read(&self) -> RwLockReadGuard<'_, IndexState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AddressStore for InMemoryStore {
    fn current_block(&self) -> u64 {
        self.read().current_block
    }

    fn addresses(&self) -> Vec<String> {
        self.read().buckets.keys().cloned().collect()
    }

    fn transactions(&self, address: &str) -> StoreResult<Vec<Transaction>> {
        let address = canonical(address);
        self.read()
            .buckets
            .get(&address)
            .cloned()
            .ok_or(StoreError::NotSubscribed(address))
    }

    fn add_address(&self, address: &str) -> StoreResult<()> {
        let address = canonical(address);
        let mut state = self.write();
        if state.buckets.contains_key(&address) {
            return Err(StoreError::AlreadySubscribed(address));
        }
        state.buckets.insert(address, Vec::new());
        metrics::record_subscriptions(state.buckets.len());
        Ok(())
    }

    fn save_transactions(&self, block_number: u64, matched: Vec<Transaction>) -> StoreResult<()> {
        let mut state = self.write();

        let mut buckets: BTreeMap<String, Vec<Transaction>> = state
            .buckets
            .keys()
            .map(|address| (address.clone(), Vec::new()))
            .collect();

        for tx in matched {
            let self_transfer = same_address(&tx.from, &tx.to);
            let from = canonical(&tx.from);

            if !self_transfer {
                if let Some(bucket) = buckets.get_mut(&from) {
                    bucket.push(tx.clone());
                }
            }
            if let Some(bucket) = buckets.get_mut(&canonical(&tx.to)) {
                bucket.push(tx);
            }
        }

        state.current_block = block_number;
        state.buckets = buckets;
        metrics::record_current_block(block_number);
        Ok(())
    }
}
