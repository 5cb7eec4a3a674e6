//! Query surface over the address index.

use std::sync::Arc;

use crate::chain::Transaction;
use crate::index::{AddressStore, StoreResult};

/// Subscribe / current block / per-address history, as exposed to the HTTP
/// layer. Subscription failures are ordinary results and only logged at
/// debug level.
#[derive(Clone)]
pub struct ParserService {
    store: Arc<dyn AddressStore>,
}

impl ParserService {
    pub fn new(store: Arc<dyn AddressStore>) -> Self {
        Self { store }
    }

    /// Add `address` to the observed set.
    pub fn subscribe(&self, address: &str) -> StoreResult<()> {
        match self.store.add_address(address) {
            Ok(()) => {
                tracing::info!(address = %address, "Address subscribed");
                Ok(())
            }
            Err(e) => {
                tracing::debug!(address = %address, error = %e, "Subscribe rejected");
                Err(e)
            }
        }
    }

    /// Last fully processed block.
    pub fn current_block(&self) -> u64 {
        self.store.current_block()
    }

    /// Inbound and outbound transactions for `address`.
    pub fn transactions_for(&self, address: &str) -> StoreResult<Vec<Transaction>> {
        self.store.transactions(address).inspect_err(|e| {
            tracing::debug!(address = %address, error = %e, "Transactions lookup rejected");
        })
    }

    /// Number of subscribed addresses.
    pub fn subscription_count(&self) -> usize {
        self.store.addresses().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{InMemoryStore, StoreError};

    #[test]
    fn test_subscribe_and_query_case_insensitive() {
        let service = ParserService::new(Arc::new(InMemoryStore::new()));

        service.subscribe("0xABC").unwrap();
        assert!(service.transactions_for("0xabc").unwrap().is_empty());
        assert!(service.transactions_for("0xAbC").unwrap().is_empty());
        assert_eq!(
            service.subscribe("0xabc"),
            Err(StoreError::AlreadySubscribed("0xabc".to_string()))
        );
        assert_eq!(service.subscription_count(), 1);
    }

    #[test]
    fn test_unknown_address() {
        let service = ParserService::new(Arc::new(InMemoryStore::new()));
        assert!(matches!(
            service.transactions_for("test"),
            Err(StoreError::NotSubscribed(_))
        ));
        assert_eq!(service.current_block(), 0);
    }
}
