//! Address index subsystem.
//!
//! # Data Flow
//! ```text
//! Subscribe request → store.rs add_address (write lock)
//! Crawl cycle       → store.rs save_transactions (write lock, full rebuild)
//! Queries           → store.rs current_block / transactions (read lock)
//! ```
//!
//! # Design Decisions
//! - Addresses are compared in canonical lower-case form (address.rs)
//! - Each save rebuilds the index for currently subscribed addresses only
//! - State is volatile; nothing survives a restart

pub mod address;
pub mod store;

pub use address::canonical;
pub use store::{AddressStore, InMemoryStore, StoreError, StoreResult};
