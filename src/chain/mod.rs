//! Chain access subsystem.
//!
//! # Data Flow
//! ```text
//! Crawler
//!     → client.rs (ChainClient trait, HTTP JSON-RPC)
//!     → rpc.rs (request/response envelope)
//!     → hex.rs (0x quantities ⇄ u64)
//!     → types.rs (Block, Transaction, ChainError)
//! ```
//!
//! # Design Decisions
//! - Transport and protocol failures are distinct error kinds
//! - Transaction timestamps are stamped from the block at decode time
//! - The trait seam lets the crawler run against in-memory fakes

pub mod client;
pub mod hex;
pub mod rpc;
pub mod types;

pub use client::{ChainClient, EthereumClient};
pub use hex::HexU64;
pub use types::{Block, ChainError, ChainResult, ErrorKind, Transaction};
