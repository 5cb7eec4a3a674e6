//! Ethereum transaction parser library.
//!
//! Watches the chain head, extracts transactions touching subscribed
//! addresses, and serves the matched history per address.

pub mod chain;
pub mod config;
pub mod crawler;
pub mod http;
pub mod index;
pub mod lifecycle;
pub mod observability;
pub mod parser;

pub use config::ParserConfig;
pub use crawler::{Crawler, Scheduler};
pub use http::HttpServer;
pub use index::{AddressStore, InMemoryStore};
pub use lifecycle::Shutdown;
pub use parser::ParserService;
