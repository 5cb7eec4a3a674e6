//! Parser query service.

pub mod service;

pub use service::ParserService;
