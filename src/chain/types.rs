//! Chain data model and error definitions.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::chain::hex::HexU64;

/// A transaction as carried inside a block.
///
/// Only `from` and `to` take part in matching; everything else is opaque
/// payload passed through to API consumers unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default)]
    pub block_number: HexU64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub block_hash: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub from: String,
    /// Empty for contract creations, where the node reports `null`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub to: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub value: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub gas: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub gas_price: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub hash: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub transaction_index: String,
    /// Stamped from the enclosing block; nodes only report block timestamps.
    #[serde(default)]
    pub timestamp: HexU64,
}

/// A block fetched with full transaction bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub number: HexU64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub hash: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub parent_hash: String,
    #[serde(default)]
    pub timestamp: HexU64,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Copy the block timestamp onto every contained transaction.
    pub fn stamp_timestamps(&mut self) {
        let timestamp = self.timestamp;
        for tx in &mut self.transactions {
            tx.timestamp = timestamp;
        }
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Coarse classification of chain failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The node could not be reached or answered with a non-2xx status.
    Transport,
    /// The node answered, but with an error or an undecodable payload.
    Protocol,
}

/// Errors that can occur while talking to the chain node.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Connection, TLS, or transport timeout failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Node replied with a non-2xx HTTP status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Node returned a JSON-RPC `error` object.
    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Response carried neither `error` nor a non-null `result`.
    #[error("no result in JSON-RPC response")]
    NoResult,

    /// Envelope or result did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ChainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChainError::Transport(_) | ChainError::Http { .. } => ErrorKind::Transport,
            ChainError::Rpc { .. } | ChainError::NoResult | ChainError::Decode(_) => {
                ErrorKind::Protocol
            }
        }
    }
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;
