//! Chain node client over HTTP JSON-RPC.
//!
//! # Responsibilities
//! - Query the head height (`eth_blockNumber`)
//! - Fetch a full block with transactions (`eth_getBlockByNumber`)
//! - Separate transport failures from protocol failures
//!
//! One round trip per call. No retries or caching happen here; the only
//! deadline is the HTTP client's own timeout.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::chain::hex::{encode_u64, HexU64};
use crate::chain::rpc::{self, RpcRequest, RpcResponse};
use crate::chain::types::{Block, ChainError, ChainResult};
use crate::config::ChainConfig;

/// Read access to a chain node.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Current head height.
    async fn block_number(&self) -> ChainResult<u64>;

    /// Full block at `number`, with every transaction's timestamp set to the
    /// block timestamp.
    async fn get_block_by_number(&self, number: u64) -> ChainResult<Block>;
}

/// JSON-RPC client for Ethereum-compatible nodes.
pub struct EthereumClient {
    http: reqwest::Client,
    rpc_url: String,
    next_id: AtomicU64,
}

impl EthereumClient {
    /// Create a client for the node at `config.rpc_url`.
    pub fn new(config: &ChainConfig) -> ChainResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.rpc_timeout_secs))
            .build()?;

        tracing::info!(
            rpc_url = %config.rpc_url,
            timeout_secs = config.rpc_timeout_secs,
            "Chain client initialized"
        );

        Ok(Self {
            http,
            rpc_url: config.rpc_url.clone(),
            next_id: AtomicU64::new(1),
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> ChainResult<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest::new(id, method, params);

        tracing::trace!(id, method, "Sending RPC request");

        let response = self.http.post(&self.rpc_url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChainError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let envelope: RpcResponse = serde_json::from_slice(&bytes)?;

        if let Some(err) = envelope.error {
            return Err(ChainError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        let result = envelope.result.ok_or(ChainError::NoResult)?;
        Ok(serde_json::from_value(result)?)
    }
}

#[async_trait]
impl ChainClient for EthereumClient {
    async fn block_number(&self) -> ChainResult<u64> {
        let number: HexU64 = self.call(rpc::BLOCK_NUMBER, json!([])).await?;
        Ok(number.0)
    }

    async fn get_block_by_number(&self, number: u64) -> ChainResult<Block> {
        let mut block: Block = self
            .call(rpc::GET_BLOCK_BY_NUMBER, json!([encode_u64(number), true]))
            .await?;
        block.stamp_timestamps();

        tracing::debug!(
            block = block.number.0,
            transactions = block.transactions.len(),
            "Fetched block"
        );
        Ok(block)
    }
}

impl std::fmt::Debug for EthereumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EthereumClient")
            .field("rpc_url", &self.rpc_url)
            .finish()
    }
}
