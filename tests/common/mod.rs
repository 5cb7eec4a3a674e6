//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{extract::State, http::StatusCode, routing::post, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

type Handler = dyn Fn(&Value) -> (u16, String) + Send + Sync;

#[derive(Clone)]
struct NodeState {
    handler: Arc<Handler>,
    requests: Arc<Mutex<Vec<Value>>>,
}

/// A programmable JSON-RPC node listening on an ephemeral port.
pub struct MockNode {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Value>>>,
}

#[allow(dead_code)]
impl MockNode {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Every request body received so far, in arrival order.
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests received for `method`.
    pub fn calls(&self, method: &str) -> usize {
        self.requests()
            .iter()
            .filter(|req| req["method"] == method)
            .count()
    }
}

/// Start a node that answers each request with `f(request) -> (status, body)`.
pub async fn start_mock_node<F>(f: F) -> MockNode
where
    F: Fn(&Value) -> (u16, String) + Send + Sync + 'static,
{
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = NodeState {
        handler: Arc::new(f),
        requests: requests.clone(),
    };

    let app = Router::new().route("/", post(handle)).with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockNode { addr, requests }
}

async fn handle(State(state): State<NodeState>, body: String) -> (StatusCode, String) {
    let request: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    state.requests.lock().unwrap().push(request.clone());

    let (status, body) = (state.handler)(&request);
    (StatusCode::from_u16(status).unwrap(), body)
}

/// A successful JSON-RPC response echoing the request id.
pub fn rpc_result(request: &Value, result: Value) -> (u16, String) {
    let body = json!({"jsonrpc": "2.0", "id": request["id"], "result": result});
    (200, body.to_string())
}

/// A JSON-RPC error response echoing the request id.
#[allow(dead_code)]
pub fn rpc_error(request: &Value, code: i64, message: &str) -> (u16, String) {
    let body = json!({
        "jsonrpc": "2.0",
        "id": request["id"],
        "error": {"code": code, "message": message}
    });
    (200, body.to_string())
}

/// A block in node wire format with the given `(from, to)` transactions.
#[allow(dead_code)]
pub fn block_json(number: u64, timestamp: u64, txs: &[(&str, Option<&str>)]) -> Value {
    let transactions: Vec<Value> = txs
        .iter()
        .enumerate()
        .map(|(i, (from, to))| {
            json!({
                "blockNumber": format!("{:#x}", number),
                "blockHash": format!("0xblock{}", number),
                "from": from,
                "to": to,
                "value": "0x0",
                "gas": "0x5208",
                "gasPrice": "0x3b9aca00",
                "hash": format!("0x{:x}{:04x}", number, i),
                "transactionIndex": format!("{:#x}", i),
                "input": "0x",
                "nonce": "0x1"
            })
        })
        .collect();

    json!({
        "number": format!("{:#x}", number),
        "hash": format!("0xblock{}", number),
        "parentHash": format!("0xblock{}", number.saturating_sub(1)),
        "timestamp": format!("{:#x}", timestamp),
        "miner": "0x0000000000000000000000000000000000000000",
        "transactions": transactions
    })
}
