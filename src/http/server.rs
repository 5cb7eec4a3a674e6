//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener and drain on shutdown

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ParserConfig;
use crate::http::handlers;
use crate::http::request::UuidRequestId;
use crate::parser::ParserService;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: ParserService,
}

/// HTTP server exposing the query API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &ParserConfig, service: ParserService) -> Self {
        let state = AppState { service };
        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ParserConfig, state: AppState) -> Router {
        Router::new()
            .route("/subscribe", post(handlers::subscribe))
            .route("/current-block", get(handlers::current_block))
            .route("/transactions", get(handlers::transactions))
            .route("/status", get(handlers::status))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// The fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until a shutdown signal arrives, then drain.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server received shutdown signal");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{HexU64, Transaction};
    use crate::index::{AddressStore, InMemoryStore};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_server() -> (HttpServer, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let service = ParserService::new(store.clone());
        (HttpServer::new(&ParserConfig::default(), service), store)
    }

    async fn send(server: &HttpServer, request: Request<Body>) -> Response {
        server.router().oneshot(request).await.unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn subscribe_request(body: &str) -> Request<Body> {
        Request::post("/subscribe")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_subscribe() {
        let (server, store) = test_server();

        let res = send(&server, subscribe_request(r#"{"address":"0xABC"}"#)).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key("x-request-id"));
        assert_eq!(body_text(res).await, "Subscribed successfully");
        assert_eq!(store.addresses(), vec!["0xabc"]);

        let res = send(&server, subscribe_request(r#"{"address":"0xabc"}"#)).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(res).await, "Address already subscribed");
    }

    #[tokio::test]
    async fn test_subscribe_bad_body() {
        let (server, _) = test_server();

        let res = send(&server, subscribe_request("not json")).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(res).await, "Error parsing request body");

        let res = send(&server, subscribe_request("{}")).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(res).await, "Address parameter is missing");
    }

    #[tokio::test]
    async fn test_wrong_method() {
        let (server, _) = test_server();
        let res = send(
            &server,
            Request::get("/subscribe").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_current_block() {
        let (server, store) = test_server();
        store.save_transactions(19041293, Vec::new()).unwrap();

        let res = send(
            &server,
            Request::get("/current-block").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_text(res).await, r#"{"block":19041293}"#);
    }

    #[tokio::test]
    async fn test_transactions() {
        let (server, store) = test_server();
        store.add_address("test1").unwrap();
        store
            .save_transactions(
                14,
                vec![Transaction {
                    block_number: HexU64(14),
                    from: "TEST1".to_string(),
                    to: "0x321".to_string(),
                    timestamp: HexU64(1_700_000_000),
                    ..Default::default()
                }],
            )
            .unwrap();

        let res = send(
            &server,
            Request::get("/transactions?address=Test1")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_text(res).await).unwrap();
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["blockNumber"], 14);
        assert_eq!(body[0]["timestamp"], 1_700_000_000u64);
        assert_eq!(body[0]["from"], "TEST1");
    }

    #[tokio::test]
    async fn test_transactions_errors() {
        let (server, _) = test_server();

        let res = send(
            &server,
            Request::get("/transactions").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(res).await, "Address parameter is missing");

        let res = send(
            &server,
            Request::get("/transactions?address=unknown")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(res).await, "Address not subscribed");
    }

    #[tokio::test]
    async fn test_status() {
        let (server, store) = test_server();
        store.add_address("a").unwrap();

        let res = send(&server, Request::get("/status").body(Body::empty()).unwrap()).await;
        let body: serde_json::Value = serde_json::from_str(&body_text(res).await).unwrap();
        assert_eq!(body["status"], "operational");
        assert_eq!(body["subscribed_addresses"], 1);
        assert_eq!(body["current_block"], 0);
    }
}
