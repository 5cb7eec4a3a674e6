//! Query API handlers.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::server::AppState;
use crate::index::StoreError;

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct TransactionsQuery {
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CurrentBlockResponse {
    pub block: u64,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub version: &'static str,
    pub status: &'static str,
    pub current_block: u64,
    pub subscribed_addresses: usize,
}

pub async fn subscribe(
    State(state): State<AppState>,
    payload: Result<Json<SubscribeRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Error parsing request body").into_response();
    };

    if request.address.is_empty() {
        return (StatusCode::BAD_REQUEST, "Address parameter is missing").into_response();
    }

    match state.service.subscribe(&request.address) {
        Ok(()) => (StatusCode::OK, "Subscribed successfully").into_response(),
        Err(_) => (StatusCode::BAD_REQUEST, "Address already subscribed").into_response(),
    }
}

pub async fn current_block(State(state): State<AppState>) -> Json<CurrentBlockResponse> {
    Json(CurrentBlockResponse {
        block: state.service.current_block(),
    })
}

pub async fn transactions(
    State(state): State<AppState>,
    Query(query): Query<TransactionsQuery>,
) -> Response {
    let address = match query.address {
        Some(address) if !address.is_empty() => address,
        _ => return (StatusCode::BAD_REQUEST, "Address parameter is missing").into_response(),
    };

    match state.service.transactions_for(&address) {
        Ok(txns) => (StatusCode::OK, Json(txns)).into_response(),
        Err(StoreError::NotSubscribed(_)) => {
            (StatusCode::NOT_FOUND, "Address not subscribed").into_response()
        }
        Err(e) => {
            tracing::error!(address = %address, error = %e, "Unexpected transactions lookup failure");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
        }
    }
}

pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        current_block: state.service.current_block(),
        subscribed_addresses: state.service.subscription_count(),
    })
}
