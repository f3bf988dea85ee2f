//! Liveness endpoint
//!
//! Answers without touching the store, so it reports process liveness only.

use axum::{routing::get, Json, Router};
use serde::Serialize;

/// Ping response
#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub message: &'static str,
    pub status: &'static str,
}

/// GET /ping
async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        message: "pong",
        status: "ok",
    })
}

/// Ping routes
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/ping", get(ping))
}
