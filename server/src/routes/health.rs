//! Liveness endpoints, for deploy probes and for terminals checking
//! whether the server is reachable before a cycle.

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

const BANNER: &str = "Till Sync Server";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { BANNER }))
        .route("/health", get(health))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
