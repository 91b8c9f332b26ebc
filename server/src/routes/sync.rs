//! Sync endpoint routes.

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use till_engine::{PullResponse, PushReceipt, RawChanges};

use crate::error::Result;
use crate::handlers::{handle_pull, handle_push, PullQuery};
use crate::AppState;

/// Create sync routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/sync/push", post(push_handler))
        .route("/api/sync/pull", get(pull_handler))
}

/// POST /api/sync/push - Push device changes to the server.
async fn push_handler(
    State(state): State<AppState>,
    Json(changes): Json<RawChanges>,
) -> Result<Json<PushReceipt>> {
    let receipt = handle_push(&state.store, changes).await?;
    Ok(Json(receipt))
}

/// GET /api/sync/pull - Pull server changes since a watermark.
async fn pull_handler(
    State(state): State<AppState>,
    Query(query): Query<PullQuery>,
) -> Result<Json<PullResponse>> {
    let response = handle_pull(&state.store, query).await?;
    Ok(Json(response))
}
