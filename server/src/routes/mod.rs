//! The route table.

mod health;
mod sync;

use crate::AppState;
use axum::Router;

/// Every route the server exposes, liveness plus sync.
pub fn create_routes() -> Router<AppState> {
    Router::new().merge(health::routes()).merge(sync::routes())
}
