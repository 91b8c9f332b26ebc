//! Till Server - the sync backend for offline-first POS devices.
//!
//! Devices push the records they changed since their last successful
//! sync and pull everything that changed on the server side since then.
//! Conflicts resolve per record by last-write-wins on `updatedAt`, using
//! the same rules as the on-device engine.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod store;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::store::AnyStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: AnyStore,
}

/// Build the application router with middleware attached.
///
/// Kept separate from `main` so integration tests can drive the exact
/// production router against an in-memory store.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
