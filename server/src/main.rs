//! Till Server - sync server for offline-first point of sale devices.
//!
//! This server provides the HTTP endpoints Till terminals use to push
//! their local changes and pull everyone else's, reconciled with the
//! till-engine last-write-wins rules.

use till_server::config::Config;
use till_server::store::{self, AnyStore};
use till_server::{create_app, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "till_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!("Starting Till sync server on {}", config.bind_addr());

    // Pick the storage backend
    let store = match &config.database_url {
        Some(url) => {
            let pool = store::create_pool(url).await?;
            tracing::info!("Running database migrations...");
            store::run_migrations(&pool).await?;
            AnyStore::postgres(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL is not set, keeping records in memory only");
            AnyStore::memory()
        }
    };

    let app = create_app(AppState { store });

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app).await?;

    Ok(())
}
