//! wager-gateway server entry point.
//!
//! Starts the Axum HTTP server with the REST endpoints.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use axum::http::StatusCode;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use wager_gateway::api;
use wager_gateway::app_state::AppState;
use wager_gateway::config::{AppConfig, LogFormat, StorageBackend};
use wager_gateway::identity::{IdentityProvider, PocketBaseClient};
use wager_gateway::oracle::{EventOracle, HttpEventFeed};
use wager_gateway::persistence::{MemoryStore, PostgresStore, WagerStore};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn WagerStore>> {
    match config.storage_backend {
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .min_connections(config.database_min_connections)
                .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
                .connect(&config.database_url)
                .await
                .context("connecting to postgres")?;
            let store = PostgresStore::new(pool);
            if config.run_migrations {
                store.migrate().await.context("running migrations")?;
                tracing::info!("database migrations applied");
            }
            Ok(Arc::new(store))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);
    tracing::info!(
        addr = %config.listen_addr,
        backend = ?config.storage_backend,
        "starting wager-gateway"
    );

    // Upstreams
    let oracle: Arc<dyn EventOracle> = Arc::new(
        HttpEventFeed::new(config.events_url.clone(), config.upstream_timeout())
            .context("building events feed client")?,
    );
    let identity: Arc<dyn IdentityProvider> = Arc::new(
        PocketBaseClient::new(
            config.pocketbase_url.clone(),
            config.pocketbase_users_collection.clone(),
            config.upstream_timeout(),
        )
        .context("building identity provider client")?,
    );

    // Storage and services
    let store = build_store(&config).await?;
    let app_state = AppState::new(store, oracle, identity);

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    config.request_timeout(),
                )),
        )
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
