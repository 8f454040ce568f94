//! Demo events feed.
//!
//! Serves `GET /events` with fixtures scheduled around the current time.
//! Listens on `0.0.0.0:$PORT` (default 5050).

use std::net::SocketAddr;

use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use wager_gateway::demo_feed::{ScoreDice, feed_at};
use wager_gateway::domain::EventFeed;

async fn events() -> Json<EventFeed> {
    Json(feed_at(Utc::now(), &mut ScoreDice::default()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port = std::env::var("PORT")
        .ok()
        .and_then(|v| v.trim().parse::<u16>().ok())
        .unwrap_or(5050);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let app = Router::new()
        .route("/events", get(events))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "events-mock listening");
    axum::serve(listener, app).await?;
    Ok(())
}
