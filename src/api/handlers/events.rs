//! Events feed proxy.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::app_state::AppState;
use crate::domain::EventFeed;
use crate::error::{ApiError, ErrorResponse};

/// `GET /events`: The upstream feed, passed through unchanged.
///
/// # Errors
///
/// Returns [`ApiError::Upstream`] if the feed cannot be fetched.
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Events",
    summary = "List events",
    description = "Proxies the events feed verbatim.",
    responses(
        (status = 200, description = "Events feed", body = EventFeed),
        (status = 502, description = "Events feed unavailable", body = ErrorResponse),
    )
)]
pub async fn list_events(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let feed = state.oracle.fetch_feed().await?;
    Ok(Json(feed))
}

/// Events routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/events", get(list_events))
}
