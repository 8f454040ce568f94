//! Leaderboard handler.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::LeaderboardResponse;
use crate::app_state::AppState;
use crate::error::ApiError;

/// `GET /leaderboard`: Top users by balance.
///
/// # Errors
///
/// Returns [`ApiError::Persistence`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/leaderboard",
    tag = "Leaderboard",
    summary = "Leaderboard",
    description = "Top 50 users by balance with bet count and win rate.",
    responses(
        (status = 200, description = "Ranked users", body = LeaderboardResponse),
    )
)]
pub async fn leaderboard(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let leaders = state.leaderboard.compute().await?;
    Ok(Json(LeaderboardResponse { leaders }))
}

/// Leaderboard routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/leaderboard", get(leaderboard))
}
