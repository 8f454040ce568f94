//! Bet history and placement handlers.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::auth::Authenticated;
use crate::api::dto::PlaceBetRequest;
use crate::app_state::AppState;
use crate::domain::{Bet, WagerSlip};
use crate::error::{ApiError, ErrorResponse};

/// `GET /bets`: Caller's bets, newest first.
///
/// # Errors
///
/// Returns [`ApiError`] on authentication or storage failure.
#[utoipa::path(
    get,
    path = "/api/bets",
    tag = "Bets",
    summary = "List bets",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Bets, newest first", body = Vec<Bet>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    )
)]
pub async fn list_bets(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<impl IntoResponse, ApiError> {
    let bets = state.bets.list_by_user(&auth.user_id).await?;
    Ok(Json(bets))
}

/// `POST /bets`: Place a bet.
///
/// # Errors
///
/// Returns [`ApiError`] when the slip is invalid, the event is unknown or
/// closed, the balance is too low, or an upstream/storage call fails.
#[utoipa::path(
    post,
    path = "/api/bets",
    tag = "Bets",
    summary = "Place a bet",
    description = "Validates the slip, checks the event is still upcoming, then records the bet and debits the stake atomically.",
    security(("bearer" = [])),
    request_body = PlaceBetRequest,
    responses(
        (status = 200, description = "Bet recorded", body = Bet),
        (status = 400, description = "Invalid slip, closed event, or insufficient funds", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Event not in the feed", body = ErrorResponse),
        (status = 502, description = "Events feed unavailable", body = ErrorResponse),
    )
)]
pub async fn place_bet(
    State(state): State<AppState>,
    auth: Authenticated,
    payload: Result<Json<PlaceBetRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let slip = WagerSlip::from(req);
    let bet = state.placement.place(&auth.user_id, &slip).await?;
    Ok(Json(bet))
}

/// Bet routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/bets", get(list_bets).post(place_bet))
}
