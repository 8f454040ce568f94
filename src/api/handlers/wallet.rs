//! Wallet endpoint handlers.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::auth::Authenticated;
use crate::api::dto::WalletResponse;
use crate::app_state::AppState;
use crate::error::{ApiError, ErrorResponse};

/// `GET /wallet`: Caller's balance, creating the wallet on first access.
///
/// # Errors
///
/// Returns [`ApiError`] on authentication or storage failure.
#[utoipa::path(
    get,
    path = "/api/wallet",
    tag = "Wallet",
    summary = "Get wallet",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current wallet", body = WalletResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    )
)]
pub async fn get_wallet(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<impl IntoResponse, ApiError> {
    let wallet = state
        .ledger
        .get_or_create(&auth.user_id, auth.display_name.as_deref())
        .await?;
    Ok(Json(WalletResponse::new(&wallet, auth.rotated_token)))
}

/// `POST /wallet/topup`: Add the fixed top-up amount.
///
/// # Errors
///
/// Returns [`ApiError`] on authentication or storage failure.
#[utoipa::path(
    post,
    path = "/api/wallet/topup",
    tag = "Wallet",
    summary = "Top up wallet",
    description = "Credits 1000.00 coins and increments the top-up counter.",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Wallet after the top-up", body = WalletResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    )
)]
pub async fn top_up(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<impl IntoResponse, ApiError> {
    let wallet = state.ledger.top_up(&auth.user_id).await?;
    Ok(Json(WalletResponse::new(&wallet, auth.rotated_token)))
}

/// Wallet routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/wallet", get(get_wallet))
        .route("/wallet/topup", post(top_up))
}
