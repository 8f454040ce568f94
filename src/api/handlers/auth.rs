//! Authentication endpoint handlers.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::auth::BearerToken;
use crate::api::dto::{AuthResponse, LoginRequest, MessageResponse};
use crate::app_state::AppState;
use crate::error::{ApiError, ErrorResponse};

/// `POST /auth/login`: Exchange email and password for a token.
///
/// # Errors
///
/// Returns [`ApiError`] on missing fields, rejected credentials, or an
/// unavailable identity provider.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    summary = "Sign in",
    description = "Verifies the credentials with the identity provider and creates the wallet on first login.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 400, description = "Email or password missing", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 502, description = "Identity provider unavailable", body = ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let (email, password) = req.credentials()?;

    let session = state.identity.sign_in(email, password).await?;
    state
        .ledger
        .get_or_create(&session.user.id, session.user.name.as_deref())
        .await?;

    tracing::info!(user_id = %session.user.id, "user signed in");
    Ok(Json(AuthResponse::from(session)))
}

/// `GET /auth/me`: Current user with a refreshed token.
///
/// # Errors
///
/// Returns [`ApiError`] on a missing or rejected token.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    summary = "Current user",
    description = "Revalidates the bearer token, possibly rotating it, and syncs the wallet display name.",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Token is valid", body = AuthResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 502, description = "Identity provider unavailable", body = ErrorResponse),
    )
)]
pub async fn me(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.identity.refresh(&token).await?;
    let name = session.user.name.as_deref();
    state.ledger.get_or_create(&session.user.id, name).await?;
    state.ledger.rename_if_changed(&session.user.id, name).await?;
    Ok(Json(AuthResponse::from(session)))
}

/// `POST /auth/logout`: Stateless sign-out confirmation.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    summary = "Sign out",
    description = "Tokens are held by the client; this only confirms the sign-out.",
    responses(
        (status = 200, description = "Signed out", body = MessageResponse),
    )
)]
pub async fn logout() -> impl IntoResponse {
    Json(MessageResponse {
        message: "logged out".to_string(),
    })
}

/// Auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout))
}
