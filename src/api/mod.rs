//! REST API layer: route handlers, DTOs, and router composition.
//!
//! All endpoints are mounted under `/api`; `/health` stays at the root.

pub mod auth;
pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::app_state::AppState;

/// OpenAPI description of the REST surface.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "wager-gateway", description = "Virtual-currency betting API"),
    paths(
        handlers::system::health_handler,
        handlers::auth::login,
        handlers::auth::me,
        handlers::auth::logout,
        handlers::wallet::get_wallet,
        handlers::wallet::top_up,
        handlers::bets::list_bets,
        handlers::bets::place_bet,
        handlers::events::list_events,
        handlers::leaderboard::leaderboard,
    ),
    components(schemas(crate::error::ErrorResponse)),
    modifiers(&BearerScheme),
    tags(
        (name = "System"),
        (name = "Auth", description = "Sign-in through the identity provider"),
        (name = "Wallet"),
        (name = "Bets"),
        (name = "Events", description = "Upstream events feed"),
        (name = "Leaderboard"),
    )
)]
pub struct ApiDoc;

#[derive(Debug)]
struct BearerScheme;

impl Modify for BearerScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .nest("/api", handlers::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
}
