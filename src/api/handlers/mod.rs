//! REST endpoint handlers organized by resource.

pub mod auth;
pub mod bets;
pub mod events;
pub mod leaderboard;
pub mod system;
pub mod wallet;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::routes())
        .merge(wallet::routes())
        .merge(bets::routes())
        .merge(events::routes())
        .merge(leaderboard::routes())
}
