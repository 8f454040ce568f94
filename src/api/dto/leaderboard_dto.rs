//! Leaderboard response DTO.

use serde::Serialize;
use utoipa::ToSchema;

use crate::service::LeaderboardEntry;

/// Response body for `GET /api/leaderboard`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaderboardResponse {
    /// Ranked users, best first.
    pub leaders: Vec<LeaderboardEntry>,
}
