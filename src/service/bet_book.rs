//! Bet record store: creation, history and settlement primitives.

use std::sync::Arc;

use crate::domain::{Bet, BetStatus, NewBet, UserId};
use crate::error::ApiError;
use crate::persistence::WagerStore;

/// Longest result annotation the `bets.result` column accepts.
pub const MAX_RESULT_LEN: usize = 20;

/// Access to stored bets.
///
/// Bets are immutable except for the one-time move out of `pending`
/// performed by [`BetBook::update_status`]. There is no automatic
/// settlement; an external process decides outcomes and calls it.
#[derive(Debug, Clone)]
pub struct BetBook {
    store: Arc<dyn WagerStore>,
}

impl BetBook {
    /// Creates a bet book over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn WagerStore>) -> Self {
        Self { store }
    }

    /// Inserts a pending bet without touching any wallet.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    pub async fn create(&self, bet: &NewBet) -> Result<Bet, ApiError> {
        self.store.insert_bet(bet).await
    }

    /// Bets of `user_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    pub async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Bet>, ApiError> {
        self.store.bets_for_user(user_id).await
    }

    /// Loads one bet.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BetNotFound`] if no bet has that id, or
    /// [`ApiError::Persistence`] on storage failure.
    pub async fn get_by_id(&self, id: i64) -> Result<Bet, ApiError> {
        self.store
            .find_bet(id)
            .await?
            .ok_or(ApiError::BetNotFound(id))
    }

    /// Moves a pending bet to `status`.
    ///
    /// Leaving `pending` stamps the settlement time; staying `pending`
    /// keeps it empty. A bet that already left `pending` cannot change
    /// again.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if `result` is too long,
    /// [`ApiError::BetNotFound`] if no bet has that id,
    /// [`ApiError::Conflict`] if the bet is already settled, or
    /// [`ApiError::Persistence`] on storage failure.
    pub async fn update_status(
        &self,
        id: i64,
        status: BetStatus,
        result: Option<&str>,
    ) -> Result<Bet, ApiError> {
        let result = result.map(str::trim).filter(|r| !r.is_empty());
        if let Some(r) = result
            && r.chars().count() > MAX_RESULT_LEN
        {
            return Err(ApiError::InvalidRequest(format!(
                "result must be at most {MAX_RESULT_LEN} characters"
            )));
        }

        if let Some(bet) = self.store.update_pending_bet(id, status, result).await? {
            tracing::info!(bet_id = id, %status, "bet status updated");
            return Ok(bet);
        }

        let existing = self.get_by_id(id).await?;
        Err(ApiError::Conflict(format!(
            "bet {id} is already settled as {}",
            existing.status
        )))
    }
}
