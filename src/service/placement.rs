//! Bet placement: validate a wager, then commit the bet and the debit.

use std::sync::Arc;

use crate::domain::{Bet, UserId, WagerSlip};
use crate::error::ApiError;
use crate::oracle::EventOracle;
use crate::persistence::WagerStore;

use super::WalletLedger;

/// Runs the placement transaction.
///
/// Each step is a precondition for the next and nothing is written until
/// the last one:
///
/// 1. structural validation of the slip,
/// 2. stake policy (at least one coin, whole coins),
/// 3. event eligibility, re-fetched live from the feed,
/// 4. balance check against the (lazily created) wallet,
/// 5. commit: insert the pending bet, then debit the stake, atomically.
///
/// No step is retried.
#[derive(Debug, Clone)]
pub struct BetPlacement {
    store: Arc<dyn WagerStore>,
    ledger: Arc<WalletLedger>,
    oracle: Arc<dyn EventOracle>,
}

impl BetPlacement {
    /// Creates the placement service.
    #[must_use]
    pub fn new(
        store: Arc<dyn WagerStore>,
        ledger: Arc<WalletLedger>,
        oracle: Arc<dyn EventOracle>,
    ) -> Self {
        Self {
            store,
            ledger,
            oracle,
        }
    }

    /// Places a bet for `user_id`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Validation`] / [`ApiError::StakePolicy`] for a bad slip
    /// - [`ApiError::EventNotFound`] if the feed does not list the event
    /// - [`ApiError::EventClosed`] if the event is not upcoming
    /// - [`ApiError::Upstream`] if the feed cannot be consulted
    /// - [`ApiError::InsufficientFunds`] if the stake exceeds the balance
    /// - [`ApiError::Persistence`] on storage failure
    pub async fn place(&self, user_id: &UserId, slip: &WagerSlip) -> Result<Bet, ApiError> {
        let wager = slip.validate()?;

        let event = self.oracle.find_event(wager.event_id).await?;
        let Some(event) = event else {
            return Err(ApiError::EventNotFound(wager.event_id));
        };
        if !event.status.accepts_bets() {
            return Err(ApiError::EventClosed {
                event_id: event.event_id,
                status: event.status,
            });
        }

        let wallet = self.ledger.get_or_create(user_id, None).await?;
        if !wallet.covers(wager.stake) {
            tracing::debug!(
                %user_id,
                balance = %wallet.balance,
                stake = %wager.stake,
                "stake exceeds balance"
            );
            return Err(ApiError::InsufficientFunds);
        }

        let (bet, wallet) = self
            .store
            .commit_bet(&wager.into_new_bet(user_id.clone()))
            .await?;

        tracing::info!(
            %user_id,
            bet_id = bet.id,
            event_id = %bet.event_id,
            stake = %bet.amount,
            potential_win = %bet.potential_win,
            balance = %wallet.balance,
            "bet placed"
        );
        Ok(bet)
    }
}
