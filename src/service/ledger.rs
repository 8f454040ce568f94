//! Wallet ledger: the only writer of wallet balances.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::money::to_cents;
use crate::domain::wallet::{STARTING_BALANCE, TOP_UP_AMOUNT};
use crate::domain::{UserId, Wallet};
use crate::error::ApiError;
use crate::persistence::WagerStore;

/// Owns every balance mutation.
///
/// Credits and debits are single store-side operations; a debit that the
/// balance does not cover is refused by the store rather than applied.
#[derive(Debug, Clone)]
pub struct WalletLedger {
    store: Arc<dyn WagerStore>,
}

fn positive(amount: Decimal) -> Result<Decimal, ApiError> {
    let amount = to_cents(amount);
    if amount <= Decimal::ZERO {
        return Err(ApiError::InvalidRequest(format!(
            "amount must be positive, got {amount}"
        )));
    }
    Ok(amount)
}

impl WalletLedger {
    /// Creates a ledger over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn WagerStore>) -> Self {
        Self { store }
    }

    /// Returns the wallet of `user_id`, creating it with the starting
    /// balance on first access.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    pub async fn get_or_create(
        &self,
        user_id: &UserId,
        display_name: Option<&str>,
    ) -> Result<Wallet, ApiError> {
        if let Some(wallet) = self.store.find_wallet(user_id).await? {
            return Ok(wallet);
        }
        let wallet = self
            .store
            .create_wallet(user_id, display_name, STARTING_BALANCE)
            .await?;
        tracing::info!(%user_id, balance = %wallet.balance, "wallet created");
        Ok(wallet)
    }

    /// Adds `amount` to the balance.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] for a non-positive amount,
    /// [`ApiError::WalletNotFound`] if the wallet does not exist, or
    /// [`ApiError::Persistence`] on storage failure.
    pub async fn credit(&self, user_id: &UserId, amount: Decimal) -> Result<Wallet, ApiError> {
        let amount = positive(amount)?;
        self.store.credit(user_id, amount).await
    }

    /// Subtracts `amount` from the balance if it is covered.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] for a non-positive amount,
    /// [`ApiError::InsufficientFunds`] if the balance is too low,
    /// [`ApiError::WalletNotFound`] if the wallet does not exist, or
    /// [`ApiError::Persistence`] on storage failure.
    pub async fn debit(&self, user_id: &UserId, amount: Decimal) -> Result<Wallet, ApiError> {
        let amount = positive(amount)?;
        self.store.debit(user_id, amount).await
    }

    /// Credits the fixed top-up amount and bumps the top-up counter,
    /// creating the wallet first if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    pub async fn top_up(&self, user_id: &UserId) -> Result<Wallet, ApiError> {
        self.get_or_create(user_id, None).await?;
        let wallet = self.store.top_up(user_id, TOP_UP_AMOUNT).await?;
        tracing::info!(
            %user_id,
            balance = %wallet.balance,
            top_up_count = wallet.top_up_count,
            "wallet topped up"
        );
        Ok(wallet)
    }

    /// Stores `display_name` if it differs from the recorded one. Blank
    /// or absent names leave the wallet untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::WalletNotFound`] if the wallet does not exist,
    /// or [`ApiError::Persistence`] on storage failure.
    pub async fn rename_if_changed(
        &self,
        user_id: &UserId,
        display_name: Option<&str>,
    ) -> Result<Wallet, ApiError> {
        let wallet = self
            .store
            .find_wallet(user_id)
            .await?
            .ok_or_else(|| ApiError::WalletNotFound(user_id.to_string()))?;

        match display_name.map(str::trim) {
            Some(name) if !name.is_empty() && wallet.display_name.as_deref() != Some(name) => {
                tracing::debug!(%user_id, name, "wallet display name updated");
                self.store.set_display_name(user_id, name).await
            }
            _ => Ok(wallet),
        }
    }
}
