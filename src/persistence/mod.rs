//! Persistence layer: wallets and bets.
//!
//! [`WagerStore`] is the storage seam. [`postgres::PostgresStore`] is the
//! production implementation backed by `sqlx::PgPool`;
//! [`memory::MemoryStore`] keeps everything in process and backs the
//! test-suite and the `memory` storage backend.
//!
//! Every balance mutation is expressed as a single store-side operation:
//! credits are increments, debits are conditional decrements, and the bet
//! commit checks, inserts and debits under one wallet row lock.

pub mod memory;
pub mod models;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{Bet, BetStatus, NewBet, UserId, Wallet};
use crate::error::ApiError;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Durable storage for wallets and bets.
///
/// Implementations must make [`WagerStore::debit`] and
/// [`WagerStore::commit_bet`] atomic with respect to concurrent calls for
/// the same user: the sufficiency check and the decrement happen under the
/// same lock or inside the same transaction.
#[async_trait]
pub trait WagerStore: Send + Sync + fmt::Debug {
    /// Loads the wallet of `user_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn find_wallet(&self, user_id: &UserId) -> Result<Option<Wallet>, ApiError>;

    /// Creates a wallet with `balance` unless one already exists, then
    /// returns the stored wallet. Safe under concurrent first access.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn create_wallet(
        &self,
        user_id: &UserId,
        display_name: Option<&str>,
        balance: Decimal,
    ) -> Result<Wallet, ApiError>;

    /// Adds `amount` to the balance.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::WalletNotFound`] if the wallet does not exist,
    /// or [`ApiError::Persistence`] on storage failure.
    async fn credit(&self, user_id: &UserId, amount: Decimal) -> Result<Wallet, ApiError>;

    /// Subtracts `amount` from the balance only if the balance covers it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InsufficientFunds`] if the balance is lower than
    /// `amount`, [`ApiError::WalletNotFound`] if the wallet does not exist,
    /// or [`ApiError::Persistence`] on storage failure.
    async fn debit(&self, user_id: &UserId, amount: Decimal) -> Result<Wallet, ApiError>;

    /// Adds `amount` to the balance and increments the top-up counter.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::WalletNotFound`] if the wallet does not exist,
    /// or [`ApiError::Persistence`] on storage failure.
    async fn top_up(&self, user_id: &UserId, amount: Decimal) -> Result<Wallet, ApiError>;

    /// Replaces the denormalised display name.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::WalletNotFound`] if the wallet does not exist,
    /// or [`ApiError::Persistence`] on storage failure.
    async fn set_display_name(&self, user_id: &UserId, name: &str) -> Result<Wallet, ApiError>;

    /// Returns every wallet.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn list_wallets(&self) -> Result<Vec<Wallet>, ApiError>;

    /// Inserts a pending bet without touching the wallet.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn insert_bet(&self, bet: &NewBet) -> Result<Bet, ApiError>;

    /// Atomically re-checks the balance, inserts the bet as pending and
    /// debits the stake, in that order. Returns the stored bet and the
    /// wallet after the debit.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InsufficientFunds`] if the locked balance does
    /// not cover the stake, [`ApiError::WalletNotFound`] if the owner has no
    /// wallet, or [`ApiError::Persistence`] on storage failure. Nothing is
    /// written in any error case.
    async fn commit_bet(&self, bet: &NewBet) -> Result<(Bet, Wallet), ApiError>;

    /// Bets of `user_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn bets_for_user(&self, user_id: &UserId) -> Result<Vec<Bet>, ApiError>;

    /// Every bet, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn all_bets(&self) -> Result<Vec<Bet>, ApiError>;

    /// Loads a bet by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn find_bet(&self, id: i64) -> Result<Option<Bet>, ApiError>;

    /// Writes `status` and `result` on a bet that is still pending. The
    /// settlement timestamp is set for any status other than pending and
    /// cleared otherwise. Returns `None` if no pending bet has that id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn update_pending_bet(
        &self,
        id: i64,
        status: BetStatus,
        result: Option<&str>,
    ) -> Result<Option<Bet>, ApiError>;
}
