//! PostgreSQL implementation of the persistence layer.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::WagerStore;
use super::models::{BetRow, WalletRow, bets_from_rows};
use crate::domain::{Bet, BetStatus, NewBet, UserId, Wallet};
use crate::error::ApiError;

/// Embedded schema migrations from `migrations/`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// PostgreSQL-backed store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), ApiError> {
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))
    }
}

#[async_trait]
impl WagerStore for PostgresStore {
    async fn find_wallet(&self, user_id: &UserId) -> Result<Option<Wallet>, ApiError> {
        let row = sqlx::query_as::<_, WalletRow>(
            "SELECT id, user_id, display_name, balance, top_up_count, created_at, updated_at \
             FROM wallets WHERE user_id = $1",
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Wallet::from))
    }

    async fn create_wallet(
        &self,
        user_id: &UserId,
        display_name: Option<&str>,
        balance: Decimal,
    ) -> Result<Wallet, ApiError> {
        sqlx::query(
            "INSERT INTO wallets (user_id, display_name, balance) VALUES ($1, $2, $3) \
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id.as_str())
        .bind(display_name)
        .bind(balance)
        .execute(&self.pool)
        .await?;

        self.find_wallet(user_id)
            .await?
            .ok_or_else(|| {
                ApiError::Internal(format!("wallet for {user_id} vanished after insert"))
            })
    }

    async fn credit(&self, user_id: &UserId, amount: Decimal) -> Result<Wallet, ApiError> {
        let row = sqlx::query_as::<_, WalletRow>(
            "UPDATE wallets SET balance = balance + $2, updated_at = now() WHERE user_id = $1 \
             RETURNING id, user_id, display_name, balance, top_up_count, created_at, updated_at",
        )
        .bind(user_id.as_str())
        .bind(amount)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Wallet::from)
            .ok_or_else(|| ApiError::WalletNotFound(user_id.to_string()))
    }

    async fn debit(&self, user_id: &UserId, amount: Decimal) -> Result<Wallet, ApiError> {
        let row = sqlx::query_as::<_, WalletRow>(
            "UPDATE wallets SET balance = balance - $2, updated_at = now() \
             WHERE user_id = $1 AND balance >= $2 \
             RETURNING id, user_id, display_name, balance, top_up_count, created_at, updated_at",
        )
        .bind(user_id.as_str())
        .bind(amount)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(row.into()),
            None if self.find_wallet(user_id).await?.is_some() => Err(ApiError::InsufficientFunds),
            None => Err(ApiError::WalletNotFound(user_id.to_string())),
        }
    }

    async fn top_up(&self, user_id: &UserId, amount: Decimal) -> Result<Wallet, ApiError> {
        let row = sqlx::query_as::<_, WalletRow>(
            "UPDATE wallets SET balance = balance + $2, top_up_count = top_up_count + 1, \
             updated_at = now() WHERE user_id = $1 \
             RETURNING id, user_id, display_name, balance, top_up_count, created_at, updated_at",
        )
        .bind(user_id.as_str())
        .bind(amount)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Wallet::from)
            .ok_or_else(|| ApiError::WalletNotFound(user_id.to_string()))
    }

    async fn set_display_name(&self, user_id: &UserId, name: &str) -> Result<Wallet, ApiError> {
        let row = sqlx::query_as::<_, WalletRow>(
            "UPDATE wallets SET display_name = $2, updated_at = now() WHERE user_id = $1 \
             RETURNING id, user_id, display_name, balance, top_up_count, created_at, updated_at",
        )
        .bind(user_id.as_str())
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Wallet::from)
            .ok_or_else(|| ApiError::WalletNotFound(user_id.to_string()))
    }

    async fn list_wallets(&self) -> Result<Vec<Wallet>, ApiError> {
        let rows = sqlx::query_as::<_, WalletRow>(
            "SELECT id, user_id, display_name, balance, top_up_count, created_at, updated_at \
             FROM wallets",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Wallet::from).collect())
    }

    async fn insert_bet(&self, bet: &NewBet) -> Result<Bet, ApiError> {
        let row = sqlx::query_as::<_, BetRow>(
            "INSERT INTO bets (user_id, event_id, event_name, selection, odds, amount, potential_win, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending') \
             RETURNING id, user_id, event_id, event_name, selection, odds, amount, potential_win, \
             status, result, created_at, settled_at",
        )
        .bind(bet.user_id.as_str())
        .bind(bet.event_id.get())
        .bind(&bet.event_name)
        .bind(&bet.selection)
        .bind(bet.odds)
        .bind(bet.amount)
        .bind(bet.potential_win)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn commit_bet(&self, bet: &NewBet) -> Result<(Bet, Wallet), ApiError> {
        let mut tx = self.pool.begin().await?;

        let balance = sqlx::query_scalar::<_, Decimal>(
            "SELECT balance FROM wallets WHERE user_id = $1 FOR UPDATE",
        )
        .bind(bet.user_id.as_str())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::WalletNotFound(bet.user_id.to_string()))?;

        if balance < bet.amount {
            return Err(ApiError::InsufficientFunds);
        }

        let bet_row = sqlx::query_as::<_, BetRow>(
            "INSERT INTO bets (user_id, event_id, event_name, selection, odds, amount, potential_win, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending') \
             RETURNING id, user_id, event_id, event_name, selection, odds, amount, potential_win, \
             status, result, created_at, settled_at",
        )
        .bind(bet.user_id.as_str())
        .bind(bet.event_id.get())
        .bind(&bet.event_name)
        .bind(&bet.selection)
        .bind(bet.odds)
        .bind(bet.amount)
        .bind(bet.potential_win)
        .fetch_one(&mut *tx)
        .await?;

        let wallet_row = sqlx::query_as::<_, WalletRow>(
            "UPDATE wallets SET balance = balance - $2, updated_at = now() WHERE user_id = $1 \
             RETURNING id, user_id, display_name, balance, top_up_count, created_at, updated_at",
        )
        .bind(bet.user_id.as_str())
        .bind(bet.amount)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((bet_row.try_into()?, wallet_row.into()))
    }

    async fn bets_for_user(&self, user_id: &UserId) -> Result<Vec<Bet>, ApiError> {
        let rows = sqlx::query_as::<_, BetRow>(
            "SELECT id, user_id, event_id, event_name, selection, odds, amount, potential_win, \
             status, result, created_at, settled_at \
             FROM bets WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        bets_from_rows(rows)
    }

    async fn all_bets(&self) -> Result<Vec<Bet>, ApiError> {
        let rows = sqlx::query_as::<_, BetRow>(
            "SELECT id, user_id, event_id, event_name, selection, odds, amount, potential_win, \
             status, result, created_at, settled_at FROM bets",
        )
        .fetch_all(&self.pool)
        .await?;

        bets_from_rows(rows)
    }

    async fn find_bet(&self, id: i64) -> Result<Option<Bet>, ApiError> {
        let row = sqlx::query_as::<_, BetRow>(
            "SELECT id, user_id, event_id, event_name, selection, odds, amount, potential_win, \
             status, result, created_at, settled_at FROM bets WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Bet::try_from).transpose()
    }

    async fn update_pending_bet(
        &self,
        id: i64,
        status: BetStatus,
        result: Option<&str>,
    ) -> Result<Option<Bet>, ApiError> {
        let row = sqlx::query_as::<_, BetRow>(
            "UPDATE bets SET status = $2, result = $3, \
             settled_at = CASE WHEN $2 = 'pending' THEN NULL ELSE now() END \
             WHERE id = $1 AND status = 'pending' \
             RETURNING id, user_id, event_id, event_name, selection, odds, amount, potential_win, \
             status, result, created_at, settled_at",
        )
        .bind(id)
        .bind(status.as_str())
        .bind(result)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Bet::try_from).transpose()
    }
}
