//! In-process store for tests and database-less runs.
//!
//! All state sits behind one [`tokio::sync::RwLock`], so every mutation
//! (including the check-insert-debit sequence of a bet commit) is
//! serialized the same way a row lock serializes it in PostgreSQL.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use super::WagerStore;
use crate::domain::money::to_cents;
use crate::domain::{Bet, BetStatus, NewBet, UserId, Wallet};
use crate::error::ApiError;

#[derive(Debug, Default)]
struct MemoryState {
    wallets: HashMap<UserId, Wallet>,
    bets: Vec<Bet>,
    last_wallet_id: i64,
    last_bet_id: i64,
}

impl MemoryState {
    fn wallet_mut(&mut self, user_id: &UserId) -> Result<&mut Wallet, ApiError> {
        self.wallets
            .get_mut(user_id)
            .ok_or_else(|| ApiError::WalletNotFound(user_id.to_string()))
    }

    fn push_bet(&mut self, bet: &NewBet) -> Bet {
        self.last_bet_id += 1;
        let stored = Bet {
            id: self.last_bet_id,
            user_id: bet.user_id.clone(),
            event_id: bet.event_id,
            event_name: bet.event_name.clone(),
            selection: bet.selection.clone(),
            odds: to_cents(bet.odds),
            amount: to_cents(bet.amount),
            potential_win: to_cents(bet.potential_win),
            status: BetStatus::Pending,
            result: None,
            created_at: Utc::now(),
            settled_at: None,
        };
        self.bets.push(stored.clone());
        stored
    }
}

/// Wallets and bets held in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn apply_delta(wallet: &mut Wallet, delta: Decimal) {
    wallet.balance = to_cents(wallet.balance + delta);
    wallet.updated_at = Utc::now();
}

#[async_trait]
impl WagerStore for MemoryStore {
    async fn find_wallet(&self, user_id: &UserId) -> Result<Option<Wallet>, ApiError> {
        Ok(self.state.read().await.wallets.get(user_id).cloned())
    }

    async fn create_wallet(
        &self,
        user_id: &UserId,
        display_name: Option<&str>,
        balance: Decimal,
    ) -> Result<Wallet, ApiError> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.wallets.get(user_id) {
            return Ok(existing.clone());
        }
        state.last_wallet_id += 1;
        let now = Utc::now();
        let wallet = Wallet {
            id: state.last_wallet_id,
            user_id: user_id.clone(),
            display_name: display_name.map(str::to_string),
            balance: to_cents(balance),
            top_up_count: 0,
            created_at: now,
            updated_at: now,
        };
        state.wallets.insert(user_id.clone(), wallet.clone());
        Ok(wallet)
    }

    async fn credit(&self, user_id: &UserId, amount: Decimal) -> Result<Wallet, ApiError> {
        let mut state = self.state.write().await;
        let wallet = state.wallet_mut(user_id)?;
        apply_delta(wallet, amount);
        Ok(wallet.clone())
    }

    async fn debit(&self, user_id: &UserId, amount: Decimal) -> Result<Wallet, ApiError> {
        let mut state = self.state.write().await;
        let wallet = state.wallet_mut(user_id)?;
        if !wallet.covers(amount) {
            return Err(ApiError::InsufficientFunds);
        }
        apply_delta(wallet, -amount);
        Ok(wallet.clone())
    }

    async fn top_up(&self, user_id: &UserId, amount: Decimal) -> Result<Wallet, ApiError> {
        let mut state = self.state.write().await;
        let wallet = state.wallet_mut(user_id)?;
        apply_delta(wallet, amount);
        wallet.top_up_count += 1;
        Ok(wallet.clone())
    }

    async fn set_display_name(&self, user_id: &UserId, name: &str) -> Result<Wallet, ApiError> {
        let mut state = self.state.write().await;
        let wallet = state.wallet_mut(user_id)?;
        wallet.display_name = Some(name.to_string());
        wallet.updated_at = Utc::now();
        Ok(wallet.clone())
    }

    async fn list_wallets(&self) -> Result<Vec<Wallet>, ApiError> {
        Ok(self.state.read().await.wallets.values().cloned().collect())
    }

    async fn insert_bet(&self, bet: &NewBet) -> Result<Bet, ApiError> {
        Ok(self.state.write().await.push_bet(bet))
    }

    async fn commit_bet(&self, bet: &NewBet) -> Result<(Bet, Wallet), ApiError> {
        let mut state = self.state.write().await;
        if !state.wallet_mut(&bet.user_id)?.covers(bet.amount) {
            return Err(ApiError::InsufficientFunds);
        }
        let stored = state.push_bet(bet);
        let wallet = state.wallet_mut(&bet.user_id)?;
        apply_delta(wallet, -bet.amount);
        Ok((stored, wallet.clone()))
    }

    async fn bets_for_user(&self, user_id: &UserId) -> Result<Vec<Bet>, ApiError> {
        let state = self.state.read().await;
        let mut bets: Vec<Bet> = state
            .bets
            .iter()
            .filter(|b| &b.user_id == user_id)
            .cloned()
            .collect();
        bets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(bets)
    }

    async fn all_bets(&self) -> Result<Vec<Bet>, ApiError> {
        Ok(self.state.read().await.bets.clone())
    }

    async fn find_bet(&self, id: i64) -> Result<Option<Bet>, ApiError> {
        Ok(self
            .state
            .read()
            .await
            .bets
            .iter()
            .find(|b| b.id == id)
            .cloned())
    }

    async fn update_pending_bet(
        &self,
        id: i64,
        status: BetStatus,
        result: Option<&str>,
    ) -> Result<Option<Bet>, ApiError> {
        let mut state = self.state.write().await;
        let Some(bet) = state
            .bets
            .iter_mut()
            .find(|b| b.id == id && b.status == BetStatus::Pending)
        else {
            return Ok(None);
        };
        bet.status = status;
        bet.result = result.map(str::to_string);
        bet.settled_at = status.is_settled().then(Utc::now);
        Ok(Some(bet.clone()))
    }
}
