//! Leaderboard: users ranked by wallet balance.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{BetStatus, UserId};
use crate::error::ApiError;
use crate::persistence::WagerStore;

/// Maximum number of ranked entries returned.
pub const LEADERBOARD_SIZE: usize = 50;

/// One ranked user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// User id.
    pub user_id: UserId,
    /// Display name, or the user id when none is recorded.
    pub display_name: String,
    /// Wallet balance.
    #[schema(value_type = String, example = "1250.00")]
    pub balance: Decimal,
    /// Number of bets placed.
    pub total_bets: usize,
    /// Percentage of bets won, rounded to an integer.
    pub win_rate: u32,
}

/// Percentage of `won` over `total`, rounded half up; zero without bets.
#[must_use]
pub fn win_rate(won: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let rate = (200 * won + total) / (2 * total);
    u32::try_from(rate).unwrap_or(100)
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    total: usize,
    won: usize,
}

/// Builds the ranking from a full scan of wallets and bets.
///
/// Suitable for the small user base of a demo platform; there is no
/// incremental index.
#[derive(Debug, Clone)]
pub struct Leaderboard {
    store: Arc<dyn WagerStore>,
}

impl Leaderboard {
    /// Creates the aggregator over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn WagerStore>) -> Self {
        Self { store }
    }

    /// Top users by balance, at most [`LEADERBOARD_SIZE`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    pub async fn compute(&self) -> Result<Vec<LeaderboardEntry>, ApiError> {
        let wallets = self.store.list_wallets().await?;
        let bets = self.store.all_bets().await?;

        let mut tallies: HashMap<UserId, Tally> = HashMap::new();
        for bet in bets {
            let tally = tallies.entry(bet.user_id).or_default();
            tally.total += 1;
            if bet.status == BetStatus::Won {
                tally.won += 1;
            }
        }

        let mut entries: Vec<LeaderboardEntry> = wallets
            .into_iter()
            .map(|wallet| {
                let tally = tallies.get(&wallet.user_id).copied().unwrap_or_default();
                LeaderboardEntry {
                    display_name: wallet.label(),
                    user_id: wallet.user_id,
                    balance: wallet.balance,
                    total_bets: tally.total,
                    win_rate: win_rate(tally.won, tally.total),
                }
            })
            .collect();

        entries.sort_by(|a, b| match b.balance.cmp(&a.balance) {
            Ordering::Equal => a.user_id.cmp(&b.user_id),
            other => other,
        });
        entries.truncate(LEADERBOARD_SIZE);
        Ok(entries)
    }
}
