//! Database row models for wallets and bets.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::{Bet, EventId, UserId, Wallet};
use crate::error::ApiError;

/// A row of the `wallets` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WalletRow {
    /// Auto-increment row ID.
    pub id: i64,
    /// Owning user (unique).
    pub user_id: String,
    /// Denormalised display name.
    pub display_name: Option<String>,
    /// `NUMERIC(12,2)` balance.
    pub balance: Decimal,
    /// Number of top-ups.
    pub top_up_count: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<WalletRow> for Wallet {
    fn from(row: WalletRow) -> Self {
        Self {
            id: row.id,
            user_id: UserId::from(row.user_id),
            display_name: row.display_name,
            balance: row.balance,
            top_up_count: row.top_up_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// A row of the `bets` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BetRow {
    /// Auto-increment row ID.
    pub id: i64,
    /// Owning user.
    pub user_id: String,
    /// Feed id of the event.
    pub event_id: i64,
    /// Event display name.
    pub event_name: String,
    /// Selection label.
    pub selection: String,
    /// `NUMERIC(6,2)` odds.
    pub odds: Decimal,
    /// `NUMERIC(12,2)` stake.
    pub amount: Decimal,
    /// `NUMERIC(12,2)` payout.
    pub potential_win: Decimal,
    /// Status discriminator (`"pending"`, `"won"`, `"lost"`).
    pub status: String,
    /// Result annotation.
    pub result: Option<String>,
    /// Placement timestamp.
    pub created_at: DateTime<Utc>,
    /// Settlement timestamp.
    pub settled_at: Option<DateTime<Utc>>,
}

impl TryFrom<BetRow> for Bet {
    type Error = ApiError;

    fn try_from(row: BetRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse()
            .map_err(|e| ApiError::Persistence(format!("bet {}: {e}", row.id)))?;
        Ok(Self {
            id: row.id,
            user_id: UserId::from(row.user_id),
            event_id: EventId::new(row.event_id),
            event_name: row.event_name,
            selection: row.selection,
            odds: row.odds,
            amount: row.amount,
            potential_win: row.potential_win,
            status,
            result: row.result,
            created_at: row.created_at,
            settled_at: row.settled_at,
        })
    }
}

/// Converts a batch of rows, failing on the first unreadable status.
///
/// # Errors
///
/// Returns [`ApiError::Persistence`] if a row carries an unknown status.
pub fn bets_from_rows(rows: Vec<BetRow>) -> Result<Vec<Bet>, ApiError> {
    rows.into_iter().map(Bet::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BetStatus;
    use rust_decimal_macros::dec;

    fn row(status: &str) -> BetRow {
        BetRow {
            id: 7,
            user_id: "u1".into(),
            event_id: 1001,
            event_name: "Spartak - CSKA".into(),
            selection: "win1".into(),
            odds: dec!(1.85),
            amount: dec!(10.00),
            potential_win: dec!(18.50),
            status: status.into(),
            result: None,
            created_at: Utc::now(),
            settled_at: None,
        }
    }

    #[test]
    fn converts_known_status() {
        let bet = Bet::try_from(row("won"));
        assert!(matches!(bet, Ok(Bet { status: BetStatus::Won, id: 7, .. })));
    }

    #[test]
    fn rejects_unknown_status() {
        let result = bets_from_rows(vec![row("pending"), row("refunded")]);
        assert!(matches!(result, Err(ApiError::Persistence(_))));
    }
}
