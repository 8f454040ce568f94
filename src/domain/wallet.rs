//! Per-user virtual-currency wallet.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use utoipa::ToSchema;

use super::UserId;

/// Balance assigned to a wallet when it is first created.
pub const STARTING_BALANCE: Decimal = dec!(1000.00);

/// Fixed amount credited by a user-initiated top-up.
pub const TOP_UP_AMOUNT: Decimal = dec!(1000.00);

/// A user's wallet as stored by the ledger.
///
/// The balance is only ever changed by the ledger's credit, debit and
/// top-up operations (or the bet commit, which debits under the same row
/// lock). It is never negative and is always carried at two fractional
/// digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    /// Storage row id.
    pub id: i64,
    /// Owner of the wallet (unique).
    pub user_id: UserId,
    /// Denormalised display name copied from the identity provider.
    pub display_name: Option<String>,
    /// Current balance.
    #[schema(value_type = String, example = "1000.00")]
    pub balance: Decimal,
    /// Number of top-ups performed so far.
    pub top_up_count: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last balance or name change.
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    /// Returns `true` if the balance covers `amount`.
    #[must_use]
    pub fn covers(&self, amount: Decimal) -> bool {
        self.balance >= amount
    }

    /// Display name for ranked views, falling back to the user id.
    #[must_use]
    pub fn label(&self) -> String {
        self.display_name
            .clone()
            .unwrap_or_else(|| self.user_id.to_string())
    }
}
