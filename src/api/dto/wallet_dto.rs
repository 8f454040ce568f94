//! Wallet response DTO.

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Wallet;

/// Response body for `GET /api/wallet` and `POST /api/wallet/topup`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WalletResponse {
    /// Current balance.
    #[schema(value_type = String, example = "1000.00")]
    pub balance: Decimal,
    /// Number of top-ups performed so far.
    pub top_up_count: i32,
    /// Replacement bearer token when the provider rotated it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_token: Option<String>,
}

impl WalletResponse {
    /// Builds the response from a wallet and an optional rotated token.
    #[must_use]
    pub fn new(wallet: &Wallet, new_token: Option<String>) -> Self {
        Self {
            balance: wallet.balance,
            top_up_count: wallet.top_up_count,
            new_token,
        }
    }
}
