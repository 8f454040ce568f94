//! Bet records and their settlement status.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;
use super::sport_event::EventId;

/// Settlement status of a bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    /// Placed and awaiting settlement.
    Pending,
    /// Settled as a win.
    Won,
    /// Settled as a loss.
    Lost,
}

impl BetStatus {
    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }

    /// Returns `true` once the bet has left `pending`.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for BetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a status string is not one of the known values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown bet status: {0}")]
pub struct UnknownBetStatus(pub String);

impl FromStr for BetStatus {
    type Err = UnknownBetStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "won" => Ok(Self::Won),
            "lost" => Ok(Self::Lost),
            other => Err(UnknownBetStatus(other.to_string())),
        }
    }
}

/// A persisted wager.
///
/// Everything except `status`, `result` and `settled_at` is fixed at
/// creation. `potential_win` is computed once from `amount` and `odds`
/// and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bet {
    /// Storage row id.
    pub id: i64,
    /// Owner of the bet.
    pub user_id: UserId,
    /// Feed id of the event the bet was placed on.
    pub event_id: EventId,
    /// Event display name as shown to the user.
    pub event_name: String,
    /// Selection label (e.g. the home win).
    pub selection: String,
    /// Decimal odds at two fractional digits.
    #[schema(value_type = String, example = "2.50")]
    pub odds: Decimal,
    /// Stake at two fractional digits.
    #[schema(value_type = String, example = "100.00")]
    pub amount: Decimal,
    /// `amount × odds`, rounded to two fractional digits.
    #[schema(value_type = String, example = "250.00")]
    pub potential_win: Decimal,
    /// Settlement status.
    pub status: BetStatus,
    /// Free-form result annotation set on settlement.
    pub result: Option<String>,
    /// Placement timestamp.
    pub created_at: DateTime<Utc>,
    /// Set when the bet leaves `pending`.
    pub settled_at: Option<DateTime<Utc>>,
}

/// A validated bet ready to be committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBet {
    /// Owner of the bet.
    pub user_id: UserId,
    /// Feed id of the event.
    pub event_id: EventId,
    /// Event display name.
    pub event_name: String,
    /// Selection label.
    pub selection: String,
    /// Odds normalised to two fractional digits.
    pub odds: Decimal,
    /// Stake normalised to two fractional digits.
    pub amount: Decimal,
    /// Precomputed payout.
    pub potential_win: Decimal,
}
